/*!
 * Tests for the create-or-update orchestration
 */

use std::sync::Arc;

use lingolink::content::{ContentStore, MemoryStore, NewRecord, RecordStatus};
use lingolink::errors::TranslationError;
use lingolink::providers::mock::MockProvider;
use lingolink::translation::{Orchestrator, Outcome};

use crate::common::mock_store::FailingStore;
use crate::common::{create_record, hello_world_store, orchestrator_for, test_config};

#[tokio::test]
async fn test_translateRecord_createBranch_shouldCopyAttributesAndForceDraft() {
    let store = Arc::new(MemoryStore::new());
    let source = store
        .create_record(
            NewRecord::draft("Hello", "World")
                .author("alice")
                .status(RecordStatus::Publish),
        )
        .await
        .unwrap();
    let orchestrator = orchestrator_for(store.clone(), MockProvider::prefixed());

    let report = orchestrator.translate_record(source, "es").await.unwrap();
    let created = store.get_record(report.record_id).await.unwrap().unwrap();

    assert_eq!(report.outcome, Outcome::Created);
    assert_eq!(created.title, "[es] Hello");
    assert_eq!(created.status, RecordStatus::Draft);
    assert_eq!(created.author.as_deref(), Some("alice"));
    assert_eq!(created.record_type, "post");
    assert_eq!(report.edit_reference, format!("post.php?post={}&action=edit", report.record_id));
}

#[tokio::test]
async fn test_translateRecord_withTaggedSource_shouldKeepSourceLanguage() {
    let (store, source) = hello_world_store().await;
    store.set_record_language(source, "fr").await.unwrap();
    let provider = MockProvider::echo();
    let orchestrator = orchestrator_for(store.clone(), provider.clone());

    let report = orchestrator.translate_record(source, "es").await.unwrap();

    assert_eq!(report.source_locale, "fr");
    assert_eq!(store.get_record_language(source).await.unwrap().as_deref(), Some("fr"));
    assert_eq!(report.group.get("fr"), Some(source));
    assert_eq!(provider.calls()[0].source_locale, "fr");
    assert_eq!(provider.calls()[0].target_locale, "es");
}

#[tokio::test]
async fn test_translateRecord_shouldNormalizeTargetLocale() {
    let (store, source) = hello_world_store().await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::echo());

    let first = orchestrator.translate_record(source, "pt_br").await.unwrap();
    let second = orchestrator.translate_record(source, "PT-BR").await.unwrap();

    assert_eq!(first.target_locale, "pt-BR");
    assert_eq!(second.outcome, Outcome::Updated);
    assert_eq!(second.record_id, first.record_id);
}

#[tokio::test]
async fn test_translateRecord_withBlankSource_shouldFailValidation() {
    let store = Arc::new(MemoryStore::new());
    let source = create_record(store.as_ref(), " ", "").await;
    let provider = MockProvider::echo();
    let orchestrator = orchestrator_for(store.clone(), provider.clone());

    let result = orchestrator.translate_record(source, "es").await;
    assert!(matches!(result, Err(TranslationError::Validation(_))));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateRecord_withCreateFailure_shouldLeaveGroupUntouched() {
    let store = Arc::new(FailingStore::new(MemoryStore::new()));
    let source = create_record(store.as_ref(), "Hello", "World").await;
    store.fail_create(true);
    let writes_before = store.write_count();
    let orchestrator = orchestrator_for(store.clone(), MockProvider::echo());

    let result = orchestrator.translate_record(source, "es").await;

    assert!(matches!(result, Err(TranslationError::Persistence(_))));
    assert_eq!(store.write_count(), writes_before);
    assert!(store.inner().get_group_meta(source).await.unwrap().is_none());
    assert_eq!(store.inner().get_record_language(source).await.unwrap(), None);
}

#[tokio::test]
async fn test_translateRecord_withUpdateFailure_shouldKeepGroupAndTarget() {
    let store = Arc::new(FailingStore::new(MemoryStore::new()));
    let source = create_record(store.as_ref(), "Hello", "World").await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::prefixed());
    let created = orchestrator.translate_record(source, "es").await.unwrap();
    let group_before = store.inner().get_group_meta(source).await.unwrap();

    store.fail_update(true);
    let result = orchestrator.translate_record(source, "es").await;

    assert!(matches!(result, Err(TranslationError::Persistence(_))));
    assert_eq!(store.inner().get_group_meta(source).await.unwrap(), group_before);
    let target = store.inner().get_record(created.record_id).await.unwrap().unwrap();
    assert_eq!(target.title, "[es] Hello");
}

#[tokio::test]
async fn test_translateRecord_updateBranch_shouldOnlyPatchText() {
    let (store, source) = hello_world_store().await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::prefixed());
    let created = orchestrator.translate_record(source, "de").await.unwrap();

    // An editor publishes the translation, then the source changes
    store.update_record(source, lingolink::content::RecordPatch {
        title: "Hello again".to_string(),
        body: "World".to_string(),
        excerpt: Some("Short".to_string()),
    })
    .await
    .unwrap();

    let updated = orchestrator.translate_record(source, "de").await.unwrap();
    let target = store.get_record(created.record_id).await.unwrap().unwrap();

    assert_eq!(updated.outcome, Outcome::Updated);
    assert_eq!(target.title, "[de] Hello again");
    assert_eq!(target.excerpt.as_deref(), Some("[de] Short"));
    assert_eq!(target.language.as_deref(), Some("de"));
}

#[tokio::test]
async fn test_translateRecord_withSourceListedUnderTarget_shouldCreate() {
    let (store, source) = hello_world_store().await;
    let bogus = [("es".to_string(), source)].into_iter().collect();
    store.set_group_meta(source, &bogus).await.unwrap();
    let orchestrator = orchestrator_for(store.clone(), MockProvider::echo());

    let report = orchestrator.translate_record(source, "es").await.unwrap();

    assert_eq!(report.outcome, Outcome::Created);
    assert_ne!(report.record_id, source);
    assert_eq!(report.group.get("en"), Some(source));
    assert_eq!(report.group.get("es"), Some(report.record_id));
}

#[tokio::test]
async fn test_translateString_shouldUseDefaultSourceLocale() {
    let store = Arc::new(MemoryStore::new());
    let provider = MockProvider::prefixed();
    let config = lingolink::Config {
        default_source_locale: "fr".to_string(),
        ..test_config()
    };
    let orchestrator = Orchestrator::new(store, Arc::new(provider.clone()), config);

    let result = orchestrator.translate_string("Bonjour", "de").await.unwrap();

    assert_eq!(result.translated, "[de] Bonjour");
    assert!(result.was_translated);
    assert_eq!(provider.calls()[0].source_locale, "fr");
}
