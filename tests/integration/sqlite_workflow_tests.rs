/*!
 * End-to-end runs against the SQLite content store
 */

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use lingolink::app_config::{Config, TranslationProvider};
use lingolink::app_controller::{Caller, Controller, TRANSLATE_RECORD_ACTION};
use lingolink::content::{ContentStore, NewRecord};
use lingolink::database::{DatabaseConnection, SqliteStore};
use lingolink::providers::mock::MockProvider;
use lingolink::providers::ConfiguredProviderFactory;
use lingolink::translation::Outcome;

use crate::common::orchestrator_for;

#[tokio::test]
async fn test_sqliteStore_echoRoundTrip_shouldPersistGroupOnBothRecords() -> Result<()> {
    let store = Arc::new(SqliteStore::new_in_memory()?);
    let source = store.create_record(NewRecord::draft("Hello", "World")).await?;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::echo());

    let report = orchestrator.translate_record(source, "es").await?;

    let created = store.get_record(report.record_id).await?.expect("translation should exist");
    assert_eq!(created.title, "Hello");
    assert_eq!(created.language.as_deref(), Some("es"));
    assert_eq!(store.get_group_meta(source).await?, store.get_group_meta(report.record_id).await?);
    assert_eq!(store.get_record_language(source).await?.as_deref(), Some("en"));
    Ok(())
}

#[tokio::test]
async fn test_sqliteStore_onDisk_shouldSurviveReopen() -> Result<()> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("content.db");

    let (source, translation) = {
        let store = Arc::new(SqliteStore::new(DatabaseConnection::new(&db_path)?));
        let source = store.create_record(NewRecord::draft("Hello", "World")).await?;
        let report = orchestrator_for(store.clone(), MockProvider::prefixed())
            .translate_record(source, "fr")
            .await?;
        (source, report.record_id)
    };

    let reopened = Arc::new(SqliteStore::new(DatabaseConnection::new(&db_path)?));
    let report = orchestrator_for(reopened.clone(), MockProvider::prefixed())
        .translate_record(source, "fr")
        .await?;

    assert_eq!(report.outcome, Outcome::Updated);
    assert_eq!(report.record_id, translation);
    Ok(())
}

#[tokio::test]
async fn test_controller_withEchoProvider_shouldRunOffline() -> Result<()> {
    let config = Config {
        provider: TranslationProvider::Echo,
        ..Config::default()
    };
    let store = Arc::new(SqliteStore::new_in_memory()?);
    let source = store.create_record(NewRecord::draft("Hello", "World").excerpt("Hi")).await?;
    let controller = Controller::new(Arc::new(config), store.clone(), Arc::new(ConfiguredProviderFactory));
    let caller = Caller::administrator("admin");

    let nonce = controller.issue_nonce(&caller, TRANSLATE_RECORD_ACTION)?;
    let reply = controller.translate_record(&caller, &nonce, source, "it").await?;

    assert_eq!(reply.outcome, Outcome::Created);
    assert_eq!(reply.fields.len(), 3);
    let created = store.get_record(reply.record_id).await?.expect("translation should exist");
    assert_eq!(created.excerpt.as_deref(), Some("Hi"));

    let stats = store.connection().stats()?;
    assert_eq!(stats.record_count, 2);
    assert_eq!(stats.tagged_count, 2);
    assert_eq!(stats.grouped_count, 2);
    Ok(())
}

#[test]
fn test_sqliteStore_afterTranslationDeleted_shouldRecreateAndRelink() {
    let result = tokio_test::block_on(async {
        let store = Arc::new(SqliteStore::new_in_memory()?);
        let source = store.create_record(NewRecord::draft("Hello", "World")).await?;
        let orchestrator = orchestrator_for(store.clone(), MockProvider::prefixed());

        let first = orchestrator.translate_record(source, "de").await?;
        store.delete_record(first.record_id).await?;
        let second = orchestrator.translate_record(source, "de").await?;

        assert_eq!(second.outcome, Outcome::Created);
        assert_ne!(second.record_id, first.record_id);
        let group = store.get_group_meta(source).await?.unwrap_or_default();
        assert_eq!(group.get("de"), Some(&second.record_id));
        Ok::<(), anyhow::Error>(())
    });

    assert!(result.is_ok(), "workflow failed: {:?}", result.err());
}
