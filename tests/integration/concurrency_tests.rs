/*!
 * Concurrent requests on the same translation slot
 */

use std::sync::Arc;

use lingolink::app_config::Config;
use lingolink::app_controller::{Caller, Controller, TRANSLATE_RECORD_ACTION};
use lingolink::content::{ContentStore, GroupMeta};
use lingolink::errors::{AppError, ProviderError, TranslationError};
use lingolink::providers::mock::{MockFailure, MockProvider};
use lingolink::providers::Provider;
use lingolink::translation::Outcome;

use crate::common::{hello_world_store, orchestrator_for, test_config};

#[tokio::test]
async fn test_sameSlot_concurrently_shouldRejectSecondRequest() {
    let (store, source) = hello_world_store().await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::slow(50));

    let (first, second) = tokio::join!(
        orchestrator.translate_record(source, "es"),
        orchestrator.translate_record(source, "es"),
    );

    assert_eq!(first.unwrap().outcome, Outcome::Created);
    assert!(matches!(
        second,
        Err(TranslationError::SlotBusy { record_id, ref locale }) if record_id == source && locale == "es"
    ));
    // Exactly one translation was created
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_differentSlots_concurrently_shouldLinkBoth() {
    let (store, source) = hello_world_store().await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::slow(20));

    let (es, fr) = tokio::join!(
        orchestrator.translate_record(source, "es"),
        orchestrator.translate_record(source, "fr"),
    );

    let es = es.unwrap();
    let fr = fr.unwrap();
    assert_eq!(es.outcome, Outcome::Created);
    assert_eq!(fr.outcome, Outcome::Created);
    assert_eq!(store.len(), 3);

    // Both slots end up in every member's copy of the group. Stores that
    // yield between the re-read and the writes (SQLite) can still lose one
    // of two racing links; only requests on the same slot are serialized.
    let expected: GroupMeta = [
        ("en".to_string(), source),
        ("es".to_string(), es.record_id),
        ("fr".to_string(), fr.record_id),
    ]
    .into_iter()
    .collect();
    for member in [source, es.record_id, fr.record_id] {
        assert_eq!(store.get_group_meta(member).await.unwrap(), Some(expected.clone()));
    }
}

#[tokio::test]
async fn test_slotLease_shouldBeReleasedAfterFailure() {
    let (store, source) = hello_world_store().await;
    let orchestrator = orchestrator_for(store.clone(), MockProvider::failing(MockFailure::Connection));

    for _ in 0..2 {
        let result = orchestrator.translate_record(source, "es").await;
        assert!(matches!(result, Err(TranslationError::Provider(_))));
    }
}

#[tokio::test]
async fn test_controller_shouldShareLeasesAcrossRequests() {
    let (store, source) = hello_world_store().await;
    let factory = |_: &Config| -> Result<Arc<dyn Provider>, ProviderError> { Ok(Arc::new(MockProvider::slow(50))) };
    let controller = Controller::new(Arc::new(test_config()), store.clone(), Arc::new(factory));
    let caller = Caller::administrator("admin");
    let nonce = controller.issue_nonce(&caller, TRANSLATE_RECORD_ACTION).unwrap();

    let (first, second) = tokio::join!(
        controller.translate_record(&caller, &nonce, source, "de"),
        controller.translate_record(&caller, &nonce, source, "de"),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Translation(TranslationError::SlotBusy { .. }))));
    assert!(!controller.leases().is_held(source, "de"));
}
