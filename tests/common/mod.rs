/*!
 * Common test utilities for the lingolink test suite
 */

use std::sync::Arc;

use lingolink::app_config::Config;
use lingolink::content::{ContentStore, MemoryStore, NewRecord, RecordId};
use lingolink::providers::mock::MockProvider;
use lingolink::translation::Orchestrator;

// Re-export the failure-injecting store
pub mod mock_store;

/// Settings used by most tests
pub fn test_config() -> Config {
    Config {
        api_key: "test-key".to_string(),
        target_locales: "es, fr, de".to_string(),
        ..Config::default()
    }
}

/// Create a record with the given text in a store
pub async fn create_record(store: &dyn ContentStore, title: &str, body: &str) -> RecordId {
    store
        .create_record(NewRecord::draft(title, body))
        .await
        .expect("record should be created")
}

/// Store holding one untagged "Hello"/"World" record
pub async fn hello_world_store() -> (Arc<MemoryStore>, RecordId) {
    let store = Arc::new(MemoryStore::new());
    let id = create_record(store.as_ref(), "Hello", "World").await;
    (store, id)
}

/// Orchestrator over `store` with the given provider
pub fn orchestrator_for(store: Arc<dyn ContentStore>, provider: MockProvider) -> Orchestrator {
    Orchestrator::new(store, Arc::new(provider), test_config())
}
