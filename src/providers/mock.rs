/*!
 * Mock provider implementations for testing and offline runs.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::echo()` - Returns every field unchanged
 * - `MockProvider::prefixed()` - Returns `[locale] text` for every field
 * - `MockProvider::partial(..)` - Only returns some of the fields
 * - `MockProvider::failing(..)` - Always fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{FieldMap, Provider, TranslationMode};

/// Kind of failure a failing mock reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockFailure {
    /// Invalid API key
    Auth,
    /// Network unreachable
    Connection,
    /// Quota exhausted
    RateLimit,
    /// Engine-side error
    Api,
}

impl MockFailure {
    fn to_error(self) -> ProviderError {
        match self {
            MockFailure::Auth => ProviderError::AuthenticationError("Invalid API key".into()),
            MockFailure::Connection => ProviderError::ConnectionError("Connection failed".into()),
            MockFailure::RateLimit => ProviderError::RateLimitExceeded("Quota exceeded".into()),
            MockFailure::Api => ProviderError::ApiError {
                status_code: 500,
                message: "Internal error".into(),
            },
        }
    }
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Returns the input unchanged
    Echo,
    /// Prefixes every field with the target locale
    Prefixed,
    /// Prefixes only the listed fields and omits the others
    Partial { fields: Vec<String> },
    /// Always fails with an error
    Failing(MockFailure),
    /// Returns no field at all
    Empty,
    /// Echoes after a delay (for concurrency testing)
    Slow { delay_ms: u64 },
}

/// One recorded provider call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub fields: FieldMap,
    pub source_locale: String,
    pub target_locale: String,
    pub mode: TranslationMode,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Calls received, oldest first
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that returns its input unchanged
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that prefixes every field with the target locale
    pub fn prefixed() -> Self {
        Self::new(MockBehavior::Prefixed)
    }

    /// Create a mock that only translates the given fields
    pub fn partial(fields: &[&str]) -> Self {
        Self::new(MockBehavior::Partial {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing(failure: MockFailure) -> Self {
        Self::new(MockBehavior::Failing(failure))
    }

    /// Create a mock that returns empty results
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that echoes after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    fn prefix(target_locale: &str, text: &str) -> String {
        format!("[{}] {}", target_locale, text)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate_fields(
        &self,
        fields: &FieldMap,
        source_locale: &str,
        target_locale: &str,
        mode: TranslationMode,
    ) -> Result<FieldMap, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(MockCall {
            fields: fields.clone(),
            source_locale: source_locale.to_string(),
            target_locale: target_locale.to_string(),
            mode,
        });

        match &self.behavior {
            MockBehavior::Echo => Ok(fields.clone()),

            MockBehavior::Prefixed => Ok(fields
                .iter()
                .map(|(key, text)| (key.clone(), Self::prefix(target_locale, text)))
                .collect()),

            MockBehavior::Partial { fields: keep } => Ok(fields
                .iter()
                .filter(|(key, _)| keep.iter().any(|k| k == *key))
                .map(|(key, text)| (key.clone(), Self::prefix(target_locale, text)))
                .collect()),

            MockBehavior::Failing(failure) => Err(failure.to_error()),

            MockBehavior::Empty => Ok(FieldMap::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(fields.clone())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Failing(failure) => Err(failure.to_error()),
            _ => Ok(()),
        }
    }
}
