/*!
 * Provider implementations for translation engines.
 *
 * This module contains client implementations for the supported providers:
 * - Lingo: Lingo.dev localization engine
 * - Mock: in-process provider with scripted behaviour (tests, offline echo)
 */

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;

pub mod lingo;
pub mod mock;

/// Named text fields sent to, and returned by, a provider
pub type FieldMap = BTreeMap<String, String>;

/// Provider-side trade-off between latency and accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationMode {
    #[default]
    Accurate,
    Fast,
}

impl TranslationMode {
    /// Mode matching the `fast_mode` setting
    pub fn from_fast_flag(fast: bool) -> Self {
        if fast { Self::Fast } else { Self::Accurate }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }
}

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably by the orchestrator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a set of named fields
    ///
    /// # Arguments
    /// * `fields` - Field name to source text
    /// * `source_locale` - Locale of the source text
    /// * `target_locale` - Locale to translate into
    /// * `mode` - Fast or accurate translation
    ///
    /// # Returns
    /// * `Result<FieldMap, ProviderError>` - Translated fields; any key may be
    ///   missing, callers fall back to the source text for those
    async fn translate_fields(
        &self,
        fields: &FieldMap,
        source_locale: &str,
        target_locale: &str,
        mode: TranslationMode,
    ) -> Result<FieldMap, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Builds the provider for a request from that request's settings
pub trait ProviderFactory: Send + Sync {
    fn build(&self, config: &Config) -> Result<Arc<dyn Provider>, ProviderError>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&Config) -> Result<Arc<dyn Provider>, ProviderError> + Send + Sync,
{
    fn build(&self, config: &Config) -> Result<Arc<dyn Provider>, ProviderError> {
        self(config)
    }
}

/// Factory selecting the provider named in the settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredProviderFactory;

impl ProviderFactory for ConfiguredProviderFactory {
    fn build(&self, config: &Config) -> Result<Arc<dyn Provider>, ProviderError> {
        match config.provider {
            TranslationProvider::Lingo => Ok(Arc::new(lingo::LingoEngine::from_config(config)?)),
            TranslationProvider::Echo => Ok(Arc::new(mock::MockProvider::echo())),
        }
    }
}
