use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{FieldMap, Provider, TranslationMode};

/// Lingo.dev localization engine client
pub struct LingoEngine {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Localization endpoint (`{base}/i18n`)
    endpoint: Url,
    /// Maximum number of fields per request
    batch_size: usize,
    /// Word budget per request
    ideal_batch_item_size: usize,
}

impl std::fmt::Debug for LingoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LingoEngine")
            .field("endpoint", &self.endpoint.as_str())
            .field("batch_size", &self.batch_size)
            .field("ideal_batch_item_size", &self.ideal_batch_item_size)
            .finish_non_exhaustive()
    }
}

/// Localization request body
#[derive(Debug, Serialize)]
pub struct LocalizeRequest {
    /// Request parameters
    params: LocalizeParams,

    /// Source and target locales
    locale: LocalePair,

    /// Field name to text
    data: FieldMap,
}

/// Localization parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizeParams {
    /// Identifier shared by every chunk of one call
    workflow_id: String,

    /// Fast mode flag
    fast: bool,
}

/// Locale pair of a localization request
#[derive(Debug, Serialize)]
pub struct LocalePair {
    pub source: String,
    pub target: String,
}

/// Localization response body
#[derive(Debug, Deserialize)]
pub struct LocalizeResponse {
    /// Translated values keyed like the request data
    #[serde(default)]
    pub data: Option<BTreeMap<String, serde_json::Value>>,

    /// Error reported by the engine with a success status
    #[serde(default)]
    pub error: Option<String>,
}

impl LocalizeRequest {
    /// Create a new localization request
    pub fn new(
        workflow_id: impl Into<String>,
        source_locale: impl Into<String>,
        target_locale: impl Into<String>,
        data: FieldMap,
    ) -> Self {
        Self {
            params: LocalizeParams {
                workflow_id: workflow_id.into(),
                fast: false,
            },
            locale: LocalePair {
                source: source_locale.into(),
                target: target_locale.into(),
            },
            data,
        }
    }

    /// Set the fast mode flag
    pub fn fast(mut self, fast: bool) -> Self {
        self.params.fast = fast;
        self
    }
}

/// Count whitespace separated words
fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split fields into request-sized chunks
///
/// A chunk is closed once it holds `batch_size` fields or more than
/// `ideal_words` words, so a single oversized field still travels alone.
pub fn chunk_fields(fields: &FieldMap, batch_size: usize, ideal_words: usize) -> Vec<FieldMap> {
    let mut chunks = Vec::new();
    let mut current = FieldMap::new();
    let mut words = 0;

    for (key, value) in fields {
        current.insert(key.clone(), value.clone());
        words += count_words(value);

        if current.len() >= batch_size.max(1) || words > ideal_words {
            chunks.push(std::mem::take(&mut current));
            words = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Map a non-success HTTP status to a provider error
pub fn error_for_status(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(body)
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::PAYMENT_REQUIRED => {
            ProviderError::RateLimitExceeded(body)
        }
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

/// Keep the string values returned for the keys of `chunk`
fn extract_chunk_fields(chunk: &FieldMap, response: LocalizeResponse) -> FieldMap {
    let data = response.data.unwrap_or_default();
    chunk
        .keys()
        .filter_map(|key| match data.get(key) {
            Some(serde_json::Value::String(text)) => Some((key.clone(), text.clone())),
            _ => None,
        })
        .collect()
}

fn new_workflow_id() -> String {
    Uuid::new_v4().to_string()
}

impl LingoEngine {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "Lingo.dev API Key is not set in settings.".to_string(),
            ));
        }

        let base = Url::parse(&format!("{}/", endpoint.trim_end_matches('/')))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;
        let endpoint = base
            .join("i18n")
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key,
            endpoint,
            batch_size: 25,
            ideal_batch_item_size: 250,
        })
    }

    /// Create a client from the request settings
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(&config.api_key, &config.endpoint, Duration::from_secs(config.timeout_secs))?
            .batch_limits(config.batch_size, config.ideal_batch_item_size))
    }

    /// Set the chunking limits
    pub fn batch_limits(mut self, batch_size: usize, ideal_batch_item_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self.ideal_batch_item_size = ideal_batch_item_size.max(1);
        self
    }

    /// Localization endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one localization request
    pub async fn complete(&self, request: &LocalizeRequest) -> Result<LocalizeResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json; charset=utf-8")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Lingo.dev API error ({}): {}", status, error_text);
            return Err(error_for_status(status, error_text));
        }

        let localized = response
            .json::<LocalizeResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if let Some(message) = localized.error.as_deref().filter(|m| !m.is_empty()) {
            error!("Lingo.dev reported an error: {}", message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: message.to_string(),
            });
        }

        Ok(localized)
    }
}

#[async_trait]
impl Provider for LingoEngine {
    async fn translate_fields(
        &self,
        fields: &FieldMap,
        source_locale: &str,
        target_locale: &str,
        mode: TranslationMode,
    ) -> Result<FieldMap, ProviderError> {
        let workflow_id = new_workflow_id();
        let chunks = chunk_fields(fields, self.batch_size, self.ideal_batch_item_size);
        let mut translated = FieldMap::new();

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                "Localizing chunk {}/{} ({} fields, {} -> {})",
                index + 1,
                chunks.len(),
                chunk.len(),
                source_locale,
                target_locale
            );

            let request = LocalizeRequest::new(&workflow_id, source_locale, target_locale, chunk.clone())
                .fast(mode.is_fast());
            let response = self.complete(&request).await?;
            translated.extend(extract_chunk_fields(chunk, response));
        }

        Ok(translated)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let fields: FieldMap = [("test".to_string(), "Hello".to_string())].into_iter().collect();
        self.translate_fields(&fields, "en", "es", TranslationMode::Fast).await?;
        Ok(())
    }
}
