use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::app_config::{Config, ConfigSource};
use crate::content::{ContentStore, RecordId};
use crate::errors::{AppError, TranslationError};
use crate::language_utils;
use crate::providers::ProviderFactory;
use crate::security::NonceVerifier;
use crate::translation::{
    orchestrator, FieldTranslation, Orchestrator, Outcome, Registry, SlotLeases, StringTranslation,
    TranslationEntry,
};

// @module: Request surface for editors and administrators

/// Capability required by every translation action
pub const MANAGE_OPTIONS: &str = "manage_options";

/// Nonce action of the single-string test
pub const TEST_STRING_ACTION: &str = "lingo_test_translate_string";

/// Nonce action of record translation
pub const TRANSLATE_RECORD_ACTION: &str = "lingo_translate_record";

/// Who is making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user: String,
    pub capabilities: Vec<String>,
}

impl Caller {
    /// A caller without any capability
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            capabilities: Vec::new(),
        }
    }

    /// A caller allowed to manage translations
    pub fn administrator(user: impl Into<String>) -> Self {
        Self::new(user).with_capability(MANAGE_OPTIONS)
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// JSON reply: `{success: true, data}` or `{success: false, data: "<message>"}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self { success: true, data },
            Err(e) => Self::error(format!("Failed to encode reply: {}", e)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::String(message.into()),
        }
    }

    /// Reply for the result of an operation
    pub fn from_result<T: Serialize>(result: &Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::error(failure_message(e)),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"success":false,"data":"Failed to encode reply"}"#.to_string())
    }
}

/// Message shown to the caller for a failed request
pub fn failure_message(error: &AppError) -> String {
    match error {
        AppError::Config(message) => message.clone(),
        AppError::Unauthorized | AppError::InvalidNonce => error.to_string(),
        AppError::Translation(TranslationError::Validation(message)) => message.clone(),
        AppError::Translation(TranslationError::NotFound(message)) => format!("Not found: {}", message),
        AppError::Translation(e @ TranslationError::SlotBusy { .. }) => e.to_string(),
        AppError::Translation(TranslationError::Provider(e)) | AppError::Provider(e) => {
            format!("Translation failed: {}", e)
        }
        other => format!("An unexpected error occurred: {}", other),
    }
}

/// Reply of `translate_record`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTranslationReply {
    pub outcome: Outcome,
    /// Record holding the translation
    pub record_id: RecordId,
    pub source_id: RecordId,
    pub edit_reference: String,
    pub source_locale: String,
    pub target_locale: String,
    pub message: String,
    pub fields: Vec<FieldReply>,
}

/// One field of a `translate_record` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReply {
    pub name: String,
    pub text: String,
    pub translated: bool,
}

impl FieldReply {
    fn new(name: &str, field: &FieldTranslation) -> Self {
        Self {
            name: name.to_string(),
            text: field.text.clone(),
            translated: field.translated,
        }
    }
}

/// Translation state of one record, for display next to its editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOverview {
    pub record_id: RecordId,
    pub title: String,
    pub language: Option<String>,
    /// Human readable language
    pub language_label: String,
    pub translations: Vec<TranslationEntry>,
    /// Locales the record can be translated into
    pub available_target_locales: Vec<String>,
}

/// Label of a record language as shown to editors
pub fn language_label(language: Option<&str>) -> String {
    match language {
        Some(code) => match language_utils::get_language_name(code) {
            Ok(name) => format!("{} ({})", name, code),
            Err(_) => code.to_string(),
        },
        None => "Not set (will be set to Default Source Language upon first translation)".to_string(),
    }
}

/// Request surface of the translation core
///
/// Settings are loaded once per request from the config source and the
/// provider is built from them, so saved changes apply to the next request.
pub struct Controller {
    config_source: Arc<dyn ConfigSource>,
    store: Arc<dyn ContentStore>,
    providers: Arc<dyn ProviderFactory>,
    leases: SlotLeases,
}

impl Controller {
    /// Create a new controller
    pub fn new(
        config_source: Arc<dyn ConfigSource>,
        store: Arc<dyn ContentStore>,
        providers: Arc<dyn ProviderFactory>,
    ) -> Self {
        Self {
            config_source,
            store,
            providers,
            leases: SlotLeases::new(),
        }
    }

    /// Leases shared by every request of this controller
    pub fn leases(&self) -> &SlotLeases {
        &self.leases
    }

    fn load_config(&self) -> Result<Config, AppError> {
        self.config_source
            .load()
            .map_err(|e| AppError::Config(format!("{:#}", e)))
    }

    fn verifier(config: &Config) -> Result<NonceVerifier, AppError> {
        if config.nonce_secret.trim().is_empty() {
            return Err(AppError::Config("Nonce secret is not set in settings.".to_string()));
        }
        Ok(NonceVerifier::from_config(config))
    }

    /// Nonce check first, then capability
    fn authorize(&self, config: &Config, caller: &Caller, action: &str, nonce: &str) -> Result<(), AppError> {
        if !Self::verifier(config)?.verify(nonce, action, &caller.user) {
            warn!("Rejected '{}' request from '{}': invalid nonce", action, caller.user);
            return Err(AppError::InvalidNonce);
        }
        if !caller.can(MANAGE_OPTIONS) {
            warn!("Rejected '{}' request from '{}': missing capability", action, caller.user);
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }

    fn orchestrator(&self, config: Config) -> Result<Orchestrator, AppError> {
        config.validate().map_err(|e| AppError::Config(format!("{:#}", e)))?;
        let provider = self.providers.build(&config)?;
        Ok(Orchestrator::new(Arc::clone(&self.store), provider, config).with_leases(self.leases.clone()))
    }

    /// Issue a nonce for `action` on behalf of `caller`
    pub fn issue_nonce(&self, caller: &Caller, action: &str) -> Result<String, AppError> {
        let config = self.load_config()?;
        Ok(Self::verifier(&config)?.issue(action, &caller.user))
    }

    /// Translate a single string from the default source locale
    pub async fn test_translate_string(
        &self,
        caller: &Caller,
        nonce: &str,
        text: &str,
        target_locale: &str,
    ) -> Result<StringTranslation, AppError> {
        let config = self.load_config()?;
        self.authorize(&config, caller, TEST_STRING_ACTION, nonce)?;

        if text.trim().is_empty() || target_locale.trim().is_empty() {
            return Err(TranslationError::Validation(
                "Text to translate and target language are required.".to_string(),
            )
            .into());
        }

        let orchestrator = self.orchestrator(config)?;
        debug!("Test translation into '{}' requested by '{}'", target_locale, caller.user);
        let result = orchestrator.translate_string(text, target_locale).await?;
        Ok(result)
    }

    /// Translate a record, creating or updating its linked translation
    pub async fn translate_record(
        &self,
        caller: &Caller,
        nonce: &str,
        record_id: RecordId,
        target_locale: &str,
    ) -> Result<RecordTranslationReply, AppError> {
        let config = self.load_config()?;
        self.authorize(&config, caller, TRANSLATE_RECORD_ACTION, nonce)?;

        if target_locale.trim().is_empty() {
            return Err(TranslationError::Validation("Target language is required.".to_string()).into());
        }

        let orchestrator = self.orchestrator(config)?;
        let report = orchestrator
            .translate_record(record_id, target_locale)
            .await
            .inspect_err(|e| error!("Translation of record {} into '{}' failed: {}", record_id, target_locale, e))?;

        let message = match report.outcome {
            Outcome::Created => "Translation created as a new draft.",
            Outcome::Updated => "Existing translation updated.",
        };
        info!("{} (record {})", message, report.record_id);

        let mut fields = vec![
            FieldReply::new("title", &report.fields.title),
            FieldReply::new("body", &report.fields.body),
        ];
        if let Some(excerpt) = &report.fields.excerpt {
            fields.push(FieldReply::new("excerpt", excerpt));
        }

        Ok(RecordTranslationReply {
            outcome: report.outcome,
            record_id: report.record_id,
            source_id: report.source_id,
            edit_reference: report.edit_reference,
            source_locale: report.source_locale,
            target_locale: report.target_locale,
            message: message.to_string(),
            fields,
        })
    }

    /// Language, existing translations and available targets of a record
    pub async fn record_overview(&self, caller: &Caller, record_id: RecordId) -> Result<RecordOverview, AppError> {
        let config = self.load_config()?;
        if !caller.can(MANAGE_OPTIONS) {
            return Err(AppError::Unauthorized);
        }

        let record = self
            .store
            .get_record(record_id)
            .await?
            .ok_or_else(|| TranslationError::NotFound(format!("record {} does not exist", record_id)))?;

        let language = orchestrator::record_language(&record);
        let translations = Registry::new(Arc::clone(&self.store)).translations_for(record_id).await;

        Ok(RecordOverview {
            record_id,
            title: record.title.clone(),
            language_label: language_label(language.as_deref()),
            available_target_locales: orchestrator::available_target_locales(&config, &record),
            language,
            translations,
        })
    }
}
