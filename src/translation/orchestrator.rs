/*!
 * Translation orchestrator.
 *
 * Given a source record and a target locale, the orchestrator decides
 * whether to create a new linked translation or update the existing one,
 * calls the provider and applies the result:
 *
 * - the target locale has a live record in the group: update it in place
 * - otherwise: create a new draft, link it into the group and tag its language
 *
 * Nothing is written before the provider call succeeds.
 */

use log::{debug, error, info, warn};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::fields::{TranslatableFields, TranslatedFields};
use super::lease::SlotLeases;
use super::registry::{Registry, TranslationGroup};
use crate::app_config::Config;
use crate::content::{ContentRecord, ContentStore, NewRecord, RecordId, RecordPatch};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::{FieldMap, Provider, TranslationMode};

/// Field key used for single-string translation
const STRING_FIELD: &str = "text";

/// Branch taken by a record translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Created,
    Updated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a record translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationReport {
    pub outcome: Outcome,
    /// Record holding the translation
    pub record_id: RecordId,
    pub source_id: RecordId,
    pub source_locale: String,
    pub target_locale: String,
    /// Where an editor opens the translated record
    pub edit_reference: String,
    pub fields: TranslatedFields,
    /// Group as known after the operation
    pub group: TranslationGroup,
}

/// Result of a single-string translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringTranslation {
    pub original: String,
    pub translated: String,
    pub target_locale: String,
    /// False when `translated` is the original text
    pub was_translated: bool,
}

/// Runs one translation request against a store and a provider
pub struct Orchestrator {
    store: Arc<dyn ContentStore>,
    provider: Arc<dyn Provider>,
    registry: Registry,
    config: Config,
    leases: SlotLeases,
}

impl Orchestrator {
    /// Create an orchestrator for the given request settings
    pub fn new(store: Arc<dyn ContentStore>, provider: Arc<dyn Provider>, config: Config) -> Self {
        Self {
            registry: Registry::new(Arc::clone(&store)),
            store,
            provider,
            config,
            leases: SlotLeases::new(),
        }
    }

    /// Share slot leases with other orchestrators
    pub fn with_leases(mut self, leases: SlotLeases) -> Self {
        self.leases = leases;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn mode(&self) -> TranslationMode {
        TranslationMode::from_fast_flag(self.config.fast_mode)
    }

    fn default_source_locale(&self) -> String {
        default_source_locale(&self.config)
    }

    /// Language of the record, or the default source locale when unset
    pub fn effective_locale(&self, record: &ContentRecord) -> String {
        effective_locale(&self.config, record)
    }

    /// Configured target locales, minus the record's own language
    pub fn available_target_locales(&self, record: &ContentRecord) -> Vec<String> {
        available_target_locales(&self.config, record)
    }

    /// Translate a record into `target_locale`, creating or updating the
    /// linked translation
    pub async fn translate_record(
        &self,
        source_id: RecordId,
        target_locale: &str,
    ) -> Result<TranslationReport, TranslationError> {
        if target_locale.trim().is_empty() {
            return Err(TranslationError::Validation("Target language is required.".to_string()));
        }
        let target_locale = language_utils::normalize_locale(target_locale)
            .map_err(|e| TranslationError::Validation(e.to_string()))?;

        let _lease = self.leases.try_acquire(source_id, &target_locale)?;

        let source = self
            .store
            .get_record(source_id)
            .await?
            .ok_or_else(|| TranslationError::NotFound(format!("source record {} does not exist", source_id)))?;

        if !source.has_content() {
            return Err(TranslationError::Validation(format!(
                "Record {} has no title or body to translate.",
                source_id
            )));
        }

        let source_locale = self.effective_locale(&source);
        if language_utils::locales_match(&source_locale, &target_locale) {
            return Err(TranslationError::Validation(format!(
                "Target language '{}' is the language of the source record.",
                target_locale
            )));
        }

        let mut group = self.registry.lookup(source_id).await;
        let existing = match group.get(&target_locale) {
            Some(id) if id == source_id => {
                warn!(
                    "Translation group of record {} lists it under '{}', treating the slot as empty",
                    source_id, target_locale
                );
                group.remove(&target_locale);
                None
            }
            Some(id) => {
                if self.registry.is_stale(&target_locale, id).await {
                    group.remove(&target_locale);
                    None
                } else {
                    Some(id)
                }
            }
            None => None,
        };

        let fields = TranslatableFields::from_record(&source);
        let translated = self.call_provider(&fields, &source_locale, &target_locale).await?;
        let merged = fields.merge(&translated);

        let fallbacks = merged.fallback_fields();
        if !fallbacks.is_empty() {
            warn!(
                "Record {} -> '{}': kept original text for {}",
                source_id,
                target_locale,
                fallbacks.join(", ")
            );
        }

        match existing {
            Some(target_id) => {
                debug!("Slot ({}, {}) holds record {}, updating", source_id, target_locale, target_id);
                self.update_existing(&source, source_locale, target_id, target_locale, merged, group)
                    .await
            }
            None => {
                debug!("Slot ({}, {}) is empty, creating a new record", source_id, target_locale);
                self.create_linked(&source, source_locale, target_locale, merged, group)
                    .await
            }
        }
    }

    async fn create_linked(
        &self,
        source: &ContentRecord,
        source_locale: String,
        target_locale: String,
        fields: TranslatedFields,
        group: TranslationGroup,
    ) -> Result<TranslationReport, TranslationError> {
        let record = NewRecord::derived_from(
            source,
            fields.title_text(),
            fields.body_text(),
            fields.excerpt_text(),
        );
        let target_id = self.store.create_record(record).await.map_err(|e| {
            error!("Failed to create translated record for {}: {}", source.id, e);
            TranslationError::Persistence(e.to_string())
        })?;

        // Keep entries linked by other slots while the provider was running
        let mut current = self.registry.lookup(source.id).await;
        for (locale, id) in group.iter() {
            if !current.contains_locale(locale) {
                current.insert(locale, id);
            }
        }

        let group = self
            .registry
            .link(current, source.id, &source_locale, target_id, &target_locale)
            .await?;

        self.store.set_record_language(target_id, &target_locale).await?;
        if record_language(source).is_none() {
            debug!("Tagging source record {} as '{}'", source.id, source_locale);
            self.store.set_record_language(source.id, &source_locale).await?;
        }

        info!(
            "Created translation {} of record {} ({} -> {})",
            target_id, source.id, source_locale, target_locale
        );

        Ok(TranslationReport {
            outcome: Outcome::Created,
            record_id: target_id,
            source_id: source.id,
            edit_reference: self.config.edit_reference(target_id),
            source_locale,
            target_locale,
            fields,
            group,
        })
    }

    async fn update_existing(
        &self,
        source: &ContentRecord,
        source_locale: String,
        target_id: RecordId,
        target_locale: String,
        fields: TranslatedFields,
        group: TranslationGroup,
    ) -> Result<TranslationReport, TranslationError> {
        let patch = RecordPatch {
            title: fields.title_text(),
            body: fields.body_text(),
            excerpt: fields.excerpt_text(),
        };
        self.store.update_record(target_id, patch).await?;

        info!(
            "Updated translation {} of record {} ({} -> {})",
            target_id, source.id, source_locale, target_locale
        );

        Ok(TranslationReport {
            outcome: Outcome::Updated,
            record_id: target_id,
            source_id: source.id,
            edit_reference: self.config.edit_reference(target_id),
            source_locale,
            target_locale,
            fields,
            group,
        })
    }

    async fn call_provider(
        &self,
        fields: &TranslatableFields,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<FieldMap, TranslationError> {
        let payload = fields.to_field_map();
        debug!(
            "Sending {} field(s) for translation ({} -> {}, {:?})",
            payload.len(),
            source_locale,
            target_locale,
            self.mode()
        );

        self.provider
            .translate_fields(&payload, source_locale, target_locale, self.mode())
            .await
            .map_err(|e| {
                error!("Translation provider failed: {}", e);
                TranslationError::Provider(e)
            })
    }

    /// Translate one string from the default source locale
    pub async fn translate_string(
        &self,
        text: &str,
        target_locale: &str,
    ) -> Result<StringTranslation, TranslationError> {
        if text.trim().is_empty() || target_locale.trim().is_empty() {
            return Err(TranslationError::Validation(
                "Text to translate and target language are required.".to_string(),
            ));
        }
        let target_locale = language_utils::normalize_locale(target_locale)
            .map_err(|e| TranslationError::Validation(e.to_string()))?;
        let source_locale = self.default_source_locale();

        let payload: FieldMap = [(STRING_FIELD.to_string(), text.to_string())].into_iter().collect();
        let result = self
            .provider
            .translate_fields(&payload, &source_locale, &target_locale, self.mode())
            .await
            .map_err(|e| {
                error!("Translation provider failed: {}", e);
                TranslationError::Provider(e)
            })?;

        let (translated, was_translated) = match result.get(STRING_FIELD).filter(|t| !t.trim().is_empty()) {
            Some(translated) => (translated.clone(), true),
            None => {
                warn!("No translation returned for the test string, keeping the original text");
                (text.to_string(), false)
            }
        };

        Ok(StringTranslation {
            original: text.to_string(),
            translated,
            target_locale,
            was_translated,
        })
    }
}

/// Locale assumed for records without a language tag
pub fn default_source_locale(config: &Config) -> String {
    language_utils::normalize_locale(&config.default_source_locale)
        .unwrap_or_else(|_| config.default_source_locale.trim().to_string())
}

/// Language of the record, or the default source locale when unset
pub fn effective_locale(config: &Config, record: &ContentRecord) -> String {
    record_language(record).unwrap_or_else(|| default_source_locale(config))
}

/// Configured target locales, minus the record's own language
pub fn available_target_locales(config: &Config, record: &ContentRecord) -> Vec<String> {
    let own = effective_locale(config, record);
    config
        .target_locale_list()
        .into_iter()
        .filter(|locale| !language_utils::locales_match(locale, &own))
        .collect()
}

/// Language tag of a record in normalized form, blank tags count as unset
pub fn record_language(record: &ContentRecord) -> Option<String> {
    record
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| language_utils::normalize_locale(l).unwrap_or_else(|_| l.to_string()))
}
