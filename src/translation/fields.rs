/*!
 * Translatable fields and merging of provider results.
 */

use log::warn;
use serde::Serialize;

use crate::content::ContentRecord;
use crate::providers::FieldMap;

pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const EXCERPT: &str = "excerpt";

/// Source text of the fields sent for translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableFields {
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
}

impl TranslatableFields {
    /// Collect the translatable fields of a record
    pub fn from_record(record: &ContentRecord) -> Self {
        Self {
            title: record.title.clone(),
            body: record.body.clone(),
            excerpt: record.excerpt.clone(),
        }
    }

    /// Non-blank fields as a provider payload
    pub fn to_field_map(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        for (key, text) in [
            (TITLE, Some(&self.title)),
            (BODY, Some(&self.body)),
            (EXCERPT, self.excerpt.as_ref()),
        ] {
            if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
                fields.insert(key.to_string(), text.clone());
            }
        }
        fields
    }

    /// Merge a provider result, falling back to the source text per field
    pub fn merge(&self, translated: &FieldMap) -> TranslatedFields {
        TranslatedFields {
            title: FieldTranslation::resolve(TITLE, &self.title, translated),
            body: FieldTranslation::resolve(BODY, &self.body, translated),
            excerpt: self
                .excerpt
                .as_ref()
                .map(|excerpt| FieldTranslation::resolve(EXCERPT, excerpt, translated)),
        }
    }
}

/// Result for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTranslation {
    /// Text to store
    pub text: String,
    /// False when `text` is the untouched source text
    pub translated: bool,
}

impl FieldTranslation {
    fn resolve(key: &str, original: &str, translated: &FieldMap) -> Self {
        if original.trim().is_empty() {
            return Self::fallback(original);
        }

        match translated.get(key).filter(|text| !text.trim().is_empty()) {
            Some(text) => Self {
                text: text.clone(),
                translated: true,
            },
            None => {
                warn!("No translation returned for '{}', keeping the original text", key);
                Self::fallback(original)
            }
        }
    }

    fn fallback(original: &str) -> Self {
        Self {
            text: original.to_string(),
            translated: false,
        }
    }
}

/// Merged result for every translatable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedFields {
    pub title: FieldTranslation,
    pub body: FieldTranslation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<FieldTranslation>,
}

impl TranslatedFields {
    /// Whether at least one field holds provider output
    pub fn any_translated(&self) -> bool {
        self.title.translated
            || self.body.translated
            || self.excerpt.as_ref().is_some_and(|e| e.translated)
    }

    /// Field names that kept their source text
    pub fn fallback_fields(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if !self.title.translated {
            names.push(TITLE);
        }
        if !self.body.translated {
            names.push(BODY);
        }
        if self.excerpt.as_ref().is_some_and(|e| !e.translated) {
            names.push(EXCERPT);
        }
        names
    }

    pub fn title_text(&self) -> String {
        self.title.text.clone()
    }

    pub fn body_text(&self) -> String {
        self.body.text.clone()
    }

    pub fn excerpt_text(&self) -> Option<String> {
        self.excerpt.as_ref().map(|e| e.text.clone())
    }
}
