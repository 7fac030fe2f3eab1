/*!
 * Content store boundary.
 *
 * Records are owned by the host content store. The translation core only
 * reads them, creates new drafts, patches the translatable fields and keeps
 * two pieces of per-record state: a flat language tag and the record's copy
 * of its translation group map.
 *
 * Implementations:
 * - `memory::MemoryStore`: in-process store
 * - `crate::database::SqliteStore`: SQLite-backed store
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::StoreError;

pub mod memory;

pub use memory::MemoryStore;

/// Identifier assigned by the content store
pub type RecordId = i64;

/// Raw locale -> record map as persisted on each group member
pub type GroupMeta = BTreeMap<String, RecordId>;

/// Publication status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Draft,
    Pending,
    Private,
    Publish,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Draft => write!(f, "draft"),
            RecordStatus::Pending => write!(f, "pending"),
            RecordStatus::Private => write!(f, "private"),
            RecordStatus::Publish => write!(f, "publish"),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(RecordStatus::Draft),
            "pending" => Ok(RecordStatus::Pending),
            "private" => Ok(RecordStatus::Private),
            "publish" => Ok(RecordStatus::Publish),
            _ => Err(anyhow::anyhow!("Invalid record status: {}", s)),
        }
    }
}

/// A unit of translatable content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Store-assigned identifier
    pub id: RecordId,
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    /// Language tag, unset until the record takes part in a translation
    pub language: Option<String>,
    pub status: RecordStatus,
    pub author: Option<String>,
    /// Kind of record (`post`, `page`, ...)
    pub record_type: String,
    pub comments_open: bool,
    pub pings_open: bool,
}

impl ContentRecord {
    /// Whether there is anything to translate
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty() || !self.body.trim().is_empty()
    }
}

/// Fields for a record about to be created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
    pub status: RecordStatus,
    pub author: Option<String>,
    pub record_type: String,
    pub comments_open: bool,
    pub pings_open: bool,
}

impl NewRecord {
    /// A draft post with the given text
    pub fn draft(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            excerpt: None,
            status: RecordStatus::Draft,
            author: None,
            record_type: "post".to_string(),
            comments_open: true,
            pings_open: true,
        }
    }

    /// Set the excerpt
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the status
    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy every non-text attribute of `source`, forcing the draft status
    pub fn derived_from(source: &ContentRecord, title: String, body: String, excerpt: Option<String>) -> Self {
        Self {
            title,
            body,
            excerpt,
            status: RecordStatus::Draft,
            author: source.author.clone(),
            record_type: source.record_type.clone(),
            comments_open: source.comments_open,
            pings_open: source.pings_open,
        }
    }
}

/// In-place update of the translatable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub title: String,
    pub body: String,
    pub excerpt: Option<String>,
}

/// Storage operations the translation core relies on
///
/// Each call is atomic for a single record only; nothing spans several
/// records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch a record, `None` when it does not exist
    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError>;

    /// Create a record and return its identifier
    async fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError>;

    /// Replace the translatable fields of an existing record
    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<(), StoreError>;

    /// Delete a record together with its language tag and group map
    async fn delete_record(&self, id: RecordId) -> Result<(), StoreError>;

    /// List records, lowest id first
    async fn list_records(&self) -> Result<Vec<ContentRecord>, StoreError>;

    /// Read a record's language tag
    async fn get_record_language(&self, id: RecordId) -> Result<Option<String>, StoreError>;

    /// Set a record's language tag
    async fn set_record_language(&self, id: RecordId, locale: &str) -> Result<(), StoreError>;

    /// Read a record's copy of its group map
    async fn get_group_meta(&self, id: RecordId) -> Result<Option<GroupMeta>, StoreError>;

    /// Overwrite a record's copy of its group map
    async fn set_group_meta(&self, id: RecordId, group: &GroupMeta) -> Result<(), StoreError>;

    /// Whether a record exists
    async fn record_exists(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.get_record(id).await?.is_some())
    }
}
