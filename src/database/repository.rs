/*!
 * SQLite content store.
 *
 * This module implements the content store boundary on top of the database
 * connection, abstracting away the SQL details. Language tags live in
 * `record_tags`, group maps are JSON values in `record_meta`.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{record_from_row, LANGUAGE_TAXONOMY, RECORD_SELECT, TRANSLATION_GROUP_META_KEY};
use crate::app_config::Config;
use crate::content::{ContentRecord, ContentStore, GroupMeta, NewRecord, RecordId, RecordPatch};
use crate::errors::StoreError;

/// Content store backed by SQLite
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Create a store over the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a store with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Open the database configured in the settings, or the default one
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.database_path {
            Some(path) => Ok(Self::new(DatabaseConnection::new(path)?)),
            None => Self::new_default(),
        }
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn exists_sync(conn: &Connection, id: RecordId) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT id FROM records WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn get_record(&self, id: RecordId) -> Result<Option<ContentRecord>, StoreError> {
        let record = self
            .db
            .execute_async(move |conn| {
                let sql = format!("{} WHERE r.id = ?1", RECORD_SELECT);
                Ok(conn.query_row(&sql, [id], record_from_row).optional()?)
            })
            .await?;
        Ok(record)
    }

    async fn create_record(&self, record: NewRecord) -> Result<RecordId, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let id = self
            .db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO records (
                        title, body, excerpt, status, author, record_type,
                        comments_open, pings_open, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                    params![
                        record.title,
                        record.body,
                        record.excerpt,
                        record.status.to_string(),
                        record.author,
                        record.record_type,
                        record.comments_open,
                        record.pings_open,
                        now,
                        now,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!("Inserted record {}", id);
        Ok(id)
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> Result<(), StoreError> {
        let now = chrono::Utc::now().to_rfc3339();

        let changed = self
            .db
            .execute_async(move |conn| {
                Ok(conn.execute(
                    "UPDATE records SET title = ?1, body = ?2, excerpt = ?3, updated_at = ?4 WHERE id = ?5",
                    params![patch.title, patch.body, patch.excerpt, now, id],
                )?)
            })
            .await?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), StoreError> {
        // Tags and meta go with the record through the foreign key cascade
        let deleted = self
            .db
            .execute_async(move |conn| Ok(conn.execute("DELETE FROM records WHERE id = ?1", [id])?))
            .await?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<ContentRecord>, StoreError> {
        let records = self
            .db
            .execute_async(|conn| {
                let sql = format!("{} ORDER BY r.id", RECORD_SELECT);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], record_from_row)?;
                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await?;
        Ok(records)
    }

    async fn get_record_language(&self, id: RecordId) -> Result<Option<String>, StoreError> {
        let found = self
            .db
            .execute_async(move |conn| {
                if !Self::exists_sync(conn, id)? {
                    return Ok(None);
                }
                let language: Option<String> = conn
                    .query_row(
                        "SELECT value FROM record_tags WHERE record_id = ?1 AND taxonomy = ?2",
                        params![id, LANGUAGE_TAXONOMY],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(Some(language))
            })
            .await?;

        found.ok_or(StoreError::NotFound(id))
    }

    async fn set_record_language(&self, id: RecordId, locale: &str) -> Result<(), StoreError> {
        let locale = locale.to_string();

        let applied = self
            .db
            .execute_async(move |conn| {
                if !Self::exists_sync(conn, id)? {
                    return Ok(false);
                }
                conn.execute(
                    r#"
                    INSERT INTO record_tags (record_id, taxonomy, value) VALUES (?1, ?2, ?3)
                    ON CONFLICT(record_id, taxonomy) DO UPDATE SET value = excluded.value
                    "#,
                    params![id, LANGUAGE_TAXONOMY, locale],
                )?;
                Ok(true)
            })
            .await?;

        if !applied {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn get_group_meta(&self, id: RecordId) -> Result<Option<GroupMeta>, StoreError> {
        let raw: Option<String> = self
            .db
            .execute_async(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT meta_value FROM record_meta WHERE record_id = ?1 AND meta_key = ?2",
                        params![id, TRANSLATION_GROUP_META_KEY],
                        |row| row.get(0),
                    )
                    .optional()?)
            })
            .await?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    record_id: id,
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn set_group_meta(&self, id: RecordId, group: &GroupMeta) -> Result<(), StoreError> {
        let json = serde_json::to_string(group).map_err(|e| StoreError::Corrupt {
            record_id: id,
            message: e.to_string(),
        })?;

        let applied = self
            .db
            .execute_async(move |conn| {
                if !Self::exists_sync(conn, id)? {
                    return Ok(false);
                }
                conn.execute(
                    r#"
                    INSERT INTO record_meta (record_id, meta_key, meta_value) VALUES (?1, ?2, ?3)
                    ON CONFLICT(record_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value
                    "#,
                    params![id, TRANSLATION_GROUP_META_KEY, json],
                )?;
                Ok(true)
            })
            .await?;

        if !applied {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
