/*!
 * Database row mapping.
 *
 * Column lists and row decoders shared by the store queries, plus the keys
 * under which the translation state is kept.
 */

use rusqlite::Row;
use rusqlite::types::Type;

use crate::content::{ContentRecord, RecordStatus};

/// Taxonomy holding a record's language tag
pub const LANGUAGE_TAXONOMY: &str = "language";

/// Meta key holding a record's copy of its translation group map
pub const TRANSLATION_GROUP_META_KEY: &str = "_translation_group";

/// Select list used by every record query, language tag last
pub const RECORD_SELECT: &str = r#"
    SELECT r.id, r.title, r.body, r.excerpt, r.status, r.author, r.record_type,
           r.comments_open, r.pings_open, t.value
    FROM records r
    LEFT JOIN record_tags t ON t.record_id = r.id AND t.taxonomy = 'language'
"#;

/// Decode a row produced by `RECORD_SELECT`
pub fn record_from_row(row: &Row) -> rusqlite::Result<ContentRecord> {
    Ok(ContentRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        excerpt: row.get(3)?,
        status: row.get::<_, String>(4)?.parse::<RecordStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
        })?,
        author: row.get(5)?,
        record_type: row.get(6)?,
        comments_open: row.get(7)?,
        pings_open: row.get(8)?,
        language: row.get(9)?,
    })
}
