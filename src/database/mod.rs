/*!
 * Database module for persistent storage of content records.
 *
 * This module provides SQLite-based persistence for:
 * - Content records and their translatable fields
 * - Per-record language tags
 * - Per-record copies of the translation group map
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::SqliteStore;
