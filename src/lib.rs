/*!
 * # lingolink - linked machine translation of content records
 *
 * A Rust library that machine-translates content records and keeps every
 * translation linked to its original and to its siblings.
 *
 * ## Features
 *
 * - Translate the title, body and excerpt of a record through Lingo.dev
 * - Create a new draft per target language, or update the existing one
 * - Keep a locale -> record map consistent on every member of a group
 * - Detect translations whose record was deleted and recreate them
 * - Per-field fallback to the original text when the provider skips a field
 * - SQLite or in-memory content stores
 * - Nonce and capability checks on the request surface
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `content`: Content store boundary and in-memory store
 * - `database`: SQLite content store
 * - `translation`: Linking and update logic:
 *   - `translation::registry`: Translation groups and fan-out writes
 *   - `translation::orchestrator`: Create-or-update decision
 *   - `translation::fields`: Field collection and fallback merging
 *   - `translation::lease`: Per-slot request leases
 * - `providers`: Translation engine clients:
 *   - `providers::lingo`: Lingo.dev localization engine
 *   - `providers::mock`: Scripted provider for tests and offline use
 * - `app_controller`: Request surface
 * - `security`: Request nonces
 * - `language_utils`: Locale utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod content;
pub mod database;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod security;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{ApiResponse, Caller, Controller};
pub use content::{ContentRecord, ContentStore, MemoryStore, RecordId};
pub use database::SqliteStore;
pub use translation::{Orchestrator, Outcome, Registry, TranslationGroup, TranslationReport};
pub use language_utils::{locales_match, normalize_locale, get_language_name};
pub use errors::{AppError, ProviderError, StoreError, TranslationError};
