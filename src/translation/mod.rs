/*!
 * Translation of content records into linked translations.
 *
 * This module contains the translation-group linking and update logic:
 *
 * - `registry`: Translation groups and their per-member persistence
 * - `orchestrator`: Create-or-update decision for one record and locale
 * - `fields`: Translatable fields and fallback merging of provider output
 * - `lease`: Per-slot leases rejecting concurrent requests
 */

// Re-export main types for easier usage
pub use self::fields::{FieldTranslation, TranslatableFields, TranslatedFields};
pub use self::lease::{SlotLease, SlotLeases};
pub use self::orchestrator::{Orchestrator, Outcome, StringTranslation, TranslationReport};
pub use self::registry::{Registry, TranslationEntry, TranslationGroup};

// Submodules
pub mod fields;
pub mod lease;
pub mod orchestrator;
pub mod registry;
