//! # ldmlkit
//!
//! Core library for BCP 47 language tag normalization and LDML
//! writing-system file migration.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! migration → whole-folder migration of legacy record files
//!   ↓
//! ldml      → record file reading/writing, canonical element order
//!   ↓
//! collation → sort rule conversion between simple and ICU forms
//!   ↓
//! tag       → RFC 5646 tags, cleaning, legacy private-use interpretation
//!   ↓
//! registry  → subtag code tables (ISO 639 / 15924 / 3166, variants)
//! ```

// ============================================================================
// MODULES (dependency order: registry → tag → collation → ldml → migration)
// ============================================================================

/// Subtag registries: language, script, region, and variant code checks
pub mod registry;

/// Language tags: parsing, validation, cleaning, legacy interpretation
pub mod tag;

/// Sort rules: simple rules and ICU rule text, conversion both ways
pub mod collation;

/// LDML record files: reading, canonical writing, element ordering
pub mod ldml;

/// Migration: whole-folder migration to unique canonical tags
pub mod migration;

// Re-export the types most callers start from
pub use ldml::{read_ldml, write_ldml, LdmlError, SortRules, WritingSystem};
pub use migration::{ChangeLog, FolderMigrator, MigrateError, MigrationSummary};
pub use tag::{IetfLanguageTagCleaner, Rfc5646Tag, TagError};
