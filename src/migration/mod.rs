//! Migration of legacy writing system folders to the current conventions.
//!
//! A folder of record files written by older tools is migrated in one
//! pass: [`source`](self) reads each file leniently, the strategy cleans
//! each tag into a valid one and carries the record's fields forward,
//! colliding tags are made unique, and every record is written to the
//! destination under its migrated tag. [`FolderMigrator`] drives the pass
//! and is the usual entry point; the [`ChangeLog`] it returns names every
//! tag the migration changed.

mod audit;
mod dedup;
mod error;
mod source;
mod strategy;

pub use audit::{ChangeEntry, ChangeLog};
pub use error::MigrateError;
pub use source::LegacyRecord;
pub use strategy::{FolderMigrator, MigrationRecord, MigrationSummary};
