//! Error type for folder migration.

use std::path::PathBuf;

use thiserror::Error;

use crate::ldml::LdmlError;
use crate::tag::TagError;

/// Errors raised while migrating a folder of legacy record files.
///
/// Failures tied to one source file carry that file's name, so a caller
/// collecting them can report which records were left behind.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// A source file could not be read as a legacy record.
    #[error("cannot migrate '{filename}': {source}")]
    Record {
        filename: String,
        source: LdmlError,
    },

    /// The tag a source file carries cannot be cleaned into a valid one.
    #[error("cannot migrate the tag of '{filename}': {source}")]
    Tag {
        filename: String,
        source: TagError,
    },

    /// Writing a migrated record failed.
    #[error("cannot write migrated record '{filename}': {source}")]
    Write {
        filename: String,
        source: LdmlError,
    },

    /// A file or folder operation failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
