//! The folder migration pass.
//!
//! [`FolderMigrator`] reads every record file in a source folder, cleans
//! each tag into a valid one, makes the cleaned tags unique within the
//! batch, and writes every record to a destination folder under its
//! migrated tag. Source files are never modified. A file that cannot be
//! read as a legacy record is skipped and reported in the summary; the
//! rest of the batch still migrates.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tempfile::NamedTempFile;

use crate::ldml::{write_ldml, WritingSystem};
use crate::migration::audit::ChangeLog;
use crate::migration::dedup::ensure_unique;
use crate::migration::error::MigrateError;
use crate::migration::source::LegacyRecord;
use crate::tag::IetfLanguageTagCleaner;

/// One record in the migration batch.
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    /// Name of the source file within the source folder.
    pub filename: String,
    /// The complete tag the source file carried, as written.
    pub tag_before: String,
    /// The tag the record is written under, final once the whole batch
    /// has been made unique.
    pub tag_after: String,
    /// The migrated record.
    pub writing_system: WritingSystem,
    /// Source file content, merged back in on write.
    pub(crate) content: String,
}

impl MigrationRecord {
    /// Whether cleaning left the tag exactly as the file wrote it.
    pub(crate) fn is_pristine(&self) -> bool {
        self.tag_before == self.tag_after
    }
}

/// What a migration produced: the batch in output order, the tag renames,
/// and the per-file failures that were skipped.
#[derive(Debug)]
pub struct MigrationSummary {
    pub records: Vec<MigrationRecord>,
    pub changes: ChangeLog,
    pub failures: Vec<MigrateError>,
}

/// Migrates a folder of legacy record files into a destination folder.
///
/// # Example
///
/// ```no_run
/// use ldmlkit::migration::FolderMigrator;
///
/// let migrator = FolderMigrator::new("old/ws", "new/ws");
/// let summary = migrator.migrate().expect("Should migrate");
/// for change in summary.changes.entries() {
///     println!("{} is now {}", change.from, change.to);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FolderMigrator {
    source: PathBuf,
    destination: PathBuf,
}

impl FolderMigrator {
    /// A migrator reading from `source` and writing to `destination`. The
    /// destination folder is created when the migration runs.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        FolderMigrator {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Run the migration.
    ///
    /// Files that cannot be read as legacy records land in the summary's
    /// `failures` and everything else still migrates. An error is returned
    /// only when the batch as a whole cannot proceed, such as an unreadable
    /// source folder or a failed write; no partially written record file is
    /// ever left in the destination.
    pub fn migrate(&self) -> Result<MigrationSummary, MigrateError> {
        let mut failures = Vec::new();
        let mut batch: IndexMap<String, MigrationRecord> = IndexMap::new();
        for filename in self.record_files()? {
            let path = self.source.join(&filename);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(source) => {
                    tracing::warn!("skipping '{}': {}", filename, source);
                    failures.push(MigrateError::Io { path, source });
                    continue;
                }
            };
            match migrate_file(&filename, content) {
                Ok(record) => {
                    batch.insert(filename, record);
                }
                Err(error) => {
                    tracing::warn!("skipping '{}': {}", filename, error);
                    failures.push(error);
                }
            }
        }

        ensure_unique(&mut batch)?;

        fs::create_dir_all(&self.destination).map_err(|source| MigrateError::Io {
            path: self.destination.clone(),
            source,
        })?;
        let mut changes = ChangeLog::new();
        for record in batch.values() {
            if record.tag_before != record.tag_after {
                changes.log_change(&record.tag_before, &record.tag_after);
            }
            self.write_record(record)?;
        }

        Ok(MigrationSummary {
            records: batch.into_values().collect(),
            changes,
            failures,
        })
    }

    /// The record files in the source folder, sorted by name. The sort
    /// keeps the batch order, and with it every rename the uniqueness pass
    /// picks, reproducible across runs.
    fn record_files(&self) -> Result<Vec<String>, MigrateError> {
        let entries = fs::read_dir(&self.source).map_err(|source| MigrateError::Io {
            path: self.source.clone(),
            source,
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| MigrateError::Io {
                path: self.source.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "ldml") {
                if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Write one migrated record, staging to a temporary file so a failed
    /// write never leaves a partial record behind.
    fn write_record(&self, record: &MigrationRecord) -> Result<(), MigrateError> {
        let destination = self.destination.join(format!("{}.ldml", record.tag_after));
        let mut staged =
            NamedTempFile::new_in(&self.destination).map_err(|source| MigrateError::Io {
                path: self.destination.clone(),
                source,
            })?;
        write_ldml(&mut staged, &record.writing_system, Some(&record.content)).map_err(
            |source| MigrateError::Write {
                filename: record.filename.clone(),
                source,
            },
        )?;
        staged.persist(&destination).map_err(|error| MigrateError::Io {
            path: destination,
            source: error.error,
        })?;
        Ok(())
    }
}

/// Migrate one file's content into a batch record. The raw tag components
/// are cleaned into a valid tag; every other field crosses over unchanged.
fn migrate_file(filename: &str, content: String) -> Result<MigrationRecord, MigrateError> {
    let legacy = LegacyRecord::from_text(&content).map_err(|source| MigrateError::Record {
        filename: filename.to_string(),
        source,
    })?;
    let mut cleaner = IetfLanguageTagCleaner::new(
        &legacy.language,
        &legacy.script,
        &legacy.territory,
        &legacy.variant,
    );
    cleaner.clean();
    let tag = cleaner.to_tag().map_err(|source| MigrateError::Tag {
        filename: filename.to_string(),
        source,
    })?;
    let tag_before = legacy.complete_tag();
    let tag_after = tag.complete_tag();
    tracing::debug!("migrating '{}' as '{}'", filename, tag_after);

    let mut ws = WritingSystem::new(tag);
    ws.abbreviation = legacy.abbreviation;
    ws.language_name = legacy.language_name;
    ws.default_font_name = legacy.default_font_name;
    ws.default_font_size = legacy.default_font_size;
    ws.keyboard = legacy.keyboard;
    ws.right_to_left = legacy.right_to_left;
    ws.is_legacy_encoded = legacy.is_legacy_encoded;
    ws.sort_rules = legacy.sort_rules;
    ws.spell_checking_id = legacy.spell_checking_id;
    ws.version_number = legacy.version_number;
    ws.version_description = legacy.version_description;
    ws.date_modified = legacy.date_modified;
    Ok(MigrationRecord {
        filename: filename.to_string(),
        tag_before,
        tag_after,
        writing_system: ws,
        content,
    })
}
