//! The batch uniqueness pass.
//!
//! Cleaning can fold two differently written tags into the same value.
//! Records are visited in their file order. On a collision the earliest
//! record still holding the value keeps it, unless that record's tag
//! survived cleaning untouched, in which case it is the one renamed and
//! the newcomer keeps the value. Renames append a numbered private use
//! marker, `en` becoming `en-x-dupl0`. Visiting order makes the outcome
//! reproducible for a given input file set.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::migration::error::MigrateError;
use crate::migration::strategy::MigrationRecord;
use crate::tag::{Rfc5646Tag, TagError};

/// Rename records until every tag in the batch is unique, ignoring case.
pub(crate) fn ensure_unique(
    batch: &mut IndexMap<String, MigrationRecord>,
) -> Result<(), MigrateError> {
    let mut used: FxHashSet<String> = FxHashSet::default();
    for index in 0..batch.len() {
        let tag = batch[index].tag_after.clone();
        if used.insert(tag.to_ascii_lowercase()) {
            continue;
        }
        let owner = batch
            .values()
            .take(index)
            .position(|record| record.tag_after.eq_ignore_ascii_case(&tag));
        let rename = match owner {
            Some(owner) if batch[owner].is_pristine() => owner,
            _ => index,
        };
        let replacement =
            unique_for(&batch[rename].writing_system.tag, &used).map_err(|source| {
                MigrateError::Tag {
                    filename: batch[rename].filename.clone(),
                    source,
                }
            })?;
        used.insert(replacement.complete_tag().to_ascii_lowercase());
        tracing::debug!(
            "tag '{}' collides, renaming '{}' to '{}'",
            tag,
            batch[rename].filename,
            replacement.complete_tag()
        );
        let record = &mut batch[rename];
        record.tag_after = replacement.complete_tag();
        record.writing_system.tag = replacement;
    }
    Ok(())
}

/// The first `duplN` rename of `tag` whose serialization is not in `used`.
///
/// Every candidate starts over from the tag's own private use content, so
/// the markers never pile up across attempts. A marker the tag already
/// carries is skipped rather than duplicated.
fn unique_for(tag: &Rfc5646Tag, used: &FxHashSet<String>) -> Result<Rfc5646Tag, TagError> {
    let mut n = 0u32;
    loop {
        let marker = format!("dupl{n}");
        if !tag.private_use_contains(&marker) {
            let mut candidate = tag.clone();
            candidate.add_to_private_use(&marker)?;
            if !used.contains(&candidate.complete_tag().to_ascii_lowercase()) {
                return Ok(candidate);
            }
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::ldml::WritingSystem;

    use super::*;

    fn record(filename: &str, before: &str, after: &str) -> MigrationRecord {
        let tag = Rfc5646Tag::parse(after).expect("Should parse");
        MigrationRecord {
            filename: filename.to_string(),
            tag_before: before.to_string(),
            tag_after: after.to_string(),
            writing_system: WritingSystem::new(tag),
            content: String::new(),
        }
    }

    fn batch(records: Vec<MigrationRecord>) -> IndexMap<String, MigrationRecord> {
        records
            .into_iter()
            .map(|record| (record.filename.clone(), record))
            .collect()
    }

    #[test]
    fn unique_tags_are_left_alone() {
        let mut batch = batch(vec![
            record("a.ldml", "en", "en"),
            record("b.ldml", "fra", "fr"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en");
        assert_eq!(batch[1].tag_after, "fr");
    }

    #[test]
    fn a_pristine_owner_yields_its_value_to_a_changed_record() {
        let mut batch = batch(vec![
            record("a.ldml", "en", "en"),
            record("b.ldml", "eng", "en"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en-x-dupl0");
        assert_eq!(batch[0].writing_system.tag.complete_tag(), "en-x-dupl0");
        assert_eq!(batch[1].tag_after, "en");
    }

    #[test]
    fn a_changed_owner_keeps_its_value() {
        let mut batch = batch(vec![
            record("a.ldml", "eng", "en"),
            record("b.ldml", "EN", "en"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en");
        assert_eq!(batch[1].tag_after, "en-x-dupl0");
        assert_eq!(batch[1].writing_system.tag.complete_tag(), "en-x-dupl0");
    }

    #[test]
    fn a_three_way_collision_counts_upward() {
        let mut batch = batch(vec![
            record("a.ldml", "en", "en"),
            record("b.ldml", "eng", "en"),
            record("c.ldml", "EN", "en"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en-x-dupl0");
        assert_eq!(batch[1].tag_after, "en");
        assert_eq!(batch[2].tag_after, "en-x-dupl1");
    }

    #[test]
    fn collisions_ignore_case() {
        let mut batch = batch(vec![
            record("a.ldml", "en-US", "en-US"),
            record("b.ldml", "en-us-", "en-us"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en-US-x-dupl0");
        assert_eq!(batch[1].tag_after, "en-us");
    }

    #[test]
    fn a_marker_already_in_private_use_is_skipped() {
        let mut batch = batch(vec![
            record("a.ldml", "en-x-dupl0", "en-x-dupl0"),
            record("b.ldml", "eng-x-dupl0", "en-x-dupl0"),
        ]);
        ensure_unique(&mut batch).expect("Should dedup");
        assert_eq!(batch[0].tag_after, "en-x-dupl0-dupl1");
        assert_eq!(batch[1].tag_after, "en-x-dupl0");
    }
}
