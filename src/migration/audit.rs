//! Audit log of the tag renames a migration performed.

/// One tag rename, old value to new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub from: String,
    pub to: String,
}

/// Every tag change a migration made, in output order.
///
/// A record whose cleaned tag equals the one its file already carried
/// produces no entry; only genuine renames are logged.
#[derive(Debug, Default)]
pub struct ChangeLog {
    entries: Vec<ChangeEntry>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a tag changed from `from` to `to`.
    pub fn log_change(&mut self, from: &str, to: &str) {
        tracing::debug!("tag '{}' was migrated to '{}'", from, to);
        self.entries.push(ChangeEntry {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// The changes in the order they were recorded.
    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_changes_in_order() {
        let mut log = ChangeLog::new();
        assert!(log.is_empty());
        log.log_change("eng", "en");
        log.log_change("en-Latn-US", "en-US");
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].from, "eng");
        assert_eq!(log.entries()[0].to, "en");
        assert_eq!(log.entries()[1].from, "en-Latn-US");
        assert!(!log.is_empty());
    }
}
