//! The writing system record an LDML file describes.

use chrono::{DateTime, Utc};

use crate::tag::Rfc5646Tag;

/// How a writing system sorts, together with the data that form needs.
///
/// The on-disk marker names the variant that wrote the collation, so a
/// reader can recover the original form instead of guessing from the rule
/// elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortRules {
    /// Sort by the system locale's default ordering.
    DefaultOrdering,
    /// Line-oriented shorthand rules.
    CustomSimple(String),
    /// ICU tailoring syntax.
    CustomIcu(String),
    /// Sort like another language, identified by its tag.
    OtherLanguage(String),
}

impl SortRules {
    /// The marker value stored with the collation element.
    pub fn marker(&self) -> &'static str {
        match self {
            SortRules::DefaultOrdering => "DefaultOrdering",
            SortRules::CustomSimple(_) => "CustomSimple",
            SortRules::CustomIcu(_) => "CustomICU",
            SortRules::OtherLanguage(_) => "OtherLanguage",
        }
    }
}

impl Default for SortRules {
    fn default() -> Self {
        SortRules::DefaultOrdering
    }
}

/// A keyboard layout a writing system has been typed with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub layout: String,
    pub locale: String,
}

/// An in-memory writing system record.
///
/// The identifier lives in [`tag`](Self::tag); the remaining fields mirror
/// the extension values a record file carries. `legacy_private_use` marks a
/// record whose tag was written entirely after the private use marker by an
/// older tool, which keeps its identity untouched when written back out.
#[derive(Debug, Clone)]
pub struct WritingSystem {
    pub tag: Rfc5646Tag,
    pub abbreviation: String,
    pub language_name: String,
    pub default_font_name: String,
    pub default_font_size: f32,
    pub keyboard: String,
    pub known_keyboards: Vec<Keyboard>,
    pub right_to_left: bool,
    pub is_legacy_encoded: bool,
    pub sort_rules: SortRules,
    pub spell_checking_id: String,
    pub version_number: String,
    pub version_description: String,
    pub date_modified: DateTime<Utc>,
    pub legacy_private_use: bool,
}

impl WritingSystem {
    /// A record for `tag` with every other field at its default and the
    /// modification date set to now.
    pub fn new(tag: Rfc5646Tag) -> Self {
        WritingSystem {
            tag,
            abbreviation: String::new(),
            language_name: String::new(),
            default_font_name: String::new(),
            default_font_size: 0.0,
            keyboard: String::new(),
            known_keyboards: Vec::new(),
            right_to_left: false,
            is_legacy_encoded: false,
            sort_rules: SortRules::default(),
            spell_checking_id: String::new(),
            version_number: String::new(),
            version_description: String::new(),
            date_modified: Utc::now(),
            legacy_private_use: false,
        }
    }

    /// Whether the record stores text in a Unicode encoding. Stored
    /// inverted, as the file format marks the legacy case.
    pub fn is_unicode_encoded(&self) -> bool {
        !self.is_legacy_encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_name_the_rule_form() {
        assert_eq!(SortRules::DefaultOrdering.marker(), "DefaultOrdering");
        assert_eq!(SortRules::CustomSimple("a".into()).marker(), "CustomSimple");
        assert_eq!(SortRules::CustomIcu("& a".into()).marker(), "CustomICU");
        assert_eq!(SortRules::OtherLanguage("en".into()).marker(), "OtherLanguage");
    }

    #[test]
    fn new_record_defaults() {
        let tag = Rfc5646Tag::parse("en").expect("Should parse");
        let ws = WritingSystem::new(tag);
        assert_eq!(ws.sort_rules, SortRules::DefaultOrdering);
        assert!(ws.is_unicode_encoded());
        assert!(!ws.legacy_private_use);
        assert_eq!(ws.default_font_size, 0.0);
    }
}
