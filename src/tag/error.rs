//! Error types for language tag operations.

use thiserror::Error;

/// Errors that can occur while parsing, validating, or rewriting language tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A language, script, region, or variant value failed its registry check.
    #[error("'{value}' is not a valid {component} code")]
    InvalidTagComponent {
        component: &'static str,
        value: String,
    },

    /// A tag must have a language subtag or consist entirely of private use subtags.
    #[error(
        "a language tag must have a language subtag or consist entirely of private use subtags ({tag})"
    )]
    TagHasNoLanguage { tag: String },

    /// No classification accepts one of the input tokens.
    #[error("the language tag '{0}' could not be parsed")]
    UnparsableTag(String),

    /// A subtag appeared after a subtag that must follow it.
    #[error("misplaced subtag '{subtag}' in legacy tag '{tag}'")]
    MisplacedSubtag { subtag: String, tag: String },

    /// Legacy conversion requires the tag to start with the private-use marker.
    #[error("'{0}' is not a legacy private-use tag: it does not start with 'x-'")]
    NotALegacyTag(String),

    /// A subtag token contains characters outside the allowed alphanumeric set.
    #[error("subtag token '{0}' contains non-alphanumeric characters")]
    MalformedSubtag(String),

    /// The same token occurs more than once (case-insensitively) in a subtag.
    #[error("duplicate subtag token '{0}'")]
    DuplicateSubtag(String),
}

impl TagError {
    /// Create a registry validation error for one tag component.
    pub fn invalid_component(component: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidTagComponent {
            component,
            value: value.into(),
        }
    }

    /// Create a missing-language error for the given serialized tag.
    pub fn no_language(tag: impl Into<String>) -> Self {
        Self::TagHasNoLanguage { tag: tag.into() }
    }

    /// Create an ordering violation error for legacy conversion.
    pub fn misplaced(subtag: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::MisplacedSubtag {
            subtag: subtag.into(),
            tag: tag.into(),
        }
    }
}

/// Component names used in [`TagError::InvalidTagComponent`].
pub mod component {
    pub const LANGUAGE: &str = "ISO 639 language";
    pub const SCRIPT: &str = "ISO 15924 script";
    pub const REGION: &str = "ISO 3166 region";
    pub const VARIANT: &str = "registered variant";
    pub const PRIVATE_USE: &str = "private use";
}
