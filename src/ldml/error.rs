//! Error types for LDML reading, writing, and sort-rule conversion.

use thiserror::Error;

use crate::tag::TagError;

/// Errors raised while reading or writing LDML writing-system files.
#[derive(Debug, Error)]
pub enum LdmlError {
    /// The underlying XML stream could not be parsed.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute could not be decoded.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Element or attribute bytes are not valid UTF-8.
    #[error("invalid UTF-8 in source: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Writing to the output stream failed.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// The source document does not have the expected structure.
    #[error("malformed source record: {0}")]
    MalformedSourceRecord(String),

    /// Simple sort rules text failed to parse.
    #[error("invalid simple sort rules: {0}")]
    InvalidSimpleRules(String),

    /// ICU sort rules text failed to parse.
    #[error("invalid ICU sort rules: {0}")]
    InvalidIcuRules(String),

    /// A language tag embedded in the document is invalid.
    #[error("invalid language tag in source record: {0}")]
    Tag(#[from] TagError),
}

impl LdmlError {
    /// Create a malformed-record error with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSourceRecord(reason.into())
    }
}
