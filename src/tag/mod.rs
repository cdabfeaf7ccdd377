//! RFC 5646 language tags.
//!
//! [`Subtag`] holds the dash-delimited token sequences used for variant and
//! private-use parts, [`Rfc5646Tag`] composes the five components into a
//! validated identifier, [`interpreter`] rewrites tags expressed under the
//! legacy private-use convention, and [`cleaner`] normalizes arbitrary
//! malformed input into something [`Rfc5646Tag`] accepts.

pub mod cleaner;
pub mod error;
pub mod interpreter;
pub mod rfc5646;
pub mod subtag;

pub use cleaner::IetfLanguageTagCleaner;
pub use error::TagError;
pub use interpreter::InterpretedTag;
pub use rfc5646::{Rfc5646Tag, TagBuilder};
pub use subtag::Subtag;
