//! Reading and writing LDML writing system record files.
//!
//! A record file is an XML document: an `identity` block names the tag, a
//! `layout` block holds the script orientation, a `collations` block holds
//! the sort rules, and vendor extensions live under `special` elements
//! keyed by namespace. [`read_ldml`] parses a file into a
//! [`WritingSystem`]; [`write_ldml`] regenerates the modeled elements and
//! carries everything else through from the previous version of the file
//! in canonical element order.

mod cursor;
mod error;
mod model;
pub mod order;
mod reader;
mod writer;

pub use error::LdmlError;
pub use model::{Keyboard, SortRules, WritingSystem};
pub use reader::read_ldml;
pub use writer::write_ldml;

pub(crate) use cursor::attribute_value;
pub(crate) use reader::{
    collation_sort_rules, declares_namespace, element_text, enter_ldml,
    first_standard_collation, parse_date_modified,
};

/// Namespace of the main extension block.
pub(crate) const PALASO_NAMESPACE: &str = "urn://palaso.org/ldmlExtensions/v1";
/// Namespace of the known keyboards extension block.
pub(crate) const PALASO2_NAMESPACE: &str = "urn://palaso.org/ldmlExtensions/v2";
