//! Sort rule formats and the conversions between them.
//!
//! Writing system records carry their sort order in one of three custom
//! forms. Simple rules are the line-oriented shorthand, ICU rules are ICU
//! tailoring syntax, and LDML collation elements are the on-disk XML form.
//! Everything funnels through ICU text: simple rules convert up to ICU,
//! ICU converts to and from the LDML elements, and a restricted ICU shape
//! converts back down to simple rules.

pub mod lexer;

mod icu_rules;
mod simple_rules;

pub use icu_rules::{
    icu_to_ldml_rules, icu_to_simple_rules, ldml_rules_to_icu, validate_icu_rules,
};
pub use simple_rules::simple_rules_to_icu;
