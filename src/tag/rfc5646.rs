//! The composed RFC 5646 language tag.

use std::fmt;

use smol_str::SmolStr;

use crate::registry::{self, well_known};
use crate::tag::error::{TagError, component};
use crate::tag::subtag::Subtag;

/// A validated RFC 5646 language tag.
///
/// Two invariants hold at all times: every non-empty language, script,
/// region, and variant token passes its registry check, and the tag carries
/// a language subtag unless it consists entirely of private use content.
/// Mutators validate a draft copy first, so a failed mutation leaves the
/// tag untouched. Token case is preserved exactly as given.
///
/// # Example
///
/// ```
/// use ldmlkit::tag::Rfc5646Tag;
///
/// let mut tag = Rfc5646Tag::parse("en-Latn-US").expect("Should parse");
/// tag.add_to_private_use("x-audio").expect("Should accept private use");
/// assert_eq!(tag.complete_tag(), "en-Latn-US-x-audio");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rfc5646Tag {
    language: SmolStr,
    script: SmolStr,
    region: SmolStr,
    variant: Subtag,
    private_use: Subtag,
}

/// An unvalidated draft of an [`Rfc5646Tag`].
///
/// Rewriting passes accumulate components here without invariant checks and
/// call [`TagBuilder::build`] once, which validates everything and produces
/// the tag. Invalid intermediate states never escape this type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBuilder {
    pub language: SmolStr,
    pub script: SmolStr,
    pub region: SmolStr,
    pub variant: Subtag,
    pub private_use: Subtag,
}

impl TagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft and produce the tag.
    pub fn build(self) -> Result<Rfc5646Tag, TagError> {
        validate_language(&self.language)?;
        validate_script(&self.script)?;
        validate_region(&self.region)?;
        validate_variant(&self.variant)?;
        validate_private_use(&self.private_use)?;
        let pure_private_use = self.script.is_empty()
            && self.region.is_empty()
            && self.variant.is_empty()
            && !self.private_use.is_empty();
        if self.language.is_empty() && !pure_private_use {
            return Err(TagError::no_language(self.serialize()));
        }
        Ok(Rfc5646Tag {
            language: self.language,
            script: self.script,
            region: self.region,
            variant: self.variant,
            private_use: self.private_use,
        })
    }

    /// Serialize the draft as it stands, without validating.
    pub fn serialize(&self) -> String {
        serialize_components(
            &self.language,
            &self.script,
            &self.region,
            &self.variant,
            &self.private_use,
        )
    }
}

impl Rfc5646Tag {
    /// Build a tag from raw component strings, validating everything.
    /// `private_use` may carry a leading `x-` marker, which is stripped.
    pub fn new(
        language: &str,
        script: &str,
        region: &str,
        variant: &str,
        private_use: &str,
    ) -> Result<Self, TagError> {
        TagBuilder {
            language: SmolStr::new(language),
            script: SmolStr::new(script),
            region: SmolStr::new(region),
            variant: Subtag::from_text(variant),
            private_use: Subtag::from_text(strip_leading_x(private_use)),
        }
        .build()
    }

    /// Parse a serialized tag.
    ///
    /// Token 0 is the language. An `x` token (case-insensitive) switches to
    /// private-use mode for everything that follows. Before that, token 1
    /// may be a script, tokens 1-2 may be a region as long as no variant
    /// has been seen, and any registered variant is appended to the variant
    /// sequence. A token no classification accepts is an
    /// [`TagError::UnparsableTag`] error.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let mut draft = TagBuilder::new();
        let mut in_private_use = false;
        for (position, token) in text.split('-').enumerate() {
            if token.eq_ignore_ascii_case("x") {
                in_private_use = true;
                continue;
            }
            if in_private_use {
                draft.private_use.append(token);
                continue;
            }
            if position == 0 {
                if !token.is_empty() && !registry::is_valid_language_code(token) {
                    return Err(TagError::invalid_component(component::LANGUAGE, token));
                }
                draft.language = SmolStr::new(token);
                continue;
            }
            if position == 1 && registry::is_valid_script_code(token) {
                draft.script = SmolStr::new(token);
                continue;
            }
            if position <= 2 && draft.variant.is_empty() && registry::is_valid_region_code(token) {
                draft.region = SmolStr::new(token);
                continue;
            }
            if registry::is_valid_variant_code(token) {
                draft.variant.append(token);
                continue;
            }
            return Err(TagError::UnparsableTag(text.to_string()));
        }
        draft.build()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn variant(&self) -> &Subtag {
        &self.variant
    }

    pub fn private_use(&self) -> &Subtag {
        &self.private_use
    }

    pub fn has_language(&self) -> bool {
        !self.language.is_empty()
    }

    pub fn has_script(&self) -> bool {
        !self.script.is_empty()
    }

    pub fn has_region(&self) -> bool {
        !self.region.is_empty()
    }

    pub fn has_variant(&self) -> bool {
        !self.variant.is_empty()
    }

    pub fn has_private_use(&self) -> bool {
        !self.private_use.is_empty()
    }

    /// The variant tokens joined with `-`, without any private use content.
    pub fn variant_text(&self) -> String {
        self.variant.to_string()
    }

    /// The private use block including its `x-` marker, or an empty string.
    pub fn private_use_text(&self) -> String {
        if self.private_use.is_empty() {
            String::new()
        } else {
            format!("x-{}", self.private_use)
        }
    }

    /// The canonical serialization:
    /// `language["-"script]["-"region]["-"variant]["-x-"privateUse]`, or the
    /// bare private use block when the language is empty.
    pub fn complete_tag(&self) -> String {
        serialize_components(
            &self.language,
            &self.script,
            &self.region,
            &self.variant,
            &self.private_use,
        )
    }

    /// Copy the components into a draft for unvalidated rewriting.
    pub fn to_builder(&self) -> TagBuilder {
        TagBuilder {
            language: self.language.clone(),
            script: self.script.clone(),
            region: self.region.clone(),
            variant: self.variant.clone(),
            private_use: self.private_use.clone(),
        }
    }

    pub fn set_language(&mut self, code: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.language = SmolStr::new(code);
        self.commit(draft)
    }

    pub fn set_script(&mut self, code: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.script = SmolStr::new(code);
        self.commit(draft)
    }

    pub fn set_region(&mut self, code: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.region = SmolStr::new(code);
        self.commit(draft)
    }

    /// Replace the whole variant sequence with tokens parsed from `text`.
    pub fn set_variant(&mut self, text: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.variant = Subtag::from_text(text);
        self.commit(draft)
    }

    /// Replace the whole private use sequence. A leading `x-` is stripped.
    pub fn set_private_use(&mut self, text: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.private_use = Subtag::from_text(strip_leading_x(text));
        self.commit(draft)
    }

    /// Append tokens to the private use sequence. A leading `x-` is stripped.
    pub fn add_to_private_use(&mut self, text: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.private_use.append(strip_leading_x(text));
        self.commit(draft)
    }

    /// Remove tokens from the private use sequence. A leading `x-` is
    /// stripped; tokens that are not present are ignored.
    pub fn remove_from_private_use(&mut self, text: &str) -> Result<(), TagError> {
        let mut draft = self.to_builder();
        draft.private_use.remove_all(strip_leading_x(text));
        self.commit(draft)
    }

    /// Case-insensitive private use membership. A leading `x-` is stripped.
    pub fn private_use_contains(&self, token: &str) -> bool {
        self.private_use.contains(strip_leading_x(token))
    }

    fn commit(&mut self, draft: TagBuilder) -> Result<(), TagError> {
        *self = draft.build()?;
        Ok(())
    }
}

impl Default for Rfc5646Tag {
    /// The unlisted-language tag `qaa`.
    fn default() -> Self {
        Self {
            language: SmolStr::new(well_known::UNLISTED_LANGUAGE),
            script: SmolStr::default(),
            region: SmolStr::default(),
            variant: Subtag::new(),
            private_use: Subtag::new(),
        }
    }
}

impl fmt::Display for Rfc5646Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.complete_tag())
    }
}

fn serialize_components(
    language: &str,
    script: &str,
    region: &str,
    variant: &Subtag,
    private_use: &Subtag,
) -> String {
    let mut out = String::new();
    for piece in [language, script, region] {
        if piece.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(piece);
    }
    if !variant.is_empty() {
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(&variant.to_string());
    }
    if !private_use.is_empty() {
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str("x-");
        out.push_str(&private_use.to_string());
    }
    out
}

fn strip_leading_x(text: &str) -> &str {
    if text.len() >= 2 && text[..2].eq_ignore_ascii_case("x-") {
        &text[2..]
    } else {
        text
    }
}

fn validate_language(code: &str) -> Result<(), TagError> {
    if code.is_empty() || registry::is_valid_language_code(code) {
        Ok(())
    } else {
        Err(TagError::invalid_component(component::LANGUAGE, code))
    }
}

fn validate_script(code: &str) -> Result<(), TagError> {
    if code.is_empty() || registry::is_valid_script_code(code) {
        Ok(())
    } else {
        Err(TagError::invalid_component(component::SCRIPT, code))
    }
}

fn validate_region(code: &str) -> Result<(), TagError> {
    if code.is_empty() || registry::is_valid_region_code(code) {
        Ok(())
    } else {
        Err(TagError::invalid_component(component::REGION, code))
    }
}

fn validate_variant(variant: &Subtag) -> Result<(), TagError> {
    variant.assert_no_invalid_content()?;
    variant.assert_no_duplicates()?;
    for token in variant.iter() {
        if !registry::is_valid_variant_code(token) {
            return Err(TagError::invalid_component(component::VARIANT, token.as_str()));
        }
    }
    Ok(())
}

fn validate_private_use(private_use: &Subtag) -> Result<(), TagError> {
    if private_use.contains("x") {
        return Err(TagError::invalid_component(component::PRIVATE_USE, "x"));
    }
    private_use.assert_no_invalid_content()?;
    private_use.assert_no_duplicates()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_tag() {
        let tag = Rfc5646Tag::parse("en-Latn-US-fonipa").expect("Should parse");
        assert_eq!(tag.language(), "en");
        assert_eq!(tag.script(), "Latn");
        assert_eq!(tag.region(), "US");
        assert_eq!(tag.variant_text(), "fonipa");
        assert!(!tag.has_private_use());
    }

    #[test]
    fn parse_region_without_script() {
        let tag = Rfc5646Tag::parse("de-DE").expect("Should parse");
        assert_eq!(tag.script(), "");
        assert_eq!(tag.region(), "DE");
    }

    #[test]
    fn parse_round_trips_canonical_tags() {
        for text in [
            "en",
            "en-US",
            "en-Latn-US",
            "sl-rozaj-biske",
            "zh-CN-x-py",
            "qaa-Zxxx-US-fonipa-x-private-en",
            "x-private",
        ] {
            let tag = Rfc5646Tag::parse(text).expect("Should parse");
            assert_eq!(tag.complete_tag(), text);
        }
    }

    #[test]
    fn parse_preserves_case() {
        let tag = Rfc5646Tag::parse("eN-lAtN-us").expect("Should parse");
        assert_eq!(tag.complete_tag(), "eN-lAtN-us");
    }

    #[test]
    fn parse_private_use_only() {
        let tag = Rfc5646Tag::parse("x-private").expect("Should parse");
        assert!(!tag.has_language());
        assert!(tag.private_use_contains("private"));
        assert_eq!(tag.complete_tag(), "x-private");
    }

    #[test]
    fn parse_rejects_bad_language() {
        let err = Rfc5646Tag::parse("english-US").expect_err("Should fail");
        assert_eq!(
            err,
            TagError::invalid_component(component::LANGUAGE, "english")
        );
    }

    #[test]
    fn parse_rejects_unclassifiable_token() {
        let err = Rfc5646Tag::parse("en-gibberish123456").expect_err("Should fail");
        assert!(matches!(err, TagError::UnparsableTag(_)));
    }

    #[test]
    fn parse_rejects_region_after_variant() {
        // A region code can only appear before any variant.
        let err = Rfc5646Tag::parse("en-fonipa-US").expect_err("Should fail");
        assert!(matches!(err, TagError::UnparsableTag(_)));
    }

    #[test]
    fn invalid_script_is_rejected() {
        let err = Rfc5646Tag::new("en", "12", "", "", "").expect_err("Should fail");
        assert_eq!(err, TagError::invalid_component(component::SCRIPT, "12"));
    }

    #[test]
    fn failed_mutation_leaves_tag_unchanged() {
        let mut tag = Rfc5646Tag::parse("en-US").expect("Should parse");
        tag.set_script("12").expect_err("Should fail");
        assert_eq!(tag.complete_tag(), "en-US");
    }

    #[test]
    fn script_without_language_is_rejected() {
        let err = Rfc5646Tag::new("", "Latn", "", "", "").expect_err("Should fail");
        assert!(matches!(err, TagError::TagHasNoLanguage { .. }));
    }

    #[test]
    fn pure_private_use_tag_is_valid() {
        let tag = Rfc5646Tag::new("", "", "", "", "x-private").expect("Should validate");
        assert_eq!(tag.complete_tag(), "x-private");
        assert_eq!(tag.private_use_text(), "x-private");
    }

    #[test]
    fn add_and_remove_private_use() {
        let mut tag = Rfc5646Tag::parse("en").expect("Should parse");
        tag.add_to_private_use("x-audio").expect("Should accept");
        assert_eq!(tag.complete_tag(), "en-x-audio");
        assert!(tag.private_use_contains("audio"));
        assert!(tag.private_use_contains("x-audio"));
        tag.remove_from_private_use("audio").expect("Should accept");
        assert_eq!(tag.complete_tag(), "en");
    }

    #[test]
    fn duplicate_private_use_is_rejected() {
        let mut tag = Rfc5646Tag::parse("en-x-test").expect("Should parse");
        let err = tag.add_to_private_use("TEST").expect_err("Should fail");
        assert_eq!(err, TagError::DuplicateSubtag("TEST".to_string()));
        assert_eq!(tag.complete_tag(), "en-x-test");
    }

    #[test]
    fn unregistered_variant_is_rejected() {
        let err = Rfc5646Tag::new("en", "", "", "bogus", "").expect_err("Should fail");
        assert_eq!(err, TagError::invalid_component(component::VARIANT, "bogus"));
    }

    #[test]
    fn marker_token_inside_private_use_is_rejected() {
        let mut draft = TagBuilder::new();
        draft.language = "en".into();
        draft.private_use.append("a-x-b");
        let err = draft.build().expect_err("Should fail");
        assert_eq!(err, TagError::invalid_component(component::PRIVATE_USE, "x"));
    }

    #[test]
    fn builder_tolerates_invalid_intermediate_state() {
        let mut draft = TagBuilder::new();
        draft.script = "Latn".into();
        draft.language = "en".into();
        let tag = draft.build().expect("Should validate");
        assert_eq!(tag.complete_tag(), "en-Latn");
    }

    #[test]
    fn default_is_the_unlisted_language() {
        assert_eq!(Rfc5646Tag::default().complete_tag(), "qaa");
    }

    #[test]
    fn equality_is_case_sensitive() {
        let lower = Rfc5646Tag::parse("en-us").expect("Should parse");
        let upper = Rfc5646Tag::parse("en-US").expect("Should parse");
        assert_ne!(lower, upper);
        assert_eq!(
            upper,
            Rfc5646Tag::new("en", "", "US", "", "").expect("Should validate")
        );
    }
}
