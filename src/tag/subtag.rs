//! Ordered, dash-delimited token sequences used for variant and private-use parts.

use regex::Regex;
use smol_str::SmolStr;

use crate::tag::error::TagError;

/// An ordered sequence of case-preserved tokens.
///
/// Tokens are stored in insertion order. All membership and removal checks are
/// case-insensitive; serialization joins tokens with `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Subtag {
    parts: Vec<SmolStr>,
}

impl Subtag {
    /// Create an empty subtag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a subtag from dash-delimited text.
    pub fn from_text(text: &str) -> Self {
        let mut subtag = Self::new();
        subtag.append(text);
        subtag
    }

    /// Split dash-delimited text into tokens, dropping empty ones.
    pub fn parse_parts(text: &str) -> Vec<SmolStr> {
        text.split('-')
            .filter(|part| !part.is_empty())
            .map(SmolStr::new)
            .collect()
    }

    /// Append every token in `text`, preserving order. No validation is performed.
    pub fn append(&mut self, text: &str) {
        self.parts.extend(Self::parse_parts(text));
    }

    /// Insert a single token at the front of the sequence.
    pub fn insert_at_start(&mut self, token: &str) {
        self.parts.insert(0, SmolStr::new(token));
    }

    /// Remove the first token matching each token of `text`, case-insensitively.
    /// Tokens that are not present are silently ignored.
    pub fn remove_all(&mut self, text: &str) {
        for requested in Self::parse_parts(text) {
            if let Some(index) = self
                .parts
                .iter()
                .position(|part| part.eq_ignore_ascii_case(&requested))
            {
                self.parts.remove(index);
            }
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.parts.iter().any(|part| part.eq_ignore_ascii_case(token))
    }

    /// Fail if any token contains a character that is not a Unicode letter or digit.
    pub fn assert_no_invalid_content(&self) -> Result<(), TagError> {
        for part in &self.parts {
            if part.chars().any(|c| !c.is_alphanumeric()) {
                return Err(TagError::MalformedSubtag(part.to_string()));
            }
        }
        Ok(())
    }

    /// Fail if any token occurs more than once, case-insensitively.
    pub fn assert_no_duplicates(&self) -> Result<(), TagError> {
        for (index, part) in self.parts.iter().enumerate() {
            if self.parts[..index]
                .iter()
                .any(|earlier| earlier.eq_ignore_ascii_case(part))
            {
                return Err(TagError::DuplicateSubtag(part.to_string()));
            }
        }
        Ok(())
    }

    /// Iterate over tokens matching `pattern`. The sequence is lazy and can be
    /// restarted by calling the method again.
    pub fn matching<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = &'a SmolStr> + 'a {
        self.parts.iter().filter(move |part| pattern.is_match(part))
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// True when there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate over all tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.parts.iter()
    }

    /// The first token, if any.
    pub fn first(&self) -> Option<&SmolStr> {
        self.parts.first()
    }

    /// Remove every token.
    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// Strip characters that are not Unicode letters or digits from every
    /// token, dropping tokens that become empty.
    pub fn remove_non_alphanumeric(&mut self) {
        let mut cleaned = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            let kept: String = part.chars().filter(|c| c.is_alphanumeric()).collect();
            if !kept.is_empty() {
                cleaned.push(SmolStr::new(kept));
            }
        }
        self.parts = cleaned;
    }

    /// Truncate every token to at most `size` characters.
    ///
    /// Duplicates introduced by truncation are left in place; callers that
    /// care run [`Subtag::remove_duplicates`] afterwards.
    pub fn truncate_parts(&mut self, size: usize) {
        for part in &mut self.parts {
            if part.chars().count() > size {
                let truncated: String = part.chars().take(size).collect();
                *part = SmolStr::new(truncated);
            }
        }
    }

    /// Drop every token that repeats an earlier one case-insensitively.
    pub fn remove_duplicates(&mut self) {
        let mut kept: Vec<SmolStr> = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            if !kept.iter().any(|earlier| earlier.eq_ignore_ascii_case(part)) {
                kept.push(part.clone());
            }
        }
        self.parts = kept;
    }

    /// Keep the first token and move every later token onto the end of `to`.
    pub fn keep_first_and_move_remainder_to(&mut self, to: &mut Subtag) {
        while self.parts.len() > 1 {
            let part = self.parts.remove(1);
            to.parts.push(part);
        }
    }
}

impl std::fmt::Display for Subtag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for part in &self.parts {
            if !first {
                f.write_str("-")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_splits_and_drops_empty_tokens() {
        let mut subtag = Subtag::new();
        subtag.append("fonipa--etic-");
        assert_eq!(subtag.to_string(), "fonipa-etic");
        assert_eq!(subtag.len(), 2);
    }

    #[test]
    fn test_remove_all_removes_first_match_case_insensitively() {
        let mut subtag = Subtag::from_text("AuDiO-test-audio");
        subtag.remove_all("audio");
        assert_eq!(subtag.to_string(), "test-audio");
        // removing something absent is a no-op
        subtag.remove_all("missing");
        assert_eq!(subtag.to_string(), "test-audio");
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let subtag = Subtag::from_text("fonipa-Etic");
        assert!(subtag.contains("FONIPA"));
        assert!(subtag.contains("etic"));
        assert!(!subtag.contains("emic"));
    }

    #[test]
    fn test_assert_no_invalid_content() {
        let good = Subtag::from_text("audio-1996");
        assert!(good.assert_no_invalid_content().is_ok());

        let bad = Subtag::from_text("au_dio");
        assert_eq!(
            bad.assert_no_invalid_content(),
            Err(TagError::MalformedSubtag("au_dio".to_string()))
        );
    }

    #[test]
    fn test_assert_no_duplicates() {
        let good = Subtag::from_text("etic-emic");
        assert!(good.assert_no_duplicates().is_ok());

        let bad = Subtag::from_text("etic-ETIC");
        assert_eq!(
            bad.assert_no_duplicates(),
            Err(TagError::DuplicateSubtag("ETIC".to_string()))
        );
    }

    #[test]
    fn test_matching_is_restartable() {
        let subtag = Subtag::from_text("private-dupl0-extra-dupl12");
        let pattern = Regex::new("^dupl[0-9]*$").expect("Should compile dupl pattern");

        let first: Vec<_> = subtag.matching(&pattern).map(|p| p.as_str()).collect();
        assert_eq!(first, vec!["dupl0", "dupl12"]);

        // a second call restarts the sequence
        let second: Vec<_> = subtag.matching(&pattern).map(|p| p.as_str()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_truncate_parts() {
        let mut subtag = Subtag::from_text("verylongsubtag-ok");
        subtag.truncate_parts(8);
        assert_eq!(subtag.to_string(), "verylong-ok");
    }

    #[test]
    fn test_remove_non_alphanumeric_drops_emptied_tokens() {
        let mut subtag = Subtag::from_text("e!tic-___");
        subtag.remove_non_alphanumeric();
        assert_eq!(subtag.to_string(), "etic");
    }

    #[test]
    fn test_keep_first_and_move_remainder() {
        let mut from = Subtag::from_text("one-two-three");
        let mut to = Subtag::from_text("zero");
        from.keep_first_and_move_remainder_to(&mut to);
        assert_eq!(from.to_string(), "one");
        assert_eq!(to.to_string(), "zero-two-three");
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let mut subtag = Subtag::from_text("Etic-emic-ETIC");
        subtag.remove_duplicates();
        assert_eq!(subtag.to_string(), "Etic-emic");
    }
}
