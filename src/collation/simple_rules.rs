//! Conversion of simple sort rules to ICU rule syntax.
//!
//! Simple rules are a shorthand for the common case of listing collation
//! elements in order. Elements on one line are secondary differences,
//! parenthesized groups hold tertiary differences, and each new line is a
//! primary difference. The generated ICU rules order everything after the
//! first regular character so unlisted characters keep their default
//! weights.

use rustc_hash::FxHashSet;

use crate::collation::lexer::{self, SimpleToken, Token};
use crate::ldml::LdmlError;

/// Convert simple sort rules to ICU rule syntax.
///
/// # Example
///
/// ```
/// use ldmlkit::collation::simple_rules_to_icu;
///
/// let icu = simple_rules_to_icu("a b\nc").expect("Should convert");
/// assert_eq!(icu, "&[before 1] [first regular] < a << b < c");
/// ```
pub fn simple_rules_to_icu(rules: &str) -> Result<String, LdmlError> {
    Converter::new(rules).convert()
}

struct Converter<'a> {
    input: &'a str,
    tokens: Vec<Token<'a, SimpleToken>>,
    pos: usize,
    used: FxHashSet<String>,
}

impl<'a> Converter<'a> {
    fn new(input: &'a str) -> Self {
        Converter {
            input,
            tokens: lexer::tokenize_simple(input),
            pos: 0,
            used: FxHashSet::default(),
        }
    }

    fn convert(mut self) -> Result<String, LdmlError> {
        let mut lines = Vec::new();
        self.skip_spaces();
        loop {
            if let Some(line) = self.parse_line()? {
                lines.push(line);
            }
            match self.peek() {
                Some(token) if token.kind == Some(SimpleToken::Newline) => {
                    self.bump();
                    self.skip_spaces();
                }
                Some(_) => return Err(self.invalid_character()),
                None => break,
            }
        }
        if lines.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(
                "&[before 1] [first regular] < {}",
                lines.join(" < ")
            ))
        }
    }

    /// Parse one line of elements and groups. Blank lines yield `None`.
    fn parse_line(&mut self) -> Result<Option<String>, LdmlError> {
        let mut items = Vec::new();
        loop {
            match self.peek().and_then(|t| t.kind) {
                Some(SimpleToken::OpenGroup) => items.push(self.parse_group()?),
                Some(SimpleToken::UnicodeEscape) | Some(SimpleToken::Text) => {
                    items.push(self.parse_element()?)
                }
                _ => break,
            }
            self.skip_spaces();
        }
        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(items.join(" << ")))
        }
    }

    fn parse_group(&mut self) -> Result<String, LdmlError> {
        self.bump();
        self.skip_spaces();
        let mut elements = Vec::new();
        while matches!(
            self.peek().and_then(|t| t.kind),
            Some(SimpleToken::UnicodeEscape) | Some(SimpleToken::Text)
        ) {
            elements.push(self.parse_element()?);
            self.skip_spaces();
        }
        if elements.len() < 2 {
            return Err(LdmlError::InvalidSimpleRules(
                "expected two or more collation elements in a group (groups cannot be nested)"
                    .into(),
            ));
        }
        match self.peek() {
            Some(token) if token.kind == Some(SimpleToken::CloseGroup) => {
                self.bump();
                Ok(elements.join(" <<< "))
            }
            _ => Err(LdmlError::InvalidSimpleRules(
                "expected ')' to close a collation group".into(),
            )),
        }
    }

    /// Parse one collation element, a run of characters and escapes with no
    /// separating space. The converted ICU text must be unique across the
    /// whole rule set.
    fn parse_element(&mut self) -> Result<String, LdmlError> {
        let mut converted = String::new();
        while let Some(token) = self.peek() {
            match token.kind {
                Some(SimpleToken::UnicodeEscape) => {
                    push_converted_escape(&mut converted, token.text);
                    self.bump();
                }
                Some(SimpleToken::Text) => {
                    for c in token.text.chars() {
                        push_icu_escaped(&mut converted, c);
                    }
                    self.bump();
                }
                _ => break,
            }
        }
        if !self.used.insert(converted.clone()) {
            return Err(LdmlError::InvalidSimpleRules(format!(
                "duplicate collation element '{converted}'"
            )));
        }
        Ok(converted)
    }

    fn peek(&self) -> Option<Token<'a, SimpleToken>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_spaces(&mut self) {
        while self
            .peek()
            .is_some_and(|t| t.kind == Some(SimpleToken::Space))
        {
            self.bump();
        }
    }

    fn invalid_character(&self) -> LdmlError {
        let offset = self.peek().map_or(self.input.len(), |t| t.offset);
        let rest = &self.input[offset..];
        if let Some(stripped) = rest.strip_prefix('\\') {
            if stripped.starts_with('u') {
                return LdmlError::InvalidSimpleRules(
                    "invalid unicode escape: expected four hexadecimal digits after '\\u'".into(),
                );
            }
            return LdmlError::InvalidSimpleRules(
                "invalid unicode escape: expected 'u' after '\\'".into(),
            );
        }
        LdmlError::InvalidSimpleRules(format!("invalid character at offset {offset}"))
    }
}

/// Append a `\uXXXX` escape converted to its ICU form. Surrogate halves
/// cannot be decoded to a character and stay in escaped form.
fn push_converted_escape(out: &mut String, text: &str) {
    match u32::from_str_radix(&text[2..], 16) {
        Ok(code) if !(0xD800..=0xDFFF).contains(&code) => match char::from_u32(code) {
            Some(c) => push_icu_escaped(out, c),
            None => out.push_str(text),
        },
        _ => out.push_str(text),
    }
}

/// Append a character, backslash-escaped if ICU gives it syntax meaning.
fn push_icu_escaped(out: &mut String, c: char) {
    if c.is_ascii() && !c.is_ascii_alphanumeric() {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rules_convert_to_empty_icu() {
        assert_eq!(simple_rules_to_icu("").expect("Should convert"), "");
        assert_eq!(simple_rules_to_icu("  \n\t\n").expect("Should convert"), "");
    }

    #[test]
    fn test_elements_on_one_line_are_secondary() {
        let icu = simple_rules_to_icu("a b c d").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < a << b << c << d");
    }

    #[test]
    fn test_lines_are_primary() {
        let icu = simple_rules_to_icu("a\nb\nc").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < a < b < c");
    }

    #[test]
    fn test_groups_are_tertiary() {
        let icu = simple_rules_to_icu("(a A) (b B)").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < a <<< A << b <<< B");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let icu = simple_rules_to_icu("a\n\n  \nb").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < a < b");
    }

    #[test]
    fn test_ascii_punctuation_is_escaped() {
        let icu = simple_rules_to_icu("n-x").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < n\\-x");
    }

    #[test]
    fn test_non_ascii_passes_through() {
        let icu = simple_rules_to_icu("ʼ a").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < ʼ << a");
    }

    #[test]
    fn test_unicode_escape_is_decoded_then_escaped() {
        let icu = simple_rules_to_icu(r"\u0041 \u0028").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < A << \\(");
    }

    #[test]
    fn test_surrogate_escape_stays_escaped() {
        let icu = simple_rules_to_icu(r"\uD800\uDC00 a").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < \\uD800\\uDC00 << a");
    }

    #[test]
    fn test_duplicate_element_is_rejected() {
        let error = simple_rules_to_icu("a b a").expect_err("Should reject");
        assert!(matches!(error, LdmlError::InvalidSimpleRules(_)));
    }

    #[test]
    fn test_duplicate_detection_uses_converted_text() {
        assert!(simple_rules_to_icu("a \\u0061").is_err());
        assert!(simple_rules_to_icu("a A").is_ok());
    }

    #[test]
    fn test_single_element_group_is_rejected() {
        assert!(simple_rules_to_icu("(a)").is_err());
        assert!(simple_rules_to_icu("(ab)").is_err());
    }

    #[test]
    fn test_nested_group_is_rejected() {
        assert!(simple_rules_to_icu("(a (b c) d)").is_err());
    }

    #[test]
    fn test_unclosed_group_is_rejected() {
        assert!(simple_rules_to_icu("(a b").is_err());
    }

    #[test]
    fn test_stray_close_parenthesis_is_rejected() {
        assert!(simple_rules_to_icu("a b)").is_err());
    }

    #[test]
    fn test_bad_escape_is_rejected() {
        assert!(simple_rules_to_icu(r"a \x").is_err());
        assert!(simple_rules_to_icu(r"a \u12").is_err());
    }

    #[test]
    fn test_mixed_groups_and_elements_on_a_line() {
        let icu = simple_rules_to_icu("a (b B) c").expect("Should convert");
        assert_eq!(icu, "&[before 1] [first regular] < a << b <<< B << c");
    }
}
