//! Tokenizers for the two sort-rule text formats.
//!
//! Simple rules and ICU rules are short, line-oriented languages. Both
//! parsers in this module's siblings work over a flat token list rather
//! than raw characters, which keeps the grammar functions small and makes
//! error offsets cheap to report.

use logos::Logos;

/// A single lexed token.
///
/// `kind` is `None` when the source contained a character no rule could
/// match. The parser turns that into an error with the token's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a, K> {
    pub kind: Option<K>,
    pub text: &'a str,
    pub offset: usize,
}

/// Token kinds for simple sort rules.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleToken {
    /// A `\uXXXX` escape with exactly four hex digits.
    #[regex(r"\\u[0-9A-Fa-f]{4}")]
    UnicodeEscape,

    #[token("(")]
    OpenGroup,

    #[token(")")]
    CloseGroup,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"[ \t]+")]
    Space,

    /// A run of plain collation characters.
    #[regex(r"[^ \t\r\n()\\]+")]
    Text,
}

/// Token kinds for ICU rule text.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcuToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("&")]
    Ampersand,

    #[token("<<<")]
    TertiaryOp,

    #[token("<<")]
    SecondaryOp,

    #[token("<")]
    PrimaryOp,

    #[token("=")]
    IdentityOp,

    #[token("|")]
    Pipe,

    #[token("/")]
    Slash,

    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("-")]
    Dash,

    /// A `\uXXXX` escape with exactly four hex digits.
    #[regex(r"\\u[0-9A-Fa-f]{4}")]
    UnicodeEscape,

    /// A `\UXXXXXXXX` escape with exactly eight hex digits.
    #[regex(r"\\U[0-9A-Fa-f]{8}")]
    LongUnicodeEscape,

    /// A backslash followed by any single character.
    #[regex(r"\\.")]
    CharacterEscape,

    /// A single-quoted string. A doubled quote inside is a literal quote.
    #[regex(r"'([^']|'')*'")]
    QuotedString,

    #[regex(r"[A-Za-z0-9]+")]
    Word,

    /// A run of characters outside the ASCII range.
    #[regex(r"[^\x00-\x7F]+")]
    NonAscii,
}

/// Tokenize simple sort rules text.
pub fn tokenize_simple(input: &str) -> Vec<Token<'_, SimpleToken>> {
    let mut lexer = SimpleToken::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push(Token {
            kind: result.ok(),
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }
    tokens
}

/// Tokenize ICU rule text.
pub fn tokenize_icu(input: &str) -> Vec<Token<'_, IcuToken>> {
    let mut lexer = IcuToken::lexer(input);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push(Token {
            kind: result.ok(),
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_rules() {
        let tokens = tokenize_simple("ab (c d)\ne");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(SimpleToken::Text),
                Some(SimpleToken::Space),
                Some(SimpleToken::OpenGroup),
                Some(SimpleToken::Text),
                Some(SimpleToken::Space),
                Some(SimpleToken::Text),
                Some(SimpleToken::CloseGroup),
                Some(SimpleToken::Newline),
                Some(SimpleToken::Text),
            ]
        );
        assert_eq!(tokens[0].text, "ab");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[8].text, "e");
        assert_eq!(tokens[8].offset, 9);
    }

    #[test]
    fn test_simple_unicode_escape_is_one_token() {
        let tokens = tokenize_simple(r"\u0041b");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, Some(SimpleToken::UnicodeEscape));
        assert_eq!(tokens[0].text, r"\u0041");
        assert_eq!(tokens[1].kind, Some(SimpleToken::Text));
        assert_eq!(tokens[1].text, "b");
    }

    #[test]
    fn test_simple_bad_escape_has_no_kind() {
        let tokens = tokenize_simple(r"\x");
        assert!(tokens.iter().any(|t| t.kind.is_none()));
    }

    #[test]
    fn test_tokenize_icu_operators_longest_first() {
        let tokens = tokenize_icu("&a<b<<c<<<d=e");
        let kinds: Vec<_> = tokens.iter().filter_map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IcuToken::Ampersand,
                IcuToken::Word,
                IcuToken::PrimaryOp,
                IcuToken::Word,
                IcuToken::SecondaryOp,
                IcuToken::Word,
                IcuToken::TertiaryOp,
                IcuToken::Word,
                IcuToken::IdentityOp,
                IcuToken::Word,
            ]
        );
    }

    #[test]
    fn test_icu_quoted_string_with_doubled_quote() {
        let tokens = tokenize_icu("'a''b' 'c'");
        assert_eq!(tokens[0].kind, Some(IcuToken::QuotedString));
        assert_eq!(tokens[0].text, "'a''b'");
        assert_eq!(tokens[2].kind, Some(IcuToken::QuotedString));
        assert_eq!(tokens[2].text, "'c'");
    }

    #[test]
    fn test_icu_escapes_prefer_unicode_forms() {
        let tokens = tokenize_icu(r"\u0041\U00000062\n");
        assert_eq!(tokens[0].kind, Some(IcuToken::UnicodeEscape));
        assert_eq!(tokens[0].text, r"\u0041");
        assert_eq!(tokens[1].kind, Some(IcuToken::LongUnicodeEscape));
        assert_eq!(tokens[1].text, r"\U00000062");
        assert_eq!(tokens[2].kind, Some(IcuToken::CharacterEscape));
        assert_eq!(tokens[2].text, r"\n");
    }

    #[test]
    fn test_icu_non_ascii_run() {
        let tokens = tokenize_icu("&ʼa");
        assert_eq!(tokens[1].kind, Some(IcuToken::NonAscii));
        assert_eq!(tokens[1].text, "ʼ");
        assert_eq!(tokens[2].kind, Some(IcuToken::Word));
        assert_eq!(tokens[2].text, "a");
    }
}
