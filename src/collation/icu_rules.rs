//! ICU rule text and its LDML collation element form.
//!
//! ICU tailoring syntax and the LDML `<collation>` vocabulary describe the
//! same rules two ways. This module converts between them: parsed ICU rules
//! are written out as LDML `settings`, `suppress_contractions`, `optimize`,
//! and `rules` elements, and an LDML fragment is rendered back into a single
//! ICU string. A restricted ICU shape can also be recovered as simple sort
//! rules.

use std::io::Write;
use std::mem;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::collation::lexer::{self, IcuToken, Token};
use crate::ldml::order;
use crate::ldml::LdmlError;

/// Check ICU rule text without producing any output.
pub fn validate_icu_rules(icu: &str) -> Result<(), LdmlError> {
    parse_icu_rules(icu).map(|_| ())
}

/// Parse ICU rule text and write the equivalent LDML collation content.
///
/// Settings become attributes of a `settings` element with canonically
/// ordered names, character set options become their own elements, and the
/// tailoring rules land under a `rules` element. Runs of single-character
/// differences of one strength are folded into the concatenated forms
/// (`pc`, `sc`, `tc`, `ic`). Nothing is written when the rules are empty.
pub fn icu_to_ldml_rules<W: Write>(writer: &mut Writer<W>, icu: &str) -> Result<(), LdmlError> {
    let rules = parse_icu_rules(icu)?;
    write_ldml_rules(writer, &rules)
}

/// Render the rules of an LDML collation fragment as ICU rule text.
///
/// The fragment may be a whole `collation` element or its content. Known
/// extension elements (`special`, `base`, `alias`) are skipped; a
/// `variableTop` setting is re-inserted as `[variable top]` after the rule
/// whose data it names.
///
/// # Example
///
/// ```
/// use ldmlkit::collation::ldml_rules_to_icu;
///
/// let icu = ldml_rules_to_icu("<rules><reset>a</reset><p>b</p></rules>")
///     .expect("Should convert");
/// assert_eq!(icu, "& a < b");
/// ```
pub fn ldml_rules_to_icu(xml: &str) -> Result<String, LdmlError> {
    let mut reader = Reader::from_str(xml);
    let mut builder = IcuBuilder::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"collation" => {}
                b"settings" => {
                    settings_chunks(&e, &mut builder)?;
                    reader.read_to_end(e.name())?;
                }
                b"suppress_contractions" => {
                    let text = read_element_text(&mut reader)?;
                    builder.chunks.push(format!("[suppress contractions {text}]"));
                }
                b"optimize" => {
                    let text = read_element_text(&mut reader)?;
                    builder.chunks.push(format!("[optimize {text}]"));
                }
                b"rules" => read_rules(&mut reader, &mut builder)?,
                b"special" | b"base" | b"alias" => {
                    reader.read_to_end(e.name())?;
                }
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unexpected element '{}' in collation content",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"settings" => settings_chunks(&e, &mut builder)?,
                b"collation" | b"rules" | b"suppress_contractions" | b"optimize" | b"special"
                | b"base" | b"alias" => {}
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unexpected element '{}' in collation content",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Text(t) => require_layout_text(&t)?,
            Event::End(_) => {}
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(builder.finish())
}

/// Recover simple sort rules from ICU rule text.
///
/// Only rules written by the simple form can be recovered: a single reset
/// to `[before 1] [first regular]` followed by primary, secondary, and
/// tertiary differences over plain data. Anything else returns `None`.
pub fn icu_to_simple_rules(icu: &str) -> Option<String> {
    let rules = parse_icu_rules(icu).ok()?;
    if !rules.settings.is_empty() || !rules.charsets.is_empty() {
        return None;
    }
    if rules.nodes.is_empty() {
        return Some(String::new());
    }
    let mut nodes = rules.nodes.iter();
    match nodes.next() {
        Some(RuleNode::Reset {
            before: Some("primary"),
            data: RuleData::Position("first_non_ignorable"),
        }) => {}
        _ => return None,
    }
    let mut lines: Vec<Vec<Vec<String>>> = Vec::new();
    for node in nodes {
        match node {
            RuleNode::Difference {
                strength,
                data: RuleData::Text(text),
            } => push_simple_difference(&mut lines, *strength, text)?,
            RuleNode::Concatenated { strength, text } => {
                for c in text.chars() {
                    push_simple_difference(&mut lines, *strength, &c.to_string())?;
                }
            }
            _ => return None,
        }
    }
    let rendered: Vec<String> = lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|item| {
                    if item.len() == 1 {
                        item[0].clone()
                    } else {
                        format!("({})", item.join(" "))
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Some(rendered.join("\n"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strength {
    Primary,
    Secondary,
    Tertiary,
    Identity,
}

impl Strength {
    fn element(self) -> &'static str {
        match self {
            Strength::Primary => "p",
            Strength::Secondary => "s",
            Strength::Tertiary => "t",
            Strength::Identity => "i",
        }
    }

    fn concatenated_element(self) -> &'static str {
        match self {
            Strength::Primary => "pc",
            Strength::Secondary => "sc",
            Strength::Tertiary => "tc",
            Strength::Identity => "ic",
        }
    }

    fn operator(self) -> &'static str {
        match self {
            Strength::Primary => "<",
            Strength::Secondary => "<<",
            Strength::Tertiary => "<<<",
            Strength::Identity => "=",
        }
    }
}

/// The content of one rule element, either literal data or an indirect
/// position such as `first_non_ignorable`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RuleData {
    Text(String),
    Position(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RuleNode {
    Reset {
        before: Option<&'static str>,
        data: RuleData,
    },
    Difference {
        strength: Strength,
        data: RuleData,
    },
    Concatenated {
        strength: Strength,
        text: String,
    },
    Extended {
        strength: Strength,
        context: Option<RuleData>,
        data: RuleData,
        extend: Option<RuleData>,
    },
}

#[derive(Debug, Default)]
struct ParsedIcuRules {
    settings: Vec<(&'static str, String)>,
    charsets: Vec<(&'static str, String)>,
    nodes: Vec<RuleNode>,
}

const INDIRECT_POSITIONS: [&str; 14] = [
    "first_non_ignorable",
    "last_non_ignorable",
    "first_primary_ignorable",
    "last_primary_ignorable",
    "first_secondary_ignorable",
    "last_secondary_ignorable",
    "first_tertiary_ignorable",
    "last_tertiary_ignorable",
    "first_variable",
    "last_variable",
    "first_implicit",
    "last_implicit",
    "first_trailing",
    "last_trailing",
];

fn parse_icu_rules(icu: &str) -> Result<ParsedIcuRules, LdmlError> {
    IcuParser::new(icu).parse()
}

struct IcuParser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a, IcuToken>>,
    pos: usize,
    rules: ParsedIcuRules,
}

impl<'a> IcuParser<'a> {
    fn new(input: &'a str) -> Self {
        IcuParser {
            input,
            tokens: lexer::tokenize_icu(input),
            pos: 0,
            rules: ParsedIcuRules::default(),
        }
    }

    fn parse(mut self) -> Result<ParsedIcuRules, LdmlError> {
        self.skip_whitespace();
        while self.at(IcuToken::OpenBracket) {
            self.parse_option()?;
            self.skip_whitespace();
        }
        while self.at(IcuToken::Ampersand) {
            self.parse_rule()?;
            self.skip_whitespace();
        }
        if self.pos < self.tokens.len() {
            return Err(self.unexpected("expected '&' or end of rules"));
        }
        self.rules.nodes = optimize_nodes(mem::take(&mut self.rules.nodes));
        Ok(self.rules)
    }

    /// Parse one bracketed option, `[strength 2]` and friends.
    fn parse_option(&mut self) -> Result<(), LdmlError> {
        self.bump();
        self.skip_whitespace();
        let keyword = self.expect_word("expected an option name")?;
        match keyword {
            "alternate" => {
                self.require_whitespace()?;
                let value = self.parse_alternate_value()?;
                self.add_setting("alternate", value);
            }
            "backwards" => {
                self.require_whitespace()?;
                let value = match self.expect_word("expected '1' or '2' after 'backwards'")? {
                    "1" => "off",
                    "2" => "on",
                    _ => return Err(self.unexpected("expected '1' or '2' after 'backwards'")),
                };
                self.add_setting("backwards", value.to_string());
            }
            "strength" => {
                self.require_whitespace()?;
                let value = match self.expect_word("expected a strength level")? {
                    "1" => "primary",
                    "2" => "secondary",
                    "3" => "tertiary",
                    "4" => "quaternary",
                    "5" | "I" | "i" => "identical",
                    _ => return Err(self.unexpected("expected a strength level")),
                };
                self.add_setting("strength", value.to_string());
            }
            "normalization" => {
                self.require_whitespace()?;
                let value = self.parse_on_off()?;
                self.add_setting("normalization", value);
            }
            "caseLevel" => {
                self.require_whitespace()?;
                let value = self.parse_on_off()?;
                self.add_setting("caseLevel", value);
            }
            "caseFirst" => {
                self.require_whitespace()?;
                let value = match self.expect_word("expected 'off', 'upper' or 'lower'")? {
                    value @ ("off" | "upper" | "lower") => value,
                    _ => return Err(self.unexpected("expected 'off', 'upper' or 'lower'")),
                };
                self.add_setting("caseFirst", value.to_string());
            }
            "numeric" => {
                self.require_whitespace()?;
                let value = self.parse_on_off()?;
                self.add_setting("numeric", value);
            }
            "hiraganaQ" => {
                self.require_whitespace()?;
                let value = self.parse_on_off()?;
                self.add_setting("hiraganaQuaternary", value);
            }
            "suppress" => {
                self.require_whitespace()?;
                if self.expect_word("expected 'contractions' after 'suppress'")? != "contractions" {
                    return Err(self.unexpected("expected 'contractions' after 'suppress'"));
                }
                self.require_whitespace()?;
                let set = self.parse_character_set()?;
                self.rules.charsets.push(("suppress_contractions", set));
            }
            "optimize" => {
                self.require_whitespace()?;
                let set = self.parse_character_set()?;
                self.rules.charsets.push(("optimize", set));
            }
            _ => return Err(self.unexpected("unknown option")),
        }
        self.skip_whitespace();
        self.expect_token(IcuToken::CloseBracket, "expected ']' to close an option")?;
        Ok(())
    }

    fn parse_alternate_value(&mut self) -> Result<String, LdmlError> {
        match self.expect_word("expected 'non-ignorable' or 'shifted'")? {
            "shifted" => Ok("shifted".to_string()),
            "non" => {
                self.expect_token(IcuToken::Dash, "expected 'non-ignorable'")?;
                if self.expect_word("expected 'non-ignorable'")? != "ignorable" {
                    return Err(self.unexpected("expected 'non-ignorable'"));
                }
                Ok("non-ignorable".to_string())
            }
            _ => Err(self.unexpected("expected 'non-ignorable' or 'shifted'")),
        }
    }

    fn parse_on_off(&mut self) -> Result<String, LdmlError> {
        match self.expect_word("expected 'on' or 'off'")? {
            value @ ("on" | "off") => Ok(value.to_string()),
            _ => Err(self.unexpected("expected 'on' or 'off'")),
        }
    }

    /// Capture a bracketed character set verbatim, brackets included. The
    /// set is raw text up to the first ']', so it is taken from the source
    /// rather than from tokens.
    fn parse_character_set(&mut self) -> Result<String, LdmlError> {
        let open = match self.peek() {
            Some(token) if token.kind == Some(IcuToken::OpenBracket) => token,
            _ => return Err(self.unexpected("expected '[' to open a character set")),
        };
        let close = self.input[open.offset + 1..].find(']').ok_or_else(|| {
            LdmlError::InvalidIcuRules("expected ']' to close a character set".into())
        })?;
        let end = open.offset + 1 + close + 1;
        let set = self.input[open.offset..end].to_string();
        while self.peek().is_some_and(|t| t.offset < end) {
            self.bump();
        }
        Ok(set)
    }

    /// Parse one `&` rule chain: a reset and its differences.
    fn parse_rule(&mut self) -> Result<(), LdmlError> {
        self.bump();
        self.skip_whitespace();
        if self.at(IcuToken::OpenBracket) {
            self.parse_bracketed_reset()?;
        } else {
            let data = self.parse_data_string();
            if data.is_empty() {
                return Err(self.unexpected("expected reset data after '&'"));
            }
            self.rules.nodes.push(RuleNode::Reset {
                before: None,
                data: RuleData::Text(data),
            });
        }
        loop {
            self.skip_whitespace();
            if self.try_parse_variable_top()? {
                continue;
            }
            let strength = match self.peek().and_then(|t| t.kind) {
                Some(IcuToken::PrimaryOp) => Strength::Primary,
                Some(IcuToken::SecondaryOp) => Strength::Secondary,
                Some(IcuToken::TertiaryOp) => Strength::Tertiary,
                Some(IcuToken::IdentityOp) => Strength::Identity,
                _ => break,
            };
            self.bump();
            self.parse_difference(strength)?;
        }
        Ok(())
    }

    /// Parse a reset that starts with '[': `[top]`, a `[before n]`
    /// specifier, or an indirect position.
    fn parse_bracketed_reset(&mut self) -> Result<(), LdmlError> {
        let save = self.pos;
        self.bump();
        self.skip_whitespace();
        let word = self.expect_word("expected 'top', 'before' or an indirect position")?;
        match word {
            "top" => {
                self.skip_whitespace();
                self.expect_token(IcuToken::CloseBracket, "expected ']' after 'top'")?;
                // [top] is deprecated in ICU, render it as [last regular]
                self.rules.nodes.push(RuleNode::Reset {
                    before: None,
                    data: RuleData::Position("last_non_ignorable"),
                });
            }
            "before" => {
                self.require_whitespace()?;
                let before = match self.expect_word("expected '1', '2' or '3' after 'before'")? {
                    "1" => "primary",
                    "2" => "secondary",
                    "3" => "tertiary",
                    _ => return Err(self.unexpected("expected '1', '2' or '3' after 'before'")),
                };
                self.skip_whitespace();
                self.expect_token(IcuToken::CloseBracket, "expected ']' after 'before'")?;
                self.skip_whitespace();
                let data = self.parse_simple_element()?;
                self.rules.nodes.push(RuleNode::Reset {
                    before: Some(before),
                    data,
                });
            }
            _ => {
                self.pos = save;
                let position = self.parse_indirect_position()?;
                self.rules.nodes.push(RuleNode::Reset {
                    before: None,
                    data: RuleData::Position(position),
                });
            }
        }
        Ok(())
    }

    /// Try to consume `< [variable top]`, restoring the position when the
    /// input is an ordinary difference instead.
    fn try_parse_variable_top(&mut self) -> Result<bool, LdmlError> {
        if !self.at(IcuToken::PrimaryOp) {
            return Ok(false);
        }
        let save = self.pos;
        self.bump();
        self.skip_whitespace();
        if !self.at(IcuToken::OpenBracket) {
            self.pos = save;
            return Ok(false);
        }
        self.bump();
        self.skip_whitespace();
        if !self.at_word("variable") {
            self.pos = save;
            return Ok(false);
        }
        self.bump();
        self.skip_whitespace();
        if !self.at_word("top") {
            self.pos = save;
            return Ok(false);
        }
        self.bump();
        self.skip_whitespace();
        if !self.at(IcuToken::CloseBracket) {
            self.pos = save;
            return Ok(false);
        }
        self.bump();
        self.apply_variable_top()?;
        Ok(true)
    }

    fn apply_variable_top(&mut self) -> Result<(), LdmlError> {
        let value = match self.rules.nodes.last() {
            Some(RuleNode::Reset {
                data: RuleData::Text(text),
                ..
            })
            | Some(RuleNode::Difference {
                data: RuleData::Text(text),
                ..
            }) => escape_variable_top(text),
            Some(RuleNode::Extended { .. }) => {
                return Err(LdmlError::InvalidIcuRules(
                    "[variable top] cannot follow an extended difference".into(),
                ));
            }
            Some(RuleNode::Reset {
                data: RuleData::Position(_),
                ..
            })
            | Some(RuleNode::Difference {
                data: RuleData::Position(_),
                ..
            }) => {
                return Err(LdmlError::InvalidIcuRules(
                    "[variable top] cannot follow an indirect position".into(),
                ));
            }
            _ => {
                return Err(LdmlError::InvalidIcuRules(
                    "[variable top] must follow collation data".into(),
                ));
            }
        };
        self.add_setting("variableTop", value);
        Ok(())
    }

    fn parse_difference(&mut self, strength: Strength) -> Result<(), LdmlError> {
        self.skip_whitespace();
        let first = self.parse_simple_element()?;
        self.skip_whitespace();
        match self.peek().and_then(|t| t.kind) {
            Some(IcuToken::Pipe) => {
                self.bump();
                self.skip_whitespace();
                let data = self.parse_simple_element()?;
                self.skip_whitespace();
                let extend = if self.at(IcuToken::Slash) {
                    self.bump();
                    self.skip_whitespace();
                    Some(self.parse_simple_element()?)
                } else {
                    None
                };
                self.rules.nodes.push(RuleNode::Extended {
                    strength,
                    context: Some(first),
                    data,
                    extend,
                });
            }
            Some(IcuToken::Slash) => {
                self.bump();
                self.skip_whitespace();
                let extend = self.parse_simple_element()?;
                self.rules.nodes.push(RuleNode::Extended {
                    strength,
                    context: None,
                    data: first,
                    extend: Some(extend),
                });
            }
            _ => self.rules.nodes.push(RuleNode::Difference {
                strength,
                data: first,
            }),
        }
        Ok(())
    }

    fn parse_simple_element(&mut self) -> Result<RuleData, LdmlError> {
        if self.at(IcuToken::OpenBracket) {
            return Ok(RuleData::Position(self.parse_indirect_position()?));
        }
        let data = self.parse_data_string();
        if data.is_empty() {
            return Err(self.unexpected("expected collation data"));
        }
        Ok(RuleData::Text(data))
    }

    fn parse_indirect_position(&mut self) -> Result<&'static str, LdmlError> {
        self.expect_token(IcuToken::OpenBracket, "expected an indirect position")?;
        self.skip_whitespace();
        let side = match self.expect_word("expected 'first' or 'last'")? {
            side @ ("first" | "last") => side,
            _ => return Err(self.unexpected("expected 'first' or 'last'")),
        };
        self.require_whitespace()?;
        let name = match self.expect_word("expected an indirect position option")? {
            level @ ("primary" | "secondary" | "tertiary") => {
                self.require_whitespace()?;
                if self.expect_word("expected 'ignorable'")? != "ignorable" {
                    return Err(self.unexpected("expected 'ignorable'"));
                }
                match (side, level) {
                    ("first", "primary") => "first_primary_ignorable",
                    ("last", "primary") => "last_primary_ignorable",
                    ("first", "secondary") => "first_secondary_ignorable",
                    ("last", "secondary") => "last_secondary_ignorable",
                    ("first", "tertiary") => "first_tertiary_ignorable",
                    _ => "last_tertiary_ignorable",
                }
            }
            // ICU "regular" is "non_ignorable" in LDML
            "regular" if side == "first" => "first_non_ignorable",
            "regular" => "last_non_ignorable",
            "variable" if side == "first" => "first_variable",
            "variable" => "last_variable",
            "implicit" if side == "first" => "first_implicit",
            "implicit" => "last_implicit",
            "trailing" if side == "first" => "first_trailing",
            "trailing" => "last_trailing",
            _ => return Err(self.unexpected("expected an indirect position option")),
        };
        self.skip_whitespace();
        self.expect_token(
            IcuToken::CloseBracket,
            "expected ']' to close an indirect position",
        )?;
        Ok(name)
    }

    /// Collect one run of collation data. Whitespace between data pieces is
    /// dropped, so `a b` is the single element `ab`.
    fn parse_data_string(&mut self) -> String {
        let mut data = String::new();
        while let Some(token) = self.peek() {
            match token.kind {
                Some(IcuToken::Word) | Some(IcuToken::NonAscii) => {
                    data.push_str(token.text);
                    self.bump();
                }
                Some(IcuToken::UnicodeEscape) | Some(IcuToken::LongUnicodeEscape) => {
                    // unicode escapes stay in escaped form
                    data.push_str(token.text);
                    self.bump();
                }
                Some(IcuToken::CharacterEscape) => {
                    data.extend(token.text.chars().nth(1));
                    self.bump();
                }
                Some(IcuToken::QuotedString) => {
                    push_decoded_quoted(&mut data, token.text);
                    self.bump();
                }
                Some(IcuToken::Whitespace) => match self.tokens.get(self.pos + 1) {
                    Some(next) if is_data_kind(next.kind) => self.bump(),
                    _ => break,
                },
                _ => break,
            }
        }
        data
    }

    fn add_setting(&mut self, name: &'static str, value: String) {
        if let Some(entry) = self.rules.settings.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.rules.settings.push((name, value));
        }
    }

    fn peek(&self) -> Option<Token<'a, IcuToken>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at(&self, kind: IcuToken) -> bool {
        self.peek().is_some_and(|t| t.kind == Some(kind))
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == Some(IcuToken::Word) && t.text == word)
    }

    fn skip_whitespace(&mut self) {
        while self.at(IcuToken::Whitespace) {
            self.bump();
        }
    }

    fn require_whitespace(&mut self) -> Result<(), LdmlError> {
        if !self.at(IcuToken::Whitespace) {
            return Err(self.unexpected("expected whitespace"));
        }
        self.bump();
        Ok(())
    }

    fn expect_word(&mut self, expected: &str) -> Result<&'a str, LdmlError> {
        match self.peek() {
            Some(token) if token.kind == Some(IcuToken::Word) => {
                self.bump();
                Ok(token.text)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_token(&mut self, kind: IcuToken, expected: &str) -> Result<(), LdmlError> {
        if !self.at(kind) {
            return Err(self.unexpected(expected));
        }
        self.bump();
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> LdmlError {
        match self.peek() {
            Some(token) => {
                LdmlError::InvalidIcuRules(format!("{expected} at offset {}", token.offset))
            }
            None => LdmlError::InvalidIcuRules(format!("{expected} at end of rules")),
        }
    }
}

fn is_data_kind(kind: Option<IcuToken>) -> bool {
    matches!(
        kind,
        Some(
            IcuToken::Word
                | IcuToken::NonAscii
                | IcuToken::UnicodeEscape
                | IcuToken::LongUnicodeEscape
                | IcuToken::CharacterEscape
                | IcuToken::QuotedString
        )
    )
}

/// Decode a quoted string token. `''` on its own is a literal quote, and a
/// doubled quote inside a quoted run is one as well.
fn push_decoded_quoted(out: &mut String, text: &str) {
    if text == "''" {
        out.push('\'');
        return;
    }
    let inner = &text[1..text.len() - 1];
    out.push_str(&inner.replace("''", "'"));
}

fn is_single_code_point(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some() && chars.next().is_none()
}

/// Fold runs of single-character differences of one strength into
/// concatenated nodes.
fn optimize_nodes(nodes: Vec<RuleNode>) -> Vec<RuleNode> {
    let mut optimized = Vec::with_capacity(nodes.len());
    let mut run_strength: Option<Strength> = None;
    let mut run_texts: Vec<String> = Vec::new();
    for node in nodes {
        let single = match &node {
            RuleNode::Difference {
                strength,
                data: RuleData::Text(text),
            } if is_single_code_point(text) => Some(*strength),
            _ => None,
        };
        match single {
            Some(strength) => {
                if run_strength != Some(strength) {
                    flush_run(&mut optimized, run_strength.take(), &mut run_texts);
                    run_strength = Some(strength);
                }
                if let RuleNode::Difference {
                    data: RuleData::Text(text),
                    ..
                } = node
                {
                    run_texts.push(text);
                }
            }
            None => {
                flush_run(&mut optimized, run_strength.take(), &mut run_texts);
                optimized.push(node);
            }
        }
    }
    flush_run(&mut optimized, run_strength.take(), &mut run_texts);
    optimized
}

fn flush_run(optimized: &mut Vec<RuleNode>, strength: Option<Strength>, texts: &mut Vec<String>) {
    let Some(strength) = strength else {
        return;
    };
    if texts.len() == 1 {
        optimized.push(RuleNode::Difference {
            strength,
            data: RuleData::Text(texts.pop().unwrap_or_default()),
        });
    } else {
        optimized.push(RuleNode::Concatenated {
            strength,
            text: texts.concat(),
        });
    }
    texts.clear();
}

fn write_ldml_rules<W: Write>(
    writer: &mut Writer<W>,
    rules: &ParsedIcuRules,
) -> Result<(), LdmlError> {
    if !rules.settings.is_empty() {
        let mut sorted = rules.settings.clone();
        sorted.sort_by(|a, b| order::compare_attribute_names(a.0, b.0));
        let mut settings = BytesStart::new("settings");
        for (name, value) in &sorted {
            settings.push_attribute((*name, value.as_str()));
        }
        writer.write_event(Event::Empty(settings))?;
    }
    let mut charsets = rules.charsets.clone();
    charsets.sort_by(|a, b| order::compare_element_names(a.0, b.0));
    for (name, set) in &charsets {
        writer.write_event(Event::Start(BytesStart::new(*name)))?;
        writer.write_event(Event::Text(BytesText::new(set)))?;
        writer.write_event(Event::End(BytesEnd::new(*name)))?;
    }
    if rules.nodes.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("rules")))?;
    for node in &rules.nodes {
        match node {
            RuleNode::Reset { before, data } => {
                let mut start = BytesStart::new("reset");
                if let Some(before) = before {
                    start.push_attribute(("before", *before));
                }
                writer.write_event(Event::Start(start))?;
                write_rule_data(writer, data)?;
                writer.write_event(Event::End(BytesEnd::new("reset")))?;
            }
            RuleNode::Difference { strength, data } => {
                let name = strength.element();
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                write_rule_data(writer, data)?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            RuleNode::Concatenated { strength, text } => {
                let name = strength.concatenated_element();
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            RuleNode::Extended {
                strength,
                context,
                data,
                extend,
            } => {
                writer.write_event(Event::Start(BytesStart::new("x")))?;
                if let Some(context) = context {
                    writer.write_event(Event::Start(BytesStart::new("context")))?;
                    write_rule_data(writer, context)?;
                    writer.write_event(Event::End(BytesEnd::new("context")))?;
                }
                let name = strength.element();
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                write_rule_data(writer, data)?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
                if let Some(extend) = extend {
                    writer.write_event(Event::Start(BytesStart::new("extend")))?;
                    write_rule_data(writer, extend)?;
                    writer.write_event(Event::End(BytesEnd::new("extend")))?;
                }
                writer.write_event(Event::End(BytesEnd::new("x")))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("rules")))?;
    Ok(())
}

fn write_rule_data<W: Write>(writer: &mut Writer<W>, data: &RuleData) -> Result<(), LdmlError> {
    match data {
        RuleData::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        RuleData::Position(name) => writer.write_event(Event::Empty(BytesStart::new(*name)))?,
    }
    Ok(())
}

/// Accumulates ICU text chunks while walking an LDML fragment. Each option
/// and each reset chain is one chunk; chunks join with newlines.
#[derive(Debug, Default)]
struct IcuBuilder {
    chunks: Vec<String>,
    current: String,
    variable_top: Option<String>,
}

impl IcuBuilder {
    fn reset(&mut self, before: Option<&'static str>, data: &RuleData) {
        if !self.current.is_empty() {
            self.chunks.push(mem::take(&mut self.current));
        }
        self.current.push_str("& ");
        if let Some(level) = before {
            self.current.push_str("[before ");
            self.current.push_str(level);
            self.current.push_str("] ");
        }
        self.push_data(data);
    }

    fn difference(&mut self, strength: Strength, data: &RuleData) {
        self.current.push(' ');
        self.current.push_str(strength.operator());
        self.current.push(' ');
        self.push_data(data);
    }

    fn extended(
        &mut self,
        strength: Strength,
        context: Option<&RuleData>,
        data: &RuleData,
        extend: Option<&RuleData>,
    ) {
        self.current.push(' ');
        self.current.push_str(strength.operator());
        self.current.push(' ');
        if let Some(context) = context {
            self.push_plain(context);
            self.current.push_str(" | ");
        }
        self.push_plain(data);
        if let Some(extend) = extend {
            self.current.push_str(" / ");
            self.push_plain(extend);
        }
    }

    /// Append one data element and re-insert `[variable top]` after the
    /// rule whose unescaped text the setting named.
    fn push_data(&mut self, data: &RuleData) {
        self.push_plain(data);
        if let RuleData::Text(text) = data {
            if self.variable_top.as_deref() == Some(text.as_str()) {
                self.current.push_str(" < [variable top]");
                self.variable_top = None;
            }
        }
    }

    fn push_plain(&mut self, data: &RuleData) {
        match data {
            RuleData::Text(text) => self.current.push_str(&escape_icu_data(text)),
            RuleData::Position(name) => {
                self.current.push('[');
                self.current.push_str(&indirect_position_display(name));
                self.current.push(']');
            }
        }
    }

    fn finish(mut self) -> String {
        if !self.current.is_empty() {
            self.chunks.push(self.current);
        }
        self.chunks.join("\n")
    }
}

fn settings_chunks(e: &BytesStart, builder: &mut IcuBuilder) -> Result<(), LdmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        match key {
            "strength" => {
                let number = match value.as_ref() {
                    "primary" => "1",
                    "secondary" => "2",
                    "tertiary" => "3",
                    "quaternary" => "4",
                    "identical" => "I",
                    other => {
                        return Err(LdmlError::malformed(format!(
                            "unknown strength value '{other}'"
                        )));
                    }
                };
                builder.chunks.push(format!("[strength {number}]"));
            }
            "backwards" => {
                let number = match value.as_ref() {
                    "off" => "1",
                    "on" => "2",
                    other => {
                        return Err(LdmlError::malformed(format!(
                            "unknown backwards value '{other}'"
                        )));
                    }
                };
                builder.chunks.push(format!("[backwards {number}]"));
            }
            "hiraganaQuaternary" => builder.chunks.push(format!("[hiraganaQ {value}]")),
            "alternate" | "normalization" | "caseLevel" | "caseFirst" | "numeric" => {
                builder.chunks.push(format!("[{key} {value}]"));
            }
            "variableTop" => builder.variable_top = Some(decode_variable_top(&value)?),
            other => {
                return Err(LdmlError::malformed(format!(
                    "unknown collation setting '{other}'"
                )));
            }
        }
    }
    Ok(())
}

fn read_rules(reader: &mut Reader<&[u8]>, builder: &mut IcuBuilder) -> Result<(), LdmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"reset" => {
                    let before = before_attribute(&e)?;
                    let data = read_rule_data(reader)?;
                    builder.reset(before, &data);
                }
                b"p" => {
                    let data = read_rule_data(reader)?;
                    builder.difference(Strength::Primary, &data);
                }
                b"s" => {
                    let data = read_rule_data(reader)?;
                    builder.difference(Strength::Secondary, &data);
                }
                b"t" => {
                    let data = read_rule_data(reader)?;
                    builder.difference(Strength::Tertiary, &data);
                }
                b"i" => {
                    let data = read_rule_data(reader)?;
                    builder.difference(Strength::Identity, &data);
                }
                b"pc" => read_concatenated(reader, builder, Strength::Primary)?,
                b"sc" => read_concatenated(reader, builder, Strength::Secondary)?,
                b"tc" => read_concatenated(reader, builder, Strength::Tertiary)?,
                b"ic" => read_concatenated(reader, builder, Strength::Identity)?,
                b"x" => read_extended(reader, builder)?,
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unknown collation rule element '{}'",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"reset" => {
                    let before = before_attribute(&e)?;
                    builder.reset(before, &RuleData::Text(String::new()));
                }
                b"p" => builder.difference(Strength::Primary, &RuleData::Text(String::new())),
                b"s" => builder.difference(Strength::Secondary, &RuleData::Text(String::new())),
                b"t" => builder.difference(Strength::Tertiary, &RuleData::Text(String::new())),
                b"i" => builder.difference(Strength::Identity, &RuleData::Text(String::new())),
                b"pc" | b"sc" | b"tc" | b"ic" => {}
                b"x" => {
                    return Err(LdmlError::malformed("x element is missing its difference"));
                }
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unknown collation rule element '{}'",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Text(t) => require_layout_text(&t)?,
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of collation rules")),
            _ => {}
        }
    }
    Ok(())
}

fn read_concatenated(
    reader: &mut Reader<&[u8]>,
    builder: &mut IcuBuilder,
    strength: Strength,
) -> Result<(), LdmlError> {
    match read_rule_data(reader)? {
        RuleData::Text(text) => {
            for c in text.chars() {
                builder.difference(strength, &RuleData::Text(c.to_string()));
            }
            Ok(())
        }
        RuleData::Position(_) => Err(LdmlError::malformed(
            "concatenated rule elements cannot hold indirect positions",
        )),
    }
}

fn read_extended(reader: &mut Reader<&[u8]>, builder: &mut IcuBuilder) -> Result<(), LdmlError> {
    let mut context = None;
    let mut difference = None;
    let mut extend = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"context" => context = Some(read_rule_data(reader)?),
                b"extend" => extend = Some(read_rule_data(reader)?),
                b"p" => difference = Some((Strength::Primary, read_rule_data(reader)?)),
                b"s" => difference = Some((Strength::Secondary, read_rule_data(reader)?)),
                b"t" => difference = Some((Strength::Tertiary, read_rule_data(reader)?)),
                b"i" => difference = Some((Strength::Identity, read_rule_data(reader)?)),
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unknown element '{}' in an x rule",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"context" => context = Some(RuleData::Text(String::new())),
                b"extend" => extend = Some(RuleData::Text(String::new())),
                b"p" => difference = Some((Strength::Primary, RuleData::Text(String::new()))),
                b"s" => difference = Some((Strength::Secondary, RuleData::Text(String::new()))),
                b"t" => difference = Some((Strength::Tertiary, RuleData::Text(String::new()))),
                b"i" => difference = Some((Strength::Identity, RuleData::Text(String::new()))),
                other => {
                    return Err(LdmlError::malformed(format!(
                        "unknown element '{}' in an x rule",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Text(t) => require_layout_text(&t)?,
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of collation rules")),
            _ => {}
        }
    }
    let (strength, data) =
        difference.ok_or_else(|| LdmlError::malformed("x element is missing its difference"))?;
    builder.extended(strength, context.as_ref(), &data, extend.as_ref());
    Ok(())
}

/// Read the content of one rule element: either its text or one indirect
/// position child. Text around a child element is layout and is dropped.
fn read_rule_data(reader: &mut Reader<&[u8]>) -> Result<RuleData, LdmlError> {
    let mut text = String::new();
    let mut position = None;
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::Start(e) => {
                position = Some(indirect_position_from_bytes(e.name().as_ref())?);
                reader.read_to_end(e.name())?;
            }
            Event::Empty(e) => position = Some(indirect_position_from_bytes(e.name().as_ref())?),
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of collation rules")),
            _ => {}
        }
    }
    match position {
        Some(name) => Ok(RuleData::Position(name)),
        None => Ok(RuleData::Text(text)),
    }
}

fn read_element_text(reader: &mut Reader<&[u8]>) -> Result<String, LdmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of collation rules")),
            _ => {}
        }
    }
    Ok(text)
}

fn require_layout_text(t: &BytesText) -> Result<(), LdmlError> {
    let text = t.unescape()?;
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(LdmlError::malformed(format!(
            "unexpected text '{}' in collation rules",
            text.trim()
        )))
    }
}

fn before_attribute(e: &BytesStart) -> Result<Option<&'static str>, LdmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"before" {
            let value = attr.unescape_value()?;
            return match value.as_ref() {
                "primary" => Ok(Some("1")),
                "secondary" => Ok(Some("2")),
                "tertiary" => Ok(Some("3")),
                other => Err(LdmlError::malformed(format!(
                    "unknown before value '{other}'"
                ))),
            };
        }
    }
    Ok(None)
}

fn indirect_position_from_bytes(name: &[u8]) -> Result<&'static str, LdmlError> {
    INDIRECT_POSITIONS
        .iter()
        .copied()
        .find(|position| position.as_bytes() == name)
        .ok_or_else(|| {
            LdmlError::malformed(format!(
                "unknown indirect position element '{}'",
                String::from_utf8_lossy(name)
            ))
        })
}

/// Render an LDML indirect position name in ICU bracket form, without the
/// brackets. `non_ignorable` is `regular` in ICU.
fn indirect_position_display(name: &str) -> String {
    name.replace("non_ignorable", "regular").replace('_', " ")
}

/// Escape collation data for ICU text. ASCII characters with syntax meaning
/// go into quoted runs, a quote doubles itself, and a backslash passes
/// through with the character it escapes.
fn escape_icu_data(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push('\\');
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else if c == '\'' {
            out.push_str("''");
        } else if c.is_ascii() && !c.is_ascii_alphanumeric() {
            out.push('\'');
            out.push(c);
            while let Some(&next) = chars.peek() {
                if next != '\'' && next != '\\' && next.is_ascii() && !next.is_ascii_alphanumeric()
                {
                    out.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            out.push('\'');
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_variable_top(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        out.push_str(&format!("u{:X}", c as u32));
    }
    out
}

/// Decode a `variableTop` attribute value, a run of `uXXXX` hex pieces.
/// Surrogate pairs written code unit by code unit are combined.
fn decode_variable_top(value: &str) -> Result<String, LdmlError> {
    let mut units = Vec::new();
    for piece in value.split(['u', 'U']) {
        if piece.is_empty() {
            continue;
        }
        let code = u32::from_str_radix(piece, 16).map_err(|_| {
            LdmlError::malformed(format!("variableTop value '{value}' is not hexadecimal"))
        })?;
        units.push(code);
    }
    let mut out = String::new();
    let mut index = 0;
    while index < units.len() {
        let code = units[index];
        if (0xD800..=0xDBFF).contains(&code)
            && index + 1 < units.len()
            && (0xDC00..=0xDFFF).contains(&units[index + 1])
        {
            let combined = 0x10000 + ((code - 0xD800) << 10) + (units[index + 1] - 0xDC00);
            match char::from_u32(combined) {
                Some(c) => out.push(c),
                None => {
                    return Err(LdmlError::malformed(format!(
                        "variableTop value '{value}' is not a valid character"
                    )));
                }
            }
            index += 2;
            continue;
        }
        match char::from_u32(code) {
            Some(c) => out.push(c),
            None => {
                return Err(LdmlError::malformed(format!(
                    "variableTop value '{value}' is not a valid character"
                )));
            }
        }
        index += 1;
    }
    Ok(out)
}

fn push_simple_difference(
    lines: &mut Vec<Vec<Vec<String>>>,
    strength: Strength,
    text: &str,
) -> Option<()> {
    let element = escape_simple_element(text);
    match strength {
        Strength::Primary => lines.push(vec![vec![element]]),
        Strength::Secondary => {
            if lines.is_empty() {
                lines.push(Vec::new());
            }
            if let Some(line) = lines.last_mut() {
                line.push(vec![element]);
            }
        }
        Strength::Tertiary => {
            if lines.is_empty() {
                lines.push(Vec::new());
            }
            if let Some(line) = lines.last_mut() {
                if line.is_empty() {
                    line.push(Vec::new());
                }
                if let Some(item) = line.last_mut() {
                    item.push(element);
                }
            }
        }
        Strength::Identity => return None,
    }
    Some(())
}

/// Escape one collation element for simple rules text. Characters the
/// simple grammar treats as structure become `\uXXXX` escapes; unicode
/// escapes already in the data pass through.
fn escape_simple_element(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('\\') {
            let bytes = tail.as_bytes();
            if bytes.len() >= 5 && bytes[0] == b'u' && bytes[1..5].iter().all(u8::is_ascii_hexdigit)
            {
                out.push_str(&rest[..6]);
                rest = &rest[6..];
                continue;
            }
            if bytes.len() >= 9 && bytes[0] == b'U' && bytes[1..9].iter().all(u8::is_ascii_hexdigit)
            {
                match u32::from_str_radix(&tail[1..9], 16).ok().and_then(char::from_u32) {
                    Some(c) => push_simple_char(&mut out, c),
                    None => {
                        // unpaired surrogate, keep the low four digits escaped
                        out.push_str("\\u");
                        out.push_str(&tail[5..9]);
                    }
                }
                rest = &rest[10..];
                continue;
            }
            push_simple_char(&mut out, '\\');
            rest = tail;
            continue;
        }
        let mut iter = rest.char_indices();
        if let Some((_, c)) = iter.next() {
            push_simple_char(&mut out, c);
        }
        rest = iter.as_str();
    }
    out
}

fn push_simple_char(out: &mut String, c: char) {
    match c {
        ' ' | '\t' | '(' | ')' | '\\' | '\n' | '\r' => {
            out.push_str(&format!("\\u{:04X}", c as u32));
        }
        _ => out.push(c),
    }
}
