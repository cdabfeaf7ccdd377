//! Reads a current-version LDML record file into a [`WritingSystem`].
//!
//! The reader models the elements the migrator owns: `identity`, the
//! `layout` orientation, the first standard `collation`, and the two
//! extension blocks under `special`. Everything else in the file is passed
//! over; the writer is responsible for carrying it through.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::collation::{icu_to_simple_rules, ldml_rules_to_icu};
use crate::ldml::cursor::attribute_value;
use crate::ldml::model::{Keyboard, SortRules, WritingSystem};
use crate::ldml::{LdmlError, PALASO2_NAMESPACE, PALASO_NAMESPACE};
use crate::tag::{interpreter, Rfc5646Tag};

/// Parse an LDML record file.
///
/// Fails with [`LdmlError::MalformedSourceRecord`] when the document is not
/// an `ldml` file, when its tag elements do not form a valid tag, or when
/// its version value is not the one this library writes. A record whose
/// language was written under the legacy private-use convention is
/// interpreted into canonical components and is exempt from the version
/// check.
pub fn read_ldml(input: &str) -> Result<WritingSystem, LdmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);
    let mut raw = RawLdml::default();
    enter_ldml(&mut reader)?;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"identity" => read_identity(&mut reader, &mut raw)?,
                b"layout" => read_layout(&mut reader, &mut raw)?,
                b"collations" => read_collations(&mut reader, input, &mut raw)?,
                b"special" => read_special(&mut reader, &e, &mut raw)?,
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(_) => {}
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
    }
    raw.into_writing_system()
}

pub(crate) fn enter_ldml(reader: &mut Reader<&[u8]>) -> Result<(), LdmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"ldml" => return Ok(()),
            Event::Empty(e) if e.name().as_ref() == b"ldml" => {
                return Err(LdmlError::malformed("ldml element is empty"));
            }
            Event::Decl(_) | Event::DocType(_) | Event::PI(_) | Event::Comment(_)
            | Event::Text(_) => {}
            Event::Eof => return Err(LdmlError::malformed("no ldml element")),
            _ => return Err(LdmlError::malformed("expected an ldml element")),
        }
    }
}

#[derive(Debug, Default)]
struct RawLdml {
    language: String,
    script: String,
    territory: String,
    variant: String,
    version_number: String,
    version_description: String,
    generation: Option<String>,
    right_to_left: bool,
    sort_rules: SortRules,
    abbreviation: String,
    default_font_name: String,
    default_font_size: f32,
    keyboard: String,
    is_legacy_encoded: bool,
    language_name: String,
    spell_checking_id: String,
    palaso_version: Option<String>,
    known_keyboards: Vec<Keyboard>,
}

impl RawLdml {
    fn into_writing_system(self) -> Result<WritingSystem, LdmlError> {
        let legacy = is_legacy_private_use(&self.language);
        let tag = if legacy {
            interpreter::convert_components(
                &self.language,
                &self.script,
                &self.territory,
                &self.variant,
            )
            .to_tag()?
        } else {
            let (variant, private_use) = interpreter::split_variant_and_private_use(&self.variant);
            Rfc5646Tag::new(
                &self.language,
                &self.script,
                &self.territory,
                &variant,
                &private_use,
            )?
        };
        if !legacy && self.palaso_version.as_deref() != Some("2") {
            return Err(LdmlError::malformed(format!(
                "record for '{}' has version '{}', expected version 2",
                tag.complete_tag(),
                self.palaso_version.unwrap_or_default()
            )));
        }
        let mut ws = WritingSystem::new(tag);
        ws.legacy_private_use = legacy;
        ws.version_number = self.version_number;
        ws.version_description = self.version_description;
        if let Some(generation) = &self.generation {
            ws.date_modified = parse_date_modified(generation);
        }
        ws.right_to_left = self.right_to_left;
        ws.sort_rules = self.sort_rules;
        ws.abbreviation = self.abbreviation;
        ws.default_font_name = self.default_font_name;
        ws.default_font_size = self.default_font_size;
        ws.keyboard = self.keyboard;
        ws.is_legacy_encoded = self.is_legacy_encoded;
        ws.language_name = self.language_name;
        ws.spell_checking_id = self.spell_checking_id;
        ws.known_keyboards = self.known_keyboards;
        Ok(ws)
    }
}

/// Whether a language value uses the legacy convention of writing the whole
/// tag after the private use marker.
pub(crate) fn is_legacy_private_use(language: &str) -> bool {
    language.eq_ignore_ascii_case("x")
        || language
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"))
}

fn read_identity(reader: &mut Reader<&[u8]>, raw: &mut RawLdml) -> Result<(), LdmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"version" => {
                    raw.version_number = attribute_value(&e, "number")?.unwrap_or_default();
                    raw.version_description = element_text(reader)?;
                }
                b"generation" => {
                    raw.generation = attribute_value(&e, "date")?;
                    reader.read_to_end(e.name())?;
                }
                b"language" => {
                    raw.language = attribute_value(&e, "type")?.unwrap_or_default();
                    reader.read_to_end(e.name())?;
                }
                b"script" => {
                    raw.script = attribute_value(&e, "type")?.unwrap_or_default();
                    reader.read_to_end(e.name())?;
                }
                b"territory" => {
                    raw.territory = attribute_value(&e, "type")?.unwrap_or_default();
                    reader.read_to_end(e.name())?;
                }
                b"variant" => {
                    raw.variant = attribute_value(&e, "type")?.unwrap_or_default();
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"version" => {
                    raw.version_number = attribute_value(&e, "number")?.unwrap_or_default();
                }
                b"generation" => raw.generation = attribute_value(&e, "date")?,
                b"language" => {
                    raw.language = attribute_value(&e, "type")?.unwrap_or_default();
                }
                b"script" => raw.script = attribute_value(&e, "type")?.unwrap_or_default(),
                b"territory" => {
                    raw.territory = attribute_value(&e, "type")?.unwrap_or_default();
                }
                b"variant" => raw.variant = attribute_value(&e, "type")?.unwrap_or_default(),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of identity element")),
            _ => {}
        }
    }
    Ok(())
}

fn read_layout(reader: &mut Reader<&[u8]>, raw: &mut RawLdml) -> Result<(), LdmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.name().as_ref() == b"orientation" {
                    raw.right_to_left |= orientation_is_right_to_left(&e)?;
                }
                reader.read_to_end(e.name())?;
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"orientation" {
                    raw.right_to_left |= orientation_is_right_to_left(&e)?;
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of layout element")),
            _ => {}
        }
    }
    Ok(())
}

fn orientation_is_right_to_left(e: &BytesStart) -> Result<bool, LdmlError> {
    Ok(attribute_value(e, "characters")?.as_deref() == Some("right-to-left"))
}

fn read_collations(
    reader: &mut Reader<&[u8]>,
    input: &str,
    raw: &mut RawLdml,
) -> Result<(), LdmlError> {
    if let Some(fragment) = first_standard_collation(reader, input)? {
        raw.sort_rules = collation_sort_rules(&fragment)?;
    }
    Ok(())
}

/// Capture the content of the first standard collation element, leaving
/// `reader` past the end of the enclosing `collations` element.
pub(crate) fn first_standard_collation(
    reader: &mut Reader<&[u8]>,
    input: &str,
) -> Result<Option<String>, LdmlError> {
    let mut captured: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let standard = e.name().as_ref() == b"collation"
                    && attribute_value(&e, "type")?
                        .is_none_or(|kind| kind.is_empty() || kind == "standard");
                let span = reader.read_to_end(e.name())?;
                if standard && captured.is_none() {
                    captured = Some(input[span.start as usize..span.end as usize].to_string());
                }
            }
            Event::Empty(e) => {
                let standard = e.name().as_ref() == b"collation"
                    && attribute_value(&e, "type")?
                        .is_none_or(|kind| kind.is_empty() || kind == "standard");
                if standard && captured.is_none() {
                    captured = Some(String::new());
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(LdmlError::malformed("unexpected end of collations element"));
            }
            _ => {}
        }
    }
    Ok(captured)
}

/// Recover the sort rules from the content of one collation element, led by
/// the marker its writer left behind.
pub(crate) fn collation_sort_rules(fragment: &str) -> Result<SortRules, LdmlError> {
    let marker = sort_rules_marker(fragment)?;
    match marker.as_deref() {
        Some("DefaultOrdering") => Ok(SortRules::DefaultOrdering),
        Some("CustomSimple") => {
            let icu = ldml_rules_to_icu(fragment)?;
            match icu_to_simple_rules(&icu) {
                Some(simple) => Ok(SortRules::CustomSimple(simple)),
                None => {
                    tracing::debug!("rules marked CustomSimple are not simple, keeping ICU form");
                    Ok(SortRules::CustomIcu(icu))
                }
            }
        }
        Some("OtherLanguage") => match base_alias_source(fragment)? {
            Some(source) => Ok(SortRules::OtherLanguage(source)),
            None => Ok(SortRules::CustomIcu(ldml_rules_to_icu(fragment)?)),
        },
        Some("CustomICU") => Ok(SortRules::CustomIcu(ldml_rules_to_icu(fragment)?)),
        None => {
            // unmarked collation, keep whatever rules it holds
            let icu = ldml_rules_to_icu(fragment)?;
            if icu.is_empty() {
                Ok(SortRules::DefaultOrdering)
            } else {
                Ok(SortRules::CustomIcu(icu))
            }
        }
        Some(other) => Err(LdmlError::malformed(format!(
            "unknown sort rules type '{other}'"
        ))),
    }
}

fn sort_rules_marker(fragment: &str) -> Result<Option<String>, LdmlError> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().local_name().as_ref() == b"sortRulesType" {
                    return Ok(attribute_value(&e, "value")?);
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn base_alias_source(fragment: &str) -> Result<Option<String>, LdmlError> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().local_name().as_ref() == b"alias" {
                    return Ok(attribute_value(&e, "source")?);
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn read_special(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    raw: &mut RawLdml,
) -> Result<(), LdmlError> {
    if declares_namespace(e, PALASO_NAMESPACE)? {
        read_palaso_special(reader, raw)
    } else if declares_namespace(e, PALASO2_NAMESPACE)? {
        read_palaso2_special(reader, raw)
    } else {
        reader.read_to_end(e.name())?;
        Ok(())
    }
}

pub(crate) fn declares_namespace(e: &BytesStart, namespace: &str) -> Result<bool, LdmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref().starts_with(b"xmlns")
            && attr.unescape_value()?.as_ref() == namespace
        {
            return Ok(true);
        }
    }
    Ok(false)
}

fn read_palaso_special(reader: &mut Reader<&[u8]>, raw: &mut RawLdml) -> Result<(), LdmlError> {
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let value = attribute_value(e, "value")?.unwrap_or_default();
                match e.name().local_name().as_ref() {
                    b"abbreviation" => raw.abbreviation = value,
                    b"defaultFontFamily" => raw.default_font_name = value,
                    b"defaultFontSize" => {
                        raw.default_font_size = value.parse().map_err(|_| {
                            LdmlError::malformed(format!("bad defaultFontSize value '{value}'"))
                        })?;
                    }
                    b"defaultKeyboard" => raw.keyboard = value,
                    b"isLegacyEncoded" => {
                        raw.is_legacy_encoded = value.eq_ignore_ascii_case("true");
                    }
                    b"languageName" => raw.language_name = value,
                    b"spellCheckingId" => raw.spell_checking_id = value,
                    b"version" => raw.palaso_version = Some(value),
                    _ => {}
                }
                if let Event::Start(e) = &event {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of special element")),
            _ => {}
        }
    }
    Ok(())
}

fn read_palaso2_special(reader: &mut Reader<&[u8]>, raw: &mut RawLdml) -> Result<(), LdmlError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.name().local_name().as_ref() == b"knownKeyboards" {
                    read_known_keyboards(reader, raw)?;
                } else {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::Empty(_) => {}
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of special element")),
            _ => {}
        }
    }
    Ok(())
}

fn read_known_keyboards(reader: &mut Reader<&[u8]>, raw: &mut RawLdml) -> Result<(), LdmlError> {
    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if e.name().local_name().as_ref() == b"keyboard" {
                    raw.known_keyboards.push(Keyboard {
                        layout: attribute_value(e, "layout")?.unwrap_or_default(),
                        locale: attribute_value(e, "locale")?.unwrap_or_default(),
                    });
                }
                if let Event::Start(e) = &event {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of special element")),
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn element_text(reader: &mut Reader<&[u8]>) -> Result<String, LdmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(LdmlError::malformed("unexpected end of file")),
            _ => {}
        }
    }
    Ok(text)
}

fn parse_cvs_date(value: &str) -> Option<DateTime<Utc>> {
    let inner = value
        .trim()
        .strip_prefix("$Date:")?
        .trim_end_matches('$')
        .trim();
    let naive = NaiveDateTime::parse_from_str(inner, "%Y/%m/%d %H:%M:%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Parse a generation date. Sortable and RFC 3339 forms are understood, as
/// is the CVS keyword form some source control tools expanded into old
/// files. Anything else falls back to the current time.
pub(crate) fn parse_date_modified(value: &str) -> DateTime<Utc> {
    if let Some(date) = parse_cvs_date(value) {
        return date;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return date.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }
    Utc::now()
}
