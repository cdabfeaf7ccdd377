//! Writes a [`WritingSystem`] back out as an LDML record file.
//!
//! The modeled elements are regenerated from the record; everything else is
//! carried through from the previous version of the file in canonical
//! element order, so unknown extensions survive a rewrite. A record read
//! under the legacy private-use convention keeps its original identity
//! elements and the extension fields that convention owns, letting the
//! tool that wrote them read the file back.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::collation::{icu_to_ldml_rules, simple_rules_to_icu, validate_icu_rules};
use crate::ldml::cursor::{attribute_value, LdmlCursor};
use crate::ldml::model::{SortRules, WritingSystem};
use crate::ldml::reader::{declares_namespace, is_legacy_private_use};
use crate::ldml::{LdmlError, PALASO2_NAMESPACE, PALASO_NAMESPACE};
use crate::tag::interpreter;

/// Write `ws` as an LDML document, merging in the unmodeled content of
/// `previous` when a previous version of the file is given.
pub fn write_ldml<W: Write>(
    output: W,
    ws: &WritingSystem,
    previous: Option<&str>,
) -> Result<(), LdmlError> {
    let mut writer = Writer::new_with_indent(output, b' ', 2);
    let mut cursor = match previous {
        Some(text) => {
            let mut cursor = LdmlCursor::new(text)?;
            cursor.enter_document("ldml")?;
            Some(cursor)
        }
        None => None,
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("ldml")))?;

    if let Some(cursor) = cursor.as_mut() {
        cursor.copy_until(&mut writer, "identity")?;
    }
    let legacy_copy = write_identity(&mut writer, ws, cursor.as_mut())?;

    if let Some(cursor) = cursor.as_mut() {
        cursor.copy_until(&mut writer, "layout")?;
    }
    write_layout(&mut writer, ws, cursor.as_mut())?;

    if let Some(cursor) = cursor.as_mut() {
        cursor.copy_until(&mut writer, "collations")?;
    }
    write_collations(&mut writer, ws, cursor.as_mut())?;

    if let Some(cursor) = cursor.as_mut() {
        cursor.copy_until(&mut writer, "special")?;
    }
    let conform = match previous {
        Some(text) if legacy_copy => Some(old_extension_values(text)?),
        _ => None,
    };
    write_palaso_special(&mut writer, ws, conform.as_ref())?;
    write_palaso2_special(&mut writer, ws, conform.as_ref())?;
    if let Some(cursor) = cursor.as_mut() {
        copy_unknown_specials(&mut writer, cursor)?;
    }

    writer.write_event(Event::End(BytesEnd::new("ldml")))?;
    Ok(())
}

/// Write the identity element. Returns whether the old identity used the
/// legacy private-use convention and was copied through unchanged.
fn write_identity<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    cursor: Option<&mut LdmlCursor>,
) -> Result<bool, LdmlError> {
    let mut components: [String; 4] = Default::default();
    let mut old: Option<&mut LdmlCursor> = None;
    if let Some(cursor) = cursor {
        if cursor.at_element("identity") {
            if let Event::Start(_) = cursor.advance()? {
                while !cursor.at_end() && !cursor.at_element("special") {
                    if let Event::Start(e) | Event::Empty(e) = cursor.current() {
                        let slot = match e.name().as_ref() {
                            b"language" => Some(0),
                            b"script" => Some(1),
                            b"territory" => Some(2),
                            b"variant" => Some(3),
                            _ => None,
                        };
                        if let Some(slot) = slot {
                            if let Some(value) = attribute_value(e, "type")? {
                                components[slot] = value;
                            }
                        }
                    }
                    cursor.skip()?;
                }
                old = Some(cursor);
            }
        }
    }
    // only copy the old values when interpreting them gives the tag the
    // record still holds; a tag changed since reading is regenerated
    let legacy_copy = ws.legacy_private_use
        && old.is_some()
        && is_legacy_private_use(&components[0])
        && interpreter::convert_components(
            &components[0],
            &components[1],
            &components[2],
            &components[3],
        )
        .complete_tag()
            == ws.tag.complete_tag();

    writer.write_event(Event::Start(BytesStart::new("identity")))?;
    let mut version = BytesStart::new("version");
    version.push_attribute(("number", ws.version_number.as_str()));
    if ws.version_description.is_empty() {
        writer.write_event(Event::Empty(version))?;
    } else {
        writer.write_event(Event::Start(version))?;
        writer.write_event(Event::Text(BytesText::new(&ws.version_description)))?;
        writer.write_event(Event::End(BytesEnd::new("version")))?;
    }
    let date = ws.date_modified.format("%Y-%m-%dT%H:%M:%S").to_string();
    let mut generation = BytesStart::new("generation");
    generation.push_attribute(("date", date.as_str()));
    writer.write_event(Event::Empty(generation))?;

    if legacy_copy {
        write_tag_elements(writer, &components)?;
    } else {
        let tag = &ws.tag;
        write_tag_elements(
            writer,
            &[
                tag.language().to_string(),
                tag.script().to_string(),
                tag.region().to_string(),
                interpreter::concatenate_variant_and_private_use(
                    &tag.variant_text(),
                    &tag.private_use_text(),
                ),
            ],
        )?;
    }
    if let Some(cursor) = old {
        if cursor.at_element("special") {
            cursor.copy_to_end(writer)?;
        }
        cursor.leave()?;
    }
    writer.write_event(Event::End(BytesEnd::new("identity")))?;
    Ok(legacy_copy)
}

fn write_tag_elements<W: Write>(
    writer: &mut Writer<W>,
    components: &[String; 4],
) -> Result<(), LdmlError> {
    let [language, script, territory, variant] = components;
    let mut element = BytesStart::new("language");
    element.push_attribute(("type", language.as_str()));
    writer.write_event(Event::Empty(element))?;
    for (name, value) in [
        ("script", script),
        ("territory", territory),
        ("variant", variant),
    ] {
        if value.is_empty() {
            continue;
        }
        let mut element = BytesStart::new(name);
        element.push_attribute(("type", value.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    Ok(())
}

fn write_layout<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    cursor: Option<&mut LdmlCursor>,
) -> Result<(), LdmlError> {
    let mut opened = false;
    if ws.right_to_left {
        writer.write_event(Event::Start(BytesStart::new("layout")))?;
        let mut orientation = BytesStart::new("orientation");
        orientation.push_attribute(("characters", "right-to-left"));
        writer.write_event(Event::Empty(orientation))?;
        opened = true;
    }
    if let Some(cursor) = cursor {
        if cursor.at_element("layout") {
            if matches!(cursor.current(), Event::Empty(_)) {
                cursor.skip()?;
            } else {
                cursor.advance()?;
                // the orientation is regenerated, the rest is kept
                if cursor.find_element("orientation")? {
                    cursor.skip()?;
                }
                if !cursor.at_end() && !opened {
                    writer.write_event(Event::Start(BytesStart::new("layout")))?;
                    opened = true;
                }
                cursor.copy_to_end(writer)?;
                cursor.leave()?;
            }
        }
    }
    if opened {
        writer.write_event(Event::End(BytesEnd::new("layout")))?;
    }
    Ok(())
}

fn write_collations<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    cursor: Option<&mut LdmlCursor>,
) -> Result<(), LdmlError> {
    let mut old: Option<&mut LdmlCursor> = None;
    if let Some(cursor) = cursor {
        if cursor.at_element("collations") {
            if matches!(cursor.current(), Event::Empty(_)) {
                cursor.skip()?;
            } else {
                cursor.advance()?;
                // an old alias would override the regenerated collation
                if cursor.find_element("alias")? {
                    cursor.skip()?;
                }
                old = Some(cursor);
            }
        }
    }
    if ws.sort_rules == SortRules::DefaultOrdering && old.is_none() {
        writer.write_event(Event::Empty(BytesStart::new("collations")))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("collations")))?;
    if let Some(cursor) = old.as_deref_mut() {
        cursor.copy_until(writer, "collation")?;
    }
    write_collation(writer, ws, old.as_deref_mut())?;
    if let Some(cursor) = old {
        // collations of other types survive the rewrite
        cursor.copy_to_end(writer)?;
        cursor.leave()?;
    }
    writer.write_event(Event::End(BytesEnd::new("collations")))?;
    Ok(())
}

fn write_collation<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    old: Option<&mut LdmlCursor>,
) -> Result<(), LdmlError> {
    let mut copy: Option<&mut LdmlCursor> = None;
    if let Some(cursor) = old {
        if cursor.at_element("collation") {
            let kind = match cursor.current() {
                Event::Start(e) | Event::Empty(e) => attribute_value(e, "type")?,
                _ => None,
            };
            if kind.is_none_or(|kind| kind.is_empty() || kind == "standard") {
                if matches!(cursor.current(), Event::Empty(_)) {
                    cursor.skip()?;
                } else {
                    cursor.advance()?;
                    copy = Some(cursor);
                }
            }
        }
    }

    if ws.sort_rules == SortRules::DefaultOrdering {
        // nothing to regenerate; keep whatever the old collation carried
        // that is not ours
        let Some(cursor) = copy else { return Ok(()) };
        cursor.find_element("special")?;
        let mut opened = false;
        while !cursor.at_end() {
            if cursor.at_element("special") && is_known_special(cursor.current())? {
                cursor.skip()?;
                continue;
            }
            if !opened {
                writer.write_event(Event::Start(BytesStart::new("collation")))?;
                opened = true;
            }
            cursor.copy_node(writer)?;
        }
        cursor.leave()?;
        if opened {
            writer.write_event(Event::End(BytesEnd::new("collation")))?;
        }
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("collation")))?;
    match &ws.sort_rules {
        SortRules::DefaultOrdering => {}
        SortRules::OtherLanguage(source) => {
            // the alias pulls everything from the other locale, so old rule
            // content is dropped
            writer.write_event(Event::Start(BytesStart::new("base")))?;
            let mut alias = BytesStart::new("alias");
            alias.push_attribute(("source", source.as_str()));
            writer.write_event(Event::Empty(alias))?;
            writer.write_event(Event::End(BytesEnd::new("base")))?;
            if let Some(cursor) = copy.as_deref_mut() {
                cursor.find_element("special")?;
            }
        }
        SortRules::CustomSimple(simple) => match simple_rules_to_icu(simple) {
            Ok(icu) => write_icu_rules(writer, ws, &icu, copy.as_deref_mut())?,
            Err(error) => {
                tracing::warn!(
                    "record '{}' has unusable simple sort rules, omitting them: {}",
                    ws.tag.complete_tag(),
                    error
                );
            }
        },
        SortRules::CustomIcu(icu) => write_icu_rules(writer, ws, icu, copy.as_deref_mut())?,
    }
    write_sort_rules_marker(writer, ws.sort_rules.marker())?;
    if let Some(cursor) = copy {
        cursor.find_element("special")?;
        copy_unknown_specials(writer, cursor)?;
        cursor.leave()?;
    }
    writer.write_event(Event::End(BytesEnd::new("collation")))?;
    Ok(())
}

fn write_icu_rules<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    icu: &str,
    old: Option<&mut LdmlCursor>,
) -> Result<(), LdmlError> {
    if let Some(cursor) = old {
        if cursor.find_element("alias")? {
            cursor.skip()?;
        }
        cursor.copy_until(writer, "settings")?;
        // old settings and tuning blocks are superseded by the regenerated
        // rules
        cursor.find_element("special")?;
    }
    if let Err(error) = validate_icu_rules(icu) {
        tracing::warn!(
            "record '{}' has unusable sort rules, omitting them: {}",
            ws.tag.complete_tag(),
            error
        );
        return Ok(());
    }
    icu_to_ldml_rules(writer, icu)
}

fn write_sort_rules_marker<W: Write>(writer: &mut Writer<W>, marker: &str) -> Result<(), LdmlError> {
    let mut special = BytesStart::new("special");
    special.push_attribute(("xmlns:palaso", PALASO_NAMESPACE));
    writer.write_event(Event::Start(special))?;
    let mut kind = BytesStart::new("palaso:sortRulesType");
    kind.push_attribute(("value", marker));
    writer.write_event(Event::Empty(kind))?;
    writer.write_event(Event::End(BytesEnd::new("special")))?;
    Ok(())
}

/// Old extension values the legacy convention owns; copied through in
/// place of the record's values when the identity was copied.
#[derive(Default)]
struct ConformValues {
    abbreviation: Option<String>,
    language_name: Option<String>,
    version: Option<String>,
    keyboards_version: Option<String>,
}

fn old_extension_values(input: &str) -> Result<ConformValues, LdmlError> {
    #[derive(Clone, Copy)]
    enum Block {
        None,
        Palaso,
        Palaso2,
    }
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);
    let mut values = ConformValues::default();
    let mut block = Block::None;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"special" => {
                block = if declares_namespace(&e, PALASO_NAMESPACE)? {
                    Block::Palaso
                } else if declares_namespace(&e, PALASO2_NAMESPACE)? {
                    Block::Palaso2
                } else {
                    Block::None
                };
            }
            Event::Start(e) | Event::Empty(e) => match block {
                Block::Palaso => match e.local_name().as_ref() {
                    b"abbreviation" => values.abbreviation = attribute_value(&e, "value")?,
                    b"languageName" => values.language_name = attribute_value(&e, "value")?,
                    b"version" => values.version = attribute_value(&e, "value")?,
                    _ => {}
                },
                Block::Palaso2 => {
                    if e.local_name().as_ref() == b"version" {
                        values.keyboards_version = attribute_value(&e, "value")?;
                    }
                }
                Block::None => {}
            },
            Event::End(e) if e.name().as_ref() == b"special" => block = Block::None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(values)
}

/// The value to write for a field the legacy convention owns: the old
/// file's value when copying through, the record's value otherwise.
fn conform_value<'a>(
    conform: Option<&'a ConformValues>,
    old: fn(&ConformValues) -> Option<&str>,
    new: &'a str,
) -> Option<&'a str> {
    match conform {
        Some(values) => old(values),
        None if new.is_empty() => None,
        None => Some(new),
    }
}

fn write_palaso_special<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    conform: Option<&ConformValues>,
) -> Result<(), LdmlError> {
    let mut special = BytesStart::new("special");
    special.push_attribute(("xmlns:palaso", PALASO_NAMESPACE));
    writer.write_event(Event::Start(special))?;
    if let Some(value) = conform_value(conform, |v| v.abbreviation.as_deref(), &ws.abbreviation) {
        value_element(writer, "palaso:abbreviation", value)?;
    }
    if !ws.default_font_name.is_empty() {
        value_element(writer, "palaso:defaultFontFamily", &ws.default_font_name)?;
    }
    if ws.default_font_size != 0.0 {
        value_element(
            writer,
            "palaso:defaultFontSize",
            &ws.default_font_size.to_string(),
        )?;
    }
    if !ws.keyboard.is_empty() {
        value_element(writer, "palaso:defaultKeyboard", &ws.keyboard)?;
    }
    if ws.is_legacy_encoded {
        value_element(writer, "palaso:isLegacyEncoded", "True")?;
    }
    if let Some(value) = conform_value(conform, |v| v.language_name.as_deref(), &ws.language_name)
    {
        value_element(writer, "palaso:languageName", value)?;
    }
    if !ws.spell_checking_id.is_empty() {
        value_element(writer, "palaso:spellCheckingId", &ws.spell_checking_id)?;
    }
    match conform {
        Some(values) => {
            if let Some(value) = values.version.as_deref() {
                value_element(writer, "palaso:version", value)?;
            }
        }
        None => value_element(writer, "palaso:version", "2")?,
    }
    writer.write_event(Event::End(BytesEnd::new("special")))?;
    Ok(())
}

fn write_palaso2_special<W: Write>(
    writer: &mut Writer<W>,
    ws: &WritingSystem,
    conform: Option<&ConformValues>,
) -> Result<(), LdmlError> {
    if ws.known_keyboards.is_empty() {
        return Ok(());
    }
    let mut special = BytesStart::new("special");
    special.push_attribute(("xmlns:palaso2", PALASO2_NAMESPACE));
    writer.write_event(Event::Start(special))?;
    writer.write_event(Event::Start(BytesStart::new("palaso2:knownKeyboards")))?;
    for keyboard in &ws.known_keyboards {
        let mut element = BytesStart::new("palaso2:keyboard");
        element.push_attribute(("layout", keyboard.layout.as_str()));
        element.push_attribute(("locale", keyboard.locale.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("palaso2:knownKeyboards")))?;
    match conform {
        Some(values) => {
            if let Some(value) = values.keyboards_version.as_deref() {
                value_element(writer, "palaso2:version", value)?;
            }
        }
        None => value_element(writer, "palaso2:version", "2")?,
    }
    writer.write_event(Event::End(BytesEnd::new("special")))?;
    Ok(())
}

fn is_known_special(event: &Event) -> Result<bool, LdmlError> {
    match event {
        Event::Start(e) | Event::Empty(e) => Ok(declares_namespace(e, PALASO_NAMESPACE)?
            || declares_namespace(e, PALASO2_NAMESPACE)?),
        _ => Ok(false),
    }
}

/// Copy the remaining nodes of the current element, dropping specials in
/// the namespaces this writer regenerates.
fn copy_unknown_specials<W: Write>(
    writer: &mut Writer<W>,
    cursor: &mut LdmlCursor,
) -> Result<(), LdmlError> {
    while !cursor.at_end() {
        if cursor.at_element("special") && is_known_special(cursor.current())? {
            cursor.skip()?;
            continue;
        }
        cursor.copy_node(writer)?;
    }
    Ok(())
}

fn value_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> Result<(), LdmlError> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("value", value));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldml::model::Keyboard;
    use crate::ldml::reader::read_ldml;
    use crate::tag::Rfc5646Tag;
    use chrono::{TimeZone, Utc};

    fn record(tag: &str) -> WritingSystem {
        let tag = Rfc5646Tag::parse(tag).expect("Should parse");
        let mut ws = WritingSystem::new(tag);
        ws.version_number = "1.0".to_string();
        ws.date_modified = Utc
            .with_ymd_and_hms(2010, 4, 7, 15, 30, 0)
            .single()
            .expect("Should be a valid date");
        ws
    }

    fn write_to_string(ws: &WritingSystem, previous: Option<&str>) -> String {
        let mut output = Vec::new();
        write_ldml(&mut output, ws, previous).expect("Should write");
        String::from_utf8(output).expect("Should be UTF-8")
    }

    #[test]
    fn writes_a_minimal_record() {
        let written = write_to_string(&record("en"), None);
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(written.contains("<version number=\"1.0\"/>"));
        assert!(written.contains("<generation date=\"2010-04-07T15:30:00\"/>"));
        assert!(written.contains("<language type=\"en\"/>"));
        assert!(written.contains("<collations/>"));
        assert!(written.contains("<palaso:version value=\"2\"/>"));
        assert!(!written.contains("<script"));
        assert!(!written.contains("<layout"));
    }

    #[test]
    fn round_trips_a_full_record() {
        let mut ws = record("en-Latn-US-fonipa-x-etic");
        ws.abbreviation = "Eng".to_string();
        ws.language_name = "English".to_string();
        ws.default_font_name = "Charis SIL".to_string();
        ws.default_font_size = 12.0;
        ws.keyboard = "English-IPA".to_string();
        ws.known_keyboards.push(Keyboard {
            layout: "English-IPA".to_string(),
            locale: "en-US".to_string(),
        });
        ws.right_to_left = true;
        ws.is_legacy_encoded = true;
        ws.sort_rules = SortRules::CustomIcu("& b < a".to_string());
        ws.spell_checking_id = "en_US".to_string();
        ws.version_description = "For testing".to_string();

        let written = write_to_string(&ws, None);
        let back = read_ldml(&written).expect("Should read back");
        assert_eq!(back.tag.complete_tag(), "en-Latn-US-fonipa-x-etic");
        assert_eq!(back.abbreviation, "Eng");
        assert_eq!(back.language_name, "English");
        assert_eq!(back.default_font_name, "Charis SIL");
        assert_eq!(back.default_font_size, 12.0);
        assert_eq!(back.keyboard, "English-IPA");
        assert_eq!(back.known_keyboards, ws.known_keyboards);
        assert!(back.right_to_left);
        assert!(back.is_legacy_encoded);
        assert_eq!(back.sort_rules, ws.sort_rules);
        assert_eq!(back.spell_checking_id, "en_US");
        assert_eq!(back.version_number, "1.0");
        assert_eq!(back.version_description, "For testing");
        assert_eq!(back.date_modified, ws.date_modified);
    }

    #[test]
    fn simple_sort_rules_survive_a_round_trip() {
        let mut ws = record("en");
        ws.sort_rules = SortRules::CustomSimple("a b c\nd".to_string());
        let written = write_to_string(&ws, None);
        assert!(written.contains("<palaso:sortRulesType value=\"CustomSimple\"/>"));
        let back = read_ldml(&written).expect("Should read back");
        assert_eq!(back.sort_rules, ws.sort_rules);
    }

    #[test]
    fn other_language_rules_write_an_alias() {
        let mut ws = record("en");
        ws.sort_rules = SortRules::OtherLanguage("de".to_string());
        let written = write_to_string(&ws, None);
        assert!(written.contains("<alias source=\"de\"/>"));
        assert!(written.contains("<palaso:sortRulesType value=\"OtherLanguage\"/>"));
        let back = read_ldml(&written).expect("Should read back");
        assert_eq!(back.sort_rules, ws.sort_rules);
    }

    #[test]
    fn unusable_icu_rules_keep_their_marker_only() {
        let mut ws = record("en");
        ws.sort_rules = SortRules::CustomIcu("b < a".to_string());
        let written = write_to_string(&ws, None);
        assert!(written.contains("<palaso:sortRulesType value=\"CustomICU\"/>"));
        assert!(!written.contains("<reset>"));
        let back = read_ldml(&written).expect("Should read back");
        assert_eq!(back.sort_rules, SortRules::CustomIcu(String::new()));
    }

    #[test]
    fn legacy_encoding_writes_the_marker_value() {
        let mut ws = record("en");
        ws.is_legacy_encoded = true;
        let written = write_to_string(&ws, None);
        assert!(written.contains("<palaso:isLegacyEncoded value=\"True\"/>"));
    }

    #[test]
    fn whole_font_sizes_are_written_without_a_fraction() {
        let mut ws = record("en");
        ws.default_font_size = 12.0;
        let written = write_to_string(&ws, None);
        assert!(written.contains("<palaso:defaultFontSize value=\"12\"/>"));
    }

    #[test]
    fn known_keyboards_get_their_own_special() {
        let mut ws = record("en");
        ws.known_keyboards.push(Keyboard {
            layout: "US".to_string(),
            locale: "en-US".to_string(),
        });
        let written = write_to_string(&ws, None);
        assert!(written.contains("<palaso2:keyboard layout=\"US\" locale=\"en-US\"/>"));
        assert!(written.contains("<palaso2:version value=\"2\"/>"));
    }

    #[test]
    fn unmodeled_content_is_carried_through() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="en"/>
    <special xmlns:fw="urn://fieldworks.sil.org/ldmlExtensions/v1">
      <fw:graphiteEnabled value="false"/>
    </special>
  </identity>
  <characters>
    <exemplarCharacters>[a b c]</exemplarCharacters>
  </characters>
  <collations/>
  <!-- keep me -->
  <special xmlns:fw="urn://fieldworks.sil.org/ldmlExtensions/v1">
    <fw:windowsLCID value="1033"/>
  </special>
  <special xmlns:palaso="urn://palaso.org/ldmlExtensions/v1">
    <palaso:version value="2"/>
  </special>
</ldml>"#;
        let ws = read_ldml(previous).expect("Should read");
        let written = write_to_string(&ws, Some(previous));
        assert!(written.contains("<fw:graphiteEnabled value=\"false\"/>"));
        assert!(written.contains("<exemplarCharacters>[a b c]</exemplarCharacters>"));
        assert!(written.contains("<!-- keep me -->"));
        assert!(written.contains("<fw:windowsLCID value=\"1033\"/>"));
        let palaso = written
            .find("xmlns:palaso")
            .expect("Should write the extension");
        let foreign = written
            .find("xmlns:fw=\"urn://fieldworks.sil.org/ldmlExtensions/v1\">\n    <fw:windowsLCID")
            .expect("Should keep the other extension");
        assert!(palaso < foreign, "regenerated specials come first");
    }

    #[test]
    fn other_collations_are_preserved() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="en"/>
  </identity>
  <collations>
    <collation type="phonebook">
      <rules>
        <reset>a</reset>
        <p>b</p>
      </rules>
    </collation>
  </collations>
  <special xmlns:palaso="urn://palaso.org/ldmlExtensions/v1">
    <palaso:version value="2"/>
  </special>
</ldml>"#;
        let ws = read_ldml(previous).expect("Should read");
        assert_eq!(ws.sort_rules, SortRules::DefaultOrdering);
        let written = write_to_string(&ws, Some(previous));
        assert!(written.contains("<collation type=\"phonebook\">"));
        assert!(written.contains("<reset>a</reset>"));
    }

    #[test]
    fn old_layout_content_outlives_the_orientation() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="en"/>
  </identity>
  <layout>
    <orientation characters="right-to-left"/>
    <inList>titlecase-words</inList>
  </layout>
  <collations/>
  <special xmlns:palaso="urn://palaso.org/ldmlExtensions/v1">
    <palaso:version value="2"/>
  </special>
</ldml>"#;
        let ws = read_ldml(previous).expect("Should read");
        assert!(ws.right_to_left);

        let mut flipped = ws.clone();
        flipped.right_to_left = false;
        let written = write_to_string(&flipped, Some(previous));
        assert!(!written.contains("orientation"));
        assert!(written.contains("<layout>"));
        assert!(written.contains("<inList>titlecase-words</inList>"));
    }

    #[test]
    fn legacy_identity_survives_a_rewrite() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="x-en"/>
    <script type="Zxxx"/>
    <variant type="x-audio"/>
  </identity>
  <collations/>
</ldml>"#;
        let ws = read_ldml(previous).expect("Should read");
        assert!(ws.legacy_private_use);
        let written = write_to_string(&ws, Some(previous));
        assert!(written.contains("<language type=\"x-en\"/>"));
        assert!(written.contains("<script type=\"Zxxx\"/>"));
        assert!(written.contains("<variant type=\"x-audio\"/>"));
        assert!(!written.contains("type=\"qaa\""));
        // the old file carried no version value to copy
        assert!(!written.contains("palaso:version"));
    }

    #[test]
    fn legacy_extension_fields_are_copied_not_regenerated() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="x-en"/>
    <script type="Zxxx"/>
    <variant type="x-audio"/>
  </identity>
  <collations/>
  <special xmlns:palaso="urn://palaso.org/ldmlExtensions/v1">
    <palaso:abbreviation value="old"/>
    <palaso:languageName value="Old Name"/>
    <palaso:version value="1"/>
  </special>
</ldml>"#;
        let mut ws = read_ldml(previous).expect("Should read");
        ws.abbreviation = "new".to_string();
        ws.language_name = "New Name".to_string();
        let written = write_to_string(&ws, Some(previous));
        assert!(written.contains("<palaso:abbreviation value=\"old\"/>"));
        assert!(written.contains("<palaso:languageName value=\"Old Name\"/>"));
        assert!(written.contains("<palaso:version value=\"1\"/>"));
    }

    #[test]
    fn a_renamed_legacy_tag_is_regenerated() {
        let previous = r#"<?xml version="1.0" encoding="utf-8"?>
<ldml>
  <identity>
    <version number="1.0"/>
    <generation date="2010-04-07T15:30:00"/>
    <language type="x-en"/>
    <script type="Zxxx"/>
    <variant type="x-audio"/>
  </identity>
  <collations/>
</ldml>"#;
        let mut ws = read_ldml(previous).expect("Should read");
        ws.tag = Rfc5646Tag::parse("qaa-Zxxx-x-audio-fr").expect("Should parse");
        let written = write_to_string(&ws, Some(previous));
        assert!(written.contains("<language type=\"qaa\"/>"));
        assert!(written.contains("<variant type=\"x-audio-fr\"/>"));
        assert!(!written.contains("type=\"x-en\""));
    }
}
