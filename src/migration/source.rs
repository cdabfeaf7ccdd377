//! Lenient reading of legacy writing system files.
//!
//! Files written before the current conventions carry no format version
//! and no guarantee that their identity elements form a valid tag.
//! [`LegacyRecord`] takes such a file as it is, raw tag components and
//! all, so the migration strategy can decide what the record should
//! become. Missing or unreadable field values keep their defaults rather
//! than failing the read; only a broken document structure does that.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::ldml::{
    attribute_value, collation_sort_rules, declares_namespace, element_text, enter_ldml,
    first_standard_collation, parse_date_modified, LdmlError, SortRules, PALASO_NAMESPACE,
};

/// One record file as an old tool wrote it.
///
/// The four tag components hold exactly what the file's identity elements
/// said; cleaning them into a valid tag is the migration strategy's job.
#[derive(Debug, Clone)]
pub struct LegacyRecord {
    pub language: String,
    pub script: String,
    pub territory: String,
    pub variant: String,
    pub version_number: String,
    pub version_description: String,
    pub date_modified: DateTime<Utc>,
    pub right_to_left: bool,
    pub sort_rules: SortRules,
    pub abbreviation: String,
    pub default_font_name: String,
    pub default_font_size: f32,
    pub keyboard: String,
    pub is_legacy_encoded: bool,
    pub language_name: String,
    pub spell_checking_id: String,
}

impl LegacyRecord {
    /// Read a legacy record file from disk.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LdmlError> {
        let input = fs::read_to_string(path)?;
        Self::from_text(&input)
    }

    /// Parse a legacy record from its file content.
    pub fn from_text(input: &str) -> Result<Self, LdmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);
        let mut record = LegacyRecord::empty();
        enter_ldml(&mut reader)?;
        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"identity" => record.read_identity(&mut reader)?,
                    b"layout" => record.read_layout(&mut reader)?,
                    b"collations" => record.read_collations(&mut reader, input)?,
                    b"special" => {
                        if declares_namespace(&e, PALASO_NAMESPACE)? {
                            record.read_palaso_special(&mut reader)?;
                        } else {
                            reader.read_to_end(e.name())?;
                        }
                    }
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
        Ok(record)
    }

    /// The tag exactly as the file spelled it, components joined with `-`.
    pub fn complete_tag(&self) -> String {
        let mut tag = String::new();
        for part in [&self.language, &self.script, &self.territory, &self.variant] {
            if part.is_empty() {
                continue;
            }
            if !tag.is_empty() {
                tag.push('-');
            }
            tag.push_str(part);
        }
        tag
    }

    fn empty() -> Self {
        LegacyRecord {
            language: String::new(),
            script: String::new(),
            territory: String::new(),
            variant: String::new(),
            version_number: String::new(),
            version_description: String::new(),
            date_modified: Utc::now(),
            right_to_left: false,
            sort_rules: SortRules::default(),
            abbreviation: String::new(),
            default_font_name: String::new(),
            default_font_size: 0.0,
            keyboard: String::new(),
            is_legacy_encoded: false,
            language_name: String::new(),
            spell_checking_id: String::new(),
        }
    }

    fn read_identity(&mut self, reader: &mut Reader<&[u8]>) -> Result<(), LdmlError> {
        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Start(e) if e.name().as_ref() == b"version" => {
                    self.version_number = attribute_value(e, "number")?.unwrap_or_default();
                    self.version_description = element_text(reader)?;
                }
                Event::Start(e) | Event::Empty(e) => {
                    match e.name().as_ref() {
                        b"version" => {
                            self.version_number =
                                attribute_value(e, "number")?.unwrap_or_default();
                        }
                        b"generation" => {
                            if let Some(date) = attribute_value(e, "date")? {
                                self.date_modified = parse_date_modified(&date);
                            }
                        }
                        b"language" => {
                            self.language = attribute_value(e, "type")?.unwrap_or_default();
                        }
                        b"script" => {
                            self.script = attribute_value(e, "type")?.unwrap_or_default();
                        }
                        b"territory" => {
                            self.territory = attribute_value(e, "type")?.unwrap_or_default();
                        }
                        b"variant" => {
                            self.variant = attribute_value(e, "type")?.unwrap_or_default();
                        }
                        _ => {}
                    }
                    if let Event::Start(e) = &event {
                        reader.read_to_end(e.name())?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(LdmlError::malformed("unexpected end of identity element"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_layout(&mut self, reader: &mut Reader<&[u8]>) -> Result<(), LdmlError> {
        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Start(e) | Event::Empty(e) => {
                    if e.name().as_ref() == b"orientation"
                        && attribute_value(e, "characters")?.as_deref() == Some("right-to-left")
                    {
                        self.right_to_left = true;
                    }
                    if let Event::Start(e) = &event {
                        reader.read_to_end(e.name())?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(LdmlError::malformed("unexpected end of layout element"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn read_collations(
        &mut self,
        reader: &mut Reader<&[u8]>,
        input: &str,
    ) -> Result<(), LdmlError> {
        if let Some(fragment) = first_standard_collation(reader, input)? {
            self.sort_rules = collation_sort_rules(&fragment)?;
        }
        Ok(())
    }

    fn read_palaso_special(&mut self, reader: &mut Reader<&[u8]>) -> Result<(), LdmlError> {
        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Start(e) | Event::Empty(e) => {
                    let value = attribute_value(e, "value")?.unwrap_or_default();
                    match e.name().local_name().as_ref() {
                        b"abbreviation" => self.abbreviation = value,
                        b"defaultFontFamily" => self.default_font_name = value,
                        b"defaultFontSize" => {
                            // old tools wrote free-form sizes
                            self.default_font_size = value.parse().unwrap_or_default();
                        }
                        b"defaultKeyboard" => self.keyboard = value,
                        b"isLegacyEncoded" => {
                            self.is_legacy_encoded = value.eq_ignore_ascii_case("true");
                        }
                        b"languageName" => self.language_name = value,
                        b"spellCheckingId" => self.spell_checking_id = value,
                        _ => {}
                    }
                    if let Event::Start(e) = &event {
                        reader.read_to_end(e.name())?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => {
                    return Err(LdmlError::malformed("unexpected end of special element"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn wrap(content: &str) -> String {
        format!("<?xml version=\"1.0\" encoding=\"utf-8\"?><ldml>{content}</ldml>")
    }

    #[test]
    fn keeps_raw_components_as_written() {
        let input = wrap(
            "<identity><version number=\"1.1\">legacy</version>\
             <generation date=\"2008-06-18T22:52:35\" />\
             <language type=\"eng\" /><script type=\"latn\" />\
             <territory type=\"us\" /><variant type=\"IPA\" /></identity>",
        );
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.language, "eng");
        assert_eq!(record.script, "latn");
        assert_eq!(record.territory, "us");
        assert_eq!(record.variant, "IPA");
        assert_eq!(record.complete_tag(), "eng-latn-us-IPA");
        assert_eq!(record.version_number, "1.1");
        assert_eq!(record.version_description, "legacy");
        assert_eq!(
            record.date_modified,
            Utc.with_ymd_and_hms(2008, 6, 18, 22, 52, 35).unwrap()
        );
    }

    #[test]
    fn a_file_without_extensions_reads_as_defaults() {
        let input = wrap("<identity><language type=\"en\" /></identity><collations />");
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.complete_tag(), "en");
        assert_eq!(record.sort_rules, SortRules::DefaultOrdering);
        assert_eq!(record.abbreviation, "");
        assert!(!record.is_legacy_encoded);
    }

    #[test]
    fn reads_the_extension_fields_old_tools_wrote() {
        let input = wrap(
            "<identity><language type=\"en\" /></identity>\
             <layout><orientation characters=\"right-to-left\" /></layout>\
             <special xmlns:palaso=\"urn://palaso.org/ldmlExtensions/v1\">\
             <palaso:abbreviation value=\"eng\" />\
             <palaso:defaultFontFamily value=\"Gentium\" />\
             <palaso:defaultFontSize value=\"12\" />\
             <palaso:defaultKeyboard value=\"IPA Unicode\" />\
             <palaso:isLegacyEncoded value=\"True\" />\
             <palaso:languageName value=\"English\" />\
             <palaso:spellCheckingId value=\"en_US\" /></special>",
        );
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.abbreviation, "eng");
        assert_eq!(record.default_font_name, "Gentium");
        assert_eq!(record.default_font_size, 12.0);
        assert_eq!(record.keyboard, "IPA Unicode");
        assert!(record.is_legacy_encoded);
        assert_eq!(record.language_name, "English");
        assert_eq!(record.spell_checking_id, "en_US");
        assert!(record.right_to_left);
    }

    #[test]
    fn an_unreadable_font_size_falls_back_to_zero() {
        let input = wrap(
            "<identity><language type=\"en\" /></identity>\
             <special xmlns:palaso=\"urn://palaso.org/ldmlExtensions/v1\">\
             <palaso:defaultFontSize value=\"huge\" /></special>",
        );
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.default_font_size, 0.0);
    }

    #[test]
    fn reads_sort_rules_from_the_first_standard_collation() {
        let input = wrap(
            "<identity><language type=\"en\" /></identity>\
             <collations><collation><rules><reset>a</reset><p>b</p></rules>\
             <special xmlns:palaso=\"urn://palaso.org/ldmlExtensions/v1\">\
             <palaso:sortRulesType value=\"CustomICU\" /></special>\
             </collation></collations>",
        );
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.sort_rules, SortRules::CustomIcu("& a < b".to_string()));
    }

    #[test]
    fn a_collation_without_a_marker_is_not_an_error() {
        let input = wrap(
            "<identity><language type=\"en\" /></identity>\
             <collations><collation><rules><reset>a</reset><p>b</p></rules>\
             </collation></collations>",
        );
        let record = LegacyRecord::from_text(&input).expect("Should read");
        assert_eq!(record.sort_rules, SortRules::CustomIcu("& a < b".to_string()));
    }

    #[test]
    fn a_document_without_an_ldml_root_is_malformed() {
        let error = LegacyRecord::from_text("<notldml />").expect_err("Should fail");
        assert!(matches!(error, LdmlError::MalformedSourceRecord(_)));
    }
}
