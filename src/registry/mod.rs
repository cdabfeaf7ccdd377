//! Subtag registry oracle.
//!
//! Answers one question per subtag slot: is this code something the IANA
//! registry (or one of its private-use ranges) knows about? All checks are
//! case-insensitive; the registry never dictates how a code is cased when
//! it is written back out.

mod data;

pub use data::{
    ISO3_TO_ISO1, LANGUAGES_ISO639_1, LANGUAGES_ISO639_3, REGIONS, REGIONS_NUMERIC, SCRIPTS,
    VARIANTS,
};

/// Subtags with fixed roles in migrated tags.
pub mod well_known {
    /// Language code assigned when no recognizable language survives cleanup.
    pub const UNLISTED_LANGUAGE: &str = "qaa";
    /// Script code for audio writing systems.
    pub const AUDIO_SCRIPT: &str = "Zxxx";
    /// Private-use token marking an audio writing system.
    pub const AUDIO_PRIVATE_USE: &str = "audio";
    /// Variant for IPA transcription.
    pub const IPA_VARIANT: &str = "fonipa";
    /// Private-use refinement of [`IPA_VARIANT`]: phonemic transcription.
    pub const IPA_PHONEMIC: &str = "emic";
    /// Private-use refinement of [`IPA_VARIANT`]: phonetic transcription.
    pub const IPA_PHONETIC: &str = "etic";
    /// First private-use script code, used as a placeholder during cleanup.
    pub const PRIVATE_SCRIPT: &str = "Qaaa";
    /// First private-use region code, used as a placeholder during cleanup.
    pub const PRIVATE_REGION: &str = "QM";
}

fn in_table(table: &[&str], code: &str) -> bool {
    let folded = code.to_ascii_lowercase();
    table.binary_search(&folded.as_str()).is_ok()
}

/// Whether `code` is a known ISO 639 language code or falls in the
/// private-use range `qaa`-`qtz`.
///
/// # Example
///
/// ```
/// use ldmlkit::registry::is_valid_language_code;
///
/// assert!(is_valid_language_code("en"));
/// assert!(is_valid_language_code("qaa"));
/// assert!(!is_valid_language_code("english"));
/// ```
pub fn is_valid_language_code(code: &str) -> bool {
    match code.len() {
        2 => in_table(LANGUAGES_ISO639_1, code),
        3 => in_table(LANGUAGES_ISO639_3, code) || is_private_language(code),
        _ => false,
    }
}

fn is_private_language(code: &str) -> bool {
    let mut chars = code.chars().map(|c| c.to_ascii_lowercase());
    chars.next() == Some('q')
        && matches!(chars.next(), Some('a'..='t'))
        && matches!(chars.next(), Some('a'..='z'))
}

/// Whether `code` is a known ISO 15924 script code or falls in the
/// private-use range `Qaaa`-`Qabx`.
pub fn is_valid_script_code(code: &str) -> bool {
    code.len() == 4 && (in_table(SCRIPTS, code) || is_private_script(code))
}

fn is_private_script(code: &str) -> bool {
    let folded = code.to_ascii_lowercase();
    let mut chars = folded.chars();
    if chars.next() != Some('q') || chars.next() != Some('a') {
        return false;
    }
    match (chars.next(), chars.next()) {
        (Some('a'), Some('a'..='z')) => true,
        (Some('b'), Some('a'..='x')) => true,
        _ => false,
    }
}

/// Whether `code` is a known ISO 3166 alpha-2 region, a UN M.49 numeric
/// area, or a private-use region (`AA`, `QM`-`QZ`, `XA`-`XZ`, `ZZ`).
pub fn is_valid_region_code(code: &str) -> bool {
    match code.len() {
        2 => in_table(REGIONS, code) || is_private_region(code),
        3 => REGIONS_NUMERIC.binary_search(&code).is_ok(),
        _ => false,
    }
}

fn is_private_region(code: &str) -> bool {
    let folded = code.to_ascii_lowercase();
    let mut chars = folded.chars();
    match (chars.next(), chars.next()) {
        (Some('a'), Some('a')) | (Some('z'), Some('z')) => true,
        (Some('q'), Some('m'..='z')) => true,
        (Some('x'), Some('a'..='z')) => true,
        _ => false,
    }
}

/// Whether `code` is a variant registered with IANA.
pub fn is_valid_variant_code(code: &str) -> bool {
    in_table(VARIANTS, code)
}

/// The two-letter equivalent of a three-letter language code, when ISO 639
/// defines one. Bibliographic aliases map to the same code as their
/// terminologic form (`fre` and `fra` both to `fr`).
///
/// # Example
///
/// ```
/// use ldmlkit::registry::iso3_to_iso1;
///
/// assert_eq!(iso3_to_iso1("eng"), Some("en"));
/// assert_eq!(iso3_to_iso1("fre"), Some("fr"));
/// assert_eq!(iso3_to_iso1("mas"), None);
/// ```
pub fn iso3_to_iso1(code: &str) -> Option<&'static str> {
    let folded = code.to_ascii_lowercase();
    ISO3_TO_ISO1
        .binary_search_by(|(iso3, _)| iso3.cmp(&folded.as_str()))
        .ok()
        .map(|idx| ISO3_TO_ISO1[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_letter_languages() {
        assert!(is_valid_language_code("en"));
        assert!(is_valid_language_code("EN"));
        assert!(is_valid_language_code("zh"));
        assert!(!is_valid_language_code("xx"));
    }

    #[test]
    fn three_letter_languages() {
        assert!(is_valid_language_code("eng"));
        assert!(is_valid_language_code("cmn"));
        assert!(!is_valid_language_code("zzz"));
    }

    #[test]
    fn private_language_range() {
        assert!(is_valid_language_code("qaa"));
        assert!(is_valid_language_code("qtz"));
        assert!(is_valid_language_code("QAA"));
        assert!(!is_valid_language_code("qua"));
    }

    #[test]
    fn scripts() {
        assert!(is_valid_script_code("Latn"));
        assert!(is_valid_script_code("latn"));
        assert!(is_valid_script_code("Zxxx"));
        assert!(!is_valid_script_code("Latin"));
        assert!(!is_valid_script_code("12"));
    }

    #[test]
    fn private_script_range() {
        assert!(is_valid_script_code("Qaaa"));
        assert!(is_valid_script_code("Qabx"));
        assert!(!is_valid_script_code("Qaby"));
        assert!(!is_valid_script_code("Qbaa"));
    }

    #[test]
    fn regions() {
        assert!(is_valid_region_code("US"));
        assert!(is_valid_region_code("us"));
        assert!(is_valid_region_code("419"));
        assert!(!is_valid_region_code("USA"));
        assert!(!is_valid_region_code("12"));
    }

    #[test]
    fn private_region_range() {
        assert!(is_valid_region_code("QM"));
        assert!(is_valid_region_code("QZ"));
        assert!(is_valid_region_code("XA"));
        assert!(is_valid_region_code("AA"));
        assert!(is_valid_region_code("ZZ"));
        assert!(!is_valid_region_code("QL"));
    }

    #[test]
    fn variants() {
        assert!(is_valid_variant_code("fonipa"));
        assert!(is_valid_variant_code("1901"));
        assert!(is_valid_variant_code("biske"));
        assert!(!is_valid_variant_code("private"));
    }

    #[test]
    fn iso3_mapping() {
        assert_eq!(iso3_to_iso1("eng"), Some("en"));
        assert_eq!(iso3_to_iso1("ENG"), Some("en"));
        assert_eq!(iso3_to_iso1("fre"), Some("fr"));
        assert_eq!(iso3_to_iso1("deu"), Some("de"));
        assert_eq!(iso3_to_iso1("mas"), None);
        assert_eq!(iso3_to_iso1("qaa"), None);
    }
}
