//! Language tag tests across the public API.
//!
//! Table-driven coverage of parsing, cleaning, and the legacy private-use
//! interpretation, using inputs collected from real pre-migration data.

use ldmlkit::tag::{IetfLanguageTagCleaner, InterpretedTag, Rfc5646Tag, TagError};
use rstest::rstest;

// =============================================================================
// Parsing
// =============================================================================

#[rstest]
#[case("en", "en", "", "", "", "")]
#[case("en-Latn", "en", "Latn", "", "", "")]
#[case("en-Latn-US", "en", "Latn", "US", "", "")]
#[case("en-US-fonipa", "en", "", "US", "fonipa", "")]
#[case("sl-rozaj-biske", "sl", "", "", "rozaj-biske", "")]
#[case("en-Latn-US-fonipa-x-etic", "en", "Latn", "US", "fonipa", "x-etic")]
#[case("qaa-Zxxx-x-audio", "qaa", "Zxxx", "", "", "x-audio")]
#[case("x-private-sketch", "", "", "", "", "x-private-sketch")]
#[case("zh-CN-x-py", "zh", "", "CN", "", "x-py")]
fn parse_classifies_every_token(
    #[case] text: &str,
    #[case] language: &str,
    #[case] script: &str,
    #[case] region: &str,
    #[case] variant: &str,
    #[case] private_use: &str,
) {
    let tag = Rfc5646Tag::parse(text).expect("Should parse");
    assert_eq!(tag.language(), language, "language of '{}'", text);
    assert_eq!(tag.script(), script, "script of '{}'", text);
    assert_eq!(tag.region(), region, "region of '{}'", text);
    assert_eq!(tag.variant_text(), variant, "variant of '{}'", text);
    assert_eq!(tag.private_use_text(), private_use, "private use of '{}'", text);
    assert_eq!(tag.complete_tag(), text, "round trip of '{}'", text);
}

#[rstest]
#[case("english")]
#[case("en-gibberish1234")]
#[case("en-fonipa-US")]
#[case("en-Latn-Cyrl")]
fn parse_rejects_misassembled_tags(#[case] text: &str) {
    assert!(
        Rfc5646Tag::parse(text).is_err(),
        "'{}' should not parse",
        text
    );
}

// =============================================================================
// Cleaning (inputs observed in legacy writing system folders)
// =============================================================================

#[rstest]
#[case("234", "qaa-x-234")]
#[case("abc-123", "abc-x-123")]
#[case("aaa-x-audio", "aaa-Zxxx-x-audio")]
#[case("wee-Latn", "qaa-Latn-x-wee")]
#[case("x-blah", "qaa-x-blah")]
#[case("qaa-x-th", "qaa-x-th")]
#[case("en-x-some-x-whatever", "en-x-some-whatever")]
#[case("x-some-x-whatever", "qaa-x-some-whatever")]
#[case("x-en-Zxxx-x-audio", "qaa-Zxxx-x-en-Zxxx-audio")]
#[case("qaa-Zxxx-x-Zxxx-AUDIO", "qaa-Zxxx-x-Zxxx-AUDIO")]
#[case("eng", "en")]
#[case("eng-bogus", "en-x-bogus")]
#[case("cmn", "zh-CN")]
#[case("pes", "fa")]
#[case("arb", "ar")]
#[case("bogus-en-audio-tpi-bogus2-x-", "en-Zxxx-x-bogus-audio-bogus2-tpi")]
fn cleaning_a_whole_tag(#[case] raw: &str, #[case] expected: &str) {
    let mut cleaner = IetfLanguageTagCleaner::from_complete_tag(raw);
    cleaner.clean();
    assert_eq!(
        cleaner.complete_tag().expect("Should produce a valid tag"),
        expected,
        "cleaning '{}'",
        raw
    );
}

#[rstest]
#[case("x-kal", "x-script", "x-RG", "fonipa-x-etic", "qaa-Qaaa-QM-fonipa-x-kal-script-RG-etic")]
#[case("fr", "x-script", "", "", "fr-Qaaa-x-script")]
#[case("fr", "x-script", "NO", "", "fr-Qaaa-NO-x-script")]
#[case("fr", "Latn", "x-ZY", "", "fr-Latn-QM-x-ZY")]
#[case("fr", "", "x-ZY", "fonipa-x-etic", "fr-QM-fonipa-x-ZY-etic")]
#[case("fr", "", "", "fonipa-etic", "fr-fonipa-x-etic")]
#[case("zh", "", "NO", "", "zh-NO")]
#[case("en", "", "", "x-etic", "en-fonipa-x-etic")]
#[case("en", "", "", "Zxxx", "en-Zxxx-x-audio")]
fn cleaning_separate_components(
    #[case] language: &str,
    #[case] script: &str,
    #[case] region: &str,
    #[case] variant: &str,
    #[case] expected: &str,
) {
    let mut cleaner = IetfLanguageTagCleaner::new(language, script, region, variant);
    cleaner.clean();
    assert_eq!(
        cleaner.complete_tag().expect("Should produce a valid tag"),
        expected,
        "cleaning ('{}', '{}', '{}', '{}')",
        language,
        script,
        region,
        variant
    );
}

#[rstest]
#[case("234")]
#[case("eng-bogus")]
#[case("x-en-Zxxx-x-audio")]
#[case("bogus-en-audio-tpi-bogus2-x-")]
#[case("cmn")]
fn cleaning_twice_changes_nothing(#[case] raw: &str) {
    let mut first = IetfLanguageTagCleaner::from_complete_tag(raw);
    first.clean();
    let once = first.complete_tag().expect("Should produce a valid tag");
    let mut second = IetfLanguageTagCleaner::from_complete_tag(&once);
    second.clean();
    assert_eq!(
        second.complete_tag().expect("Should stay valid"),
        once,
        "second pass over '{}'",
        raw
    );
}

// =============================================================================
// Legacy private-use convention
// =============================================================================

#[rstest]
#[case("x-en", "", "", "", "x-en")]
#[case("x-en", "Zxxx", "", "x-audio", "qaa-Zxxx-x-audio-en")]
#[case("x-kal", "", "GL", "", "qaa-GL-x-kal")]
#[case("x-abc", "Latn", "", "fonipa", "qaa-Latn-fonipa-x-abc")]
fn legacy_components_become_canonical_tags(
    #[case] language: &str,
    #[case] script: &str,
    #[case] region: &str,
    #[case] variant: &str,
    #[case] expected: &str,
) {
    let interpreted =
        ldmlkit::tag::interpreter::convert_components(language, script, region, variant);
    assert_eq!(interpreted.complete_tag(), expected);
    let tag = interpreted.to_tag().expect("Should validate");
    assert_eq!(tag.complete_tag(), expected);
}

#[test]
fn legacy_interpretation_reports_components() {
    let interpreted: InterpretedTag =
        ldmlkit::tag::interpreter::convert_components("x-en", "Zxxx", "", "x-audio");
    assert_eq!(interpreted.language, "qaa");
    assert_eq!(interpreted.script, "Zxxx");
    assert_eq!(interpreted.region, "");
    assert_eq!(interpreted.variant, "x-audio-en");
}

// =============================================================================
// Mutation invariants
// =============================================================================

#[test]
fn mutations_validate_against_the_registries() {
    let mut tag = Rfc5646Tag::parse("en").expect("Should parse");
    tag.set_script("Latn").expect("Should accept a script");
    tag.set_region("US").expect("Should accept a region");
    assert_eq!(tag.complete_tag(), "en-Latn-US");

    let error = tag.set_region("USA1").expect_err("Should reject");
    assert!(matches!(error, TagError::InvalidTagComponent { .. }));
    assert_eq!(tag.complete_tag(), "en-Latn-US", "failed mutation is a no-op");
}

#[test]
fn private_use_membership_ignores_case_and_marker() {
    let mut tag = Rfc5646Tag::parse("en").expect("Should parse");
    tag.add_to_private_use("dupl0").expect("Should accept");
    assert!(tag.private_use_contains("DUPL0"));
    assert!(tag.private_use_contains("x-dupl0"));
    assert_eq!(tag.complete_tag(), "en-x-dupl0");
}
