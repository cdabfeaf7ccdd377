//! Normalization of raw language tag components from legacy files.

use smol_str::SmolStr;

use crate::registry::{self, well_known};
use crate::tag::error::TagError;
use crate::tag::interpreter::split_variant_and_private_use;
use crate::tag::rfc5646::Rfc5646Tag;
use crate::tag::subtag::Subtag;

/// Rewrites arbitrary raw tag components into a form [`Rfc5646Tag`] accepts.
///
/// Legacy files carry tags assembled by many generations of writers: codes
/// in the wrong slot, unregistered inventions, stray punctuation, private
/// use content without its `x` marker. [`IetfLanguageTagCleaner::clean`]
/// shuffles every token into a slot whose registry check accepts it and
/// demotes everything else to private use, so the result always validates.
///
/// # Example
///
/// ```
/// use ldmlkit::tag::IetfLanguageTagCleaner;
///
/// let mut cleaner = IetfLanguageTagCleaner::from_complete_tag("eng-bogus");
/// cleaner.clean();
/// assert_eq!(cleaner.complete_tag().expect("Should be valid"), "en-x-bogus");
/// ```
#[derive(Debug, Clone)]
pub struct IetfLanguageTagCleaner {
    language: Subtag,
    script: Subtag,
    region: Subtag,
    variant: Subtag,
    private_use: Subtag,
}

impl IetfLanguageTagCleaner {
    /// Create a cleaner from four raw components. The variant may carry an
    /// embedded private use block (`fonipa-x-etic`), which is split off.
    pub fn new(language: &str, script: &str, region: &str, variant: &str) -> Self {
        let (variant, private_use) = split_variant_and_private_use(variant);
        Self::with_private_use(language, script, region, &variant, &private_use)
    }

    /// Create a cleaner with all five components already separated.
    pub fn with_private_use(
        language: &str,
        script: &str,
        region: &str,
        variant: &str,
        private_use: &str,
    ) -> Self {
        Self {
            language: Subtag::from_text(language),
            script: Subtag::from_text(script),
            region: Subtag::from_text(region),
            variant: Subtag::from_text(variant),
            private_use: Subtag::from_text(private_use),
        }
    }

    /// Create a cleaner from a whole serialized tag. No parsing happens up
    /// front; every token lands in the language slot and [`clean`] sorts
    /// them out.
    ///
    /// [`clean`]: IetfLanguageTagCleaner::clean
    pub fn from_complete_tag(tag: &str) -> Self {
        Self::with_private_use(tag, "", "", "", "")
    }

    /// The language tokens, joined and lowercased.
    pub fn language(&self) -> String {
        self.language.to_string().to_lowercase()
    }

    /// The script tokens, joined, in title case.
    pub fn script(&self) -> String {
        to_upper_first_letter(&self.script.to_string())
    }

    /// The region tokens, joined and uppercased.
    pub fn region(&self) -> String {
        self.region.to_string().to_uppercase()
    }

    /// The variant tokens, joined, case preserved.
    pub fn variant(&self) -> String {
        self.variant.to_string()
    }

    /// The private use tokens, joined, case preserved except that a leading
    /// `audio` token is always written lowercase.
    pub fn private_use(&self) -> String {
        let mut out = String::new();
        for (index, part) in self.private_use.iter().enumerate() {
            if !out.is_empty() {
                out.push('-');
            }
            if index == 0 && part.eq_ignore_ascii_case(well_known::AUDIO_PRIVATE_USE) {
                out.push_str(well_known::AUDIO_PRIVATE_USE);
            } else {
                out.push_str(part);
            }
        }
        out
    }

    /// Normalize the components in place.
    ///
    /// The passes run in a fixed order. Each one either repairs a slot or
    /// moves tokens towards private use; none of them ever drops content,
    /// so the cleaned tag still carries everything the input did.
    pub fn clean(&mut self) {
        self.migrate_iso3_codes();

        // Slots whose first token is unusable get a private use placeholder
        // put in front, with the token itself preserved in private use.
        promote_or_replace_first_part(
            &mut self.language,
            &mut self.private_use,
            registry::is_valid_language_code,
            well_known::UNLISTED_LANGUAGE,
            true,
        );
        promote_or_replace_first_part(
            &mut self.script,
            &mut self.private_use,
            registry::is_valid_script_code,
            well_known::PRIVATE_SCRIPT,
            false,
        );
        promote_or_replace_first_part(
            &mut self.region,
            &mut self.private_use,
            registry::is_valid_region_code,
            well_known::PRIVATE_REGION,
            false,
        );

        // An early convention marked audio writing systems by putting Zxxx
        // in the variant.
        if self.variant.contains(well_known::AUDIO_SCRIPT) {
            move_matching(&mut self.variant, &mut self.script, |part| {
                part == well_known::AUDIO_SCRIPT
            });
            self.private_use.append(well_known::AUDIO_PRIVATE_USE);
        }

        // Codes that were retired or never had a two letter form.
        match self.language().as_str() {
            "cmn" => self.language = Subtag::from_text("zh"),
            "pes" => self.language = Subtag::from_text("fa"),
            "arb" => self.language = Subtag::from_text("ar"),
            _ => {}
        }
        if self.language() == "zh" && self.region.is_empty() {
            self.region = Subtag::from_text("CN");
        }

        // Language tokens behind an x marker are private use content.
        self.move_language_parts_after_marker();

        // Script, region, and variant codes buried in the language move to
        // their own slots. The first valid language code stays put.
        move_matching_keeping_first(
            &mut self.language,
            &mut self.script,
            registry::is_valid_script_code,
            registry::is_valid_language_code,
        );
        move_matching_keeping_first(
            &mut self.language,
            &mut self.region,
            registry::is_valid_region_code,
            registry::is_valid_language_code,
        );
        move_matching_keeping_first(
            &mut self.language,
            &mut self.variant,
            registry::is_valid_variant_code,
            registry::is_valid_language_code,
        );

        // Remaining non-language tokens go to private use. A four letter
        // leftover was in all likelihood meant as a script, so the script
        // slot gets the private use placeholder when it has nothing else.
        let mut leftovers = Subtag::new();
        move_matching(&mut self.language, &mut leftovers, |part| {
            !registry::is_valid_language_code(part)
        });
        for part in leftovers.iter() {
            self.private_use.append(part);
            if self.script.is_empty()
                && part.chars().count() == 4
                && part != well_known::IPA_PHONEMIC
                && part != well_known::IPA_PHONETIC
            {
                self.script = Subtag::from_text(well_known::PRIVATE_SCRIPT);
            }
        }

        move_matching(&mut self.script, &mut self.private_use, |part| {
            !registry::is_valid_script_code(part)
        });
        move_matching(&mut self.region, &mut self.private_use, |part| {
            !registry::is_valid_region_code(part)
        });
        move_matching(&mut self.variant, &mut self.private_use, |part| {
            !registry::is_valid_variant_code(part)
        });

        // Language, script, and region hold at most one token each.
        self.language
            .keep_first_and_move_remainder_to(&mut self.private_use);
        self.script
            .keep_first_and_move_remainder_to(&mut self.private_use);
        self.region
            .keep_first_and_move_remainder_to(&mut self.private_use);

        // An audio tag always carries the Zxxx script and nothing else in
        // the script slot.
        if self.private_use.contains(well_known::AUDIO_PRIVATE_USE) {
            if !self.script.is_empty() && !self.script.contains(well_known::AUDIO_SCRIPT) {
                let extras: Vec<SmolStr> = self
                    .script
                    .iter()
                    .filter(|part| !self.private_use.contains(part.as_str()))
                    .cloned()
                    .collect();
                for part in extras {
                    self.private_use.append(&part);
                    self.script.remove_all(&part);
                }
            }
            if !self.script.contains(well_known::AUDIO_SCRIPT) {
                self.script = Subtag::from_text(well_known::AUDIO_SCRIPT);
            }
        }

        self.private_use.remove_non_alphanumeric();
        self.private_use.truncate_parts(8);
        self.variant.remove_duplicates();
        self.private_use.remove_duplicates();
        // Marker tokens swept in from the other slots.
        self.private_use.remove_all("x");

        let all_empty = self.language.is_empty()
            && self.script.is_empty()
            && self.region.is_empty()
            && self.variant.is_empty()
            && self.private_use.is_empty();
        let needs_language = self.language.is_empty()
            && (!self.script.is_empty() || !self.region.is_empty() || !self.variant.is_empty());
        if needs_language || all_empty {
            self.language.append(well_known::UNLISTED_LANGUAGE);
        }

        // etic and emic only make sense as refinements of fonipa.
        if self.variant.is_empty()
            && (self.private_use.contains(well_known::IPA_PHONETIC)
                || self.private_use.contains(well_known::IPA_PHONEMIC))
        {
            self.variant = Subtag::from_text(well_known::IPA_VARIANT);
        }
    }

    /// Assemble the cleaned components into a validated tag.
    pub fn to_tag(&self) -> Result<Rfc5646Tag, TagError> {
        Rfc5646Tag::new(
            &self.language(),
            &self.script(),
            &self.region(),
            &self.variant(),
            &self.private_use(),
        )
    }

    /// The canonical serialization of the cleaned components.
    pub fn complete_tag(&self) -> Result<String, TagError> {
        Ok(self.to_tag()?.complete_tag())
    }

    /// Replace the first three letter language token that has a two letter
    /// equivalent. Tokens behind an x marker stay as written.
    fn migrate_iso3_codes(&mut self) {
        let mut migration: Option<(SmolStr, &'static str)> = None;
        for part in self.language.iter() {
            if part.eq_ignore_ascii_case("x") {
                break;
            }
            if let Some(iso1) = registry::iso3_to_iso1(part) {
                migration = Some((part.clone(), iso1));
                break;
            }
        }
        if let Some((iso3, iso1)) = migration {
            self.language.remove_all(&iso3);
            self.language.append(iso1);
        }
    }

    fn move_language_parts_after_marker(&mut self) {
        let parts: Vec<SmolStr> = self.language.iter().cloned().collect();
        let Some(marker) = parts.iter().position(|p| p.eq_ignore_ascii_case("x")) else {
            return;
        };
        for part in &parts[marker + 1..] {
            self.private_use.append(part);
        }
        self.language.clear();
        for part in &parts[..marker] {
            self.language.append(part);
        }
    }
}

/// Make sure the first token of `from` passes `test`.
///
/// A passing token elsewhere in the sequence is pulled to the front. Failing
/// that, punctuation is stripped and the scan retried. As a last resort the
/// first real token moves to private use and `placeholder` takes its place.
/// With `stop_at_marker` the pull never reaches behind an `x` token.
fn promote_or_replace_first_part(
    from: &mut Subtag,
    private_use: &mut Subtag,
    test: impl Fn(&str) -> bool,
    placeholder: &str,
    stop_at_marker: bool,
) {
    let Some(first) = from.first() else {
        return;
    };
    if test(first.as_str()) {
        return;
    }
    if pull_passing_part_to_front(from, &test, stop_at_marker) {
        return;
    }
    // Stray punctuation may be hiding a usable code.
    from.remove_non_alphanumeric();
    if pull_passing_part_to_front(from, &test, stop_at_marker) {
        return;
    }
    let Some(part) = from.iter().find(|p| !p.eq_ignore_ascii_case("x")).cloned() else {
        return;
    };
    private_use.append(&part);
    from.remove_all(&part);
    from.insert_at_start(placeholder);
}

fn pull_passing_part_to_front(
    from: &mut Subtag,
    test: impl Fn(&str) -> bool,
    stop_at_marker: bool,
) -> bool {
    let parts: Vec<SmolStr> = from.iter().cloned().collect();
    for part in parts {
        if stop_at_marker && part.eq_ignore_ascii_case("x") {
            return false;
        }
        if test(part.as_str()) {
            from.remove_all(&part);
            from.insert_at_start(&part);
            return true;
        }
    }
    false
}

/// Move every token of `from` that `should_move` accepts onto the end of
/// `to`, in order.
fn move_matching(from: &mut Subtag, to: &mut Subtag, should_move: impl Fn(&str) -> bool) {
    let moved: Vec<SmolStr> = from
        .iter()
        .filter(|part| should_move(part.as_str()))
        .cloned()
        .collect();
    for part in moved {
        to.append(&part);
        from.remove_all(&part);
    }
}

/// Like [`move_matching`], but the first token `keeps_place` accepts is left
/// alone even when `should_move` would also accept it.
fn move_matching_keeping_first(
    from: &mut Subtag,
    to: &mut Subtag,
    should_move: impl Fn(&str) -> bool,
    keeps_place: impl Fn(&str) -> bool,
) {
    let parts: Vec<SmolStr> = from.iter().cloned().collect();
    let mut have_first = false;
    for part in parts {
        if !have_first && keeps_place(part.as_str()) {
            have_first = true;
            continue;
        }
        if !should_move(part.as_str()) {
            continue;
        }
        to.append(&part);
        from.remove_all(&part);
    }
}

fn to_upper_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
