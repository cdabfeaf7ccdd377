//! Interprets tags written under the legacy private-use convention.
//!
//! One third-party tool wrote every component of a tag after the `x`
//! marker, expecting script, region, and variant content in there to be
//! treated as first class. This module rewrites such a tag into canonical
//! components: real script/region/variant move to their own slots, the
//! language code it buried in the private use area stays private use, and
//! the reserved `qaa` code stands in as the language when anything
//! registry-visible remains.

use smol_str::SmolStr;

use crate::registry::{self, well_known};
use crate::tag::error::TagError;
use crate::tag::rfc5646::Rfc5646Tag;
use crate::tag::subtag::Subtag;

/// Canonical components recovered from a legacy tag.
///
/// `variant` carries the registered-variant half and the private use half
/// combined, the way migrated records store them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpretedTag {
    pub language: SmolStr,
    pub script: SmolStr,
    pub region: SmolStr,
    pub variant: SmolStr,
}

impl InterpretedTag {
    /// The serialized form of the recovered components.
    pub fn complete_tag(&self) -> String {
        let mut out = String::new();
        for piece in [&self.language, &self.script, &self.region, &self.variant] {
            if piece.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('-');
            }
            out.push_str(piece);
        }
        out
    }

    /// Assemble a validated tag from the recovered components.
    pub fn to_tag(&self) -> Result<Rfc5646Tag, TagError> {
        let (variant, private_use) = split_variant_and_private_use(&self.variant);
        Rfc5646Tag::new(
            &self.language,
            &self.script,
            &self.region,
            &variant,
            &private_use,
        )
    }
}

/// Split a combined variant string at its first `x` token into the
/// registered-variant half and the private use half. Neither half keeps
/// the marker itself.
pub fn split_variant_and_private_use(combined: &str) -> (String, String) {
    let tokens = Subtag::parse_parts(combined);
    match tokens.iter().position(|t| t.eq_ignore_ascii_case("x")) {
        Some(marker) => (join(&tokens[..marker]), join(&tokens[marker + 1..])),
        None => (join(&tokens), String::new()),
    }
}

/// Join a registered-variant half and a private use half back into the
/// combined form, inserting the `x` marker when the private use half does
/// not already carry one.
pub fn concatenate_variant_and_private_use(variant: &str, private_use: &str) -> String {
    if private_use.is_empty() {
        return variant.to_string();
    }
    let marked = if private_use.len() >= 2 && private_use[..2].eq_ignore_ascii_case("x-") {
        private_use.to_string()
    } else {
        format!("x-{private_use}")
    };
    if variant.is_empty() {
        marked
    } else {
        format!("{variant}-{marked}")
    }
}

/// Rewrite legacy components into canonical ones.
///
/// The variant is split at its first `x` token; `x` tokens are stripped
/// from both the private use half and the language; the remaining language
/// tokens are unioned into the private use sequence (first seen wins,
/// case-insensitive). The language becomes `qaa` when a script, region, or
/// registered variant survives, and stays empty for a pure private use
/// result.
pub fn convert_components(
    language: &str,
    script: &str,
    region: &str,
    variant: &str,
) -> InterpretedTag {
    let (real_variant, private_use_half) = split_variant_and_private_use(variant);
    let mut private_use = Subtag::new();
    for token in tokens_without_marker(&private_use_half)
        .iter()
        .chain(tokens_without_marker(language).iter())
    {
        if !private_use.contains(token) {
            private_use.append(token);
        }
    }
    let language = if !script.is_empty() || !region.is_empty() || !real_variant.is_empty() {
        SmolStr::new(well_known::UNLISTED_LANGUAGE)
    } else {
        SmolStr::default()
    };
    InterpretedTag {
        language,
        script: SmolStr::new(script),
        region: SmolStr::new(region),
        variant: SmolStr::new(concatenate_variant_and_private_use(
            &real_variant,
            &private_use.to_string(),
        )),
    }
}

/// Decompose a raw legacy tag string and rewrite it.
///
/// The first token must be the `x` marker. Token 1 continues the language;
/// later tokens are classified as script, region, or variant content, and
/// a script or region appearing after a later-priority subtag fails with
/// [`TagError::MisplacedSubtag`].
pub fn convert_tag(text: &str) -> Result<InterpretedTag, TagError> {
    let mut language = String::new();
    let mut script = "";
    let mut region = "";
    let mut variant = String::new();
    for (position, token) in text.split('-').enumerate() {
        if position == 0 {
            if !token.eq_ignore_ascii_case("x") {
                return Err(TagError::NotALegacyTag(text.to_string()));
            }
            language.push_str(token);
        } else if position == 1 {
            language.push('-');
            language.push_str(token);
        } else if registry::is_valid_script_code(token) {
            if !region.is_empty() || !variant.is_empty() {
                return Err(TagError::misplaced(token, text));
            }
            script = token;
        } else if registry::is_valid_region_code(token) {
            if !variant.is_empty() {
                return Err(TagError::misplaced(token, text));
            }
            region = token;
        } else {
            if !variant.is_empty() {
                variant.push('-');
            }
            variant.push_str(token);
        }
    }
    Ok(convert_components(&language, script, region, &variant))
}

fn tokens_without_marker(text: &str) -> Vec<SmolStr> {
    Subtag::parse_parts(text)
        .into_iter()
        .filter(|token| !token.eq_ignore_ascii_case("x"))
        .collect()
}

fn join(tokens: &[SmolStr]) -> String {
    tokens
        .iter()
        .map(SmolStr::as_str)
        .collect::<Vec<_>>()
        .join("-")
}
