use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating and normalizing the
/// ISO 639-1 (2-letter) and ISO 639-2 (3-letter) codes accepted on the
/// command line. The public translation endpoints expect 2-letter codes
/// where one exists, plus the `auto` pseudo-code for source detection.
/// Pseudo-code requesting source language detection
pub const AUTO_DETECT: &str = "auto";

/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Whether a code is the detection pseudo-code
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// Resolve a 2- or 3-letter code to an isolang language
fn resolve(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code)
            .or_else(|| part2b_to_part2t(&normalized_code).and_then(Language::from_639_3)),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Validate a source language, which may be `auto`
pub fn validate_source_language(code: &str) -> Result<()> {
    if is_auto(code) {
        return Ok(());
    }
    validate_language_code(code)
}

/// Validate a target language; `auto` is not a valid target
pub fn validate_target_language(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(anyhow!("Target language must not be empty"));
    }
    if is_auto(code) {
        return Err(anyhow!("Target language cannot be '{}'", AUTO_DETECT));
    }
    validate_language_code(code)
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists; `auto` is kept
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    if is_auto(code) {
        return Ok(AUTO_DETECT.to_string());
    }

    let lang = resolve(code).ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    if is_auto(code) {
        return Ok("Auto-detect".to_string());
    }

    let lang = resolve(code).ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;
    Ok(lang.to_name().to_string())
}
