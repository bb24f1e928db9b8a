/*!
 * Tests for language code utilities
 */

use anyhow::Result;
use npc_translator::language_utils::{
    get_language_name, is_auto, normalize_to_part1_or_part2t, validate_source_language,
    validate_target_language,
};

#[test]
fn test_normalize_withBibliographicCode_shouldReturnTwoLetterCode() -> Result<()> {
    assert_eq!(normalize_to_part1_or_part2t("fre")?, "fr");
    assert_eq!(normalize_to_part1_or_part2t("ger")?, "de");
    assert_eq!(normalize_to_part1_or_part2t("ITA")?, "it");
    Ok(())
}

#[test]
fn test_normalize_withInvalidCode_shouldFail() {
    assert!(normalize_to_part1_or_part2t("xx").is_err());
    assert!(normalize_to_part1_or_part2t("english").is_err());
}

#[test]
fn test_isAuto_shouldIgnoreCaseAndWhitespace() {
    assert!(is_auto("auto"));
    assert!(is_auto(" AUTO "));
    assert!(!is_auto("en"));
}

#[test]
fn test_validateLanguages_shouldTreatAutoBySide() {
    assert!(validate_source_language("Auto").is_ok());
    assert!(validate_target_language("Auto").is_err());
    assert!(validate_target_language("  ").is_err());
    assert!(validate_target_language("es").is_ok());
}

#[test]
fn test_getLanguageName_withThreeLetterCode_shouldResolve() -> Result<()> {
    assert_eq!(get_language_name("deu")?, "German");
    assert_eq!(get_language_name("fr")?, "French");
    Ok(())
}
