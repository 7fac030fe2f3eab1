/*!
 * Tests for locale utilities
 */

use lingolink::language_utils::{get_language_name, locales_match, normalize_locale, validate_locale};

#[test]
fn test_getLanguageName_withTwoAndThreeLetterCodes_shouldResolve() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert_eq!(get_language_name("es-MX").unwrap(), "Spanish");
}

#[test]
fn test_getLanguageName_withUnknownCode_shouldFail() {
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_validateLocale_shouldAcceptRegionsAndScripts() {
    assert!(validate_locale("en").is_ok());
    assert!(validate_locale("pt-BR").is_ok());
    assert!(validate_locale("zh_Hans").is_ok());
    assert!(validate_locale("").is_err());
    assert!(validate_locale("e").is_err());
}

#[test]
fn test_normalizeLocale_shouldBeStableForGroupKeys() {
    // Group maps are keyed by the normalized form
    for input in ["es", "ES", " es ", "spa", "SPA"] {
        assert_eq!(normalize_locale(input).unwrap(), "es");
    }
    assert_eq!(normalize_locale("en_gb").unwrap(), "en-GB");
}

#[test]
fn test_localesMatch_withBibliographicCodes_shouldMatch() {
    assert!(locales_match("de", "ger"));
    assert!(locales_match("deu", "ger"));
    assert!(!locales_match("de", "de-AT"));
}
