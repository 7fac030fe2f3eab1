use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Locale utilities
///
/// Locales are a base ISO 639 language code, optionally followed by
/// script/region subtags (`en`, `pt-BR`, `zh-Hant`). The base code is
/// validated against ISO 639-1 or ISO 639-2; subtags are only checked for
/// shape.
static LOCALE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{2,8})*$").expect("locale pattern is valid")
});

/// Map an ISO 639-2/B code to its ISO 639-2/T form
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Resolve the base language subtag of a locale
fn base_language(base: &str) -> Option<Language> {
    match base.len() {
        2 => Language::from_639_1(base),
        3 => Language::from_639_3(part2b_to_part2t(base).unwrap_or(base)),
        _ => None,
    }
}

/// Normalize a locale: ISO 639-1 language where one exists, `-` separators,
/// uppercase two-letter regions and title-case four-letter scripts
pub fn normalize_locale(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if !LOCALE_PATTERN.is_match(trimmed) {
        return Err(anyhow!("Invalid locale: '{}'", code));
    }

    let mut parts = trimmed.split(['-', '_']);
    let base = parts.next().unwrap_or_default().to_lowercase();
    let language = base_language(&base)
        .ok_or_else(|| anyhow!("Unknown language code: '{}'", code))?;

    // Three-letter codes collapse to the two-letter one when it exists
    let mut normalized = language.to_639_1().map(str::to_string).unwrap_or(base);
    for subtag in parts {
        normalized.push('-');
        match subtag.len() {
            2 => normalized.push_str(&subtag.to_uppercase()),
            4 => {
                let lower = subtag.to_lowercase();
                let mut chars = lower.chars();
                if let Some(first) = chars.next() {
                    normalized.extend(first.to_uppercase());
                    normalized.push_str(chars.as_str());
                }
            }
            _ => normalized.push_str(subtag),
        }
    }

    Ok(normalized)
}

/// Validate a locale code
pub fn validate_locale(code: &str) -> Result<()> {
    normalize_locale(code).map(|_| ())
}

/// Check if two locales designate the same language and region
///
/// `en` and `eng` match, `pt` and `pt-BR` do not.
pub fn locales_match(code1: &str, code2: &str) -> bool {
    fn canonical(code: &str) -> Option<String> {
        let normalized = normalize_locale(code).ok()?;
        let (base, rest) = match normalized.split_once('-') {
            Some((base, rest)) => (base.to_string(), Some(rest.to_string())),
            None => (normalized.clone(), None),
        };
        let part3 = base_language(&base)?.to_639_3().to_string();
        Some(match rest {
            Some(rest) => format!("{}-{}", part3, rest),
            None => part3,
        })
    }

    match (canonical(code1), canonical(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => code1.trim() == code2.trim() && !code1.trim().is_empty(),
    }
}

/// Get the English language name for a locale
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_locale(code)?;
    let base = normalized.split('-').next().unwrap_or_default();
    let lang = base_language(base)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Split a comma separated locale list, trimming entries and dropping blanks
/// and duplicates while keeping the configured order
pub fn parse_locale_list(list: &str) -> Vec<String> {
    let mut locales: Vec<String> = Vec::new();
    for locale in list.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !locales.iter().any(|known| known == locale) {
            locales.push(locale.to_string());
        }
    }
    locales
}
