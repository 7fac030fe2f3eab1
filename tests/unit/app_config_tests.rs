/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use tempfile::TempDir;

use lingolink::app_config::{Config, ConfigSource, FileConfigSource, TranslationProvider};

fn valid_config() -> Config {
    Config {
        api_key: "key".to_string(),
        ..Config::default()
    }
}

#[test]
fn test_default_shouldMatchDocumentedValues() {
    let config = Config::default();
    assert_eq!(config.provider, TranslationProvider::Lingo);
    assert_eq!(config.endpoint, "https://engine.lingo.dev");
    assert_eq!(config.default_source_locale, "en");
    assert_eq!(config.batch_size, 25);
    assert_eq!(config.ideal_batch_item_size, 250);
    assert!(!config.fast_mode);
    assert_eq!(config.nonce_secret.len(), 64);
    assert!(config.nonce_secret.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_validate_withoutApiKey_shouldReturnSettingsMessage() {
    let error = Config::default().validate().unwrap_err();
    assert_eq!(
        error.to_string(),
        "Lingo.dev API Key is not set in settings. Please configure it and save changes."
    );
}

#[test]
fn test_validate_withEchoProvider_shouldNotNeedApiKey() {
    let config = Config {
        provider: TranslationProvider::Echo,
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadLocales_shouldFail() {
    let config = Config {
        target_locales: "es, xx-??".to_string(),
        ..valid_config()
    };
    assert!(config.validate().is_err());

    let config = Config {
        target_locales: " , ".to_string(),
        ..valid_config()
    };
    assert!(config.validate().is_err());

    let config = Config {
        default_source_locale: "english".to_string(),
        ..valid_config()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withoutIdPlaceholder_shouldFail() {
    let config = Config {
        edit_link_template: "post.php".to_string(),
        ..valid_config()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_targetLocaleList_shouldTrimAndDropBlanks() {
    let config = Config {
        target_locales: " es, ,fr ,, de,es ".to_string(),
        ..Config::default()
    };
    assert_eq!(config.target_locale_list(), vec!["es", "fr", "de"]);
}

#[test]
fn test_editReference_shouldSubstituteId() {
    assert_eq!(Config::default().edit_reference(42), "post.php?post=42&action=edit");
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{"api_key": "abc", "fast_mode": true, "target_locales": "it"}"#)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.api_key, "abc");
    assert!(config.fast_mode);
    assert_eq!(config.target_locale_list(), vec!["it"]);
    assert_eq!(config.endpoint, "https://engine.lingo.dev");
    Ok(())
}

#[test]
fn test_loadOrCreate_shouldWriteDefaultsOnce() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(created.nonce_secret, loaded.nonce_secret);
    Ok(())
}

#[test]
fn test_loadOrCreate_withoutNonceSecret_shouldGenerateAndPersistOne() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{"provider":"echo"}"#)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.provider, TranslationProvider::Echo);
    assert_eq!(loaded.nonce_secret.len(), 64);

    let reread = FileConfigSource::new(&path).load()?;
    assert_eq!(reread.nonce_secret, loaded.nonce_secret);
    assert!(reread.validate().is_ok());
    Ok(())
}

#[test]
fn test_fileConfigSource_shouldSeeSavedChanges() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    valid_config().save(&path)?;

    let source = FileConfigSource::new(&path);
    assert!(!source.load()?.fast_mode);

    let mut changed = Config::from_file(&path)?;
    changed.fast_mode = true;
    changed.save(&path)?;
    assert!(source.load()?.fast_mode);
    Ok(())
}

#[test]
fn test_translationProvider_fromStr() {
    assert_eq!("LINGO".parse::<TranslationProvider>().unwrap(), TranslationProvider::Lingo);
    assert_eq!("echo".parse::<TranslationProvider>().unwrap(), TranslationProvider::Echo);
    assert!("openai".parse::<TranslationProvider>().is_err());
}
