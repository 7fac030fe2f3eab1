use anyhow::{anyhow, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
/// This module handles the settings blob: provider credentials, the default
/// source locale, the list of target locales and request security settings.
/// It is loaded once per request and passed down explicitly.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// API key for the translation engine
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Translation engine base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Locale assumed for records that have no language yet
    #[serde(default = "default_source_locale")]
    pub default_source_locale: String,

    /// Comma separated list of locales offered as translation targets
    #[serde(default = "default_target_locales")]
    pub target_locales: String,

    /// Trade accuracy for latency on the provider side
    #[serde(default)]
    pub fast_mode: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of fields sent in one provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Word budget of one provider request
    #[serde(default = "default_ideal_batch_item_size")]
    pub ideal_batch_item_size: usize,

    /// SQLite database path, platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Edit reference template, `{id}` is replaced with the record id
    #[serde(default = "default_edit_link_template")]
    pub edit_link_template: String,

    /// Secret used to derive request nonces
    #[serde(default = "String::new")]
    pub nonce_secret: String,

    /// Nonce lifetime in seconds
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Lingo.dev localization engine
    #[default]
    Lingo,
    // @provider: Offline echo, returns the source text unchanged
    Echo,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Lingo => "Lingo.dev",
            Self::Echo => "Echo",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Lingo => "lingo".to_string(),
            Self::Echo => "echo".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lingo" => Ok(Self::Lingo),
            "echo" => Ok(Self::Echo),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_endpoint() -> String {
    "https://engine.lingo.dev".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_target_locales() -> String {
    "es,fr,de".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    25
}

fn default_ideal_batch_item_size() -> usize {
    250
}

fn default_edit_link_template() -> String {
    "post.php?post={id}&action=edit".to_string()
}

fn default_nonce_lifetime_secs() -> u64 {
    86_400 // one day, like the host platform's nonces
}

/// Generate a fresh random nonce secret
pub fn generate_nonce_secret() -> String {
    let mut rng = rand::rng();
    format!("{:032x}{:032x}", rng.random::<u128>(), rng.random::<u128>())
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_locale(&self.default_source_locale)
            .context("Invalid default source locale")?;

        let targets = self.target_locale_list();
        if targets.is_empty() {
            return Err(anyhow!("At least one target locale must be configured"));
        }
        for locale in &targets {
            language_utils::validate_locale(locale)
                .with_context(|| format!("Invalid target locale '{}'", locale))?;
        }

        if self.provider == TranslationProvider::Lingo {
            if self.api_key.trim().is_empty() {
                return Err(anyhow!(
                    "Lingo.dev API Key is not set in settings. Please configure it and save changes."
                ));
            }
            url::Url::parse(&self.endpoint)
                .with_context(|| format!("Invalid endpoint URL: {}", self.endpoint))?;
        }

        if self.batch_size == 0 || self.ideal_batch_item_size == 0 {
            return Err(anyhow!("Batch sizes must be greater than zero"));
        }

        if !self.edit_link_template.contains("{id}") {
            return Err(anyhow!("Edit link template must contain '{{id}}'"));
        }

        if self.nonce_secret.trim().is_empty() {
            return Err(anyhow!("Nonce secret must not be empty"));
        }

        Ok(())
    }

    /// Target locales, trimmed with blanks dropped
    pub fn target_locale_list(&self) -> Vec<String> {
        language_utils::parse_locale_list(&self.target_locales)
    }

    /// Build the edit reference for a record
    pub fn edit_reference(&self, record_id: crate::content::RecordId) -> String {
        self.edit_link_template.replace("{id}", &record_id.to_string())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Load the configuration, writing a default one first when the file is
    /// missing and filling in a nonce secret when the file lacks one
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let mut config = Self::from_file(path)?;
            if config.nonce_secret.trim().is_empty() {
                log::warn!("Config file '{}' has no nonce secret, generating one.", path.display());
                config.nonce_secret = generate_nonce_secret();
                config.save(path)?;
            }
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: TranslationProvider::default(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            default_source_locale: default_source_locale(),
            target_locales: default_target_locales(),
            fast_mode: false,
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            ideal_batch_item_size: default_ideal_batch_item_size(),
            database_path: None,
            edit_link_template: default_edit_link_template(),
            nonce_secret: generate_nonce_secret(),
            nonce_lifetime_secs: default_nonce_lifetime_secs(),
            log_level: LogLevel::default(),
        }
    }
}

/// Where a request reads its settings from
///
/// Implementations are consulted once per request so that saved changes
/// apply to the next request without restarting anything.
pub trait ConfigSource: Send + Sync {
    /// Load the current settings
    fn load(&self) -> Result<Config>;
}

/// Settings kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Config> {
        Config::from_file(&self.path)
    }
}

/// A fixed settings value
impl ConfigSource for Config {
    fn load(&self) -> Result<Config> {
        Ok(self.clone())
    }
}
