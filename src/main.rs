// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use lingolink::app_config::{self, Config, ConfigSource, FileConfigSource, TranslationProvider};
use lingolink::app_controller::{ApiResponse, Caller, Controller, TEST_STRING_ACTION, TRANSLATE_RECORD_ACTION};
use lingolink::content::{ContentStore, NewRecord, RecordStatus};
use lingolink::providers::ConfiguredProviderFactory;
use lingolink::{language_utils, SqliteStore};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Lingo,
    Echo,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Lingo => TranslationProvider::Lingo,
            CliTranslationProvider::Echo => TranslationProvider::Echo,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Create a content record
    Add {
        /// Record title
        #[arg(long)]
        title: String,

        /// Record body
        #[arg(long, default_value = "")]
        body: String,

        /// Record excerpt
        #[arg(long)]
        excerpt: Option<String>,

        /// Record author
        #[arg(long)]
        author: Option<String>,

        /// Language tag of the record (e.g., 'en')
        #[arg(long)]
        language: Option<String>,

        /// Publication status (draft, pending, private, publish)
        #[arg(long, default_value = "draft")]
        status: String,
    },

    /// List content records
    List,

    /// Show a record with its language and translations
    Show {
        /// Record identifier
        id: i64,
    },

    /// Translate a record, creating or updating its linked translation
    Translate {
        /// Source record identifier
        id: i64,

        /// Target language code (e.g., 'es', 'fr', 'pt-BR')
        #[arg(short, long)]
        target_locale: String,

        /// Print the JSON reply instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Translate a single string without touching any record
    TestString {
        /// Text to translate
        text: String,

        /// Target language code (e.g., 'es', 'fr', 'pt-BR')
        #[arg(short, long)]
        target_locale: String,

        /// Print the JSON reply instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Delete a record
    Delete {
        /// Record identifier
        id: i64,
    },

    /// Generate shell completions for lingolink
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lingolink - linked machine translation of content records
///
/// Translates content records through Lingo.dev and keeps every translation
/// linked to its original and its siblings.
#[derive(Parser, Debug)]
#[command(name = "lingolink")]
#[command(version)]
#[command(about = "Linked machine translation of content records")]
#[command(long_about = "lingolink translates content records and keeps a locale -> record map on every record of a translation group.

EXAMPLES:
    lingolink init                                  # Write a default conf.json
    lingolink add --title Hello --body World        # Create a record
    lingolink translate 1 -t es                     # Create or update the Spanish translation
    lingolink -p echo translate 1 -t fr             # Offline run, copies the text unchanged
    lingolink show 1                                # Language and translations of a record
    lingolink test-string 'Good morning' -t de      # Translate a single string
    lingolink completions bash > lingolink.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    lingo - Lingo.dev localization engine (requires API key)
    echo  - Offline provider returning the source text")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,
}

/// Settings file with the command line overrides applied on every load
struct CliConfigSource {
    file: FileConfigSource,
    provider: Option<TranslationProvider>,
}

impl ConfigSource for CliConfigSource {
    fn load(&self) -> Result<Config> {
        let mut config = self.file.load()?;
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        Ok(config)
    }
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> u8 {
        match level {
            Level::Error => 31,
            Level::Warn => 33,
            Level::Info => 32,
            Level::Debug => 36,
            Level::Trace => 35,
        }
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[1;{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "admin".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lingolink", &mut std::io::stdout());
            Ok(())
        }
        Commands::Init { force } => run_init(&cli.config, force),
        command => {
            let config = Config::load_or_create(&cli.config)?;

            // If log level was not set via command line, update it from config now
            if cli.log_level.is_none() {
                log::set_max_level(LevelFilter::from(&config.log_level));
            }

            let store = Arc::new(SqliteStore::from_config(&config).context("Failed to open content database")?);
            let source = CliConfigSource {
                file: FileConfigSource::new(&cli.config),
                provider: cli.provider.map(Into::into),
            };
            let controller = Controller::new(Arc::new(source), store.clone(), Arc::new(ConfiguredProviderFactory));

            run_command(command, &controller, store.as_ref()).await
        }
    }
}

fn run_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!("Config file already exists: {}. Use --force to overwrite.", path.display()));
    }
    Config::default().save(path)?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn run_command(command: Commands, controller: &Controller, store: &SqliteStore) -> Result<()> {
    let caller = Caller::administrator(current_user());

    match command {
        Commands::Add { title, body, excerpt, author, language, status } => {
            let mut record = NewRecord::draft(title, body).status(status.parse::<RecordStatus>()?);
            if let Some(excerpt) = excerpt {
                record = record.excerpt(excerpt);
            }
            if let Some(author) = author {
                record = record.author(author);
            }

            let language = language.map(|l| language_utils::normalize_locale(&l)).transpose()?;
            let id = store.create_record(record).await?;
            if let Some(language) = language {
                store.set_record_language(id, &language).await?;
            }
            info!("Created record {}", id);
            println!("{}", id);
        }

        Commands::List => {
            let records = store.list_records().await?;
            if records.is_empty() {
                warn!("No records found");
            }
            for record in records {
                println!(
                    "{:>5}  {:<8}  {:<7}  {}",
                    record.id,
                    record.language.as_deref().unwrap_or("-"),
                    record.status.to_string(),
                    record.title
                );
            }
            match store.connection().stats() {
                Ok(stats) => info!(
                    "{} record(s), {} tagged, {} in translation groups",
                    stats.record_count, stats.tagged_count, stats.grouped_count
                ),
                Err(e) => warn!("Could not read database statistics: {}", e),
            }
        }

        Commands::Show { id } => {
            let overview = controller.record_overview(&caller, id).await?;
            println!("Record {}: {}", overview.record_id, overview.title);
            println!("Current Language: {}", overview.language_label);
            if overview.translations.is_empty() {
                println!("Existing Translations: none");
            } else {
                println!("Existing Translations:");
                for entry in &overview.translations {
                    let marker = if entry.is_current {
                        " (current)"
                    } else if entry.is_stale {
                        " (missing)"
                    } else {
                        ""
                    };
                    println!("  {:<8} -> {}{}", entry.locale, entry.record_id, marker);
                }
            }
            println!("Translate to: {}", overview.available_target_locales.join(", "));
        }

        Commands::Translate { id, target_locale, json } => {
            let nonce = controller.issue_nonce(&caller, TRANSLATE_RECORD_ACTION)?;
            let progress = spinner(format!("Translating record {} into {}", id, target_locale));
            let result = controller.translate_record(&caller, &nonce, id, &target_locale).await;
            progress.finish_and_clear();

            if json {
                println!("{}", ApiResponse::from_result(&result).to_json());
                return Ok(());
            }

            let reply = result?;
            info!("{} ({} -> {})", reply.message, reply.source_locale, reply.target_locale);
            for field in reply.fields.iter().filter(|f| !f.translated) {
                warn!("Field '{}' kept its original text", field.name);
            }
            println!("{} record {}: {}", reply.outcome, reply.record_id, reply.edit_reference);
        }

        Commands::TestString { text, target_locale, json } => {
            let nonce = controller.issue_nonce(&caller, TEST_STRING_ACTION)?;
            let progress = spinner(format!("Translating into {}", target_locale));
            let result = controller.test_translate_string(&caller, &nonce, &text, &target_locale).await;
            progress.finish_and_clear();

            if json {
                println!("{}", ApiResponse::from_result(&result).to_json());
                return Ok(());
            }

            let reply = result?;
            if !reply.was_translated {
                warn!("No translation returned, showing the original text");
            }
            println!("{}", reply.translated);
        }

        Commands::Delete { id } => {
            store.delete_record(id).await?;
            info!("Deleted record {}", id);
        }

        Commands::Init { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
