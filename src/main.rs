// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::{BufReader, Read, Write};
use std::fs::File;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use npc_translator::app_config::{self, Config};
use npc_translator::app_controller::Controller;
use npc_translator::file_utils::FileManager;
use npc_translator::TranslationError;

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
    /// Translate text, files or stdin
    Translate(TranslateArgs),

    /// Show or clear the translation history
    History {
        /// Number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Delete every history entry
        #[arg(long)]
        clear: bool,
    },

    /// Manage glossary entries applied after translation
    Glossary {
        #[command(subcommand)]
        action: GlossaryAction,
    },

    /// Generate shell completions for npc-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum GlossaryAction {
    /// List entries, optionally for one target language
    List {
        #[arg(short, long)]
        target_language: Option<String>,
    },
    /// Add an entry
    Add {
        term: String,
        translation: String,
        #[arg(short, long)]
        target_language: String,
    },
    /// Replace an entry
    Update {
        id: i64,
        term: String,
        translation: String,
        #[arg(short, long)]
        target_language: String,
    },
    /// Delete an entry
    Delete {
        id: i64,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate; read from stdin when neither text nor files are given
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Text file or directory whose content is appended to the input
    #[arg(short, long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Source language code (e.g., 'auto', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'it', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Write the translation to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

/// npc-translator - free text translation through public services
///
/// Splits the input into chunks and translates each one through Google,
/// MyMemory and Lingva in order, falling back to the next service when one
/// fails.
#[derive(Parser, Debug)]
#[command(name = "npc-translator")]
#[command(version)]
#[command(about = "Multi-provider text translation tool")]
#[command(long_about = "npc-translator translates text through a chain of public translation services.

EXAMPLES:
    npc-translator translate \"Hello world\" -t it      # Translate to Italian
    npc-translator translate -f notes.txt -s en -t de  # Translate a file
    cat mail.txt | npc-translator translate -t fr      # Translate stdin
    npc-translator history --limit 5                   # Show recent translations
    npc-translator glossary add Cloud Nuvola -t it     # Force a term translation
    npc-translator completions bash > npc.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Tag and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
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
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set through max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "npc-translator", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Translate(args) => {
            if let Some(source_language) = &args.source_language {
                config.source_language = source_language.clone();
            }
            if let Some(target_language) = &args.target_language {
                config.target_language = target_language.clone();
            }
            config.validate().context("Configuration validation failed")?;

            let controller = Controller::with_config(config)?;
            run_translate(&controller, args).await
        }
        Commands::History { limit, clear } => {
            config.validate().context("Configuration validation failed")?;
            let controller = Controller::with_config(config)?;

            if clear {
                let removed = controller.clear_history().await?;
                info!("Removed {} history entries", removed);
                return Ok(());
            }

            let entries = controller.history(limit).await?;
            if entries.is_empty() {
                println!("No translations recorded yet.");
            }
            for entry in entries {
                println!(
                    "#{} [{}] {} -> {}\n  {}\n  {}",
                    entry.id,
                    entry.created_at,
                    entry.source_language,
                    entry.target_language,
                    entry.original_preview(),
                    entry.translated_preview()
                );
            }
            Ok(())
        }
        Commands::Glossary { action } => {
            config.validate().context("Configuration validation failed")?;
            let controller = Controller::with_config(config)?;
            run_glossary(&controller, action).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// Load the configuration, writing a default one when the file is missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

async fn run_translate(controller: &Controller, args: TranslateArgs) -> Result<()> {
    let text = if args.text.is_none() && args.files.is_empty() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        Some(buffer)
    } else {
        args.text.clone()
    };

    let inputs = Controller::collect_input(text, &args.files);
    for failure in &inputs.failures {
        warn!("Skipped {}: {}", failure.path.display(), failure.error);
    }
    if inputs.text.trim().is_empty() {
        return Err(anyhow!("Nothing to translate"));
    }

    match controller.load_cache().await {
        Ok(count) => debug!("Loaded {} cached translations", count),
        Err(e) => warn!("Offline cache unavailable: {:#}", e),
    }

    let service = controller.service();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            service.cancel_all();
        }
    });

    let result = controller
        .translate_text(&inputs.text, None, None, !args.no_progress)
        .await;
    interrupt.abort();

    if let Err(e) = controller.persist_cache().await {
        warn!("Failed to save the offline cache: {:#}", e);
    }

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.downcast_ref::<TranslationError>().is_some_and(TranslationError::is_cancelled) {
                warn!("Translation cancelled");
                return Ok(());
            }
            return Err(e);
        }
    };

    match &args.output {
        Some(path) => {
            FileManager::write_to_file(path, &outcome.text)?;
            info!("Success: {:?}", path);
        }
        None => println!("{}", outcome.text),
    }

    Ok(())
}

async fn run_glossary(controller: &Controller, action: GlossaryAction) -> Result<()> {
    match action {
        GlossaryAction::List { target_language } => {
            let entries = controller.glossary(target_language.as_deref()).await?;
            if entries.is_empty() {
                println!("Glossary is empty.");
            }
            for entry in entries {
                println!("#{} [{}] {} => {}", entry.id, entry.target_language, entry.term, entry.translation);
            }
        }
        GlossaryAction::Add { term, translation, target_language } => {
            let id = controller.add_glossary_entry(&term, &translation, &target_language).await?;
            info!("Added glossary entry #{}", id);
        }
        GlossaryAction::Update { id, term, translation, target_language } => {
            if !controller.update_glossary_entry(id, &term, &translation, &target_language).await? {
                return Err(anyhow!("No glossary entry with id {}", id));
            }
            info!("Updated glossary entry #{}", id);
        }
        GlossaryAction::Delete { id } => {
            if !controller.delete_glossary_entry(id).await? {
                return Err(anyhow!("No glossary entry with id {}", id));
            }
            info!("Deleted glossary entry #{}", id);
        }
    }
    Ok(())
}
