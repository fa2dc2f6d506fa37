use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexicon::dictionary::config::{PrintFormat, SessionConfig};
use lexicon::dictionary::loader::BulkLoader;
use lexicon::dictionary::session::Session;
use lexicon::Dictionary;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexicon", version)]
#[command(about = "AVL-backed word dictionary", long_about = None)]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where bulk loads write their timing CSV
    #[arg(long)]
    timing_log: Option<PathBuf>,

    /// Disable the bulk-load timing CSV
    #[arg(long, default_value_t = false, conflicts_with = "timing_log")]
    no_timing_log: bool,

    /// Output format of the print command
    #[arg(long, value_enum)]
    format: Option<PrintFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive command session (default)
    Session {
        /// Read commands from this file instead of standard input
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Bulk-load a word file and report the result
    Load {
        /// Whitespace-delimited word source
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command {
        None => run_session(config, None),
        Some(Commands::Session { script }) => run_session(config, script.as_deref()),
        Some(Commands::Load { file, json }) => run_load(&config, &file, json),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexicon=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// File settings first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(path) = &cli.timing_log {
        config.timing_log = Some(path.clone());
    }
    if cli.no_timing_log {
        config.timing_log = None;
    }
    if let Some(format) = cli.format {
        config.print_format = format;
    }
    Ok(config)
}

fn run_session(config: SessionConfig, script: Option<&Path>) -> Result<()> {
    let stdout = io::stdout().lock();
    match script {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?;
            Session::new(BufReader::new(file), stdout, config).run()?;
        }
        None => Session::new(io::stdin().lock(), stdout, config).run()?,
    }
    Ok(())
}

fn run_load(config: &SessionConfig, file: &Path, json: bool) -> Result<()> {
    let mut dict = Dictionary::new();
    let report = BulkLoader::new(config.placeholder_meaning.clone())
        .load_path(&mut dict, file, config.timing_log.as_deref())
        .with_context(|| format!("Failed to load {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Loaded {} words from {} ({} new, {} duplicates) in {:.2?}",
            report.tokens,
            file.display(),
            report.inserted,
            report.duplicates,
            report.elapsed
        );
        println!("Tree height: {}", dict.height());
        if let Some(log) = &config.timing_log {
            println!("Log saved to {}", log.display());
        }
    }
    Ok(())
}
