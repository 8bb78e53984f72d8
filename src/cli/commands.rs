use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, warn};

use crate::cache::SegmentCache;
use crate::commands::CommandHandler;
use crate::config::Config;
use crate::indexer::ArchiveIndexer;
use crate::models::ContainerKind;
use crate::parsers::{ContainerProbe, DurationProbe};
use crate::timestamps::parse_query_time;

#[derive(Parser)]
#[command(name = "rec-archive")]
#[command(version = "0.1.0")]
#[command(about = "Query recorded media segments by capture time", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $REC_ARCHIVE_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum level of log messages written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List segments captured strictly between two times, as JSON
    Query {
        /// Range start, "YYYY-MM-DD HH:MM:SS" in the configured timezone
        #[arg(long)]
        begin: String,
        /// Range end, "YYYY-MM-DD HH:MM:SS" in the configured timezone
        #[arg(long)]
        end: String,
        /// Archive root (overrides save_path from the configuration)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Sort by capture time instead of archive walk order
        #[arg(long)]
        sort: bool,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the duration read from one segment file
    Duration { file: PathBuf },
    /// Answer JSON commands read from stdin, one per line
    Serve {
        /// Archive root (overrides save_path from the configuration)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only JSON replies
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Query { begin, end, root, sort, pretty }) => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(root) = root {
                config.save_path = root;
            }
            config.sort_by_capture_time |= sort;
            query(&config, &begin, &end, pretty)?;
        }
        Some(Commands::Duration { file }) => {
            show_duration(&file)?;
        }
        Some(Commands::Serve { root }) => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(root) = root {
                config.save_path = root;
            }
            serve(&config)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn query(config: &Config, begin: &str, end: &str, pretty: bool) -> Result<()> {
    let zone = config.zone()?;
    let begin = parse_query_time(begin, &zone).context("Invalid --begin")?;
    let end = parse_query_time(end, &zone).context("Invalid --end")?;

    let cache = Arc::new(SegmentCache::new(config.cache_capacity()?));
    let indexer = ArchiveIndexer::from_config(config, cache)?;
    let segments = indexer.query(&config.save_path, begin, end)?;

    let output = if pretty {
        serde_json::to_string_pretty(&segments)
    } else {
        serde_json::to_string(&segments)
    }
    .context("Failed to serialize segments")?;
    println!("{}", output);

    Ok(())
}

fn show_duration(path: &Path) -> Result<()> {
    let kind = ContainerKind::from_path(path)
        .with_context(|| format!("Unsupported container: {}", path.display()))?;
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let duration = match ContainerProbe.probe(kind, &mut file) {
        Ok(duration) => duration,
        Err(e) => {
            warn!("Duration unavailable for {}: {:#}", path.display(), e);
            0
        }
    };
    println!("{}", duration);

    Ok(())
}

fn serve(config: &Config) -> Result<()> {
    let handler = CommandHandler::from_config(config)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = handler.handle_message(&line);
        let payload = serde_json::to_string(&reply).context("Failed to serialize reply")?;
        writeln!(stdout, "{}", payload).context("Failed to write reply")?;
        stdout.flush().context("Failed to flush reply")?;
    }

    Ok(())
}
