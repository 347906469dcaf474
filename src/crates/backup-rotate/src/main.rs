//! backup-rotate - Count, list and rotate dated backups
//!
//! Backups are recognized by a date in their file name (`DD.MM.YYYY` or
//! `YYYY-MM-DD`). Files without one are never touched.

mod config;

use anyhow::{Context, Result};
use backup_rotation::{Bucket, FsDeleter, Reference, RetentionEngine, RotationError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::{Config, Overrides};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backup-rotate")]
#[command(about = "Count, list and rotate dated backups in a directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Run verbosely
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Tracing log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Path to a YAML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Date backups are aged against (defaults to today)
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the dated backups in a directory
    Count {
        /// Directory to analyze
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,
    },
    /// List the dated backups in a directory
    Ls {
        /// Directory to analyze
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,
    },
    /// Delete backups that fall outside the retention policy
    Delete {
        /// Directory to analyze
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Show what would be deleted, but do not delete anything
        #[arg(short = 'x', long)]
        dry_run: bool,

        /// Days to keep backups around
        #[arg(short, long, value_name = "DAYS", allow_negative_numbers = true)]
        keep: Option<i64>,

        /// Also keep the newest backup of every year, month, week or day
        #[arg(long, value_name = "BUCKET")]
        keep_last_per: Vec<Bucket>,
    },
}

impl Commands {
    fn overrides(&self) -> Overrides {
        match self {
            Commands::Count { directory } | Commands::Ls { directory } => Overrides {
                directory: directory.clone(),
                ..Default::default()
            },
            Commands::Delete {
                directory,
                keep,
                keep_last_per,
                ..
            } => Overrides {
                directory: directory.clone(),
                keep_days: *keep,
                keep_last_per: keep_last_per.clone(),
            },
        }
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else {
        cli.log_level.as_str()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = Config::load(cli.config.as_deref(), cli.command.overrides())?;
    let reference = cli.today.map(Reference).unwrap_or_else(Reference::today);

    info!(
        "Analyzing directory {} as of {}",
        config.directory.display(),
        reference
    );

    let engine = RetentionEngine::from_directory(&config.directory, reference)
        .with_context(|| format!("Scanning {}", config.directory.display()))?;

    match cli.command {
        Commands::Count { .. } => {
            println!(
                "{} backups found in {}.",
                engine.count(),
                config.directory.display()
            );
        }
        Commands::Ls { .. } => {
            for name in engine.records().names() {
                println!("{}", name);
            }
        }
        Commands::Delete { dry_run: true, .. } => {
            for record in &engine.removable_with(&config.retention) {
                println!("{}", record.name());
            }
        }
        Commands::Delete { dry_run: false, .. } => {
            match engine.purge_with(&config.retention, &mut FsDeleter) {
                Ok(report) => {
                    println!(
                        "Deleted {} backups from {}.",
                        report.deleted.len(),
                        config.directory.display()
                    );
                }
                Err(RotationError::PartialPurge(report)) => {
                    for failure in &report.failed {
                        error!("{}", failure);
                    }
                    println!(
                        "Deleted {} backups from {}.",
                        report.deleted.len(),
                        config.directory.display()
                    );
                    anyhow::bail!(RotationError::PartialPurge(report));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
