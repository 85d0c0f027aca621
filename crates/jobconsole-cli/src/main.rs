//! Job Console CLI
//!
//! Thin wrapper around jobconsole-core for writing to and reading from a
//! console store on disk.
//!
//! ## Usage
//!
//! ```bash
//! # Write a line to job 42's console
//! jobconsole write 42 "Fetching sources"
//!
//! # Write a colored line
//! jobconsole write 42 "Tests failed" --color red
//!
//! # Create a progress bar and step it through values
//! jobconsole progress 42 download 0 25 50 100
//!
//! # Print the console of job 42
//! jobconsole show 42
//!
//! # List jobs with a saved console session
//! jobconsole sessions
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jobconsole_core::{read_console, ConsoleColor, JobConsole, RedbStorage, SessionDescriptor};
use tracing::debug;

/// Job Console - streaming job logs into an ordered store
#[derive(Parser)]
#[command(name = "jobconsole")]
#[command(version = "0.1.0")]
#[command(about = "Job Console - write and inspect background job consoles")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Data directory (default: ~/.jobconsole/data)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a line to a job's console
    Write {
        /// Job id
        job: String,
        /// Line text
        message: String,
        /// Text color (e.g. red, darkgreen, #ffff00)
        #[arg(short, long)]
        color: Option<ConsoleColor>,
    },

    /// Create a progress bar and set it to each value in turn
    Progress {
        /// Job id
        job: String,
        /// Progress bar name
        name: String,
        /// Values to report, 0 to 100
        #[arg(required = true)]
        values: Vec<f64>,
        /// Bar color
        #[arg(short, long)]
        color: Option<ConsoleColor>,
    },

    /// Print a job's console
    Show {
        /// Job id
        job: String,
    },

    /// List jobs with a saved console session
    Sessions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    debug!(data_dir = %data_dir.display(), "Opening console store");
    let storage = open_storage(&data_dir)?;

    match cli.command {
        Commands::Write {
            job,
            message,
            color,
        } => {
            let console = open_console(&storage, &job)?;
            console.write_line(&message, color)?;
            save_console(&storage, &job, &console)?;
        }

        Commands::Progress {
            job,
            name,
            values,
            color,
        } => {
            let console = open_console(&storage, &job)?;
            let (first, rest) = values
                .split_first()
                .context("at least one progress value is required")?;

            let bar = console.create_progress_bar(&name, *first, color)?;
            for value in rest {
                bar.set_value(*value)?;
            }
            save_console(&storage, &job, &console)?;
            println!("Progress bar {} ({})", bar.id(), bar.name());
        }

        Commands::Show { job } => {
            let Some(info) = storage.load_session(&job)? else {
                println!("No console for job {}", job);
                return Ok(());
            };

            for line in read_console(&*storage, &info)? {
                match line.progress_value {
                    Some(value) => match &line.progress_name {
                        Some(name) => println!(
                            "+{:.4}s [progress {}] {} {}%",
                            line.time_offset, line.message, name, value
                        ),
                        None => println!(
                            "+{:.4}s [progress {}] {}%",
                            line.time_offset, line.message, value
                        ),
                    },
                    None => println!("+{:.4}s {}", line.time_offset, line.message),
                }
            }
        }

        Commands::Sessions => {
            let jobs = storage.list_sessions()?;
            if jobs.is_empty() {
                println!("No console sessions");
            }
            for job in jobs {
                println!("{}", job);
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Get the default data directory (~/.jobconsole/data)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jobconsole")
        .join("data")
}

fn open_storage(data_dir: &Path) -> Result<Arc<RedbStorage>> {
    let path = data_dir.join("console.redb");
    let storage = RedbStorage::new(&path)
        .with_context(|| format!("Failed to open console store at {}", path.display()))?;
    Ok(Arc::new(storage))
}

/// Attach a writer to the job's saved session, or start a new one.
fn open_console(storage: &Arc<RedbStorage>, job: &str) -> Result<JobConsole> {
    let info = storage
        .load_session(job)?
        .unwrap_or_else(|| SessionDescriptor::for_job(job));

    let console = JobConsole::new(storage.clone());
    console.init(info);
    Ok(console)
}

/// Persist start time and progress counter so the next run resumes them.
fn save_console(storage: &RedbStorage, job: &str, console: &JobConsole) -> Result<()> {
    if let Some(info) = console.descriptor() {
        storage.save_session(job, &info)?;
    }
    Ok(())
}
