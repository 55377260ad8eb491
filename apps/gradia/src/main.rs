//! # Gradia Binary
//!
//! CLI entry point: directory store commands plus the HTTP server.

use clap::{Parser, Subcommand};
use gradia::api;
use gradia::cli::{self, CliError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gradia",
    version,
    about = "Membership tier engine for the Gradia competition platform"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty directory store.
    Init {
        /// Path of the store to create.
        db: PathBuf,
        /// Store backend: "file" (binary snapshot) or "redb".
        #[arg(long, default_value = "file")]
        backend: String,
        /// Overwrite an existing store.
        #[arg(long)]
        force: bool,
    },
    /// Ingest profile field signals from a file.
    Ingest {
        db: PathBuf,
        /// Signals file (JSON array or id:field:value lines).
        file: PathBuf,
        /// Input format: "json" or "text".
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, default_value = "file")]
        backend: String,
        /// Print machine-readable JSON output.
        #[arg(long)]
        json: bool,
    },
    /// Import competition listings from a JSON file.
    Import {
        db: PathBuf,
        file: PathBuf,
        #[arg(long, default_value = "file")]
        backend: String,
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one member's membership tier.
    Evaluate {
        db: PathBuf,
        member_id: u64,
        #[arg(long, default_value = "file")]
        backend: String,
        #[arg(long)]
        json: bool,
    },
    /// Show directory counters and the tier census.
    Status {
        db: PathBuf,
        #[arg(long, default_value = "file")]
        backend: String,
        #[arg(long)]
        json: bool,
    },
    /// Mark ended competitions as completed.
    Sweep {
        db: PathBuf,
        /// Sweep date (YYYY-MM-DD); defaults to the current UTC date.
        #[arg(long)]
        today: Option<String>,
        #[arg(long, default_value = "file")]
        backend: String,
        #[arg(long)]
        json: bool,
    },
    /// Export the directory to JSON or a binary snapshot.
    Export {
        db: PathBuf,
        out: PathBuf,
        /// Output format: "json" or "snapshot".
        #[arg(long, default_value = "snapshot")]
        format: String,
        #[arg(long, default_value = "file")]
        backend: String,
    },
    /// Serve the HTTP API.
    Serve {
        db: PathBuf,
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
        /// API key required for mutating endpoints (none = open).
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long, default_value = "file")]
        backend: String,
    },
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Init { db, backend, force } => cli::cmd_init(&db, &backend, force),
        Command::Ingest {
            db,
            file,
            format,
            backend,
            json,
        } => cli::cmd_ingest(&db, &backend, json, &file, &format),
        Command::Import {
            db,
            file,
            backend,
            json,
        } => cli::cmd_import(&db, &backend, json, &file),
        Command::Evaluate {
            db,
            member_id,
            backend,
            json,
        } => cli::cmd_evaluate(&db, &backend, json, member_id),
        Command::Status { db, backend, json } => cli::cmd_status(&db, &backend, json),
        Command::Sweep {
            db,
            today,
            backend,
            json,
        } => cli::cmd_sweep(&db, &backend, json, today.as_deref()),
        Command::Export {
            db,
            out,
            format,
            backend,
        } => cli::cmd_export(&db, &backend, &out, &format),
        Command::Serve {
            db,
            addr,
            api_key,
            backend,
        } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(&db, &backend, &addr, api_key))
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
