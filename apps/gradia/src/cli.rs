//! # CLI Module
//!
//! Command implementations for the Gradia binary.
//!
//! Each command is a plain function so integration tests can drive them
//! without spawning the binary. The directory store lives in a single file:
//! either a binary snapshot (`file` backend) or a redb database (`redb`
//! backend).

use gradia_core::completion::Competition;
use gradia_core::formats::{decode_snapshot, encode_snapshot};
use gradia_core::palette::{badge_color, progress_bar_color};
use gradia_core::{Date, Directory, FieldSignal, FieldValue, MemberId, RedbDirectory};
use serde_json::json;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Filesystem or network I/O failed.
    Io(std::io::Error),
    /// The core engine reported an error.
    Core(gradia_core::Error),
    /// JSON parsing or serialization failed.
    Json(serde_json::Error),
    /// Unknown backend or file format name.
    InvalidFormat(String),
    /// `init` target already exists and `--force` was not given.
    AlreadyExists(PathBuf),
    /// Referenced member has no record in the directory.
    UnknownMember(u64),
    /// A line in a text ingest file did not parse.
    MalformedLine { line: usize, content: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Core(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::InvalidFormat(what) => write!(f, "{what}"),
            Self::AlreadyExists(path) => {
                write!(f, "{} already exists (use --force to overwrite)", path.display())
            }
            Self::UnknownMember(id) => write!(f, "no profile for member {id}"),
            Self::MalformedLine { line, content } => {
                write!(f, "malformed signal on line {line}: {content:?}")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Core(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<gradia_core::Error> for CliError {
    fn from(err: gradia_core::Error) -> Self {
        Self::Core(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

// =============================================================================
// BACKENDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    File,
    Redb,
}

fn parse_backend(backend: &str) -> Result<Backend, CliError> {
    match backend {
        "file" => Ok(Backend::File),
        "redb" => Ok(Backend::Redb),
        other => Err(CliError::InvalidFormat(format!("unknown backend: {other}"))),
    }
}

/// Load the directory, or start a fresh one when the store is absent.
pub fn load_or_create_directory(db_path: &Path, backend: &str) -> Result<Directory, CliError> {
    let backend = parse_backend(backend)?;
    if !db_path.exists() {
        return Ok(Directory::new());
    }
    match backend {
        Backend::File => {
            let bytes = fs::read(db_path)?;
            Ok(decode_snapshot(&bytes)?)
        }
        Backend::Redb => Ok(RedbDirectory::open(db_path)?.load()?),
    }
}

/// Persist the directory. The backend is inferred from the path: a `.redb`
/// extension selects the redb store, anything else a snapshot file.
pub fn save_directory(directory: &Directory, db_path: &Path) -> Result<(), CliError> {
    if db_path.extension().is_some_and(|ext| ext == "redb") {
        RedbDirectory::create(db_path)?.store(directory)?;
    } else {
        fs::write(db_path, encode_snapshot(directory)?)?;
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty directory store.
pub fn cmd_init(db_path: &Path, backend: &str, force: bool) -> Result<(), CliError> {
    let backend = parse_backend(backend)?;
    if db_path.exists() {
        if !force {
            return Err(CliError::AlreadyExists(db_path.to_path_buf()));
        }
        fs::remove_file(db_path)?;
    }

    match backend {
        Backend::File => fs::write(db_path, encode_snapshot(&Directory::new())?)?,
        Backend::Redb => {
            RedbDirectory::create(db_path)?;
        }
    }

    tracing::info!(path = %db_path.display(), "initialized directory store");
    Ok(())
}

// =============================================================================
// INGEST COMMAND
// =============================================================================

/// Field names whose text-format values are split on commas into lists.
const LIST_FIELDS: [&str; 3] = ["interests", "hobbies", "languages_spoken"];

fn parse_text_signals(input: &str) -> Result<Vec<FieldSignal>, CliError> {
    let mut signals = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.splitn(3, ':');
        let signal = match (parts.next(), parts.next(), parts.next()) {
            (Some(id), Some(field), Some(value)) => {
                let member_id = id.parse::<u64>().map_err(|_| CliError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                })?;
                let value = if LIST_FIELDS.contains(&field) {
                    FieldValue::list(value.split(',').map(str::trim))
                } else {
                    FieldValue::text(value)
                };
                FieldSignal::new(MemberId(member_id), field, value)
            }
            _ => {
                return Err(CliError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        };
        signals.push(signal);
    }
    Ok(signals)
}

/// Ingest profile field signals from a file.
pub fn cmd_ingest(
    db_path: &Path,
    backend: &str,
    json_output: bool,
    file: &Path,
    format: &str,
) -> Result<(), CliError> {
    let input = fs::read_to_string(file)?;
    let signals: Vec<FieldSignal> = match format {
        "json" => serde_json::from_str(&input)?,
        "text" => parse_text_signals(&input)?,
        other => {
            return Err(CliError::InvalidFormat(format!(
                "unknown ingest format: {other}"
            )))
        }
    };

    let mut directory = load_or_create_directory(db_path, backend)?;
    directory.ingest_sequence(&signals);
    save_directory(&directory, db_path)?;

    tracing::info!(applied = signals.len(), "ingested field signals");
    if json_output {
        println!(
            "{}",
            json!({
                "applied": signals.len(),
                "member_count": directory.member_count(),
            })
        );
    } else {
        println!(
            "applied {} signals ({} members)",
            signals.len(),
            directory.member_count()
        );
    }
    Ok(())
}

// =============================================================================
// IMPORT COMMAND (competitions)
// =============================================================================

/// Import competition listings from a JSON file.
pub fn cmd_import(
    db_path: &Path,
    backend: &str,
    json_output: bool,
    file: &Path,
) -> Result<(), CliError> {
    let input = fs::read_to_string(file)?;
    let competitions: Vec<Competition> = serde_json::from_str(&input)?;

    let mut directory = load_or_create_directory(db_path, backend)?;
    for competition in &competitions {
        directory.insert_competition(competition.clone());
    }
    save_directory(&directory, db_path)?;

    tracing::info!(imported = competitions.len(), "imported competitions");
    if json_output {
        println!(
            "{}",
            json!({
                "imported": competitions.len(),
                "competition_count": directory.competition_count(),
            })
        );
    } else {
        println!(
            "imported {} competitions ({} total)",
            competitions.len(),
            directory.competition_count()
        );
    }
    Ok(())
}

// =============================================================================
// EVALUATE COMMAND
// =============================================================================

/// Evaluate one member's membership tier.
pub fn cmd_evaluate(
    db_path: &Path,
    backend: &str,
    json_output: bool,
    member_id: u64,
) -> Result<(), CliError> {
    let directory = load_or_create_directory(db_path, backend)?;
    let result = directory
        .evaluate_member(MemberId(member_id))
        .ok_or(CliError::UnknownMember(member_id))?;

    if json_output {
        println!(
            "{}",
            json!({
                "member_id": member_id,
                "result": result,
                "badge_color": badge_color(result.level),
                "progress_bar_color": progress_bar_color(result.level),
            })
        );
    } else {
        print!("{}", result.to_text());
        println!(
            "badge: {}  progress bar: {}",
            badge_color(result.level),
            progress_bar_color(result.level)
        );
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Print directory counters and the tier census.
pub fn cmd_status(db_path: &Path, backend: &str, json_output: bool) -> Result<(), CliError> {
    let directory = load_or_create_directory(db_path, backend)?;
    let census = directory.tier_census();

    if json_output {
        println!(
            "{}",
            json!({
                "member_count": directory.member_count(),
                "competition_count": directory.competition_count(),
                "members_at_level": census.members_at_level,
            })
        );
    } else {
        println!("members:      {}", directory.member_count());
        println!("competitions: {}", directory.competition_count());
        for level in 1..=4u8 {
            println!("level {level}:      {}", census.at_level(level));
        }
    }
    Ok(())
}

// =============================================================================
// SWEEP COMMAND
// =============================================================================

fn today_utc() -> Result<Date, CliError> {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    Ok(Date::parse(&today)?)
}

/// Run the competition completion sweep.
pub fn cmd_sweep(
    db_path: &Path,
    backend: &str,
    json_output: bool,
    today: Option<&str>,
) -> Result<(), CliError> {
    let today = match today {
        Some(raw) => Date::parse(raw)?,
        None => today_utc()?,
    };

    let mut directory = load_or_create_directory(db_path, backend)?;
    let outcome = directory.sweep(&today);
    save_directory(&directory, db_path)?;

    tracing::info!(
        completed = outcome.completed.len(),
        unchanged = outcome.unchanged,
        date = %today,
        "completion sweep finished"
    );
    if json_output {
        println!(
            "{}",
            json!({
                "date": today.as_str(),
                "completed": outcome.completed,
                "unchanged": outcome.unchanged,
            })
        );
    } else {
        println!(
            "swept {}: {} completed, {} unchanged",
            today,
            outcome.completed.len(),
            outcome.unchanged
        );
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export the directory to a JSON document or a binary snapshot.
pub fn cmd_export(db_path: &Path, backend: &str, out: &Path, format: &str) -> Result<(), CliError> {
    let directory = load_or_create_directory(db_path, backend)?;

    let bytes = match format {
        "json" => serde_json::to_vec_pretty(&directory)?,
        "snapshot" => encode_snapshot(&directory)?,
        other => {
            return Err(CliError::InvalidFormat(format!(
                "unknown export format: {other}"
            )))
        }
    };
    fs::write(out, &bytes)?;

    tracing::info!(path = %out.display(), bytes = bytes.len(), "exported directory");
    println!("wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}
