//! # Gradia Core
//!
//! The deterministic membership tier engine for the Gradia competition
//! platform.
//!
//! This crate is THE LOGIC: a pure projection from profile records onto
//! membership levels (1-4), the member directory that holds those records,
//! and the competition completion sweep. The app layer (apps/gradia) owns
//! all I/O, networking, and scheduling.
//!
//! Architectural constraints:
//! - No async, no network dependencies
//! - `BTreeMap` only, no `HashMap`, no floats, no randomness
//! - Evaluation is total: malformed input degrades, it never faults

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod completion;
pub mod directory;
pub mod formats;
pub mod labels;
pub mod palette;
pub mod profile;
pub mod storage;
pub mod tier;

pub use completion::{Competition, CompetitionStatus, Date, SweepOutcome};
pub use directory::{Directory, FieldSignal, TierCensus};
pub use profile::{FieldValue, ProfileRecord, Section};
pub use storage::RedbDirectory;
pub use tier::{evaluate, TierResult, MAX_LEVEL, MIN_LEVEL};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a registered member.
///
/// Issued by the identity provider; opaque to the tier engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct MemberId(pub u64);

/// Identifier of a listed competition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct CompetitionId(pub u64);

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the fallible core surfaces (storage, snapshot codec, dates).
///
/// Tier evaluation itself is total and never returns an error.
#[derive(Debug, Error)]
pub enum Error {
    /// An embedded database operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] redb::Error),

    /// Binary encode/decode of a directory or record failed.
    #[error("codec error: {0}")]
    Codec(#[from] postcard::Error),

    /// Snapshot bytes do not start with the expected magic header.
    #[error("not a gradia snapshot (bad header)")]
    BadHeader,

    /// Snapshot was written by an unknown format version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u16),

    /// A calendar date was not valid ISO-8601 `YYYY-MM-DD`.
    #[error("invalid calendar date: {0:?}")]
    InvalidDate(String),
}

// redb surfaces one error enum per operation family; funnel them all
// through `redb::Error` so callers only see `Error::Storage`.
impl From<redb::DatabaseError> for Error {
    fn from(err: redb::DatabaseError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::TransactionError> for Error {
    fn from(err: redb::TransactionError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::TableError> for Error {
    fn from(err: redb::TableError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::StorageError> for Error {
    fn from(err: redb::StorageError) -> Self {
        Self::Storage(err.into())
    }
}

impl From<redb::CommitError> for Error {
    fn from(err: redb::CommitError) -> Self {
        Self::Storage(err.into())
    }
}
