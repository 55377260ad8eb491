//! # Formats Module
//!
//! Serialization and format handling for directory snapshots.
//!
//! This module contains:
//! - Binary snapshot format (postcard + header)
//! - Optional BLAKE3 checksum for export verification (`crypto-hash`)
//!
//! Note: File I/O operations remain in the app layer (apps/gradia).
//! This module only handles format conversion (pure transformations).

mod persistence;

pub use persistence::*;
