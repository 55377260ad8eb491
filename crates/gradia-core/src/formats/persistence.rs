//! Binary snapshot format for the member directory.
//!
//! Layout: 4-byte magic, 2-byte little-endian format version, then the
//! postcard-encoded [`Directory`]. Decoding rejects unknown magic and
//! versions before touching the payload.

use crate::directory::Directory;
use crate::Error;

/// Magic bytes at the start of every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"GRDA";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

const HEADER_LEN: usize = 6;

/// Encode a directory into snapshot bytes.
pub fn encode_snapshot(directory: &Directory) -> Result<Vec<u8>, Error> {
    let payload = postcard::to_stdvec(directory)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode snapshot bytes back into a directory.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Directory, Error> {
    if bytes.len() < HEADER_LEN || bytes[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(Error::BadHeader);
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != SNAPSHOT_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    let directory = postcard::from_bytes(&bytes[HEADER_LEN..])?;
    Ok(directory)
}

/// Hex-encoded BLAKE3 checksum of snapshot bytes, for export verification.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn snapshot_checksum(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================
