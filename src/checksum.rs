//! Content digests for checksum-mode comparison
//!
//! Files are streamed through SHA-256 rather than read into memory, so large
//! files cost time but not RAM.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Read buffer for hashing (64KB).
const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the hex-encoded SHA-256 digest of a file's content.
pub fn file_digest(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the hex-encoded SHA-256 digest of in-memory bytes.
pub fn bytes_digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
