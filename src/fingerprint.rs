//! File fingerprinting collaborator
//!
//! The binary movie-hash algorithm itself lives outside this crate; callers
//! hand a [`MovieHasher`] to the fingerprint search and the session only
//! renders the result for the wire.

use std::path::Path;

use crate::error::Result;

/// Pure file-fingerprint function: path → fixed-width 64-bit hash
///
/// Implementations must not mutate the file. The hash is transmitted as
/// 16-digit lowercase hexadecimal, see [`to_hex`].
pub trait MovieHasher {
    /// Compute the fingerprint of the file at `path`
    fn fingerprint(&self, path: &Path) -> Result<u64>;
}

impl<F> MovieHasher for F
where
    F: Fn(&Path) -> Result<u64>,
{
    fn fingerprint(&self, path: &Path) -> Result<u64> {
        self(path)
    }
}

/// Render a fingerprint the way the service expects it on the wire
pub fn to_hex(fingerprint: u64) -> String {
    format!("{fingerprint:016x}")
}
