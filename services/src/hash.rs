//! Content hashing helpers.

use sha1::{Digest, Sha1};

/// Compute a lowercase hex SHA-1 of a string.
pub fn sha1_hex(s: &str) -> String {
    let mut h = Sha1::new();
    h.update(s.as_bytes());
    format!("{:x}", h.finalize())
}
