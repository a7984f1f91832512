//! Checksums for schema migrations and seed downloads

use sha2::{Digest, Sha256};

/// Calculate SHA256 hash and return as lowercase hex string
pub fn sha256_hex(data: &str) -> String {
    sha256_hex_bytes(data.as_bytes())
}

/// SHA256 of raw bytes as lowercase hex
pub fn sha256_hex_bytes(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
