//! Migration checksums
//!
//! Each applied migration is recorded with the SHA-256 of its SQL text so an
//! edited migration is detected on the next start.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the migration SQL
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}
