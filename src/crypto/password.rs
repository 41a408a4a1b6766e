//! Master-passphrase hashing with bcrypt.
//!
//! The bcrypt hash is stored in the config record and only answers
//! "did the user type the right passphrase?".  It is never used as key
//! material; the AES key comes from `kdf::derive_key`.

use crate::errors::{LockboxError, Result};

/// Hash a passphrase with bcrypt at the library default cost.
pub fn hash_password(passphrase: &[u8]) -> Result<Vec<u8>> {
    hash_password_with_cost(passphrase, bcrypt::DEFAULT_COST)
}

/// Hash with an explicit bcrypt cost (4..=31).
pub fn hash_password_with_cost(passphrase: &[u8], cost: u32) -> Result<Vec<u8>> {
    bcrypt::hash(passphrase, cost)
        .map(String::into_bytes)
        .map_err(|e| LockboxError::PasswordHashFailed(e.to_string()))
}

/// Compare a passphrase against a stored bcrypt hash.
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(hash: &[u8], passphrase: &[u8]) -> bool {
    let Ok(hash) = std::str::from_utf8(hash) else {
        return false;
    };
    bcrypt::verify(passphrase, hash).unwrap_or(false)
}
