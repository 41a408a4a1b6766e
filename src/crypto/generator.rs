//! Random password generation.

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{LockboxError, Result};

/// Characters always available to the generator.
const BASE_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Special characters used when the caller does not pick their own.
pub const DEFAULT_SPECIAL_CHARS: &str = "!@#$%^&*";

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 256;

/// Generate a password of `length` characters drawn uniformly from
/// `[a-zA-Z0-9]` plus `special`.
pub fn generate_password(length: usize, special: &str) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(LockboxError::CommandFailed(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {length})"
        )));
    }

    let mut charset: Vec<char> = BASE_CHARSET.chars().collect();
    for c in special.chars() {
        if c.is_control() || c.is_whitespace() {
            return Err(LockboxError::CommandFailed(
                "special characters cannot include whitespace or control characters".into(),
            ));
        }
        if !charset.contains(&c) {
            charset.push(c);
        }
    }

    let mut rng = rand::rng();
    let password: String = (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect();

    Ok(Zeroizing::new(password))
}
