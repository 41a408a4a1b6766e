//! Cryptographic primitives for Lockbox.
//!
//! This module provides:
//! - AES-256-GCM seal/open with nonce framing and text encoding (`encryption`)
//! - PBKDF2-HMAC-SHA256 key derivation from seed + passphrase + salt (`kdf`)
//! - Key, seed and key-manager types (`keys`)
//! - bcrypt hashing of the master passphrase (`password`)
//! - Random password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;
pub mod password;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{open, open_with, seal, seal_with, Encoding};
pub use generator::generate_password;
pub use kdf::{derive_key, Salt};
pub use keys::{AesKey, KeyManager, Seed};
pub use password::{hash_password, verify_password};
