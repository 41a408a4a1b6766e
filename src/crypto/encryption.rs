//! AES-256-GCM authenticated encryption with text framing.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext, then text-encodes the whole buffer so
//! it can live in a JSON/text file.  `open` reverses the steps.
//!
//! Layout before text encoding:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! Current files use standard base64; legacy files used lowercase hex.
//! The caller always states which one it expects.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::keys::AesKey;
use crate::errors::{LockboxError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Text encoding applied to `nonce || ciphertext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Base64,
    Hex,
}

impl Encoding {
    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => BASE64.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }

    fn decode(self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            Self::Base64 => BASE64
                .decode(text)
                .map_err(|e| LockboxError::Malformed(format!("base64 decode: {e}"))),
            Self::Hex => {
                hex::decode(text).map_err(|e| LockboxError::Malformed(format!("hex decode: {e}")))
            }
        }
    }

    /// Shortest possible text for a sealed empty payload.
    pub fn min_sealed_len(self) -> usize {
        let raw = NONCE_LEN + TAG_LEN;
        match self {
            Self::Base64 => raw.div_ceil(3) * 4,
            Self::Hex => raw * 2,
        }
    }
}

/// Encrypt `plaintext` and return base64 text of `nonce || ciphertext`.
pub fn seal(key: &AesKey, plaintext: &[u8]) -> Result<String> {
    seal_with(key, plaintext, Encoding::Base64)
}

/// Decrypt base64 text produced by `seal`.
pub fn open(key: &AesKey, text: &str) -> Result<Vec<u8>> {
    open_with(key, text, Encoding::Base64)
}

/// Encrypt with an explicit text encoding.
pub fn seal_with(key: &AesKey, plaintext: &[u8], encoding: Encoding) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LockboxError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Never reuse a nonce under the same key.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| LockboxError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&ciphertext);
    Ok(encoding.encode(&framed))
}

/// Decrypt text with an explicit encoding.
///
/// Decoding problems and short inputs are `Malformed`; a tag that does
/// not verify (wrong key or tampered bytes) is `AuthenticationFailed`.
/// No plaintext is returned unless the tag verifies.
pub fn open_with(key: &AesKey, text: &str, encoding: Encoding) -> Result<Vec<u8>> {
    let framed = encoding.decode(text)?;

    if framed.len() < NONCE_LEN + TAG_LEN {
        return Err(LockboxError::Malformed(format!(
            "sealed payload is {} bytes, need at least {}",
            framed.len(),
            NONCE_LEN + TAG_LEN
        )));
    }

    let (nonce_bytes, ciphertext) = framed.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| LockboxError::Malformed(format!("invalid key length: {e}")))?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| LockboxError::AuthenticationFailed)
}
