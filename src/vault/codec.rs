//! Vault and config codecs.
//!
//! Both files hold exactly one text blob:
//!
//! ```text
//! base64( nonce[12] || AES-256-GCM( JSON ) || tag[16] )
//! ```
//!
//! The JSON is an array of `VaultEntry` for a vault, a single `Config`
//! object for the config file.  Legacy files use hex instead of base64 and
//! were sealed with the raw environment key.  Which scheme applies is
//! always stated by the caller through [`Mode`]; nothing is auto-detected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::entry::VaultEntry;
use crate::crypto::keys::AesKey;
use crate::crypto::{open_with, seal, Encoding};
use crate::errors::{LockboxError, Result};

/// Keying/encoding scheme of a stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Base64 text, key derived from seed + passphrase + salt.
    #[default]
    Current,
    /// Hex text, key taken directly from the environment.
    Legacy,
}

impl Mode {
    pub fn encoding(self) -> Encoding {
        match self {
            Self::Current => Encoding::Base64,
            Self::Legacy => Encoding::Hex,
        }
    }
}

/// Shortest text a sealed blob can have in the current encoding.
///
/// A vault file shorter than this has never been written and should be
/// treated as empty without trying to decrypt it.
pub fn min_sealed_len() -> usize {
    Encoding::Base64.min_sealed_len()
}

/// True when a file of `len` bytes cannot hold a sealed blob.
pub fn is_unwritten(len: u64) -> bool {
    is_unwritten_in(len, Mode::Current)
}

/// [`is_unwritten`] for text in `mode`'s encoding.
pub fn is_unwritten_in(len: u64, mode: Mode) -> bool {
    len < mode.encoding().min_sealed_len() as u64
}

/// Serialize `entries` (in order) and seal them.
pub fn encode_vault(entries: &[VaultEntry], key: &AesKey) -> Result<String> {
    encode_json(entries, key, "vault")
}

/// Open and parse a vault blob.
///
/// A JSON `null` or `[]` decodes to an empty vault.  A blob too short to
/// hold a nonce and tag fails with `Malformed`.
pub fn decode_vault(text: &str, key: &AesKey, mode: Mode) -> Result<Vec<VaultEntry>> {
    let entries: Option<Vec<VaultEntry>> = decode_json(text, key, mode, "vault")?;
    Ok(entries.unwrap_or_default())
}

pub(crate) fn encode_json<T: Serialize + ?Sized>(
    value: &T,
    key: &AesKey,
    what: &str,
) -> Result<String> {
    let json = Zeroizing::new(
        serde_json::to_vec(value)
            .map_err(|e| LockboxError::SerializationFailed(format!("{what}: {e}")))?,
    );
    seal(key, &json)
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    text: &str,
    key: &AesKey,
    mode: Mode,
    what: &str,
) -> Result<T> {
    let json = Zeroizing::new(open_with(key, text, mode.encoding())?);
    serde_json::from_slice(&json)
        .map_err(|e| LockboxError::SerializationFailed(format!("{what} JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

/// Accepts a base64 string or `null` (an unset byte field).
pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => BASE64.decode(&s).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}
