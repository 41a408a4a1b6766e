//! Credential records stored inside a vault.
//!
//! `VaultEntry` keeps the password encrypted: the `password` field holds
//! the text produced by `crypto::seal`, stored as raw bytes.  The JSON
//! field names and the base64 form of byte fields match the files written
//! by earlier releases, so both old and new vaults read the same way.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use super::codec::{base64_decode, base64_encode, Mode};
use crate::crypto::keys::AesKey;
use crate::crypto::{open_with, seal};
use crate::errors::{LockboxError, Result};

/// A single credential record.
///
/// `name` is the lookup key but is not required to be unique; identity
/// across edits is by name and position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    /// Source the credentials belong to (e.g. "github").  Case-sensitive.
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Username", default)]
    pub username: String,

    /// Sealed password text, as bytes.
    #[serde(
        rename = "Password",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode",
        default
    )]
    pub password: Vec<u8>,

    #[serde(rename = "Notes", default)]
    pub notes: String,

    /// Epoch milliseconds of the last create/update.
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: i64,
}

impl VaultEntry {
    /// Build an entry, sealing `password` under `key`.
    pub fn new(
        name: &str,
        username: &str,
        password: &str,
        notes: &str,
        updated_at: i64,
        key: &AesKey,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            username: username.to_string(),
            password: seal_password(key, password)?,
            notes: notes.to_string(),
            updated_at,
        })
    }

    /// Decrypt the password.
    ///
    /// Legacy entries sealed a hex-encoded password with hex framing, so
    /// they need one extra hex decode after opening.
    pub fn reveal_password(&self, key: &AesKey, mode: Mode) -> Result<Zeroizing<String>> {
        let text = std::str::from_utf8(&self.password)
            .map_err(|_| LockboxError::Malformed(format!("password of '{}' is not text", self.name)))?;

        let mut opened = Zeroizing::new(open_with(key, text, mode.encoding())?);

        if mode == Mode::Legacy {
            let inner = std::str::from_utf8(&opened)
                .map_err(|_| LockboxError::Malformed("legacy password is not hex".into()))?;
            let decoded = hex::decode(inner)
                .map_err(|e| LockboxError::Malformed(format!("legacy password hex: {e}")))?;
            opened = Zeroizing::new(decoded);
        }

        into_text(std::mem::take(&mut *opened))
    }

    /// Replace the password, sealing it under `key`.
    pub fn set_password(&mut self, key: &AesKey, password: &str) -> Result<()> {
        self.password = seal_password(key, password)?;
        Ok(())
    }
}

/// Plaintext mirror of [`VaultEntry`], used for export and import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct DecryptedEntry {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Username", default)]
    pub username: String,

    #[serde(rename = "Password", default)]
    pub password: String,

    #[serde(rename = "Notes", default)]
    pub notes: String,

    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: i64,
}

impl DecryptedEntry {
    /// Seal the password and produce a storable entry.
    pub fn seal(&self, key: &AesKey) -> Result<VaultEntry> {
        VaultEntry::new(
            &self.name,
            &self.username,
            &self.password,
            &self.notes,
            self.updated_at,
            key,
        )
    }
}

fn seal_password(key: &AesKey, password: &str) -> Result<Vec<u8>> {
    seal(key, password.as_bytes()).map(String::into_bytes)
}

fn into_text(bytes: Vec<u8>) -> Result<Zeroizing<String>> {
    String::from_utf8(bytes).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        LockboxError::Malformed("password is not valid UTF-8".into())
    })
}
