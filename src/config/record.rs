//! The encrypted session/config record and the session gate.
//!
//! The record holds the bcrypt hash of the master passphrase, the vault
//! file name, the time of the last successful login and the session
//! window.  It is stored like a vault: one sealed JSON blob.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::keys::AesKey;
use crate::errors::Result;
use crate::vault::codec::{base64_decode, base64_encode, decode_json, encode_json, Mode};
use crate::vault::file;

/// Session window given to configs that do not carry one: 30 minutes.
pub const DEFAULT_TIMEOUT_MS: i64 = 30 * 60 * 1000;

fn default_timeout() -> i64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// bcrypt hash of the master passphrase.
    #[serde(
        rename = "MasterPassword",
        serialize_with = "base64_encode",
        deserialize_with = "base64_decode",
        default
    )]
    pub master_password_hash: Vec<u8>,

    #[serde(rename = "VaultName", default)]
    pub vault_name: String,

    /// Epoch milliseconds of the last successful authentication.
    #[serde(rename = "LastVisited", default)]
    pub last_visited: i64,

    /// Session window in milliseconds.
    #[serde(rename = "Timeout", default = "default_timeout")]
    pub timeout: i64,
}

impl Config {
    pub fn new(master_password_hash: Vec<u8>, vault_name: &str, now: i64, timeout: i64) -> Self {
        Self {
            master_password_hash,
            vault_name: vault_name.to_string(),
            last_visited: now,
            timeout,
        }
    }

    /// Record a successful authentication at `now`.
    pub fn touch(&mut self, now: i64) {
        self.last_visited = now;
    }

    /// See [`is_session_valid`].
    pub fn is_active(&self, now: i64) -> bool {
        is_session_valid(self, now)
    }

    /// Epoch milliseconds at which the session ends.
    pub fn expires_at(&self) -> i64 {
        self.last_visited.saturating_add(self.timeout)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("master_password_hash", &"<redacted>")
            .field("vault_name", &self.vault_name)
            .field("last_visited", &self.last_visited)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// True while `now` is inside the session window, boundary included.
pub fn is_session_valid(config: &Config, now: i64) -> bool {
    now <= config.expires_at()
}

/// Serialize and seal a config record.
pub fn encode_config(config: &Config, key: &AesKey) -> Result<String> {
    encode_json(config, key, "config")
}

/// Open and parse a config record.
pub fn decode_config(text: &str, key: &AesKey, mode: Mode) -> Result<Config> {
    decode_json(text, key, mode, "config")
}

/// Read and decode the config file at `path`.
pub fn load_config(path: &Path, key: &AesKey, mode: Mode) -> Result<Config> {
    decode_config(&file::read_text(path)?, key, mode)
}

/// Encode `config` and write it to `path` atomically.
pub fn save_config(path: &Path, config: &Config, key: &AesKey) -> Result<()> {
    let text = encode_config(config, key)?;
    file::write_atomic(path, text.as_bytes())
}
