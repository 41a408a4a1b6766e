use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LockboxError, Result};
use crate::keyring::SeedId;

/// Name of the encrypted session/config record inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "LOCKBOX_HOME";

/// Runtime settings, loaded from `<data_dir>/lockbox.toml`.
///
/// Every field has a sensible default so Lockbox works out-of-the-box
/// without any settings file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the vault created by `init`.
    #[serde(default = "default_vault_name")]
    pub default_vault_name: String,

    /// Session window given to a fresh config, in minutes.
    #[serde(default = "default_timeout_minutes")]
    pub default_timeout_minutes: u32,

    /// Keyring service that holds the seed.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Keyring account that holds the seed.
    #[serde(default = "default_keyring_account")]
    pub keyring_account: String,

    /// Directory (relative to the data dir) where backups are written.
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_name() -> String {
    "pass.json".to_string()
}

fn default_timeout_minutes() -> u32 {
    30
}

fn default_keyring_service() -> String {
    crate::keyring::DEFAULT_SERVICE.to_string()
}

fn default_keyring_account() -> String {
    crate::keyring::DEFAULT_ACCOUNT.to_string()
}

fn default_backup_dir() -> String {
    "backups".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_vault_name: default_vault_name(),
            default_timeout_minutes: default_timeout_minutes(),
            keyring_service: default_keyring_service(),
            keyring_account: default_keyring_account(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl Settings {
    /// Name of the settings file we look for in the data directory.
    const FILE_NAME: &'static str = "lockbox.toml";

    /// Load settings from `<data_dir>/lockbox.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(Self::FILE_NAME);

        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&settings_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LockboxError::ConfigError(format!(
                "Failed to parse {}: {e}",
                settings_path.display()
            ))
        })?;

        if settings.default_vault_name.trim().is_empty()
            || settings.default_vault_name.contains(['/', '\\'])
        {
            return Err(LockboxError::ConfigError(format!(
                "default_vault_name must be a plain file name, got '{}'",
                settings.default_vault_name
            )));
        }

        Ok(settings)
    }

    /// Path of the encrypted config record.
    pub fn config_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Path of a vault file.
    ///
    /// Example: `data_dir/pass.json`
    pub fn vault_path(&self, data_dir: &Path, vault_name: &str) -> PathBuf {
        data_dir.join(vault_name)
    }

    /// Directory holding vault backups.
    pub fn backup_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.backup_dir)
    }

    /// Session window for a fresh config, in milliseconds.
    pub fn default_timeout_ms(&self) -> i64 {
        i64::from(self.default_timeout_minutes) * 60 * 1000
    }

    /// Keyring identifiers of the seed.
    pub fn seed_id(&self) -> SeedId {
        SeedId::new(&self.keyring_service, &self.keyring_account)
    }
}

/// The data directory used when neither `--data-dir` nor `LOCKBOX_HOME` is
/// given: `~/.local/lockbox`.
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".local").join("lockbox"))
        .ok_or_else(|| LockboxError::ConfigError("cannot determine home directory".into()))
}

// ── Tests ────────────────────────────────────────────────────────────
