//! Session orchestration: init, unlock, login and passphrase changes.
//!
//! A [`Session`] knows where the files live and how to reach the seed and
//! salt.  Successful authentication yields an [`Unlocked`] handle holding
//! the decoded config and the derived key for the rest of one command.
//!
//! Clock values are always passed in by the caller as epoch milliseconds.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::record::{decode_config, encode_config, load_config, save_config, Config};
use crate::config::Settings;
use crate::crypto::keys::{AesKey, KeyManager};
use crate::crypto::{hash_password, verify_password, Salt};
use crate::errors::{LockboxError, Result};
use crate::keyring::SeedStore;
use crate::vault::codec::{encode_vault, Mode};
use crate::vault::file;
use crate::vault::migrate::{migrate_legacy, Migrated};
use crate::vault::store::VaultStore;

/// Suffix of the copies kept when legacy files are migrated.
pub const LEGACY_SUFFIX: &str = "legacy";

pub struct Session<'a> {
    data_dir: PathBuf,
    settings: Settings,
    seeds: &'a dyn SeedStore,
    salt: Salt,
}

/// An authenticated config plus the key that opened it.
pub struct Unlocked {
    pub config: Config,
    key: AesKey,
    config_path: PathBuf,
    vault_path: PathBuf,
}

impl<'a> Session<'a> {
    pub fn new(data_dir: &Path, settings: Settings, seeds: &'a dyn SeedStore, salt: Salt) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            settings,
            seeds,
            salt,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_path(&self) -> PathBuf {
        self.settings.config_path(&self.data_dir)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.settings.backup_path(&self.data_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.config_path().exists()
    }

    fn key_manager(&self, passphrase: &[u8]) -> KeyManager {
        KeyManager::new(passphrase, self.settings.seed_id())
    }

    /// Create the seed (if missing), an empty vault and the config.
    ///
    /// Initializing counts as a login: the session starts at `now`.
    pub fn initialize(&self, passphrase: &[u8], now: i64) -> Result<Unlocked> {
        let config_path = self.config_path();
        if config_path.exists() {
            return Err(LockboxError::AlreadyInitialized(config_path));
        }

        file::ensure_dir(&self.data_dir)?;

        let manager = self.key_manager(passphrase);
        manager.initialize_seed(self.seeds)?;
        let key = manager.derive_key(self.seeds, &self.salt)?;

        let vault_name = self.settings.default_vault_name.clone();
        let vault_path = self.settings.vault_path(&self.data_dir, &vault_name);
        let config = Config::new(
            hash_password(passphrase)?,
            &vault_name,
            now,
            self.settings.default_timeout_ms(),
        );

        VaultStore::create(&vault_path, key.clone())?;
        if let Err(e) = save_config(&config_path, &config, &key) {
            // Without a config the fresh vault would block the next init.
            let _ = fs::remove_file(&vault_path);
            return Err(e);
        }

        Ok(Unlocked {
            config,
            key,
            config_path,
            vault_path,
        })
    }

    /// Derive the key and decode the config.
    ///
    /// Does not check the session window; a config that fails to
    /// authenticate means the passphrase is wrong.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<Unlocked> {
        let config_path = self.config_path();
        if !config_path.exists() {
            return Err(LockboxError::NotInitialized(self.data_dir.clone()));
        }

        let key = self.key_manager(passphrase).derive_key(self.seeds, &self.salt)?;
        let config = match load_config(&config_path, &key, Mode::Current) {
            Ok(config) => config,
            Err(LockboxError::AuthenticationFailed) => return Err(LockboxError::LoginFailed),
            Err(e) => return Err(e),
        };

        let vault_path = self.settings.vault_path(&self.data_dir, &config.vault_name);
        Ok(Unlocked {
            config,
            key,
            config_path,
            vault_path,
        })
    }

    /// Verify the passphrase and start a new session at `now`.
    pub fn login(&self, passphrase: &[u8], now: i64) -> Result<Unlocked> {
        let mut unlocked = self.unlock(passphrase)?;
        unlocked.verify(passphrase)?;
        unlocked.config.touch(now);
        unlocked.save_config()?;
        Ok(unlocked)
    }

    /// Unlock and require the session to still be active at `now`.
    pub fn open_active(&self, passphrase: &[u8], now: i64) -> Result<Unlocked> {
        let unlocked = self.unlock(passphrase)?;
        unlocked.require_active(now)?;
        Ok(unlocked)
    }

    /// Switch to a new passphrase.
    ///
    /// The old passphrase is re-checked against the stored hash, every
    /// entry is re-sealed under the new key and both files are replaced
    /// together (see [`commit_vault_and_config`]).
    pub fn change_passphrase(
        &self,
        unlocked: Unlocked,
        old: &[u8],
        new: &[u8],
        now: i64,
    ) -> Result<Unlocked> {
        unlocked.verify(old)?;

        let new_key = self.key_manager(new).derive_key(self.seeds, &self.salt)?;

        let mut vault = unlocked.open_vault()?;
        vault.rekey(new_key.clone())?;

        let mut config = unlocked.config.clone();
        config.master_password_hash = hash_password(new)?;
        config.touch(now);

        let previous_config = file::read_text(&unlocked.config_path)?;
        commit_vault_and_config(
            &unlocked.vault_path,
            &encode_vault(vault.entries(), &new_key)?,
            &unlocked.config_path,
            &encode_config(&config, &new_key)?,
            &previous_config,
        )?;

        Ok(Unlocked {
            config,
            key: new_key,
            config_path: unlocked.config_path,
            vault_path: unlocked.vault_path,
        })
    }

    /// Convert legacy config and vault files to the current scheme.
    ///
    /// The legacy key is the salt itself.  Originals are kept next to the
    /// new files with a `.legacy` suffix.
    pub fn migrate(&self, passphrase: &[u8], now: i64) -> Result<Migrated> {
        let config_path = self.config_path();
        if !config_path.exists() {
            return Err(LockboxError::NotInitialized(self.data_dir.clone()));
        }

        let legacy_key = self.salt.legacy_key();
        let legacy_config = file::read_text(&config_path)?;
        let vault_name = decode_config(&legacy_config, &legacy_key, Mode::Legacy)?.vault_name;
        let vault_path = self.settings.vault_path(&self.data_dir, &vault_name);
        let legacy_vault = if vault_path.exists() {
            file::read_text(&vault_path)?
        } else {
            String::new()
        };

        let manager = self.key_manager(passphrase);
        manager.initialize_seed(self.seeds)?;
        let new_key = manager.derive_key(self.seeds, &self.salt)?;

        let mut migrated = migrate_legacy(
            &legacy_config,
            &legacy_vault,
            &legacy_key,
            passphrase,
            &new_key,
        )?;
        migrated.config.touch(now);
        migrated.config_text = encode_config(&migrated.config, &new_key)?;

        keep_legacy_copy(&config_path)?;
        if vault_path.exists() {
            keep_legacy_copy(&vault_path)?;
        }
        commit_vault_and_config(
            &vault_path,
            &migrated.vault_text,
            &config_path,
            &migrated.config_text,
            &legacy_config,
        )?;

        Ok(migrated)
    }

    /// Remove the config and vault files, and optionally the seed.
    pub fn destroy(&self, unlocked: Unlocked, delete_seed: bool) -> Result<()> {
        if unlocked.vault_path.exists() {
            fs::remove_file(&unlocked.vault_path)?;
        }
        fs::remove_file(&unlocked.config_path)?;
        if delete_seed {
            self.seeds.delete(&self.settings.seed_id())?;
        }
        Ok(())
    }
}

impl Unlocked {
    pub fn key(&self) -> &AesKey {
        &self.key
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    /// `SessionExpired` once `now` is past the session window.
    pub fn require_active(&self, now: i64) -> Result<()> {
        if self.config.is_active(now) {
            Ok(())
        } else {
            Err(LockboxError::SessionExpired)
        }
    }

    /// Check `passphrase` against the stored bcrypt hash.
    pub fn verify(&self, passphrase: &[u8]) -> Result<()> {
        if verify_password(&self.config.master_password_hash, passphrase) {
            Ok(())
        } else {
            Err(LockboxError::LoginFailed)
        }
    }

    /// Open the vault named by the config.
    pub fn open_vault(&self) -> Result<VaultStore> {
        if !self.vault_path.exists() {
            return Err(LockboxError::CommandFailed(format!(
                "vault file {} is missing",
                self.vault_path.display()
            )));
        }
        VaultStore::open(&self.vault_path, self.key.clone())
    }

    /// Change the session window (milliseconds) and persist it.
    pub fn set_timeout(&mut self, timeout_ms: i64) -> Result<()> {
        if timeout_ms <= 0 {
            return Err(LockboxError::CommandFailed(
                "timeout must be greater than zero".into(),
            ));
        }
        self.config.timeout = timeout_ms;
        self.save_config()
    }

    pub fn save_config(&self) -> Result<()> {
        save_config(&self.config_path, &self.config, &self.key)
    }
}

/// Replace vault and config as one step.
///
/// The vault is staged first and renamed into place only once the new
/// config is on disk.  If that rename fails, `previous_config` is written
/// back so the two files keep matching keys.
fn commit_vault_and_config(
    vault_path: &Path,
    vault_text: &str,
    config_path: &Path,
    config_text: &str,
    previous_config: &str,
) -> Result<()> {
    let staged = file::stage(vault_path, vault_text.as_bytes())?;
    file::write_atomic(config_path, config_text.as_bytes())?;
    if let Err(e) = staged.commit() {
        let _ = file::write_atomic(config_path, previous_config.as_bytes());
        return Err(e);
    }
    Ok(())
}

fn keep_legacy_copy(path: &Path) -> Result<()> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{LEGACY_SUFFIX}"));
    let copy = path.with_file_name(name);
    fs::copy(path, &copy)?;
    file::restrict_permissions(&copy);
    Ok(())
}
