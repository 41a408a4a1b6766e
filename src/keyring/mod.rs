//! Secret-seed storage.
//!
//! The random key-derivation seed lives in the operating system's secure
//! credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: kernel keyutils
//!
//! Access goes through the [`SeedStore`] trait so the rest of the crate can
//! be exercised against [`MemorySeedStore`] instead of a real keyring.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::crypto::keys::Seed;
use crate::errors::{LockboxError, Result};

/// Service name used in the OS keyring.
pub const DEFAULT_SERVICE: &str = "lockbox";

/// Account name used in the OS keyring.
pub const DEFAULT_ACCOUNT: &str = "encryption_key";

/// `(service, account)` pair addressing one seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedId {
    pub service: String,
    pub account: String,
}

impl SeedId {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    /// The identifiers used by a normal installation.
    pub fn production() -> Self {
        Self::new(DEFAULT_SERVICE, DEFAULT_ACCOUNT)
    }

    /// Identifiers reserved for tests, so they never touch a real seed.
    pub fn test() -> Self {
        Self::new("lockbox-test", "test_encryption_key")
    }
}

/// Get/set/delete capability for seeds.
pub trait SeedStore {
    /// Fetch the seed.  A missing or unreadable entry is `SeedUnavailable`.
    fn get(&self, id: &SeedId) -> Result<Seed>;

    /// Store (or replace) the seed.
    fn set(&self, id: &SeedId, seed: &Seed) -> Result<()>;

    /// Remove the seed.  Removing a missing seed is not an error.
    fn delete(&self, id: &SeedId) -> Result<()>;
}

/// Seed store backed by the OS keyring.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringSeedStore;

impl KeyringSeedStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(id: &SeedId) -> Result<::keyring::Entry> {
        ::keyring::Entry::new(&id.service, &id.account)
            .map_err(|e| LockboxError::KeyringError(format!("failed to create keyring entry: {e}")))
    }
}

impl SeedStore for KeyringSeedStore {
    fn get(&self, id: &SeedId) -> Result<Seed> {
        let entry = Self::entry(id)?;
        match entry.get_password() {
            Ok(encoded) => Seed::from_base64(&encoded),
            Err(::keyring::Error::NoEntry) => Err(LockboxError::SeedUnavailable(format!(
                "no seed stored for {}/{}",
                id.service, id.account
            ))),
            Err(e) => Err(LockboxError::SeedUnavailable(format!(
                "failed to read from keyring: {e}"
            ))),
        }
    }

    fn set(&self, id: &SeedId, seed: &Seed) -> Result<()> {
        let entry = Self::entry(id)?;
        entry.set_password(&seed.to_base64()).map_err(|e| {
            LockboxError::KeyringError(format!("failed to store seed in keyring: {e}"))
        })
    }

    fn delete(&self, id: &SeedId) -> Result<()> {
        let entry = Self::entry(id)?;
        match entry.delete_credential() {
            Ok(()) | Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(LockboxError::KeyringError(format!(
                "failed to delete from keyring: {e}"
            ))),
        }
    }
}

/// In-process seed store.  Holds seeds in their keyring text form so the
/// same parsing path is exercised as with the OS keyring.
#[derive(Debug, Default)]
pub struct MemorySeedStore {
    entries: Mutex<HashMap<SeedId, String>>,
}

impl MemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `id`, bypassing seed validation.
    pub fn insert_raw(&self, id: &SeedId, text: &str) {
        self.lock().insert(id.clone(), text.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SeedId, String>> {
        // A poisoned map still holds valid strings.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SeedStore for MemorySeedStore {
    fn get(&self, id: &SeedId) -> Result<Seed> {
        match self.lock().get(id) {
            Some(encoded) => Seed::from_base64(encoded),
            None => Err(LockboxError::SeedUnavailable(format!(
                "no seed stored for {}/{}",
                id.service, id.account
            ))),
        }
    }

    fn set(&self, id: &SeedId, seed: &Seed) -> Result<()> {
        self.lock().insert(id.clone(), seed.to_base64().to_string());
        Ok(())
    }

    fn delete(&self, id: &SeedId) -> Result<()> {
        self.lock().remove(id);
        Ok(())
    }
}
