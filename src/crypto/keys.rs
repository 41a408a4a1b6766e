//! Key material wrappers and the per-invocation key manager.
//!
//! - [`AesKey`]: the derived 32-byte AES-256 key.
//! - [`Seed`]: the random 32-byte seed held in the OS keyring.
//! - [`KeyManager`]: the master passphrase plus the keyring identifiers
//!   needed to turn it into an [`AesKey`].
//!
//! All of them wipe their memory when dropped.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use super::kdf::{derive_key, Salt};
use crate::errors::{LockboxError, Result};
use crate::keyring::{SeedId, SeedStore};

/// Length of the AES key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the keyring seed in bytes (256 bits).
pub const SEED_LEN: usize = 32;

/// A 32-byte AES-256 key that is zeroed when dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AesKey {
    bytes: [u8; KEY_LEN],
}

impl AesKey {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl PartialEq for AesKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for AesKey {}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey(..)")
    }
}

/// The random seed combined with the passphrase during derivation.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Seed {
    bytes: [u8; SEED_LEN],
}

impl Seed {
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self { bytes }
    }

    /// A fresh seed from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        rand::rng().fill_bytes(&mut bytes);
        let seed = Self::new(bytes);
        bytes.zeroize();
        seed
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }

    /// Text form stored in the keyring (standard base64).
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(BASE64.encode(self.bytes))
    }

    /// Parse the keyring text form.  Bad base64 or a wrong length means the
    /// entry is unusable, which is reported as an unavailable seed.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(BASE64.decode(encoded.trim()).map_err(|e| {
            LockboxError::SeedUnavailable(format!("stored seed is not valid base64: {e}"))
        })?);
        let bytes: [u8; SEED_LEN] = decoded.as_slice().try_into().map_err(|_| {
            LockboxError::SeedUnavailable(format!(
                "stored seed must be {SEED_LEN} bytes (got {})",
                decoded.len()
            ))
        })?;
        Ok(Self::new(bytes))
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Holds the master passphrase for the duration of one command and knows
/// where its seed lives.  Never persisted, never cached across commands.
pub struct KeyManager {
    passphrase: Zeroizing<Vec<u8>>,
    seed_id: SeedId,
}

impl KeyManager {
    pub fn new(passphrase: &[u8], seed_id: SeedId) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.to_vec()),
            seed_id,
        }
    }

    /// Make sure a seed exists in the store, creating one if missing.
    ///
    /// An existing seed is kept: replacing it would orphan every file
    /// already encrypted under keys derived from it.
    pub fn initialize_seed(&self, store: &dyn SeedStore) -> Result<()> {
        match store.get(&self.seed_id) {
            Ok(_) => Ok(()),
            Err(LockboxError::SeedUnavailable(_)) => store.set(&self.seed_id, &Seed::generate()),
            Err(e) => Err(e),
        }
    }

    /// Remove the seed from the store.
    pub fn delete_seed(&self, store: &dyn SeedStore) -> Result<()> {
        store.delete(&self.seed_id)
    }

    /// Fetch the seed and derive the AES key for this passphrase.
    pub fn derive_key(&self, store: &dyn SeedStore, salt: &Salt) -> Result<AesKey> {
        let seed = store.get(&self.seed_id)?;
        Ok(derive_key(&seed, &self.passphrase, salt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::MemorySeedStore;

    fn salt() -> Salt {
        Salt::new(&[0x5Au8; 32]).unwrap()
    }

    #[test]
    fn seed_base64_roundtrip() {
        let seed = Seed::generate();
        let parsed = Seed::from_base64(&seed.to_base64()).unwrap();
        assert_eq!(parsed.as_bytes(), seed.as_bytes());
    }

    #[test]
    fn seed_with_wrong_length_is_unavailable() {
        let short = BASE64.encode([1u8; 16]);
        assert!(matches!(
            Seed::from_base64(&short),
            Err(LockboxError::SeedUnavailable(_))
        ));
        assert!(matches!(
            Seed::from_base64("not base64 !!"),
            Err(LockboxError::SeedUnavailable(_))
        ));
    }

    #[test]
    fn derive_without_seed_fails() {
        let store = MemorySeedStore::new();
        let km = KeyManager::new(b"mastahpass", SeedId::test());
        assert!(matches!(
            km.derive_key(&store, &salt()),
            Err(LockboxError::SeedUnavailable(_))
        ));
    }

    #[test]
    fn initialize_seed_keeps_existing_seed() {
        let store = MemorySeedStore::new();
        let km = KeyManager::new(b"mastahpass", SeedId::test());

        km.initialize_seed(&store).unwrap();
        let first = km.derive_key(&store, &salt()).unwrap();

        km.initialize_seed(&store).unwrap();
        let second = km.derive_key(&store, &salt()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn delete_seed_makes_derivation_fail() {
        let store = MemorySeedStore::new();
        let km = KeyManager::new(b"mastahpass", SeedId::test());
        km.initialize_seed(&store).unwrap();
        km.delete_seed(&store).unwrap();
        assert!(km.derive_key(&store, &salt()).is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        assert_eq!(format!("{:?}", AesKey::new([1u8; 32])), "AesKey(..)");
        assert_eq!(format!("{:?}", Seed::new([1u8; 32])), "Seed(..)");
    }
}
