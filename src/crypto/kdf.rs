//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The working AES key is never stored.  Every command re-derives it from
//! three inputs:
//! - the random 32-byte **seed** kept in the OS keyring,
//! - the user's master **passphrase**,
//! - a deployment-wide 32-byte **salt** taken from the environment.
//!
//! The PBKDF2 password input is `seed || passphrase`; the salt is the
//! PBKDF2 salt.  The iteration count is fixed.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use super::keys::{AesKey, Seed, KEY_LEN};
use crate::errors::{LockboxError, Result};

/// Length of the deployment salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Fixed PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Environment variable holding the deployment salt.
pub const SALT_ENV_VAR: &str = "LOCKBOX_SECRET_KEY";

/// The deployment-wide salt (a pepper shared by every derivation).
///
/// In legacy mode the same 32 bytes were used directly as the AES key,
/// see [`Salt::legacy_key`].
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Salt {
    bytes: [u8; SALT_LEN],
}

impl Salt {
    /// Build a salt from raw bytes.  Anything but exactly 32 bytes is a
    /// configuration error.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
            LockboxError::SaltMisconfigured(format!(
                "salt must be exactly {SALT_LEN} bytes (got {})",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Read the salt from `LOCKBOX_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(SALT_ENV_VAR)
    }

    /// Read the salt from an arbitrary environment variable.
    pub fn from_env_var(name: &str) -> Result<Self> {
        let value = Zeroizing::new(std::env::var(name).map_err(|_| {
            LockboxError::SaltMisconfigured(format!("{name} is not set"))
        })?);
        Self::new(value.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.bytes
    }

    /// The key used by files written before seed-based derivation existed.
    pub fn legacy_key(&self) -> AesKey {
        AesKey::new(self.bytes)
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Derive the 32-byte AES key from seed, passphrase and salt.
///
/// Deterministic: the same three inputs always produce the same key.
/// Every call pays the full iteration cost; nothing is cached.
pub fn derive_key(seed: &Seed, passphrase: &[u8], salt: &Salt) -> AesKey {
    let mut input = Zeroizing::new(Vec::with_capacity(seed.as_bytes().len() + passphrase.len()));
    input.extend_from_slice(seed.as_bytes());
    input.extend_from_slice(passphrase);

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(&input, salt.as_bytes(), PBKDF2_ITERATIONS, &mut key);

    let out = AesKey::new(key);
    key.zeroize();
    out
}
