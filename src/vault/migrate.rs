//! Conversion of legacy (hex, environment-keyed) files to the current
//! scheme.

use crate::config::record::{decode_config, encode_config, Config};
use crate::crypto::keys::AesKey;
use crate::crypto::verify_password;
use crate::errors::{LockboxError, Result};

use super::codec::{decode_vault, encode_vault, is_unwritten_in, Mode};
use super::entry::VaultEntry;

/// Result of a successful migration.
#[derive(Debug)]
pub struct Migrated {
    pub config: Config,
    pub config_text: String,
    pub vault_text: String,
    pub entries: usize,
}

/// Re-encrypt a legacy config and vault under `new_key`.
///
/// The passphrase is checked against the hash in the legacy config before
/// the vault is touched.  Every password is opened with the legacy key and
/// sealed again under `new_key`; any failure aborts the whole migration.
pub fn migrate_legacy(
    legacy_config: &str,
    legacy_vault: &str,
    legacy_key: &AesKey,
    passphrase: &[u8],
    new_key: &AesKey,
) -> Result<Migrated> {
    let config = decode_config(legacy_config, legacy_key, Mode::Legacy)?;
    if !verify_password(&config.master_password_hash, passphrase) {
        return Err(LockboxError::LoginFailed);
    }

    let legacy_entries = if is_unwritten_in(legacy_vault.trim().len() as u64, Mode::Legacy) {
        Vec::new()
    } else {
        decode_vault(legacy_vault, legacy_key, Mode::Legacy)?
    };

    let entries = legacy_entries
        .iter()
        .map(|old| {
            let password = old.reveal_password(legacy_key, Mode::Legacy)?;
            VaultEntry::new(
                &old.name,
                &old.username,
                &password,
                &old.notes,
                old.updated_at,
                new_key,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Migrated {
        config_text: encode_config(&config, new_key)?,
        vault_text: encode_vault(&entries, new_key)?,
        entries: entries.len(),
        config,
    })
}
