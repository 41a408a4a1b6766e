//! Timestamped vault backups.
//!
//! A backup is an ordinary vault blob sealed under the current key and
//! written to `<backup_dir>/backup__YYYY-MM-DD_HH-MM-SS.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::crypto::keys::AesKey;
use crate::errors::{LockboxError, Result};

use super::codec::{decode_vault, is_unwritten, Mode};
use super::file;
use super::store::VaultStore;

const BACKUP_PREFIX: &str = "backup__";
const BACKUP_SUFFIX: &str = ".json";

/// File name for a backup taken at `at`.
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!(
        "{BACKUP_PREFIX}{}{BACKUP_SUFFIX}",
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Write the vault's current contents to a new backup file.
///
/// An existing backup is never replaced: a second backup in the same
/// second gets a `_1`, `_2`, ... suffix.
pub fn create_backup(store: &VaultStore, backup_dir: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
    file::ensure_dir(backup_dir)?;
    let path = free_backup_path(backup_dir, at);
    store.save_to(&path)?;
    Ok(path)
}

fn free_backup_path(backup_dir: &Path, at: DateTime<Utc>) -> PathBuf {
    let base = backup_file_name(at);
    let stem = base.trim_end_matches(BACKUP_SUFFIX);
    let mut path = backup_dir.join(&base);
    let mut n = 1u32;
    while path.exists() {
        path = backup_dir.join(format!("{stem}_{n}{BACKUP_SUFFIX}"));
        n += 1;
    }
    path
}

/// Backup file names in `backup_dir`, oldest first.
pub fn list_backups(backup_dir: &Path) -> Result<Vec<String>> {
    if !backup_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX))
        .collect();

    names.sort();
    Ok(names)
}

/// Replace the vault at `vault_path` with the backup `name`.
///
/// The backup must open under `key`.  An existing non-empty vault is only
/// overwritten when `force` is set.  Returns the number of restored entries.
pub fn restore_backup(
    backup_dir: &Path,
    name: &str,
    vault_path: &Path,
    key: &AesKey,
    force: bool,
) -> Result<usize> {
    // Plain file names only; no walking out of the backup directory.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(LockboxError::BackupNotFound(name.to_string()));
    }

    let backup_path = backup_dir.join(name);
    if !backup_path.is_file() {
        return Err(LockboxError::BackupNotFound(name.to_string()));
    }

    let text = file::read_text(&backup_path)?;
    let entries = if is_unwritten(text.len() as u64) {
        Vec::new()
    } else {
        decode_vault(&text, key, Mode::Current)?
    };

    if !force && vault_path.exists() && !is_unwritten(fs::metadata(vault_path)?.len()) {
        let current = decode_vault(&file::read_text(vault_path)?, key, Mode::Current)?;
        if !current.is_empty() {
            return Err(LockboxError::CommandFailed(format!(
                "vault already holds {} entries, use --force to overwrite it",
                current.len()
            )));
        }
    }

    file::write_atomic(vault_path, text.as_bytes())?;
    Ok(entries.len())
}
