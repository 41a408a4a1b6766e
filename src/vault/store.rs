//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` wraps the codec and the file layer so that the rest of the
//! application can work with simple method calls like
//! `store.add_entry("github", "me", "hunter2", "", now)`.
//!
//! The whole collection is loaded, mutated in memory and rewritten on
//! `save`; nothing is patched in place.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::keys::AesKey;
use crate::errors::{LockboxError, Result};

use super::codec::{decode_vault, encode_vault, is_unwritten, Mode};
use super::entry::{DecryptedEntry, VaultEntry};
use super::file;

/// Changes applied by [`VaultStore::update_entry`].  `None` keeps the
/// current value.
#[derive(Debug, Default)]
pub struct EntryUpdate {
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub notes: Option<String>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.notes.is_none()
    }
}

/// The main vault handle.  Create one with `VaultStore::create` or
/// `VaultStore::open`, then use its methods to manage entries.
pub struct VaultStore {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Entries in file order.
    entries: Vec<VaultEntry>,

    /// The derived AES key (zeroized on drop).
    key: AesKey,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new, empty vault file at `path`.
    pub fn create(path: &Path, key: AesKey) -> Result<Self> {
        if path.exists() {
            return Err(LockboxError::VaultAlreadyExists(path.to_path_buf()));
        }

        let store = Self::from_parts(path.to_path_buf(), Vec::new(), key);
        store.save()?;
        Ok(store)
    }

    /// Open an existing vault file.
    ///
    /// A file too short to hold a sealed blob has never been written and
    /// opens as an empty vault without touching the cipher.
    pub fn open(path: &Path, key: AesKey) -> Result<Self> {
        let len = std::fs::metadata(path)?.len();
        let entries = if is_unwritten(len) {
            Vec::new()
        } else {
            decode_vault(&file::read_text(path)?, &key, Mode::Current)?
        };

        Ok(Self::from_parts(path.to_path_buf(), entries, key))
    }

    /// Build a `VaultStore` from pre-constructed parts without touching disk.
    pub fn from_parts(path: PathBuf, entries: Vec<VaultEntry>, key: AesKey) -> Self {
        Self { path, entries, key }
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Append a new entry.  Names are not required to be unique.
    pub fn add_entry(
        &mut self,
        name: &str,
        username: &str,
        password: &str,
        notes: &str,
        now: i64,
    ) -> Result<()> {
        validate_name(name)?;
        let entry = VaultEntry::new(name, username, password, notes, now, &self.key)?;
        self.entries.push(entry);
        Ok(())
    }

    /// First entry named `name` (case-sensitive).
    pub fn get_entry(&self, name: &str) -> Option<&VaultEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Decrypt the password of an entry held by this vault.
    pub fn reveal_password(&self, entry: &VaultEntry) -> Result<Zeroizing<String>> {
        entry.reveal_password(&self.key, Mode::Current)
    }

    /// Apply `changes` to the first entry named `name` and stamp it.
    pub fn update_entry(&mut self, name: &str, changes: EntryUpdate, now: i64) -> Result<()> {
        let index = self.position(name)?;
        let entry = &mut self.entries[index];

        if let Some(username) = changes.username {
            entry.username = username;
        }
        if let Some(password) = changes.password {
            entry.set_password(&self.key, &password)?;
        }
        if let Some(notes) = changes.notes {
            entry.notes = notes;
        }
        entry.updated_at = now;
        Ok(())
    }

    /// Remove and return the first entry named `name`.
    pub fn delete_entry(&mut self, name: &str) -> Result<VaultEntry> {
        let index = self.position(name)?;
        Ok(self.entries.remove(index))
    }

    /// Entries whose name contains `term`, ignoring case, sorted by name.
    pub fn search(&self, term: &str) -> Vec<&VaultEntry> {
        let needle = term.to_lowercase();
        let mut hits: Vec<&VaultEntry> = self
            .entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[VaultEntry] {
        &self.entries
    }

    /// Decrypt every entry for export.
    pub fn export_plaintext(&self) -> Result<Vec<DecryptedEntry>> {
        self.entries
            .iter()
            .map(|e| {
                let password = self.reveal_password(e)?;
                Ok(DecryptedEntry {
                    name: e.name.clone(),
                    username: e.username.clone(),
                    password: password.to_string(),
                    notes: e.notes.clone(),
                    updated_at: e.updated_at,
                })
            })
            .collect()
    }

    /// Seal and append plaintext entries.  Entries without a timestamp get
    /// `now`.  Returns how many were added.
    pub fn import_plaintext(&mut self, entries: &[DecryptedEntry], now: i64) -> Result<usize> {
        for plain in entries {
            validate_name(&plain.name)?;
        }
        for plain in entries {
            let mut sealed = plain.seal(&self.key)?;
            if sealed.updated_at == 0 {
                sealed.updated_at = now;
            }
            self.entries.push(sealed);
        }
        Ok(entries.len())
    }

    /// Re-seal every password under `new_key` and make it the vault key.
    ///
    /// All passwords are decrypted first, so a failure leaves the vault
    /// unchanged.
    pub fn rekey(&mut self, new_key: AesKey) -> Result<()> {
        let mut resealed = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let password = self.reveal_password(entry)?;
            let mut copy = entry.clone();
            copy.set_password(&new_key, &password)?;
            resealed.push(copy);
        }
        self.entries = resealed;
        self.key = new_key;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt the vault and write it to disk atomically.
    pub fn save(&self) -> Result<()> {
        self.save_to(&self.path)
    }

    /// Encrypt the vault and write it to `path` atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let text = encode_vault(&self.entries, &self.key)?;
        file::write_atomic(path, text.as_bytes())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &AesKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| LockboxError::EntryNotFound(name.to_string()))
    }
}

/// Entry names must be non-empty and at most 256 characters.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LockboxError::CommandFailed(
            "entry name cannot be empty".into(),
        ));
    }
    if name.chars().count() > 256 {
        return Err(LockboxError::CommandFailed(
            "entry name cannot exceed 256 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key() -> AesKey {
        AesKey::new([7u8; 32])
    }

    fn new_store(dir: &TempDir) -> VaultStore {
        VaultStore::create(&dir.path().join("pass.json"), key()).unwrap()
    }

    #[test]
    fn create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let _ = new_store(&dir);
        let err = VaultStore::create(&dir.path().join("pass.json"), key());
        assert!(matches!(err, Err(LockboxError::VaultAlreadyExists(_))));
    }

    #[test]
    fn never_written_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pass.json");
        std::fs::write(&path, "[]").unwrap();

        let store = VaultStore::open(&path, key()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn add_allows_duplicates_and_get_returns_first() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("git", "first", "a", "", 1).unwrap();
        store.add_entry("git", "second", "b", "", 2).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_entry("git").unwrap().username, "first");
        assert!(store.get_entry("GIT").is_none());
    }

    #[test]
    fn update_changes_only_given_fields() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("mail", "me", "old", "note", 1).unwrap();

        let changes = EntryUpdate {
            password: Some(Zeroizing::new("new".to_string())),
            ..Default::default()
        };
        store.update_entry("mail", changes, 99).unwrap();

        let entry = store.get_entry("mail").unwrap();
        assert_eq!(entry.username, "me");
        assert_eq!(entry.notes, "note");
        assert_eq!(entry.updated_at, 99);
        assert_eq!(store.reveal_password(entry).unwrap().as_str(), "new");
    }

    #[test]
    fn update_missing_entry_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        let err = store.update_entry("nope", EntryUpdate::default(), 1);
        assert!(matches!(err, Err(LockboxError::EntryNotFound(_))));
    }

    #[test]
    fn delete_removes_first_match_only() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("git", "first", "a", "", 1).unwrap();
        store.add_entry("git", "second", "b", "", 2).unwrap();

        let removed = store.delete_entry("git").unwrap();
        assert_eq!(removed.username, "first");
        assert_eq!(store.get_entry("git").unwrap().username, "second");
    }

    #[test]
    fn search_is_case_insensitive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        for name in ["GitLab", "mail", "github"] {
            store.add_entry(name, "u", "p", "", 1).unwrap();
        }

        let names: Vec<&str> = store.search("GIT").iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["GitLab", "github"]);
        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn empty_name_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        assert!(store.add_entry("  ", "u", "p", "", 1).is_err());
    }

    #[test]
    fn save_and_reopen_preserves_order() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("b", "u1", "p1", "", 1).unwrap();
        store.add_entry("a", "u2", "p2", "", 2).unwrap();
        store.save().unwrap();

        let reopened = VaultStore::open(store.path(), key()).unwrap();
        let names: Vec<&str> = reopened.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("a", "u", "p", "", 1).unwrap();
        store.save().unwrap();

        let err = VaultStore::open(store.path(), AesKey::new([8u8; 32]));
        assert!(matches!(err, Err(LockboxError::AuthenticationFailed)));
    }

    #[test]
    fn rekey_reseals_passwords() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("a", "u", "secret", "", 1).unwrap();

        let new_key = AesKey::new([9u8; 32]);
        store.rekey(new_key.clone()).unwrap();
        store.save().unwrap();

        let reopened = VaultStore::open(store.path(), new_key).unwrap();
        let entry = reopened.get_entry("a").unwrap();
        assert_eq!(reopened.reveal_password(entry).unwrap().as_str(), "secret");
    }

    #[test]
    fn export_then_import_copies_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = new_store(&dir);
        store.add_entry("a", "u", "pw", "n", 5).unwrap();
        let exported = store.export_plaintext().unwrap();
        assert_eq!(exported[0].password, "pw");

        let other_dir = TempDir::new().unwrap();
        let mut other = new_store(&other_dir);
        assert_eq!(other.import_plaintext(&exported, 10).unwrap(), 1);
        let entry = other.get_entry("a").unwrap();
        assert_eq!(entry.updated_at, 5);
        assert_eq!(other.reveal_password(entry).unwrap().as_str(), "pw");
    }
}
