//! Integration tests for the vault: codec, store, backups and migration.

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use zeroize::Zeroizing;

use lockbox::config::record::{decode_config, Config};
use lockbox::crypto::keys::AesKey;
use lockbox::crypto::password::hash_password_with_cost;
use lockbox::crypto::{seal_with, Encoding};
use lockbox::errors::LockboxError;
use lockbox::vault::backup::{create_backup, list_backups, restore_backup};
use lockbox::vault::migrate::migrate_legacy;
use lockbox::vault::{
    decode_vault, encode_vault, is_unwritten, DecryptedEntry, EntryUpdate, Mode, VaultEntry,
    VaultStore,
};

fn key() -> AesKey {
    AesKey::new([0x42u8; 32])
}

fn entry(name: &str, password: &str, notes: &str) -> VaultEntry {
    VaultEntry::new(name, "user", password, notes, 1_700_000_000_000, &key()).expect("entry")
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

#[test]
fn vault_roundtrip_preserves_order_and_fields() {
    for n in [0usize, 1, 3] {
        let entries: Vec<VaultEntry> = (0..n)
            .map(|i| entry(&format!("site-{i}"), &format!("pw-{i}"), ""))
            .collect();

        let text = encode_vault(&entries, &key()).expect("encode");
        let decoded = decode_vault(&text, &key(), Mode::Current).expect("decode");

        assert_eq!(decoded, entries, "N={n}");
        for (i, e) in decoded.iter().enumerate() {
            let pw = e.reveal_password(&key(), Mode::Current).expect("reveal");
            assert_eq!(pw.as_str(), format!("pw-{i}"));
            assert_eq!(e.notes, "");
        }
    }
}

#[test]
fn hunter2_entry_survives_encode_decode() {
    let entries = vec![entry("github", "hunter2", "work account")];
    let text = encode_vault(&entries, &key()).expect("encode");

    let decoded = decode_vault(&text, &key(), Mode::Current).expect("decode");
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].name, "github");
    assert_eq!(decoded[0].username, "user");
    assert_eq!(decoded[0].notes, "work account");
    assert_eq!(
        decoded[0]
            .reveal_password(&key(), Mode::Current)
            .expect("reveal")
            .as_str(),
        "hunter2"
    );
}

#[test]
fn vault_under_wrong_key_is_rejected() {
    let text = encode_vault(&[entry("a", "b", "")], &key()).expect("encode");
    let result = decode_vault(&text, &AesKey::new([0x43u8; 32]), Mode::Current);
    assert!(matches!(result, Err(LockboxError::AuthenticationFailed)));
}

#[test]
fn short_files_count_as_unwritten() {
    assert!(is_unwritten(0));
    assert!(is_unwritten(39));
    assert!(!is_unwritten(40));
}

// ---------------------------------------------------------------------------
// VaultStore
// ---------------------------------------------------------------------------

#[test]
fn store_create_then_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("pass.json");

    let mut store = VaultStore::create(&path, key()).expect("create");
    store
        .add_entry("github", "octocat", "hunter2", "", 10)
        .expect("add");
    store.save().expect("save");

    let reopened = VaultStore::open(&path, key()).expect("open");
    assert_eq!(reopened.len(), 1);
    let github = reopened.get_entry("github").expect("github entry");
    assert_eq!(github.username, "octocat");
    assert_eq!(github.updated_at, 10);
    assert_eq!(reopened.reveal_password(github).expect("reveal").as_str(), "hunter2");

    assert!(matches!(
        VaultStore::create(&path, key()),
        Err(LockboxError::VaultAlreadyExists(_))
    ));
}

#[test]
fn empty_file_opens_as_empty_vault() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("pass.json");
    std::fs::write(&path, "").expect("write");

    // Any key works: nothing is decrypted.
    let store = VaultStore::open(&path, AesKey::new([0u8; 32])).expect("open");
    assert!(store.is_empty());
}

#[test]
fn store_update_search_delete() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("pass.json");
    let mut store = VaultStore::create(&path, key()).expect("create");

    store.add_entry("GitHub", "a", "one", "", 1).expect("add");
    store.add_entry("gitlab", "b", "two", "", 1).expect("add");
    store.add_entry("email", "c", "three", "", 1).expect("add");

    let names: Vec<&str> = store.search("GIT").iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["GitHub", "gitlab"]);

    store
        .update_entry(
            "gitlab",
            EntryUpdate {
                password: Some(Zeroizing::new("four".to_string())),
                notes: Some("rotated".into()),
                ..EntryUpdate::default()
            },
            99,
        )
        .expect("update");
    let gitlab = store.get_entry("gitlab").expect("gitlab");
    assert_eq!(gitlab.username, "b");
    assert_eq!(gitlab.notes, "rotated");
    assert_eq!(gitlab.updated_at, 99);
    assert_eq!(store.reveal_password(gitlab).expect("reveal").as_str(), "four");

    let removed = store.delete_entry("email").expect("delete");
    assert_eq!(removed.name, "email");
    assert_eq!(store.len(), 2);
    assert!(matches!(
        store.delete_entry("email"),
        Err(LockboxError::EntryNotFound(_))
    ));
}

#[test]
fn rekey_reseals_every_password() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("pass.json");
    let mut store = VaultStore::create(&path, key()).expect("create");
    store.add_entry("a", "", "alpha", "", 1).expect("add");
    store.add_entry("b", "", "beta", "", 1).expect("add");

    let new_key = AesKey::new([0x99u8; 32]);
    store.rekey(new_key.clone()).expect("rekey");
    store.save().expect("save");

    assert!(VaultStore::open(&path, key()).is_err());
    let reopened = VaultStore::open(&path, new_key).expect("open with new key");
    let b = reopened.get_entry("b").expect("b");
    assert_eq!(reopened.reveal_password(b).expect("reveal").as_str(), "beta");
}

#[test]
fn export_then_import_into_fresh_vault() {
    let dir = TempDir::new().expect("tempdir");
    let mut source = VaultStore::create(&dir.path().join("a.json"), key()).expect("create");
    source.add_entry("bank", "me", "s3cret", "pin 0000", 5).expect("add");

    let exported = source.export_plaintext().expect("export");
    assert_eq!(exported[0].password, "s3cret");

    let other_key = AesKey::new([0x07u8; 32]);
    let mut target = VaultStore::create(&dir.path().join("b.json"), other_key).expect("create");
    let added = target.import_plaintext(&exported, 77).expect("import");
    assert_eq!(added, 1);

    let bank = target.get_entry("bank").expect("bank");
    assert_eq!(bank.updated_at, 5);
    assert_eq!(bank.notes, "pin 0000");
    assert_eq!(target.reveal_password(bank).expect("reveal").as_str(), "s3cret");

    let undated = vec![DecryptedEntry {
        name: "new".into(),
        username: String::new(),
        password: "x".into(),
        notes: String::new(),
        updated_at: 0,
    }];
    target.import_plaintext(&undated, 77).expect("import");
    assert_eq!(target.get_entry("new").expect("new").updated_at, 77);
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

#[test]
fn backup_and_restore() {
    let dir = TempDir::new().expect("tempdir");
    let vault_path = dir.path().join("pass.json");
    let backup_dir = dir.path().join("backups");

    let mut store = VaultStore::create(&vault_path, key()).expect("create");
    store.add_entry("github", "", "hunter2", "", 1).expect("add");
    store.save().expect("save");

    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let backup = create_backup(&store, &backup_dir, at).expect("backup");
    assert!(backup.is_file());
    assert_eq!(
        list_backups(&backup_dir).expect("list"),
        vec!["backup__2024-01-02_03-04-05.json".to_string()]
    );

    store.delete_entry("github").expect("delete");
    store.save().expect("save");

    let restored = restore_backup(
        &backup_dir,
        "backup__2024-01-02_03-04-05.json",
        &vault_path,
        &key(),
        false,
    )
    .expect("restore");
    assert_eq!(restored, 1);
    assert!(VaultStore::open(&vault_path, key())
        .expect("open")
        .get_entry("github")
        .is_some());
}

#[test]
fn restore_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("tempdir");
    let vault_path = dir.path().join("pass.json");
    let backup_dir = dir.path().join("backups");

    let mut store = VaultStore::create(&vault_path, key()).expect("create");
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    create_backup(&store, &backup_dir, at).expect("backup");

    store.add_entry("keep-me", "", "pw", "", 1).expect("add");
    store.save().expect("save");

    let name = "backup__2024-01-02_03-04-05.json";
    assert!(restore_backup(&backup_dir, name, &vault_path, &key(), false).is_err());
    assert_eq!(
        restore_backup(&backup_dir, name, &vault_path, &key(), true).expect("forced restore"),
        0
    );
}

#[test]
fn restore_rejects_unknown_or_escaping_names() {
    let dir = TempDir::new().expect("tempdir");
    let vault_path = dir.path().join("pass.json");
    let backup_dir = dir.path().join("backups");

    for name in ["missing.json", "../pass.json", "a/b.json"] {
        assert!(matches!(
            restore_backup(&backup_dir, name, &vault_path, &key(), true),
            Err(LockboxError::BackupNotFound(_))
        ));
    }
}

#[test]
fn list_backups_of_missing_dir_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    assert!(list_backups(&dir.path().join("nope")).expect("list").is_empty());
}

// ---------------------------------------------------------------------------
// Legacy migration
// ---------------------------------------------------------------------------

#[test]
fn legacy_files_migrate_to_current_scheme() {
    let legacy_key = AesKey::new([0x10u8; 32]);
    let new_key = AesKey::new([0x20u8; 32]);

    let config = Config::new(
        hash_password_with_cost(b"mastahpass", 4).expect("hash"),
        "pass.json",
        0,
        60_000,
    );
    let config_json = serde_json::to_vec(&config).expect("json");
    let config_text = seal_with(&legacy_key, &config_json, Encoding::Hex).expect("seal");

    let inner = hex::encode("hunter2");
    let sealed_pw = seal_with(&legacy_key, inner.as_bytes(), Encoding::Hex).expect("seal");
    let legacy_entries = vec![VaultEntry {
        name: "github".into(),
        username: "octocat".into(),
        password: sealed_pw.into_bytes(),
        notes: "n".into(),
        updated_at: 42,
    }];
    let vault_json = serde_json::to_vec(&legacy_entries).expect("json");
    let vault_text = seal_with(&legacy_key, &vault_json, Encoding::Hex).expect("seal");

    let migrated = migrate_legacy(&config_text, &vault_text, &legacy_key, b"mastahpass", &new_key)
        .expect("migrate");
    assert_eq!(migrated.entries, 1);

    let cfg = decode_config(&migrated.config_text, &new_key, Mode::Current).expect("config");
    assert_eq!(cfg.timeout, 60_000);

    let entries = decode_vault(&migrated.vault_text, &new_key, Mode::Current).expect("vault");
    assert_eq!(entries[0].username, "octocat");
    assert_eq!(
        entries[0]
            .reveal_password(&new_key, Mode::Current)
            .expect("reveal")
            .as_str(),
        "hunter2"
    );
}
