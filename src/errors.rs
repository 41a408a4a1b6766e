use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Lockbox.
#[derive(Debug, Error)]
pub enum LockboxError {
    // --- Key material errors ---
    #[error("Key-derivation seed unavailable: {0}")]
    SeedUnavailable(String),

    #[error("Salt misconfigured: {0}")]
    SaltMisconfigured(String),

    // --- Crypto errors ---
    #[error("Decryption failed — wrong password")]
    AuthenticationFailed,

    #[error("Malformed ciphertext — file may be corrupted: {0}")]
    Malformed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationFailed(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashFailed(String),

    // --- Keyring errors ---
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // --- Config / session errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    #[error("No config found in {0} — run `lockbox init` first")]
    NotInitialized(PathBuf),

    #[error("Already initialized — config exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Session expired — run `lockbox login`")]
    SessionExpired,

    #[error("Login failed — wrong password")]
    LoginFailed,

    // --- Vault errors ---
    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Entry '{0}' not found")]
    EntryNotFound(String),

    #[error("Backup '{0}' not found")]
    BackupNotFound(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for Lockbox results.
pub type Result<T> = std::result::Result<T, LockboxError>;
