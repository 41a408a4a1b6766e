//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `VaultEntry` and `DecryptedEntry` records (`entry`)
//! - Sealed JSON encoding of vaults, current and legacy (`codec`)
//! - Atomic file writes (`file`)
//! - High-level `VaultStore` for creating, opening, and managing vaults (`store`)
//! - Timestamped backups (`backup`) and legacy migration (`migrate`)

pub mod backup;
pub mod codec;
pub mod entry;
pub mod file;
pub mod migrate;
pub mod store;

// Re-export the most commonly used items.
pub use codec::{decode_vault, encode_vault, is_unwritten, Mode};
pub use entry::{DecryptedEntry, VaultEntry};
pub use store::{EntryUpdate, VaultStore};
