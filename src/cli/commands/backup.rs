//! `lockbox backup`: write an encrypted copy of the vault, or list copies.

use chrono::Utc;

use crate::cli::output;
use crate::cli::{log_audit, require_initialized, unlock_active, Cli};
use crate::errors::Result;
use crate::vault::backup::{create_backup, list_backups};

/// Execute the `backup` command.
pub fn execute(cli: &Cli, list: bool) -> Result<()> {
    if list {
        // File names only; nothing is decrypted.
        let session = require_initialized(cli)?;
        let names = list_backups(&session.backup_dir())?;
        if names.is_empty() {
            output::info("No backups yet.");
            output::tip("Run `lockbox backup` to create one.");
        }
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let (session, unlocked) = unlock_active(cli)?;
    let store = unlocked.open_vault()?;

    let path = create_backup(&store, &session.backup_dir(), Utc::now())?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log_audit(
        &session,
        &unlocked.config.vault_name,
        "backup",
        None,
        Some(&file_name),
    );

    output::success(&format!(
        "Backed up {} entries to {}",
        store.len(),
        path.display()
    ));

    Ok(())
}
