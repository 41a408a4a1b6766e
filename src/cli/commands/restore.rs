//! `lockbox restore`: replace the vault with a backup.

use dialoguer::Select;

use crate::cli::output;
use crate::cli::{log_audit, unlock_active, Cli};
use crate::errors::{LockboxError, Result};
use crate::vault::backup::{list_backups, restore_backup};

/// Execute the `restore` command.
pub fn execute(cli: &Cli, name: Option<&str>, force: bool) -> Result<()> {
    let (session, unlocked) = unlock_active(cli)?;
    let backup_dir = session.backup_dir();

    let chosen = match name {
        Some(n) => n.to_string(),
        None => {
            let names = list_backups(&backup_dir)?;
            if names.is_empty() {
                return Err(LockboxError::CommandFailed(
                    "no backups found — run `lockbox backup` first".into(),
                ));
            }
            let index = Select::new()
                .with_prompt("Backup to restore")
                .items(&names)
                .default(names.len() - 1)
                .interact_opt()
                .map_err(|e| LockboxError::CommandFailed(format!("select prompt: {e}")))?
                .ok_or(LockboxError::UserCancelled)?;
            names[index].clone()
        }
    };

    let count = restore_backup(
        &backup_dir,
        &chosen,
        unlocked.vault_path(),
        unlocked.key(),
        force,
    )?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "restore",
        None,
        Some(&chosen),
    );

    output::success(&format!("Restored {count} entries from {chosen}"));

    Ok(())
}
