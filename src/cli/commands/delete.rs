//! `lockbox delete`: remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{log_audit, unlock_active, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    // Open the vault (requires password and an active session).
    let (session, unlocked) = unlock_active(cli)?;
    let mut store = unlocked.open_vault()?;

    if store.get_entry(name).is_none() {
        return Err(LockboxError::EntryNotFound(name.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // Delete the entry and save.
    store.delete_entry(name)?;
    store.save()?;

    log_audit(&session, &unlocked.config.vault_name, "delete", Some(name), None);
    output::success(&format!("Deleted entry '{name}'"));

    Ok(())
}
