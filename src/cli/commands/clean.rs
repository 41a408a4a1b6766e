//! `lockbox clean`: remove the vault and config from this machine.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock_active, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `clean` command.
pub fn execute(cli: &Cli, force: bool, delete_seed: bool) -> Result<()> {
    let (session, unlocked) = unlock_active(cli)?;

    if !force {
        output::warning("This permanently removes your vault and config.");
        let confirmed = Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let vault_path = unlocked.vault_path().to_path_buf();
    session.destroy(unlocked, delete_seed)?;

    output::success(&format!("Removed {}", vault_path.display()));
    output::success(&format!("Removed {}", session.config_path().display()));
    if delete_seed {
        output::success("Removed the seed from the OS keyring.");
    }

    Ok(())
}
