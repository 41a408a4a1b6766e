//! `lockbox list`: display all entries in a table.

use crate::cli::output;
use crate::cli::{unlock_active, Cli};
use crate::errors::Result;
use crate::vault::VaultEntry;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_session, unlocked) = unlock_active(cli)?;
    let store = unlocked.open_vault()?;

    let entries: Vec<&VaultEntry> = store.entries().iter().collect();

    output::info(&format!(
        "{} — {} entr{}",
        unlocked.config.vault_name,
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    ));

    output::print_entries_table(&entries);

    Ok(())
}
