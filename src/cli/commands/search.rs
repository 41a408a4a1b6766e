//! `lockbox search`: find entries by name, ignoring case.

use crate::cli::output;
use crate::cli::{unlock_active, Cli};
use crate::errors::Result;

/// Execute the `search` command.
pub fn execute(cli: &Cli, term: &str) -> Result<()> {
    let (_session, unlocked) = unlock_active(cli)?;
    let store = unlocked.open_vault()?;

    let hits = store.search(term);
    if hits.is_empty() {
        output::info(&format!("No entries match '{term}'."));
        return Ok(());
    }

    output::print_entries_table(&hits);
    Ok(())
}
