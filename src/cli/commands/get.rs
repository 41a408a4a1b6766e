//! `lockbox get`: print a single entry's password.

use crate::cli::output;
use crate::cli::{unlock_active, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, name: &str, details: bool) -> Result<()> {
    let (_session, unlocked) = unlock_active(cli)?;
    let store = unlocked.open_vault()?;

    let entry = store
        .get_entry(name)
        .ok_or_else(|| LockboxError::EntryNotFound(name.to_string()))?;
    let password = store.reveal_password(entry)?;

    if details {
        output::print_entry_details(entry, &password);
    } else {
        // Password alone on stdout so it can be piped.
        println!("{}", password.as_str());
    }

    Ok(())
}
