//! `lockbox generate`: print a random password, optionally storing it.
//!
//! A bare `generate` needs no vault and no session.  With `--add NAME`
//! the password is stored as a new entry, which requires an active
//! session.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, unlock_active, Cli};
use crate::crypto::generate_password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(
    cli: &Cli,
    length: usize,
    special: &str,
    no_special: bool,
    add: Option<&str>,
    username: &str,
) -> Result<()> {
    let special = if no_special { "" } else { special };
    let password = generate_password(length, special)?;

    let Some(name) = add else {
        println!("{}", password.as_str());
        return Ok(());
    };

    let (session, unlocked) = unlock_active(cli)?;
    let mut store = unlocked.open_vault()?;
    store.add_entry(name, username, &password, "", now_millis())?;
    store.save()?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "add",
        Some(name),
        Some("generated"),
    );

    output::success(&format!("Generated password stored as '{name}'"));
    output::tip(&format!("Run `lockbox get {name}` to see it."));

    Ok(())
}
