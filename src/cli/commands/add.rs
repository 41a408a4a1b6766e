//! `lockbox add`: append a new entry to the vault.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, read_entry_password, unlock_active, Cli};
use crate::crypto::generator::DEFAULT_SPECIAL_CHARS;
use crate::crypto::generate_password;
use crate::errors::Result;

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub notes: &'a str,
    pub password: Option<&'a str>,
    pub generate: bool,
    pub length: usize,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: &AddArgs<'_>) -> Result<()> {
    let (session, unlocked) = unlock_active(cli)?;
    let mut store = unlocked.open_vault()?;

    if store.get_entry(args.name).is_some() {
        output::warning(&format!(
            "An entry named '{}' already exists; adding another one.",
            args.name
        ));
    }

    let password = if args.generate {
        generate_password(args.length, DEFAULT_SPECIAL_CHARS)?
    } else {
        read_entry_password(args.name, args.password)?
    };

    store.add_entry(args.name, args.username, &password, args.notes, now_millis())?;
    store.save()?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "add",
        Some(args.name),
        None,
    );

    output::success(&format!(
        "Entry '{}' added ({} total)",
        args.name,
        store.len()
    ));
    if args.generate {
        output::tip(&format!("Run `lockbox get {}` to see the password.", args.name));
    }

    Ok(())
}
