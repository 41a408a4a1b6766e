//! `lockbox update`: change fields of an existing entry.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, read_entry_password, unlock_active, Cli};
use crate::crypto::generator::DEFAULT_SPECIAL_CHARS;
use crate::crypto::generate_password;
use crate::errors::{LockboxError, Result};
use crate::vault::EntryUpdate;

/// Arguments of the `update` command.
pub struct UpdateArgs<'a> {
    pub name: &'a str,
    pub username: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub password: Option<&'a str>,
    pub prompt_password: bool,
    pub generate: bool,
    pub length: usize,
}

/// Execute the `update` command.
pub fn execute(cli: &Cli, args: &UpdateArgs<'_>) -> Result<()> {
    let no_password_change = args.password.is_none() && !args.prompt_password && !args.generate;
    if args.username.is_none() && args.notes.is_none() && no_password_change {
        return Err(LockboxError::CommandFailed(
            "nothing to update — pass --username, --notes, --password, --prompt-password or --generate"
                .into(),
        ));
    }

    let (session, unlocked) = unlock_active(cli)?;
    let mut store = unlocked.open_vault()?;

    if store.get_entry(args.name).is_none() {
        return Err(LockboxError::EntryNotFound(args.name.to_string()));
    }

    let password = if args.generate {
        Some(generate_password(args.length, DEFAULT_SPECIAL_CHARS)?)
    } else if args.password.is_some() || args.prompt_password {
        Some(read_entry_password(args.name, args.password)?)
    } else {
        None
    };

    let changes = EntryUpdate {
        username: args.username.map(str::to_string),
        password,
        notes: args.notes.map(str::to_string),
    };

    let mut fields = Vec::new();
    if changes.username.is_some() {
        fields.push("username");
    }
    if changes.password.is_some() {
        fields.push("password");
    }
    if changes.notes.is_some() {
        fields.push("notes");
    }
    let details = fields.join(", ");

    store.update_entry(args.name, changes, now_millis())?;
    store.save()?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "update",
        Some(args.name),
        Some(&details),
    );

    output::success(&format!("Entry '{}' updated ({details})", args.name));

    Ok(())
}
