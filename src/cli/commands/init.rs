//! `lockbox init`: create the seed, an empty vault and the config.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, prompt_new_password, session, Cli, PASSWORD_ENV};
use crate::errors::{LockboxError, Result};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = session(cli)?;

    // 1. Refuse before prompting if a config already exists.
    if session.is_initialized() {
        output::tip("Use `lockbox login` to start a session with the existing vault.");
        return Err(LockboxError::AlreadyInitialized(session.config_path()));
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 3. Seed, key, empty vault, config.
    let unlocked = session.initialize(password.as_bytes(), now_millis())?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "init",
        None,
        Some("vault created"),
    );

    output::success(&format!(
        "Vault created at {}",
        unlocked.vault_path().display()
    ));
    output::tip("Run `lockbox add <NAME>` to add an entry.");
    output::tip("Run `lockbox list` to see all entries.");

    Ok(())
}
