//! `lockbox login`: verify the master password and start a new session.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, prompt_password, require_initialized, Cli};
use crate::errors::Result;

/// Execute the `login` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = require_initialized(cli)?;
    let password = prompt_password()?;

    let unlocked = session.login(password.as_bytes(), now_millis())?;

    log_audit(&session, &unlocked.config.vault_name, "login", None, None);

    output::success(&format!(
        "Logged in. Session valid until {}",
        output::format_millis(unlocked.config.expires_at())
    ));

    Ok(())
}
