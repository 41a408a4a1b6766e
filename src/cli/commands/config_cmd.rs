//! `lockbox config`: view the session config, change the timeout or the
//! master password.

use crate::cli::output;
use crate::cli::{
    log_audit, now_millis, prompt_new_password, prompt_password_with, require_initialized,
    unlock_active, Cli, PASSWORD_ENV,
};
use crate::errors::{LockboxError, Result};

/// Environment variable holding the new password for a scripted
/// `config change-password`.
pub const NEW_PASSWORD_ENV: &str = "LOCKBOX_NEW_PASSWORD";

/// Execute `config view`.
pub fn view(cli: &Cli) -> Result<()> {
    let (_session, unlocked) = unlock_active(cli)?;
    let config = &unlocked.config;

    output::info("Config");
    println!("  Vault name:      {}", config.vault_name);
    println!("  Master password: ******");
    println!("  Timeout:         {}", output::format_duration_ms(config.timeout));
    println!("  Last login:      {}", output::format_millis(config.last_visited));
    println!("  Session ends:    {}", output::format_millis(config.expires_at()));

    Ok(())
}

/// Execute `config timeout`.
pub fn timeout(cli: &Cli, hours: u32, minutes: u32) -> Result<()> {
    let timeout_ms = timeout_millis(hours, minutes)?;

    let (session, mut unlocked) = unlock_active(cli)?;
    unlocked.set_timeout(timeout_ms)?;

    let shown = output::format_duration_ms(timeout_ms);
    log_audit(
        &session,
        &unlocked.config.vault_name,
        "timeout",
        None,
        Some(&shown),
    );
    output::success(&format!("Session timeout set to {shown}"));

    Ok(())
}

/// Execute `config change-password`.
///
/// Every entry is re-encrypted under the key derived from the new password.
pub fn change_password(cli: &Cli) -> Result<()> {
    let session = require_initialized(cli)?;
    let old = prompt_password_with("Enter current master password")?;
    let unlocked = session.open_active(old.as_bytes(), now_millis())?;

    output::info("Choose your new master password.");
    let new = prompt_new_password(NEW_PASSWORD_ENV)?;

    if old.as_str() == new.as_str() {
        return Err(LockboxError::CommandFailed(
            "new password is the same as the current one".into(),
        ));
    }

    let unlocked = session.change_passphrase(unlocked, old.as_bytes(), new.as_bytes(), now_millis())?;

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "change-password",
        None,
        None,
    );
    output::success("Master password changed.");
    if std::env::var_os(PASSWORD_ENV).is_some() {
        output::tip(&format!("Remember to update {PASSWORD_ENV}."));
    }

    Ok(())
}

/// Hours + minutes as milliseconds; zero is rejected.
fn timeout_millis(hours: u32, minutes: u32) -> Result<i64> {
    let ms = (i64::from(hours) * 60 + i64::from(minutes)) * 60 * 1000;
    if ms == 0 {
        return Err(LockboxError::CommandFailed(
            "timeout must be greater than zero — pass --hours and/or --minutes".into(),
        ));
    }
    Ok(ms)
}
