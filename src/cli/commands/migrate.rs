//! `lockbox migrate`: convert legacy hex files to the current format.
//!
//! Legacy files were sealed with the raw `LOCKBOX_SECRET_KEY` bytes.  The
//! master password is checked against the hash in the legacy config, then
//! both files are re-encrypted under the seed-derived key.  The originals
//! stay next to them as `*.legacy`.

use crate::cli::output;
use crate::cli::{log_audit, now_millis, prompt_password, require_initialized, Cli};
use crate::errors::Result;
use crate::session::LEGACY_SUFFIX;

/// Execute the `migrate` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let session = require_initialized(cli)?;
    let password = prompt_password()?;

    let migrated = session.migrate(password.as_bytes(), now_millis())?;

    log_audit(
        &session,
        &migrated.config.vault_name,
        "migrate",
        None,
        Some(&format!("{} entries", migrated.entries)),
    );

    output::success(&format!(
        "Migrated {} entries in {}",
        migrated.entries, migrated.config.vault_name
    ));
    output::tip(&format!(
        "The original files were kept with a .{LEGACY_SUFFIX} suffix."
    ));

    Ok(())
}
