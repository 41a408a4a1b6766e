//! `lockbox import`: append entries from a JSON export.
//!
//! The file must be a JSON array of `{Name, Username, Password, Notes,
//! UpdatedAt}` objects, as written by `lockbox export`.  Entries are
//! appended; existing entries with the same name are kept.

use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{log_audit, now_millis, unlock_active, Cli};
use crate::errors::{LockboxError, Result};
use crate::vault::DecryptedEntry;

/// Execute the `import` command.
pub fn execute(cli: &Cli, source: &Path) -> Result<()> {
    if !source.exists() {
        return Err(LockboxError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let entries = parse_json_file(source)?;
    if entries.is_empty() {
        output::warning("No entries found in the import file.");
        return Ok(());
    }

    let (session, unlocked) = unlock_active(cli)?;
    let mut store = unlocked.open_vault()?;

    let count = store.import_plaintext(&entries, now_millis())?;
    store.save()?;

    for e in &entries {
        output::info(&format!("  + {}", e.name));
    }

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "import",
        None,
        Some(&format!("{count} entries from {}", source.display())),
    );

    output::success(&format!(
        "Imported {count} entries from {} ({} total)",
        source.display(),
        store.len()
    ));

    Ok(())
}

/// Parse an exported JSON array.
fn parse_json_file(path: &Path) -> Result<Vec<DecryptedEntry>> {
    let content = Zeroizing::new(std::fs::read_to_string(path)?);
    serde_json::from_str(&content).map_err(|e| {
        LockboxError::SerializationFailed(format!("invalid import file {}: {e}", path.display()))
    })
}
