//! `lockbox export`: write decrypted entries in plain text.
//!
//! Supported formats:
//! - `json` (default): array of `{Name, Username, Password, Notes, UpdatedAt}`,
//!   the same shape `lockbox import` reads
//! - `csv`: `name,username,password,notes,updated_at` with a header row

use std::fmt::Write as _;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{log_audit, unlock_active, Cli};
use crate::errors::{LockboxError, Result};
use crate::vault::{file, DecryptedEntry};

/// Execute the `export` command.
pub fn execute(cli: &Cli, format: &str, output_path: Option<&Path>) -> Result<()> {
    let (session, unlocked) = unlock_active(cli)?;
    let store = unlocked.open_vault()?;

    // Refuse to clobber our own files before decrypting anything.
    if let Some(dest) = output_path {
        let config_path = session.config_path();
        if same_file(dest, &config_path) || same_file(dest, unlocked.vault_path()) {
            return Err(LockboxError::CommandFailed(
                "refusing to export over the vault or config file".into(),
            ));
        }
    }

    let entries = store.export_plaintext()?;

    let content = match format {
        "json" => format_as_json(&entries)?,
        "csv" => format_as_csv(&entries),
        other => {
            return Err(LockboxError::CommandFailed(format!(
                "unknown export format '{other}' — use 'json' or 'csv'"
            )));
        }
    };

    log_audit(
        &session,
        &unlocked.config.vault_name,
        "export",
        None,
        Some(&format!("{} entries, format: {format}", entries.len())),
    );

    match output_path {
        Some(dest) => {
            file::write_atomic(dest, content.as_bytes())?;
            output::success(&format!(
                "Exported {} entries to {} (format: {format})",
                entries.len(),
                dest.display()
            ));
            output::warning("The export holds plaintext passwords. Delete it when done.");
        }
        None => {
            // Write to stdout (no success message, just raw output).
            print!("{}", content.as_str());
        }
    }

    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Format entries as pretty JSON.
fn format_as_json(entries: &[DecryptedEntry]) -> Result<Zeroizing<String>> {
    let mut text = serde_json::to_string_pretty(entries)
        .map_err(|e| LockboxError::SerializationFailed(format!("JSON export: {e}")))?;
    text.push('\n');
    Ok(Zeroizing::new(text))
}

/// Format entries as CSV with a header row.
fn format_as_csv(entries: &[DecryptedEntry]) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::from("name,username,password,notes,updated_at\n"));
    for e in entries {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&e.name),
            csv_field(&e.username),
            csv_field(&e.password),
            csv_field(&e.notes),
            e.updated_at
        );
    }
    out
}

/// Quote a field when it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
