//! `lockbox audit`: display the audit log.
//!
//! Usage:
//!   lockbox audit               # show last 50 entries
//!   lockbox audit --last 20     # show last 20
//!   lockbox audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::{data_dir, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let cutoff = since
        .map(|s| since_cutoff(s, Utc::now()).map(|at| at.timestamp_millis()))
        .transpose()?;

    let data_dir = data_dir(cli)?;
    // Don't create a database just to report that it is empty.
    if !AuditLog::db_path(&data_dir).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&data_dir)
        .ok_or_else(|| LockboxError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last, cutoff)?;
    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Turn "2w", "7d", "24h" or "30m" into the instant that far before `now`.
fn since_cutoff(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        LockboxError::CommandFailed(format!(
            "invalid duration '{input}' — use format like 2w, 7d, 24h, or 30m"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'w' => Duration::try_weeks(amount),
        'd' => Duration::try_days(amount),
        'h' => Duration::try_hours(amount),
        'm' => Duration::try_minutes(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    now.checked_sub_signed(span).ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Vault", "Entry", "Details"]);

    for entry in entries {
        table.add_row(vec![
            output::format_millis(entry.at_ms),
            colorize_operation(&entry.operation),
            entry.vault.clone(),
            entry.entry_name.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    match op {
        "init" | "login" => style(op).green().to_string(),
        "add" | "update" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "change-password" | "migrate" | "timeout" => style(op).yellow().to_string(),
        "export" | "import" => style(op).cyan().to_string(),
        "backup" | "restore" => style(op).magenta().to_string(),
        _ => op.to_string(),
    }
}
