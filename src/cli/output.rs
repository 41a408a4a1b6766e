//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::VaultEntry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Format epoch milliseconds as local time.
pub fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Format a millisecond span as "H hours M minutes".
pub fn format_duration_ms(ms: i64) -> String {
    let total_minutes = ms.max(0) / 60_000;
    format!("{} hours {} minutes", total_minutes / 60, total_minutes % 60)
}

/// Print a table of entries (Name, Username, Updated).  Passwords are
/// never shown here.
pub fn print_entries_table(entries: &[&VaultEntry]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `lockbox add <NAME>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Username", "Updated"]);

    for e in entries {
        table.add_row(vec![
            e.name.clone(),
            e.username.clone(),
            format_millis(e.updated_at),
        ]);
    }

    println!("{table}");
}

/// Print one entry with its decrypted password.
pub fn print_entry_details(entry: &VaultEntry, password: &str) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Name", entry.name.as_str()]);
    table.add_row(vec!["Username", entry.username.as_str()]);
    table.add_row(vec!["Password", password]);
    table.add_row(vec!["Notes", entry.notes.as_str()]);
    table.add_row(vec!["Updated".to_string(), format_millis(entry.updated_at)]);
    println!("{table}");
}
