//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::{default_data_dir, Settings};
use crate::crypto::Salt;
use crate::errors::{LockboxError, Result};
use crate::keyring::KeyringSeedStore;
use crate::session::{Session, Unlocked};

/// Minimum master password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "LOCKBOX_PASSWORD";

/// The seed lives in the OS keyring for every CLI invocation.
static KEYRING: KeyringSeedStore = KeyringSeedStore;

/// Lockbox CLI: local encrypted password manager.
#[derive(Parser)]
#[command(name = "lockbox", about = "Local encrypted password manager", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.local/lockbox)
    #[arg(long, env = "LOCKBOX_HOME", global = true)]
    pub data_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the seed, an empty vault and the config
    Init,

    /// Verify the master password and start a new session
    Login,

    /// Add a new entry
    Add {
        /// Entry name (e.g. github)
        name: String,
        /// Username for the entry
        #[arg(short, long, default_value = "")]
        username: String,
        /// Free-form notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Password value (omit for piped input or a prompt)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password instead of asking for one
        #[arg(short, long)]
        generate: bool,
        /// Length of a generated password
        #[arg(long, default_value = "16")]
        length: usize,
    },

    /// Print an entry's password
    Get {
        /// Entry name
        name: String,
        /// Also show username, notes and last update
        #[arg(short, long)]
        details: bool,
    },

    /// List all entries
    List,

    /// Find entries whose name contains a term (case-insensitive)
    Search {
        /// Search term
        term: String,
    },

    /// Change fields of an existing entry
    Update {
        /// Entry name
        name: String,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
        /// New password value
        #[arg(short, long, conflicts_with_all = ["generate", "prompt_password"])]
        password: Option<String>,
        /// Prompt for a new password
        #[arg(long, conflicts_with = "generate")]
        prompt_password: bool,
        /// Replace the password with a generated one
        #[arg(short, long)]
        generate: bool,
        /// Length of a generated password
        #[arg(long, default_value = "16")]
        length: usize,
    },

    /// Delete an entry
    Delete {
        /// Entry name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length
        #[arg(short, long, default_value = "16")]
        length: usize,
        /// Special characters to draw from
        #[arg(long, default_value = crate::crypto::generator::DEFAULT_SPECIAL_CHARS)]
        special: String,
        /// Letters and digits only
        #[arg(long, conflicts_with = "special")]
        no_special: bool,
        /// Store the password as a new entry with this name
        #[arg(long)]
        add: Option<String>,
        /// Username for the stored entry
        #[arg(short, long, default_value = "")]
        username: String,
    },

    /// Write an encrypted copy of the vault to the backup directory
    Backup {
        /// List existing backups instead of creating one
        #[arg(long)]
        list: bool,
    },

    /// Replace the vault with a backup
    Restore {
        /// Backup file name (choose interactively if omitted)
        name: Option<String>,
        /// Overwrite a vault that still holds entries
        #[arg(short, long)]
        force: bool,
    },

    /// Export decrypted entries (plaintext!)
    Export {
        /// Output format: json (default) or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import entries from a JSON export
    Import {
        /// Path to the file to import
        file: PathBuf,
    },

    /// Convert files from the legacy hex format
    Migrate,

    /// Remove the vault and config from this machine
    Clean {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
        /// Also remove the seed from the OS keyring
        #[arg(long)]
        delete_seed: bool,
    },

    /// View or change the session config
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },
}

/// Config subcommands.
#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Show vault name, session timeout and expiry
    View,

    /// Change the session timeout
    Timeout {
        /// Hours part of the new timeout
        #[arg(long, default_value = "0")]
        hours: u32,
        /// Minutes part of the new timeout
        #[arg(long, default_value = "0")]
        minutes: u32,
    },

    /// Change the master password
    ChangePassword,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Resolve the data directory from `--data-dir` / `LOCKBOX_HOME` or the
/// default location.
pub fn data_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir(),
    }
}

/// Build a session for the data directory, reading settings and the salt.
pub fn session(cli: &Cli) -> Result<Session<'static>> {
    let data_dir = data_dir(cli)?;
    let settings = Settings::load(&data_dir)?;
    let salt = Salt::from_env()?;
    Ok(Session::new(&data_dir, settings, &KEYRING, salt))
}

/// Prompt for the password and open a session that must still be active.
///
/// Everything except `init`, `login` and `migrate` goes through here.
pub fn unlock_active(cli: &Cli) -> Result<(Session<'static>, Unlocked)> {
    let session = require_initialized(cli)?;
    let password = prompt_password()?;
    match session.open_active(password.as_bytes(), now_millis()) {
        Ok(unlocked) => Ok((session, unlocked)),
        Err(e @ LockboxError::SessionExpired) => {
            output::tip("Run `lockbox login` to start a new session.");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Build a session and fail early when nothing has been initialized.
pub fn require_initialized(cli: &Cli) -> Result<Session<'static>> {
    let session = session(cli)?;
    if !session.is_initialized() {
        return Err(LockboxError::NotInitialized(session.data_dir().to_path_buf()));
    }
    Ok(session)
}

/// Log an audit event.  A no-op when built without the `audit-log` feature.
pub fn log_audit(
    session: &Session<'_>,
    vault: &str,
    op: &str,
    entry: Option<&str>,
    details: Option<&str>,
) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(session.data_dir(), now_millis(), op, vault, entry, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (session, vault, op, entry, details);
}

/// Get the master password, trying in order:
/// 1. `LOCKBOX_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    prompt_password_with("Enter master password")
}

/// Same as [`prompt_password`] with a custom prompt.
pub fn prompt_password_with(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` lets scripted callers supply it without a terminal.
/// Enforces a minimum password length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            check_password_length(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?;

        if check_password_length(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LockboxError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Read an entry password from one of three sources: an inline value,
/// piped stdin, or a hidden prompt with confirmation.
pub fn read_entry_password(name: &str, inline: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Password provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {name}"))
        .with_confirmation("Confirm password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
