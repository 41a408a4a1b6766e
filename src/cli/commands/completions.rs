//! `lockbox completions`: generate shell completion scripts.
//!
//! Usage:
//!   lockbox completions bash > ~/.local/share/bash-completion/completions/lockbox
//!   lockbox completions zsh
//!   lockbox completions fish

use std::io::{self, Write};

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{LockboxError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    write_completions(parse_shell(shell)?, &mut io::stdout())
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
    Ok(())
}

/// Shell names as accepted on the command line ("ps" is PowerShell).
fn parse_shell(name: &str) -> Result<Shell> {
    let wanted = name.trim().to_ascii_lowercase();
    let wanted = if wanted == "ps" { "powershell".to_string() } else { wanted };

    Shell::value_variants()
        .iter()
        .copied()
        .find(|s| s.to_string() == wanted)
        .ok_or_else(|| {
            LockboxError::CommandFailed(format!(
                "unknown shell '{name}' — supported: bash, zsh, fish, powershell, elvish"
            ))
        })
}
