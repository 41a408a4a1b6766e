use clap::Parser;
use lockbox::cli::commands::{add::AddArgs, update::UpdateArgs};
use lockbox::cli::{Cli, Commands, ConfigAction};
use lockbox::errors::LockboxError;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => lockbox::cli::commands::init::execute(&cli),
        Commands::Login => lockbox::cli::commands::login::execute(&cli),
        Commands::Add {
            ref name,
            ref username,
            ref notes,
            ref password,
            generate,
            length,
        } => lockbox::cli::commands::add::execute(
            &cli,
            &AddArgs {
                name,
                username,
                notes,
                password: password.as_deref(),
                generate,
                length,
            },
        ),
        Commands::Get { ref name, details } => {
            lockbox::cli::commands::get::execute(&cli, name, details)
        }
        Commands::List => lockbox::cli::commands::list::execute(&cli),
        Commands::Search { ref term } => lockbox::cli::commands::search::execute(&cli, term),
        Commands::Update {
            ref name,
            ref username,
            ref notes,
            ref password,
            prompt_password,
            generate,
            length,
        } => lockbox::cli::commands::update::execute(
            &cli,
            &UpdateArgs {
                name,
                username: username.as_deref(),
                notes: notes.as_deref(),
                password: password.as_deref(),
                prompt_password,
                generate,
                length,
            },
        ),
        Commands::Delete { ref name, force } => {
            lockbox::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Generate {
            length,
            ref special,
            no_special,
            ref add,
            ref username,
        } => lockbox::cli::commands::generate::execute(
            &cli,
            length,
            special,
            no_special,
            add.as_deref(),
            username,
        ),
        Commands::Backup { list } => lockbox::cli::commands::backup::execute(&cli, list),
        Commands::Restore { ref name, force } => {
            lockbox::cli::commands::restore::execute(&cli, name.as_deref(), force)
        }
        Commands::Export {
            ref format,
            ref output,
        } => lockbox::cli::commands::export::execute(&cli, format, output.as_deref()),
        Commands::Import { ref file } => lockbox::cli::commands::import_cmd::execute(&cli, file),
        Commands::Migrate => lockbox::cli::commands::migrate::execute(&cli),
        Commands::Clean { force, delete_seed } => {
            lockbox::cli::commands::clean::execute(&cli, force, delete_seed)
        }
        Commands::Config { ref action } => match action {
            ConfigAction::View => lockbox::cli::commands::config_cmd::view(&cli),
            ConfigAction::Timeout { hours, minutes } => {
                lockbox::cli::commands::config_cmd::timeout(&cli, *hours, *minutes)
            }
            ConfigAction::ChangePassword => {
                lockbox::cli::commands::config_cmd::change_password(&cli)
            }
        },
        Commands::Completions { ref shell } => lockbox::cli::commands::completions::execute(shell),
        Commands::Audit { last, ref since } => run_audit(&cli, last, since.as_deref()),
    };

    if let Err(e) = result {
        lockbox::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(feature = "audit-log")]
fn run_audit(cli: &Cli, last: usize, since: Option<&str>) -> Result<(), LockboxError> {
    lockbox::cli::commands::audit_cmd::execute(cli, last, since)
}

#[cfg(not(feature = "audit-log"))]
fn run_audit(_cli: &Cli, _last: usize, _since: Option<&str>) -> Result<(), LockboxError> {
    Err(LockboxError::AuditError(
        "this build has no audit log (enable the `audit-log` feature)".into(),
    ))
}
