//! One module per subcommand.

pub mod add;
#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod backup;
pub mod clean;
pub mod completions;
pub mod config_cmd;
pub mod delete;
pub mod export;
pub mod generate;
pub mod get;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod login;
pub mod migrate;
pub mod restore;
pub mod search;
pub mod update;
