//! Configuration.
//!
//! - `settings`: plain-text runtime settings (`lockbox.toml`)
//! - `record`: the encrypted session/config record and the session gate

pub mod record;
pub mod settings;

pub use record::{
    decode_config, encode_config, is_session_valid, load_config, save_config, Config,
    DEFAULT_TIMEOUT_MS,
};
pub use settings::{default_data_dir, Settings};
