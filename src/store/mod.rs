mod config_file;
mod settings;
mod store_error;

pub use config_file::ConfigFile;
pub use settings::{SearchSettings, TwilioSettings};
pub use store_error::ConfigError;
