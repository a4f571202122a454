mod error;
mod loader;
pub mod types;
mod validate;

pub use error::{ConfigError, ValidationIssue};
pub use loader::{load_config, load_config_file};
pub use types::{ConfigOverrides, HitwatchConfig};
pub use validate::validate_config;
