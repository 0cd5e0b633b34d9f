//! Settings module
//!
//! Settings live in a process wide [`GLOBAL`] slot and are read through
//! [`Settings::current`]. Files may be written in TOML or YAML.

pub mod file_settings;
pub mod settings_struct;

use thiserror::Error;

pub use file_settings::FileSettings;
pub use settings_struct::{
    update_settings_from_content, update_settings_from_file, Settings, GLOBAL,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
