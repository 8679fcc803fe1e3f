//! Platform directories for config, data and logs

use std::path::PathBuf;

use crate::constants::fs::{APP_DIR_NAME, CONFIG_FILE, DATABASE_FILE};

/// Directory holding `config.toml`
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Directory holding the rating database
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

pub fn database_file() -> PathBuf {
    data_dir().join(DATABASE_FILE)
}
