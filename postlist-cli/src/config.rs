//! Loading the table config from disk.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use log::info;
use postlist_lib::TableConfig;

use crate::paths;

/// Errors reading `config.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads the table config from the platform config dir.
///
/// A missing file yields the defaults.
pub fn load() -> Result<TableConfig, ConfigError> {
    match paths::config_file() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(TableConfig::default()),
    }
}

/// Loads the table config from `path`.
pub fn load_from(path: &Path) -> Result<TableConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
