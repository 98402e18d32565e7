//! Command implementations for `ts-cli`.

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod checkout;
pub mod quote;
pub mod rates;

/// Errors reading command input files.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Read and deserialize a YAML (or JSON) file.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: display.clone(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| InputError::Yaml {
        path: display,
        source,
    })
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
