//! Error handling for the beacon CLI

use std::path::PathBuf;

use airplay_beacon_core::{BeaconError, ConfigError};
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Beacon(#[from] BeaconError),

    #[error("configuration file {} not found", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("Unknown key \"{key}\" in config file {}", .file.display())]
    UnknownKey { key: String, file: PathBuf },

    #[error("Invalid config file input ({key}) {value} in {}", .file.display())]
    InvalidFileValue {
        key: String,
        value: String,
        file: PathBuf,
    },

    #[error("Invalid input ({key}) {value}")]
    InvalidArgument { key: String, value: String },

    #[error("Invalid IPv4 address \"{0}\"")]
    InvalidIpv4(String),

    #[error("failed to obtain local ipv4 address: enter it with option --ipv4 ... ({0})")]
    Ipv4Detection(String),

    #[error("Could not determine the home directory")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Beacon(BeaconError::Config(err))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
