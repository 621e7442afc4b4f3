use std::path::PathBuf;
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Elevation error: {0}")]
    Elevation(#[from] ElevationError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures of the administrator bootstrap. Always fatal.
#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("administrator rights were refused: {0}")]
    Refused(String),

    #[error("administrator elevation is only supported on Windows")]
    Unsupported,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PurgeError>;
