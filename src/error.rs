//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The query API answered with an error body
    #[error("API error: {0}")]
    Api(String),

    /// Data source errors
    #[error("Data source error: {0}")]
    DataSource(String),

    /// JSON / record decoding errors
    #[error("Parser error: {0}")]
    Parser(String),

    /// A theme colour that looks like HSL but does not parse
    #[error("Malformed colour {0:?}: expected hsl(H, S%, L%)")]
    MalformedColor(String),

    /// User input rejected by the validator before any request was issued
    #[error("Invalid {kind}: {value}")]
    InvalidInput { kind: &'static str, value: String },

    /// TUI/visualization errors
    #[error("TUI error: {0}")]
    Tui(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file parsing errors
    #[error("Config parsing error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Missing configuration
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a data source error
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Create an input validation error
    pub fn invalid_input(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            kind,
            value: value.into(),
        }
    }

    /// Check if the error was raised before any request left the process
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse {
            file: PathBuf::from("unknown"),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parser(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
