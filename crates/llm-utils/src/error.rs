//! Error types for llm-utils

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for llm-utils
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shared utilities
#[derive(Error, Debug)]
pub enum Error {
    /// A dynamically assembled logger lacks one or more leveled operations
    #[error("Logger '{name}' is incomplete: missing {}", .missing.join(", "))]
    IncompleteLogger {
        name: String,
        missing: Vec<&'static str>,
    },

    /// Config file could not be read
    #[error("Failed to read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected shape
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
