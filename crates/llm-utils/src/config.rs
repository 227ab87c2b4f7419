//! Configuration file helpers
//!
//! Configuration in this workspace is plain JSON deserialized with serde.
//! Crates define their own config structs and load them through
//! [`load_json`], which attaches the file path to any failure.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and deserialize a JSON configuration file
///
/// # Example
///
/// ```no_run
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct AppConfig {
///     name: String,
/// }
///
/// let config: AppConfig = llm_utils::config::load_json("app.json")?;
/// # Ok::<(), llm_utils::Error>(())
/// ```
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
