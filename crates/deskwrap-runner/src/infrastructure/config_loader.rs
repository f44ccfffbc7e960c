//! Reads the configuration record from disk.
//!
//! The record is a boot-time dependency: there is no default configuration
//! and no retry.  Any failure here is reported to the caller, which treats it
//! as fatal.

use std::path::Path;

use deskwrap_core::{AppConfiguration, ConfigError};
use tracing::debug;

/// Loads and validates the configuration record at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist), [`ConfigError::Parse`] if it is not the expected JSON
/// object, and [`ConfigError::InvalidDimensions`] for a zero width or height.
pub async fn load_config(path: &Path) -> Result<AppConfiguration, ConfigError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes of configuration from {}", bytes.len(), path.display());
    AppConfiguration::from_json(&bytes)
}
