//! The runner configuration record.
//!
//! A packaged application carries a small JSON file next to its runner
//! executable:
//!
//! ```json
//! {"name":"GitHub","width":1200,"height":800,"url":"https://github.com"}
//! ```
//!
//! The field names on disk (`name`, `url`) differ from the names used in
//! code (`title`, `target`).  Serde's `rename` attribute keeps the wire names
//! stable while the Rust names describe what the values are used for.
//!
//! There is no versioning field.  A missing key is reported as an ordinary
//! parse failure; unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed file name of the configuration record, located beside the runner.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error type for reading, parsing, and writing the configuration record.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read (most commonly: it does not exist).
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a JSON object of the expected shape.
    #[error("failed to parse config JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Width or height is zero.
    #[error("window dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The record could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Everything a runner needs to know to open its window.
///
/// Immutable once loaded.  Created once at process start and consumed by the
/// launch sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfiguration {
    /// Window title.
    #[serde(rename = "name")]
    pub title: String,
    /// Initial window width in logical pixels.  Always positive.
    pub width: u32,
    /// Initial window height in logical pixels.  Always positive.
    pub height: u32,
    /// Either a remote URL or a path relative to the serving root.
    #[serde(rename = "url")]
    pub target: String,
}

impl AppConfiguration {
    /// Creates and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDimensions`] if either dimension is zero.
    pub fn new(
        title: impl Into<String>,
        width: u32,
        height: u32,
        target: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            title: title.into(),
            width,
            height,
            target: target.into(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses and validates a configuration record from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the bytes are not the expected JSON
    /// object and [`ConfigError::InvalidDimensions`] if a dimension is zero.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: AppConfiguration = serde_json::from_slice(bytes).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serializes the record exactly as a packaging tool writes it beside the
    /// runner (compact, single line).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Checks the invariants that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDimensions`] if either dimension is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns the location of the configuration record for a runner
    /// executable at `executable`.
    ///
    /// The record always sits in the executable's own directory, even inside
    /// a nested application bundle.
    pub fn path_beside(executable: &Path) -> PathBuf {
        executable
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
