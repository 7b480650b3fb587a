//! Configuration file handling.
//!
//! ```ini
//! [raster]
//! stroke_width = 2.0
//! point_radius = 4.0
//! anti_alias = true
//!
//! [layer]
//! min_zoom = 5
//! max_zoom = 21
//! ```

use std::path::Path;

use ini::Ini;
use thiserror::Error;

use super::layer::LayerDefaults;
use super::raster::RasterConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings loaded from an INI file, layered over the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigFile {
    pub raster: RasterConfig,
    pub layer: LayerDefaults,
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}
