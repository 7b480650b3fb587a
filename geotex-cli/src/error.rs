//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geotex::config::ConfigFileError;
use geotex::coord::CoordError;
use geotex::layer::{LoadError, PreprocessError};
use geotex::provider::ProviderError;
use geotex::texture::TextureError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read
    Config(ConfigFileError),
    /// Layer descriptor could not be read or parsed
    Descriptor { path: String, reason: String },
    /// Tile coordinates outside the grid
    InvalidTile(CoordError),
    /// Failed to fetch or prepare the layer
    Load(LoadError),
    /// Failed to render the tile
    Render(ProviderError),
    /// Failed to encode the texture
    Encode(TextureError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
    /// Failed to install the Ctrl-C handler
    Signal(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Load(LoadError::Preprocess(PreprocessError::UnsupportedFormat(_))) => {
                eprintln!();
                eprintln!("Supported layer sources:");
                eprintln!("  KML documents with a <kml> root element");
                eprintln!("  GPX 1.0/1.1 documents with a <gpx> root element");
                eprintln!("  GeoJSON Feature or FeatureCollection objects");
            }
            CliError::Render(ProviderError::TileOutOfBounds { .. }) => {
                eprintln!();
                eprintln!("Check the layer's zoom range and extent with: geotex inspect <file>");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Descriptor { path, reason } => {
                write!(f, "Invalid layer descriptor '{}': {}", path, reason)
            }
            CliError::InvalidTile(e) => write!(f, "Invalid tile: {}", e),
            CliError::Load(e) => write!(f, "Failed to load layer: {}", e),
            CliError::Render(e) => write!(f, "Failed to render tile: {}", e),
            CliError::Encode(e) => write!(f, "Failed to encode texture: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InvalidTile(e) => Some(e),
            CliError::Load(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Encode(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::Load(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Render(e)
    }
}

impl From<TextureError> for CliError {
    fn from(e: TextureError) -> Self {
        CliError::Encode(e)
    }
}
