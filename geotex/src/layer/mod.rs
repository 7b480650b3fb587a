//! Vector layers.
//!
//! A layer goes through two phases. A [`RawLayerConfig`] holds what the
//! application declared (source content, projection, optional extent, style,
//! zoom range). [`preprocess`] turns it once into an immutable
//! [`PreparedLayer`] holding the detected format, normalized geometry and
//! extent; tile rendering only ever reads prepared layers, usually through an
//! `Arc` shared between concurrent requests.
//!
//! [`LayerLoader`] runs the whole thing asynchronously from a
//! [`LayerDescriptor`]: fetch the source, then preprocess on the blocking
//! pool, abandoning the work when its cancellation token fires.

mod descriptor;
mod loader;
mod prepare;

pub use descriptor::{LayerDescriptor, LayerOptions, LayerType, RawLayerConfig};
pub use loader::{FileFetcher, LayerLoader, LoadError, SourceFetcher};
pub use prepare::{preprocess, PreparedLayer};

use thiserror::Error;

use crate::extent::ExtentError;
use crate::format::FormatError;
use crate::geometry::GeometryError;
use crate::style::StyleError;

/// Errors that abort layer registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    /// A required configuration field is absent.
    #[error("Layer configuration is missing '{0}'")]
    MissingField(&'static str),

    /// The source is neither KML, GPX nor GeoJSON.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    MalformedGeometry(#[from] GeometryError),

    /// Invalid extent or unknown reference system.
    #[error(transparent)]
    Extent(#[from] ExtentError),

    #[error("Invalid style: {0}")]
    InvalidStyle(#[from] StyleError),
}

impl From<FormatError> for PreprocessError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::UnsupportedFormat(msg) => PreprocessError::UnsupportedFormat(msg),
            FormatError::Geometry(e) => PreprocessError::MalformedGeometry(e),
            FormatError::Extent(e) => PreprocessError::Extent(e),
        }
    }
}
