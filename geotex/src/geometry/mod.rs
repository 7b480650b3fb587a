//! Canonical vector geometry.
//!
//! Every supported input format ends up as GeoJSON and is then normalized
//! here into [`NormalizedGeometry`]: a flat list of point, line and polygon
//! features in the layer's reference system, each carrying its own extent,
//! plus the aggregate extent of the whole layer.

mod normalize;
mod types;

pub use normalize::{normalize, NormalizeOptions};
pub use types::{GeometryKind, NormalizedFeature, NormalizedGeometry, Polygon, Shape};

use thiserror::Error;

/// Errors raised while reading coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A feature's coordinate sequence cannot be read.
    #[error("Malformed geometry in feature {feature}: {reason}")]
    MalformedGeometry { feature: usize, reason: String },

    /// The document is not valid GeoJSON at all.
    #[error("Malformed GeoJSON document: {0}")]
    MalformedDocument(String),
}

impl GeometryError {
    pub(crate) fn malformed(feature: usize, reason: impl Into<String>) -> Self {
        GeometryError::MalformedGeometry {
            feature,
            reason: reason.into(),
        }
    }
}
