//! Geographic extents tagged with a coordinate reference system.
//!
//! An [`Extent`] bounds both the geometry a layer was built from and the
//! area covered by a tile. Extents can be reprojected between the supported
//! reference systems ([`Crs`]) and tested for intersection, which is what
//! drives tile culling.
//!
//! # Example
//!
//! ```
//! use geotex::extent::{Crs, Extent};
//!
//! let layer = Extent::new(Crs::Wgs84, 1.0, 2.0, 43.0, 44.0).unwrap();
//! let tile = Extent::new(Crs::Wgs84, 1.5, 3.0, 43.5, 45.0).unwrap();
//! assert!(layer.intersects(&tile));
//!
//! let mercator = layer.as_projection("EPSG:3857").unwrap();
//! assert_eq!(mercator.crs(), Crs::WebMercator);
//! ```

mod bounds;
mod crs;

pub use bounds::{Bounds, Extent};
pub use crs::Crs;

use thiserror::Error;

/// Errors raised while building or reprojecting extents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtentError {
    /// Bounds are inverted, not finite, or not numbers at all.
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    /// The reference system identifier is not one this crate can transform.
    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),
}
