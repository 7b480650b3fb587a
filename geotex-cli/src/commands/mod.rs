//! CLI command implementations.
//!
//! - [`inspect`] - Load a layer source and print what was found
//! - [`render`] - Render one tile of a layer to a PNG file

pub mod common;
pub mod inspect;
pub mod render;
