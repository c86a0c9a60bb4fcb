//! External inputs: custom overlay images and fonts.

/// Custom image slots and their background loader.
pub mod custom;
/// Raster and SVG decoding.
pub mod decode;
/// SVG rasterization.
pub mod svg_raster;
/// Font resolution and shaping.
pub mod text;
