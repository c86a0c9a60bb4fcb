//! Settings snapshot, presets and the flat attribute schema.

/// Flat key/value encoding.
pub mod attributes;
/// Settings structure and catalog identifiers.
pub mod model;
/// Built-in presets.
pub mod presets;
