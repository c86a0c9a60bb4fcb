//! Primitive drawers.
//!
//! Drawers are stateless: they turn pattern parameters into a [`list::DrawList`] of
//! layer-local paths, text placements and image placements. Transforms, clipping, alpha and
//! compositing belong to the mode planners in [`crate::compile`].

/// Geometric shape catalog.
pub mod geometric;
/// Line gratings.
pub mod grating;
/// Draw commands.
pub mod list;
/// Text-mode reveal catalog.
pub mod overlay;
/// Overlay-pattern catalog.
pub mod patterns;
/// Text measurement and grids.
pub mod text;
