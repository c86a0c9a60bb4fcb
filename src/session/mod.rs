//! Frame driving.
//!
//! [`engine::MoireEngine`] is the interactive driver: it owns time, the surface size, the
//! settings snapshot and the caches. [`export::render_sequence`] renders a time sequence offline,
//! in parallel.

/// Interactive frame driver.
pub mod engine;
/// Offline sequence rendering.
pub mod export;
