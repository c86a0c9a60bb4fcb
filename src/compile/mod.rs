//! Frame planning.
//!
//! [`compiler::compile_frame`] turns `(settings, time, canvas)` into a [`plan::FramePlan`]: the
//! background, the canvas rotation and exactly two layer passes with their clip, transform,
//! opacity, blend mode, color and draw list.

/// Mode planners.
pub mod compiler;
/// Base-layer fingerprinting.
pub mod fingerprint;
/// Plan types.
pub mod plan;
