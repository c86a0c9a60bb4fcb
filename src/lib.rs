//! Moiré is a parametric generative-art renderer.
//!
//! Two patterned layers are drawn over a background; the interference between them is the
//! picture. Five pattern families are available (overlay patterns, geometric shapes, repeated
//! text, line gratings and compressed text behind slits), each animated by a movement oscillator
//! and an optional scale oscillator.
//!
//! - Build or load a [`Settings`] snapshot, optionally merging a [`Preset`]
//! - Create a [`MoireEngine`] for a [`Canvas`]
//! - [`MoireEngine::tick`] once per displayed frame, or stream frames into a [`FrameSink`]
//!
//! Frames are deterministic functions of `(settings, time, canvas)`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Oscillators.
pub mod anim;
/// Custom images and fonts.
pub mod assets;
/// Frame planning.
pub mod compile;
/// Primitive drawers.
pub mod draw;
/// Frame sinks.
pub mod encode;
/// Shared types and errors.
pub mod foundation;
/// Rasterization.
pub mod render;
/// Frame drivers.
pub mod session;
/// Settings, presets and attributes.
pub mod settings;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{MoireError, MoireResult};

pub use crate::assets::text::FontBook;
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig, write_png};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::{CpuBackend, CpuBackendOpts};
pub use crate::session::engine::{EngineOpts, EngineState, MoireEngine};
pub use crate::session::export::{
    export_sequence, render_sequence, sequence_time, sequence_times,
};
pub use crate::settings::attributes::{Attributes, from_attributes, to_attributes};
pub use crate::settings::model::{BlendMode, Mode, Settings};
pub use crate::settings::presets::Preset;
