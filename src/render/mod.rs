//! Rasterization.
//!
//! [`cpu::CpuBackend`] turns a [`crate::compile::plan::FramePlan`] into a [`backend::FrameRGBA`].

/// Frame buffers.
pub mod backend;
/// Per-layer compositing kernels.
pub(crate) mod composite;
/// `vello_cpu` backend.
pub mod cpu;
