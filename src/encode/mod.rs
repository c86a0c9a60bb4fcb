//! Frame sinks.
//!
//! Sinks consume rendered frames in order; used by [`crate::session::engine::MoireEngine::run`]
//! and [`crate::session::export::render_sequence`].

/// Sink trait and the built-in sinks.
pub mod sink;
