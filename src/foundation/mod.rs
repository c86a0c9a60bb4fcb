/// Surface size, colors and geometry re-exports.
pub mod core;
/// Error type and result alias.
pub mod error;
pub(crate) mod math;
