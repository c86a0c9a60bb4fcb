/// Crate-wide result alias.
pub type MoireResult<T> = Result<T, MoireError>;

/// Errors surfaced by settings loading, asset preparation and rendering.
///
/// The per-frame render path itself treats unknown pattern identifiers and unready assets as
/// silent no-ops; errors are reserved for invalid surfaces, I/O and parse failures.
#[derive(thiserror::Error, Debug)]
pub enum MoireError {
    /// Caller-provided values that cannot be rendered (e.g. a zero-sized surface).
    #[error("validation error: {0}")]
    Validation(String),

    /// Custom asset loading or decoding failed.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization or compositing failed.
    #[error("render error: {0}")]
    Render(String),

    /// Settings (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MoireError {
    /// Build a [`MoireError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MoireError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MoireError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MoireError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
