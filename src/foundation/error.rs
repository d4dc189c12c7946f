/// Result alias used across the crate.
pub type PoppetResult<T> = Result<T, PoppetError>;

/// Crate-wide error type.
///
/// Warp boundary conditions and malformed entities are not errors; they are skipped silently by
/// the warp engine and the compositor.
#[derive(thiserror::Error, Debug)]
pub enum PoppetError {
    /// A caller-supplied value violated a documented constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// An uploaded or returned image could not be read.
    #[error("decode error: {0}")]
    Decode(String),

    /// Frame composition failed.
    #[error("render error: {0}")]
    Render(String),

    /// The external generative collaborator failed or declined.
    #[error("external effect error: {0}")]
    External(String),

    /// A required surface (image or canvas) is missing; fatal for the session.
    #[error("setup error: {0}")]
    Setup(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PoppetError {
    /// Build a [`PoppetError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PoppetError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PoppetError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PoppetError::External`].
    pub fn external(msg: impl Into<String>) -> Self {
        Self::External(msg.into())
    }

    /// Build a [`PoppetError::Setup`].
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
