//! Glyph error types.

use thiserror::Error;
use zinc_core::CoreError;
use zinc_core::format::FormatError;
use zinc_core::manager::ManagerError;
use zinc_core::vertex_array::VertexArrayError;

/// Errors raised by glyphs and the glyph module.
///
/// A setter that fails leaves the glyph exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("axis number {0} is not in 1..=3")]
    AxisOutOfRange(u32),

    #[error("colour bar axis and side axis are colinear")]
    ColinearAxes,

    #[error("failed to build glyph '{0}'")]
    BuildFailed(String),

    #[error("glyph name '{0}' is already in use")]
    NameInUse(String),

    #[error("glyph '{0}' is already managed")]
    AlreadyManaged(String),

    #[error(transparent)]
    VertexArray(#[from] VertexArrayError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl From<ManagerError> for GlyphError {
    fn from(error: ManagerError) -> Self {
        match error {
            ManagerError::NameInUse(name) => Self::NameInUse(name),
            ManagerError::AlreadyManaged(name) => Self::AlreadyManaged(name),
        }
    }
}

impl From<CoreError> for GlyphError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidArgument(message) => Self::InvalidArgument(message),
            CoreError::Manager(error) => error.into(),
        }
    }
}

/// Result type for glyph operations.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Log and build a [`GlyphError::InvalidArgument`].
pub(crate) fn invalid_argument(message: impl Into<String>) -> GlyphError {
    let message = message.into();
    log::error!("{message}");
    GlyphError::InvalidArgument(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GlyphError::AxisOutOfRange(4).to_string(),
            "axis number 4 is not in 1..=3"
        );
        let err: GlyphError = ManagerError::NameInUse("axes".to_string()).into();
        assert_eq!(err, GlyphError::NameInUse("axes".to_string()));
        assert_eq!(err.to_string(), "glyph name 'axes' is already in use");
    }
}
