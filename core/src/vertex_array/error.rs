//! Vertex attribute store error types.

use thiserror::Error;

use super::VertexAttribute;
use super::buffer::ValueType;

/// Errors raised by [`VertexAttributeStore`](super::VertexAttributeStore) writes.
///
/// A failed call never mutates the buffer it addressed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VertexArrayError {
    #[error("{kind:?} buffer has {existing} values per vertex, {requested} requested")]
    ValuesPerVertexMismatch {
        kind: VertexAttribute,
        existing: usize,
        requested: usize,
    },

    #[error("{kind:?} buffer holds {existing:?} values, {requested:?} requested")]
    ValueTypeMismatch {
        kind: VertexAttribute,
        existing: ValueType,
        requested: ValueType,
    },

    #[error("no {0:?} buffer")]
    MissingAttribute(VertexAttribute),

    #[error("{count} vertices at {start} exceed the {vertex_count} vertices of {kind:?}")]
    RangeOutOfBounds {
        kind: VertexAttribute,
        start: usize,
        count: usize,
        vertex_count: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to allocate {0} values")]
    AllocationFailed(usize),
}

/// Result type for vertex attribute store operations.
pub type VertexArrayResult<T> = Result<T, VertexArrayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VertexArrayError::ValuesPerVertexMismatch {
            kind: VertexAttribute::Position,
            existing: 3,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Position buffer has 3 values per vertex, 2 requested"
        );

        let err = VertexArrayError::MissingAttribute(VertexAttribute::Normal);
        assert_eq!(err.to_string(), "no Normal buffer");
    }
}
