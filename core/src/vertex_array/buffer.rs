//! Typed growable vertex buffers.

use std::fmt;

use super::error::{VertexArrayError, VertexArrayResult};

/// Vertex headroom allocated when a buffer is first created.
pub const INITIAL_VERTEX_CAPACITY: usize = 50;

/// Scalar type stored in a vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Float,
    Unsigned,
    Integer,
    String,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for u32 {}
    impl Sealed for i32 {}
    impl Sealed for String {}
}

/// A scalar that can live in a [`VertexBuffer`].
///
/// Implemented for `f32`, `u32`, `i32` and `String`.
pub trait VertexValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static + sealed::Sealed {
    const VALUE_TYPE: ValueType;

    #[doc(hidden)]
    fn wrap(buffer: VertexBuffer<Self>) -> AttributeBuffer;
    #[doc(hidden)]
    fn unwrap_ref(buffer: &AttributeBuffer) -> Option<&VertexBuffer<Self>>;
    #[doc(hidden)]
    fn unwrap_mut(buffer: &mut AttributeBuffer) -> Option<&mut VertexBuffer<Self>>;
}

macro_rules! impl_vertex_value {
    ($ty:ty, $variant:ident) => {
        impl VertexValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn wrap(buffer: VertexBuffer<Self>) -> AttributeBuffer {
                AttributeBuffer::$variant(buffer)
            }

            fn unwrap_ref(buffer: &AttributeBuffer) -> Option<&VertexBuffer<Self>> {
                match buffer {
                    AttributeBuffer::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn unwrap_mut(buffer: &mut AttributeBuffer) -> Option<&mut VertexBuffer<Self>> {
                match buffer {
                    AttributeBuffer::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_vertex_value!(f32, Float);
impl_vertex_value!(u32, Unsigned);
impl_vertex_value!(i32, Integer);
impl_vertex_value!(String, String);

/// A growable buffer of `values_per_vertex` scalars per vertex.
///
/// Capacity is tracked in vertices. When an append would reach the current
/// capacity the buffer grows to `2 * capacity + incoming` vertices, so
/// reallocation happens a logarithmic number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer<V> {
    values_per_vertex: usize,
    max_vertex_count: usize,
    values: Vec<V>,
}

impl<V: VertexValue> VertexBuffer<V> {
    /// Create an empty buffer with room for `INITIAL_VERTEX_CAPACITY + incoming` vertices.
    pub(crate) fn with_headroom(
        values_per_vertex: usize,
        incoming: usize,
    ) -> VertexArrayResult<Self> {
        let max_vertex_count = INITIAL_VERTEX_CAPACITY + incoming;
        let mut values = Vec::new();
        reserve_values(&mut values, max_vertex_count, values_per_vertex)?;
        Ok(Self {
            values_per_vertex,
            max_vertex_count,
            values,
        })
    }

    pub fn values_per_vertex(&self) -> usize {
        self.values_per_vertex
    }

    pub fn vertex_count(&self) -> usize {
        self.values.len() / self.values_per_vertex
    }

    /// Number of vertices the buffer can hold before the next growth step.
    pub fn vertex_capacity(&self) -> usize {
        self.max_vertex_count
    }

    /// All stored values, `values_per_vertex` per vertex.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Values of a single vertex.
    pub fn vertex(&self, index: usize) -> Option<&[V]> {
        let start = index.checked_mul(self.values_per_vertex)?;
        self.values.get(start..start + self.values_per_vertex)
    }

    /// Append `values.len() / values_per_vertex` vertices.
    pub(crate) fn append(&mut self, values: &[V]) -> VertexArrayResult<()> {
        let incoming = values.len() / self.values_per_vertex;
        let count = self.vertex_count();
        if self.max_vertex_count <= count + incoming {
            let new_max = self
                .max_vertex_count
                .checked_mul(2)
                .and_then(|doubled| doubled.checked_add(incoming))
                .ok_or(VertexArrayError::AllocationFailed(usize::MAX))?;
            reserve_values(&mut self.values, new_max, self.values_per_vertex)?;
            log::trace!(
                "vertex buffer grew from {} to {} vertices",
                self.max_vertex_count,
                new_max
            );
            self.max_vertex_count = new_max;
        }
        self.values.extend_from_slice(values);
        Ok(())
    }

    /// Overwrite vertices starting at `start`. The caller checks the range.
    pub(crate) fn overwrite(&mut self, start: usize, values: &[V]) {
        let offset = start * self.values_per_vertex;
        self.values[offset..offset + values.len()].clone_from_slice(values);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}

impl<V: VertexValue + bytemuck::Pod> VertexBuffer<V> {
    /// Raw bytes of the stored values, for upload by a renderer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.values)
    }
}

fn reserve_values<V>(
    values: &mut Vec<V>,
    vertex_capacity: usize,
    values_per_vertex: usize,
) -> VertexArrayResult<()> {
    let total = vertex_capacity
        .checked_mul(values_per_vertex)
        .ok_or(VertexArrayError::AllocationFailed(usize::MAX))?;
    let additional = total.saturating_sub(values.len());
    values
        .try_reserve_exact(additional)
        .map_err(|_| VertexArrayError::AllocationFailed(total))
}

/// A vertex buffer of any supported value type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBuffer {
    Float(VertexBuffer<f32>),
    Unsigned(VertexBuffer<u32>),
    Integer(VertexBuffer<i32>),
    String(VertexBuffer<String>),
}

macro_rules! dispatch {
    ($self:expr, $buffer:ident => $body:expr) => {
        match $self {
            AttributeBuffer::Float($buffer) => $body,
            AttributeBuffer::Unsigned($buffer) => $body,
            AttributeBuffer::Integer($buffer) => $body,
            AttributeBuffer::String($buffer) => $body,
        }
    };
}

impl AttributeBuffer {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Float(_) => ValueType::Float,
            Self::Unsigned(_) => ValueType::Unsigned,
            Self::Integer(_) => ValueType::Integer,
            Self::String(_) => ValueType::String,
        }
    }

    pub fn values_per_vertex(&self) -> usize {
        dispatch!(self, buffer => buffer.values_per_vertex())
    }

    pub fn vertex_count(&self) -> usize {
        dispatch!(self, buffer => buffer.vertex_count())
    }

    pub fn vertex_capacity(&self) -> usize {
        dispatch!(self, buffer => buffer.vertex_capacity())
    }

    pub(crate) fn clear(&mut self) {
        dispatch!(self, buffer => buffer.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_headroom() {
        let buffer = VertexBuffer::<f32>::with_headroom(3, 4).unwrap();
        assert_eq!(buffer.vertex_count(), 0);
        assert_eq!(buffer.vertex_capacity(), INITIAL_VERTEX_CAPACITY + 4);
    }

    #[test]
    fn test_growth_policy() {
        let mut buffer = VertexBuffer::<u32>::with_headroom(1, 0).unwrap();
        buffer.append(&[0; 49]).unwrap();
        assert_eq!(buffer.vertex_capacity(), 50);

        // 49 + 1 reaches capacity: grow to 2 * 50 + 1
        buffer.append(&[0]).unwrap();
        assert_eq!(buffer.vertex_capacity(), 101);
        assert_eq!(buffer.vertex_count(), 50);
    }

    #[test]
    fn test_vertex_access() {
        let mut buffer = VertexBuffer::<i32>::with_headroom(2, 2).unwrap();
        buffer.append(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.vertex(1), Some(&[3, 4][..]));
        assert_eq!(buffer.vertex(2), None);
    }

    #[test]
    fn test_float_bytes() {
        let mut buffer = VertexBuffer::<f32>::with_headroom(3, 1).unwrap();
        buffer.append(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(buffer.as_bytes().len(), 12);
    }

    #[test]
    fn test_clear_retains_capacity() {
        let mut buffer = AttributeBuffer::String(VertexBuffer::with_headroom(1, 0).unwrap());
        if let AttributeBuffer::String(inner) = &mut buffer {
            inner.append(&["a".to_string(), "b".to_string()]).unwrap();
        }
        assert_eq!(buffer.vertex_count(), 2);
        buffer.clear();
        assert_eq!(buffer.vertex_count(), 0);
        assert_eq!(buffer.vertex_capacity(), 50);
        assert_eq!(buffer.value_type(), ValueType::String);
    }
}
