//! Vertex attribute storage for drawable graphics objects.
//!
//! This module provides:
//! - [`VertexAttribute`] - The kinds of per-vertex and per-primitive data a drawable carries
//! - [`VertexBuffer`] - A typed growable buffer with a fixed number of values per vertex
//! - [`VertexAttributeStore`] - The buffer-of-buffers owned by one graphics object
//! - Fill helpers writing whole primitives (lines, point sets, surfaces, glyph sets)
//!
//! # Example
//!
//! ```ignore
//! let mut store = VertexAttributeStore::new();
//! store.add_float_attribute(VertexAttribute::Position, 3, 2, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0])?;
//! assert_eq!(store.number_of_vertices(VertexAttribute::Position), 2);
//! ```

mod buffer;
mod error;
mod fill;
mod store;
mod strips;

pub use buffer::{AttributeBuffer, INITIAL_VERTEX_CAPACITY, ValueType, VertexBuffer, VertexValue};
pub use error::{VertexArrayError, VertexArrayResult};
pub use fill::{
    DataValues, GlyphVertexData, PolygonType, SurfaceVertexData, fill_glyph_vertex_array,
    fill_line_vertex_array, fill_pointset_vertex_array, fill_surface_vertex_array,
};
pub use store::VertexAttributeStore;
pub use strips::ElementShape;

/// Kind of data held by one buffer of a [`VertexAttributeStore`].
///
/// Per-vertex kinds (positions, normals, axes) have one entry per vertex.
/// Per-primitive kinds (`ElementIndexCount`, `ElementIndexStart`, `ObjectId`)
/// have one entry per primitive written into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexAttribute {
    Position,
    Normal,
    Colour,
    Data,
    TextureCoordinate0,
    /// Number of vertices in each primitive.
    ElementIndexCount,
    /// First vertex of each primitive.
    ElementIndexStart,
    VertexId,
    Tangent,
    Axis1,
    Axis2,
    Axis3,
    Scale,
    LabelDensity,
    LabelBound,
    NumberOfXi1,
    NumberOfXi2,
    /// Polygon type of each surface primitive.
    Polygon,
    ObjectId,
    /// Number of triangle strips per surface primitive.
    NumberOfStrips,
    NumberOfPointsForStrip,
    /// First strip of each surface primitive.
    StripStart,
    /// First entry in `StripIndexArray` of each strip.
    StripIndexStart,
    StripIndexArray,
    UpdateRequired,
    PartialRedraw,
    PartialRedrawCount,
    Label,
}
