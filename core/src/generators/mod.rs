//! Builders for the unit shapes glyphs are drawn with.
//!
//! Every builder returns a fresh [`GraphicsObject`](crate::graphics_object::GraphicsObject)
//! whose vertex store holds the shape in glyph space: unit length along
//! x, centred or based at the origin. Invalid arguments are rejected
//! before any geometry is written.

mod axes;
mod lines;
mod round;
mod surfaces;

pub use axes::{AxesStyle, create_axes};
pub use lines::{create_arrow_line, create_cross, create_cube_wireframe, create_line, create_point};
pub use round::{
    ArrowSolidShape, create_arrow_solid, create_cone, create_cylinder, create_sphere,
};
pub use surfaces::{create_cube_solid, create_sheet};

use crate::vertex_array::{VertexArrayError, VertexArrayResult};

/// Shorthand for building the error returned on bad builder input.
pub(crate) fn invalid_shape(builder: &str, message: impl std::fmt::Display) -> VertexArrayError {
    log::error!("{builder}: {message}");
    VertexArrayError::InvalidArgument(format!("{builder}: {message}"))
}

pub(crate) fn check_name(builder: &str, name: &str) -> VertexArrayResult<()> {
    if name.is_empty() {
        return Err(invalid_shape(builder, "name must not be empty"));
    }
    Ok(())
}
