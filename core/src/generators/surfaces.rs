//! Flat-faced surface shapes.

use crate::graphics_object::{GraphicsObject, Primitive};
use crate::math::Triple;
use crate::vertex_array::{
    PolygonType, SurfaceVertexData, VertexArrayResult, fill_surface_vertex_array,
};

use super::check_name;

/// Solid unit cube centred at the origin: two triangles per face.
///
/// Faces come in the order -x, +x, -y, +y, -z, +z. Each face is split as
///
/// ```text
/// 4-3   1-3-4 3-1-2
/// |/|
/// 1-2
/// ```
///
/// in its own face coordinates, so every normal points outwards.
pub fn create_cube_solid(name: &str) -> VertexArrayResult<GraphicsObject> {
    check_name("create_cube_solid", name)?;
    let mut points = Vec::with_capacity(36);
    let mut normals = Vec::with_capacity(36);
    for face in 0..6 {
        let a = face / 2;
        let b = (a + 1) % 3;
        let c = (a + 2) % 3;
        let factor = if face % 2 == 0 { -1.0 } else { 1.0 };
        let corners = [
            (0.5, 0.5),
            (-0.5, -0.5),
            (0.5, -0.5),
            (-0.5, -0.5),
            (0.5, 0.5),
            (-0.5, 0.5),
        ];
        for (along_b, along_c) in corners {
            let mut point = [0.0; 3];
            point[a] = 0.5 * factor;
            point[b] = along_b * factor;
            point[c] = along_c;
            points.push(point);

            let mut normal = [0.0; 3];
            normal[a] = factor;
            normals.push(normal);
        }
    }

    let mut object = GraphicsObject::new(name, Primitive::Surface);
    fill_surface_vertex_array(
        object.vertices_mut(),
        &SurfaceVertexData {
            polygon: PolygonType::Triangle,
            n_xi1: 6,
            n_xi2: 6,
            points: &points,
            normals: Some(&normals),
            discontinuous: true,
            ..SurfaceVertexData::default()
        },
    )?;
    Ok(object)
}

/// Unit square in the xy plane centred at the origin, facing +z.
///
/// With `texture_coordinates` the corners map to `(0, 0)` through `(1, 1)`.
pub fn create_sheet(name: &str, texture_coordinates: bool) -> VertexArrayResult<GraphicsObject> {
    check_name("create_sheet", name)?;
    let corners: [[f32; 2]; 6] = [
        [-0.5, -0.5],
        [0.5, 0.5],
        [-0.5, 0.5],
        [0.5, 0.5],
        [-0.5, -0.5],
        [0.5, -0.5],
    ];
    let points: Vec<Triple> = corners.iter().map(|[x, y]| [*x, *y, 0.0]).collect();
    let normals = [[0.0, 0.0, 1.0]; 6];
    let texture: Vec<Triple> = corners.iter().map(|[x, y]| [x + 0.5, y + 0.5, 0.0]).collect();

    let mut object = GraphicsObject::new(name, Primitive::Surface);
    fill_surface_vertex_array(
        object.vertices_mut(),
        &SurfaceVertexData {
            polygon: PolygonType::Triangle,
            n_xi1: 2,
            n_xi2: 3,
            points: &points,
            normals: Some(&normals),
            texture_coordinates: texture_coordinates.then_some(texture.as_slice()),
            discontinuous: true,
            ..SurfaceVertexData::default()
        },
    )?;
    Ok(object)
}
