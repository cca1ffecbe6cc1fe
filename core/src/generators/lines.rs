//! Line and point glyph shapes.

use crate::graphics_object::{GraphicsObject, PointMarker, PolylineType, Primitive};
use crate::math::Triple;
use crate::vertex_array::{VertexArrayResult, fill_line_vertex_array, fill_pointset_vertex_array};

use super::{check_name, invalid_shape};

fn segments(name: &str, points: &[Triple]) -> VertexArrayResult<GraphicsObject> {
    let mut object = GraphicsObject::new(name, Primitive::polyline(PolylineType::Discontinuous));
    fill_line_vertex_array(object.vertices_mut(), points, None, None)?;
    Ok(object)
}

/// A line from the origin to `(1, 0, 0)`.
pub fn create_line(name: &str) -> VertexArrayResult<GraphicsObject> {
    check_name("create_line", name)?;
    segments(name, &[[0.0; 3], [1.0, 0.0, 0.0]])
}

/// Three segments through the origin, each spanning `-0.5..0.5` on one axis.
pub fn create_cross(name: &str) -> VertexArrayResult<GraphicsObject> {
    check_name("create_cross", name)?;
    let mut points = [[0.0; 3]; 6];
    for axis in 0..3 {
        points[2 * axis][axis] = -0.5;
        points[2 * axis + 1][axis] = 0.5;
    }
    segments(name, &points)
}

/// The 12 edges of the unit cube centred at the origin.
pub fn create_cube_wireframe(name: &str) -> VertexArrayResult<GraphicsObject> {
    check_name("create_cube_wireframe", name)?;
    let mut points = Vec::with_capacity(24);
    for a in 0..3 {
        let b = (a + 1) % 3;
        let c = (a + 2) % 3;
        for i in 0..8 {
            let mut point = [0.0; 3];
            point[a] = if i % 2 == 0 { -0.5 } else { 0.5 };
            point[b] = if i % 4 < 2 { -0.5 } else { 0.5 };
            point[c] = if i < 4 { -0.5 } else { 0.5 };
            points.push(point);
        }
    }
    segments(name, &points)
}

/// Shaft from the origin to `(1, 0, 0)` with a four way head.
///
/// The head ticks start `head_length` back from the tip and stand
/// `half_head_width` off the shaft in +y, +z, -y and -z.
pub fn create_arrow_line(
    name: &str,
    head_length: f32,
    half_head_width: f32,
) -> VertexArrayResult<GraphicsObject> {
    check_name("create_arrow_line", name)?;
    if !(head_length >= 0.0 && half_head_width >= 0.0) {
        return Err(invalid_shape(
            "create_arrow_line",
            format!(
                "head length {head_length} and half width {half_head_width} must be non-negative"
            ),
        ));
    }
    segments(name, &arrow_points(0, head_length, half_head_width))
}

/// Points of an arrow line along `axis` (0, 1 or 2).
///
/// Head ticks go to the next axis, the one after, then the negatives.
pub(crate) fn arrow_points(axis: usize, head_length: f32, half_head_width: f32) -> [Triple; 10] {
    let b = (axis + 1) % 3;
    let c = (axis + 2) % 3;
    let mut points = [[0.0; 3]; 10];
    points[1][axis] = 1.0;
    let ticks = [(b, 1.0), (c, 1.0), (b, -1.0), (c, -1.0)];
    for (tick, (side, width)) in ticks.into_iter().enumerate() {
        let tip = 2 + 2 * tick;
        points[tip][axis] = 1.0;
        points[tip + 1][axis] = 1.0 - head_length;
        points[tip + 1][side] = width * half_head_width;
    }
    points
}

/// A single point at the origin drawn with `marker`.
pub fn create_point(
    name: &str,
    marker: PointMarker,
    marker_size: f32,
) -> VertexArrayResult<GraphicsObject> {
    check_name("create_point", name)?;
    let mut object = GraphicsObject::new(name, Primitive::point_set(marker, marker_size, None));
    fill_pointset_vertex_array(object.vertices_mut(), &[[0.0; 3]], None, None)?;
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_array::VertexAttribute;

    fn positions(object: &GraphicsObject) -> Vec<Triple> {
        object
            .vertices()
            .vertex_buffer::<f32>(VertexAttribute::Position)
            .map(|buffer| {
                buffer
                    .values()
                    .chunks_exact(3)
                    .map(|v| [v[0], v[1], v[2]])
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_cross_points() {
        let cross = create_cross("x").unwrap();
        assert_eq!(
            positions(&cross),
            vec![
                [-0.5, 0.0, 0.0],
                [0.5, 0.0, 0.0],
                [0.0, -0.5, 0.0],
                [0.0, 0.5, 0.0],
                [0.0, 0.0, -0.5],
                [0.0, 0.0, 0.5],
            ]
        );
        assert!(matches!(
            cross.primitive(),
            Primitive::Polyline {
                line_type: PolylineType::Discontinuous,
                ..
            }
        ));
    }

    #[test]
    fn test_arrow_line_head() {
        let arrow = create_arrow_line("a", 1.0 / 3.0, 0.5).unwrap();
        let points = positions(&arrow);
        assert_eq!(points.len(), 10);
        assert_eq!(points[1], [1.0, 0.0, 0.0]);
        assert!((points[3][0] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(points[3][1], 0.5);
        assert_eq!(points[5][2], 0.5);
        assert_eq!(points[7][1], -0.5);
        assert_eq!(points[9][2], -0.5);
        assert_eq!(
            arrow.vertices().scalar::<u32>(VertexAttribute::ElementIndexCount, 0),
            Some(10)
        );
    }

    #[test]
    fn test_cube_wireframe_edges() {
        let points = positions(&create_cube_wireframe("cube").unwrap());
        assert_eq!(points.len(), 24);
        for edge in points.chunks_exact(2) {
            let differing = (0..3).filter(|&k| edge[0][k] != edge[1][k]).count();
            assert_eq!(differing, 1, "edge {edge:?} must run along one axis");
        }
        assert!(points.iter().flatten().all(|v| v.abs() == 0.5));
    }

    #[test]
    fn test_line_and_point() {
        assert_eq!(positions(&create_line("line").unwrap()), vec![[0.0; 3], [1.0, 0.0, 0.0]]);
        let point = create_point("point", PointMarker::Point, 2.0).unwrap();
        assert_eq!(positions(&point), vec![[0.0; 3]]);
        assert!(create_line("").is_err());
        assert!(create_arrow_line("a", -1.0, 0.5).is_err());
    }
}
