//! Shapes of revolution: cylinders, cones, solid arrows and spheres.
//!
//! Each curved face is written as its own structured surface primitive
//! with `divisions + 1` points around, the seam duplicated so strips close.

use std::f32::consts::PI;

use crate::graphics_object::{GraphicsObject, Primitive};
use crate::math::{Triple, Vec3};
use crate::vertex_array::{
    PolygonType, SurfaceVertexData, VertexArrayResult, VertexAttributeStore,
    fill_surface_vertex_array,
};

use super::{check_name, invalid_shape};

/// One ring of a surface of revolution about the x axis.
#[derive(Debug, Clone, Copy)]
struct ProfilePoint {
    x: f32,
    radius: f32,
    /// Normal in (axial, radial) components.
    normal: [f32; 2],
}

const fn ring(x: f32, radius: f32, normal: [f32; 2]) -> ProfilePoint {
    ProfilePoint { x, radius, normal }
}

/// Map glyph-space `[axial, radial1, radial2]` to world axes with `primary_axis` (1-3) axial.
fn orient(primary_axis: usize, v: Triple) -> Triple {
    match primary_axis {
        2 => [v[2], v[0], v[1]],
        3 => [v[1], v[2], v[0]],
        _ => v,
    }
}

fn check_divisions(builder: &str, divisions: u32, minimum: u32) -> VertexArrayResult<()> {
    if divisions < minimum {
        return Err(invalid_shape(
            builder,
            format!("{divisions} divisions given, at least {minimum} required"),
        ));
    }
    Ok(())
}

/// Append a surface sweeping `profile` once around the axis.
fn revolve(
    store: &mut VertexAttributeStore,
    profile: &[ProfilePoint],
    divisions: u32,
    primary_axis: usize,
) -> VertexArrayResult<()> {
    let around = divisions as usize + 1;
    let mut points = Vec::with_capacity(around * profile.len());
    let mut normals = Vec::with_capacity(around * profile.len());
    for ring in profile {
        let normal_length = ring.normal[0].hypot(ring.normal[1]);
        let (axial, radial) = if normal_length > 0.0 {
            (ring.normal[0] / normal_length, ring.normal[1] / normal_length)
        } else {
            (0.0, 0.0)
        };
        for segment in 0..around {
            let theta = segment as f32 * 2.0 * PI / divisions as f32;
            let (sin, cos) = theta.sin_cos();
            points.push(orient(primary_axis, [ring.x, ring.radius * cos, ring.radius * sin]));
            normals.push(orient(primary_axis, [axial, radial * cos, radial * sin]));
        }
    }
    fill_surface_vertex_array(
        store,
        &SurfaceVertexData {
            polygon: PolygonType::Quadrilateral,
            n_xi1: around,
            n_xi2: profile.len(),
            points: &points,
            normals: Some(&normals),
            ..SurfaceVertexData::default()
        },
    )
}

/// Cylinder of diameter 1 from the origin to `(1, 0, 0)`; `solid` adds end caps.
pub fn create_cylinder(
    name: &str,
    divisions: u32,
    solid: bool,
) -> VertexArrayResult<GraphicsObject> {
    check_name("create_cylinder", name)?;
    check_divisions("create_cylinder", divisions, 3)?;
    let mut object = GraphicsObject::new(name, Primitive::Surface);
    let store = object.vertices_mut();
    revolve(store, &[ring(0.0, 0.5, [0.0, 1.0]), ring(1.0, 0.5, [0.0, 1.0])], divisions, 1)?;
    if solid {
        revolve(store, &[ring(0.0, 0.0, [-1.0, 0.0]), ring(0.0, 0.5, [-1.0, 0.0])], divisions, 1)?;
        revolve(store, &[ring(1.0, 0.5, [1.0, 0.0]), ring(1.0, 0.0, [1.0, 0.0])], divisions, 1)?;
    }
    Ok(object)
}

/// Cone with a base of diameter 1 at the origin and its apex at `(1, 0, 0)`.
///
/// `solid` closes the base.
pub fn create_cone(name: &str, divisions: u32, solid: bool) -> VertexArrayResult<GraphicsObject> {
    check_name("create_cone", name)?;
    check_divisions("create_cone", divisions, 3)?;
    let mut object = GraphicsObject::new(name, Primitive::Surface);
    let store = object.vertices_mut();
    let side = [0.5, 1.0];
    revolve(store, &[ring(0.0, 0.5, side), ring(1.0, 0.0, side)], divisions, 1)?;
    if solid {
        revolve(store, &[ring(0.0, 0.0, [-1.0, 0.0]), ring(0.0, 0.5, [-1.0, 0.0])], divisions, 1)?;
    }
    Ok(object)
}

/// Proportions of a solid arrow of unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSolidShape {
    /// Axis the arrow points along, 1 to 3.
    pub primary_axis: usize,
    pub shaft_length: f32,
    pub shaft_radius: f32,
    pub cone_radius: f32,
}

impl ArrowSolidShape {
    /// Arrow along x with a head `head_length` long and `head_width` across.
    pub fn from_head(head_length: f32, head_width: f32) -> Self {
        let cone_radius = 0.5 * head_width;
        Self {
            primary_axis: 1,
            shaft_length: 1.0 - head_length,
            shaft_radius: 0.4 * cone_radius,
            cone_radius,
        }
    }

    pub fn with_primary_axis(mut self, primary_axis: usize) -> Self {
        self.primary_axis = primary_axis;
        self
    }
}

/// Closed arrow: capped shaft, a flat ring behind the head, then the cone.
pub fn create_arrow_solid(
    name: &str,
    shape: &ArrowSolidShape,
    divisions: u32,
) -> VertexArrayResult<GraphicsObject> {
    const BUILDER: &str = "create_arrow_solid";
    check_name(BUILDER, name)?;
    check_divisions(BUILDER, divisions, 3)?;
    let ArrowSolidShape {
        primary_axis,
        shaft_length,
        shaft_radius,
        cone_radius,
    } = *shape;
    if !(1..=3).contains(&primary_axis) {
        return Err(invalid_shape(BUILDER, format!("primary axis {primary_axis} not in 1..=3")));
    }
    if !(0.0..=1.0).contains(&shaft_length) || shaft_radius < 0.0 || cone_radius < shaft_radius {
        return Err(invalid_shape(
            BUILDER,
            format!("shaft {shaft_length} x {shaft_radius} does not fit cone radius {cone_radius}"),
        ));
    }

    let mut object = GraphicsObject::new(name, Primitive::Surface);
    let store = object.vertices_mut();
    let back = [-1.0, 0.0];
    let cone = [cone_radius, 1.0 - shaft_length];
    revolve(
        store,
        &[ring(0.0, 0.0, back), ring(0.0, shaft_radius, back)],
        divisions,
        primary_axis,
    )?;
    revolve(
        store,
        &[ring(0.0, shaft_radius, [0.0, 1.0]), ring(shaft_length, shaft_radius, [0.0, 1.0])],
        divisions,
        primary_axis,
    )?;
    revolve(
        store,
        &[ring(shaft_length, shaft_radius, back), ring(shaft_length, cone_radius, back)],
        divisions,
        primary_axis,
    )?;
    revolve(
        store,
        &[ring(shaft_length, cone_radius, cone), ring(1.0, 0.0, cone)],
        divisions,
        primary_axis,
    )?;
    Ok(object)
}

/// Sphere of diameter 1 centred at the origin.
///
/// With few divisions this is a faceted solid; 4 by 2 gives the diamond glyph.
pub fn create_sphere(
    name: &str,
    longitude_divisions: u32,
    latitude_divisions: u32,
) -> VertexArrayResult<GraphicsObject> {
    const BUILDER: &str = "create_sphere";
    check_name(BUILDER, name)?;
    check_divisions(BUILDER, longitude_divisions, 3)?;
    check_divisions(BUILDER, latitude_divisions, 2)?;

    let around = longitude_divisions as usize + 1;
    let rows = latitude_divisions as usize + 1;
    let mut points = Vec::with_capacity(around * rows);
    let mut normals = Vec::with_capacity(around * rows);
    let mut texture = Vec::with_capacity(around * rows);
    for latitude in 0..rows {
        let theta = latitude as f32 * PI / latitude_divisions as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        for longitude in 0..around {
            let phi = longitude as f32 * 2.0 * PI / longitude_divisions as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            // poles on the x axis so the diamond points along the glyph axis
            let normal = Vec3::new(-cos_theta, sin_theta * cos_phi, sin_theta * sin_phi);
            points.push([normal.x * 0.5, normal.y * 0.5, normal.z * 0.5]);
            normals.push([normal.x, normal.y, normal.z]);
            texture.push([
                longitude as f32 / longitude_divisions as f32,
                latitude as f32 / latitude_divisions as f32,
                0.0,
            ]);
        }
    }

    let mut object = GraphicsObject::new(name, Primitive::Surface);
    fill_surface_vertex_array(
        object.vertices_mut(),
        &SurfaceVertexData {
            polygon: PolygonType::Quadrilateral,
            n_xi1: around,
            n_xi2: rows,
            points: &points,
            normals: Some(&normals),
            texture_coordinates: Some(&texture),
            ..SurfaceVertexData::default()
        },
    )?;
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_array::VertexAttribute;

    fn positions(object: &GraphicsObject) -> Vec<Vec3> {
        let store = object.vertices();
        (0..store.number_of_vertices(VertexAttribute::Position))
            .filter_map(|i| store.attribute::<f32>(VertexAttribute::Position, i))
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect()
    }

    #[test]
    fn test_cylinder_primitives() {
        let open = create_cylinder("cylinder", 12, false).unwrap();
        assert_eq!(open.primitive_count(), 1);
        assert_eq!(positions(&open).len(), 13 * 2);
        let solid = create_cylinder("cylinder_solid", 12, true).unwrap();
        assert_eq!(solid.primitive_count(), 3);
        for p in positions(&open) {
            assert!(((p.y * p.y + p.z * p.z).sqrt() - 0.5).abs() < 1e-5);
        }
        assert!(create_cylinder("c", 2, false).is_err());
    }

    #[test]
    fn test_cone_apex_and_base() {
        let cone = create_cone("cone", 8, true).unwrap();
        let points = positions(&cone);
        assert_eq!(cone.primitive_count(), 2);
        assert!(points[9..18].iter().all(|p| *p == Vec3::new(1.0, 0.0, 0.0)));
        assert!(points[..9].iter().all(|p| p.x == 0.0));
    }

    #[test]
    fn test_arrow_solid_along_primary_axis() {
        let shape = ArrowSolidShape::from_head(1.0 / 3.0, 1.0 / 3.0).with_primary_axis(2);
        let arrow = create_arrow_solid("arrow", &shape, 6).unwrap();
        assert_eq!(arrow.primitive_count(), 4);
        let points = positions(&arrow);
        let tip = points.iter().fold(f32::MIN, |max, p| max.max(p.y));
        assert!((tip - 1.0).abs() < 1e-6);
        assert!(points.iter().all(|p| p.y >= 0.0));
        assert!(create_arrow_solid("arrow", &shape.with_primary_axis(4), 6).is_err());
    }

    #[test]
    fn test_sphere_radius() {
        let diamond = create_sphere("diamond", 4, 2).unwrap();
        let points = positions(&diamond);
        assert_eq!(points.len(), 15);
        assert!(points.iter().all(|p| (p.norm() - 0.5).abs() < 1e-5));
        assert!(create_sphere("s", 4, 1).is_err());
    }
}
