//! Coordinate axes triads.

use std::sync::Arc;

use crate::font::Font;
use crate::graphics_object::{GraphicsObject, PointMarker, PolylineType, Primitive, link_chain};
use crate::material::{Colour, Material};
use crate::math::Triple;
use crate::tessellation::Tessellation;
use crate::vertex_array::{VertexArrayResult, fill_line_vertex_array, fill_pointset_vertex_array};

use super::lines::arrow_points;
use super::round::{ArrowSolidShape, create_arrow_solid};
use super::{check_name, invalid_shape};

/// How [`create_axes`] draws the triad.
#[derive(Debug, Clone)]
pub struct AxesStyle {
    /// Shaded arrows coloured red, green and blue instead of lines.
    pub solid: bool,
    pub head_length: f32,
    pub half_head_width: f32,
    pub labels: Option<[String; 3]>,
    /// Distance past each axis tip at which its label is placed.
    pub label_offset: f32,
    pub font: Option<Arc<Font>>,
    pub tessellation: Tessellation,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            solid: false,
            head_length: 0.1,
            half_head_width: 0.025,
            labels: None,
            label_offset: 0.1,
            font: None,
            tessellation: Tessellation::default(),
        }
    }
}

/// Unit x, y and z axes from the origin, optionally labelled at their tips.
///
/// Wireframe axes are one polyline object. Solid axes are three arrow
/// objects named `name`, `{name}_arrow2` and `{name}_arrow3`. Labels are
/// chained on last as `{name}_labels`.
pub fn create_axes(name: &str, style: &AxesStyle) -> VertexArrayResult<Arc<GraphicsObject>> {
    check_name("create_axes", name)?;
    if !(style.head_length >= 0.0 && style.half_head_width >= 0.0) {
        return Err(invalid_shape(
            "create_axes",
            format!(
                "head length {} and half width {} must be non-negative",
                style.head_length, style.half_head_width
            ),
        ));
    }

    let mut objects = Vec::with_capacity(4);
    if style.solid {
        let colours = [Colour::RED, Colour::GREEN, Colour::BLUE];
        for (axis, colour) in colours.into_iter().enumerate() {
            let arrow_name = match axis {
                0 => name.to_string(),
                _ => format!("{name}_arrow{}", axis + 1),
            };
            let shape = ArrowSolidShape::from_head(style.head_length, 2.0 * style.half_head_width)
                .with_primary_axis(axis + 1);
            let material = Material::with_colour(format!("{arrow_name}_material"), colour);
            objects.push(
                create_arrow_solid(&arrow_name, &shape, style.tessellation.circle_divisions())?
                    .with_default_material(Some(material)),
            );
        }
    } else {
        let points: Vec<Triple> = (0..3)
            .flat_map(|axis| arrow_points(axis, style.head_length, style.half_head_width))
            .collect();
        let mut axes = GraphicsObject::new(name, Primitive::polyline(PolylineType::Discontinuous));
        fill_line_vertex_array(axes.vertices_mut(), &points, None, None)?;
        objects.push(axes);
    }

    if let Some(labels) = &style.labels {
        let mut tips = [[0.0; 3]; 3];
        for (axis, tip) in tips.iter_mut().enumerate() {
            tip[axis] = 1.0 + style.label_offset;
        }
        let mut label_object = GraphicsObject::new(
            format!("{name}_labels"),
            Primitive::point_set(PointMarker::None, 0.0, style.font.clone()),
        );
        fill_pointset_vertex_array(label_object.vertices_mut(), &tips, Some(&labels[..]), None)?;
        objects.push(label_object);
    }

    link_chain(objects).ok_or_else(|| invalid_shape("create_axes", "no objects built"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_array::VertexAttribute;

    #[test]
    fn test_wireframe_axes_single_polyline() {
        let axes = create_axes("axes", &AxesStyle::default()).unwrap();
        assert_eq!(axes.chain_len(), 1);
        let store = axes.vertices();
        assert_eq!(store.number_of_vertices(VertexAttribute::Position), 30);
        // each axis ends at its unit tip
        let position = |i| store.attribute::<f32>(VertexAttribute::Position, i);
        assert_eq!(position(11), Some(&[0.0, 1.0, 0.0][..]));
        assert_eq!(position(21), Some(&[0.0, 0.0, 1.0][..]));
    }

    #[test]
    fn test_solid_axes_coloured_and_labelled() {
        let style = AxesStyle {
            solid: true,
            labels: Some(["x".into(), "y".into(), "z".into()]),
            label_offset: 0.2,
            ..AxesStyle::default()
        };
        let axes = create_axes("axes_solid", &style).unwrap();
        let names: Vec<_> = axes.chain().map(GraphicsObject::name).collect();
        assert_eq!(
            names,
            ["axes_solid", "axes_solid_arrow2", "axes_solid_arrow3", "axes_solid_labels"]
        );
        let diffuse: Vec<_> = axes
            .chain()
            .filter_map(|object| object.default_material().map(|material| material.diffuse()))
            .collect();
        assert_eq!(diffuse, [Colour::RED, Colour::GREEN, Colour::BLUE]);

        let labels = axes.chain().last().unwrap();
        let store = labels.vertices();
        assert_eq!(
            store.attribute::<String>(VertexAttribute::Label, 2),
            Some(&["z".to_string()][..])
        );
        let tip = store.attribute::<f32>(VertexAttribute::Position, 2).unwrap();
        assert!((tip[2] - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_negative_head() {
        let style = AxesStyle {
            head_length: -0.1,
            ..AxesStyle::default()
        };
        assert!(create_axes("axes", &style).is_err());
    }
}
