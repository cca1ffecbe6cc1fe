//! Instanced glyph sets.

use std::sync::Arc;

use crate::font::Font;
use crate::math::{Triple, Vec3, from_triple, to_triple};
use crate::vertex_array::{
    GlyphVertexData, VertexArrayResult, VertexAttribute, fill_glyph_vertex_array,
};

use super::resolve::{GlyphPoint, GlyphRepeatMode, GlyphSizing, ResolvedAxes, resolve_glyph_axes};
use super::{GraphicsObject, Primitive};

/// Settings shared by every point of a glyph set.
#[derive(Debug, Clone, Default)]
pub struct GlyphSetParameters {
    pub sizing: GlyphSizing,
    /// Label position as a fraction of each final axis.
    pub label_offset: Vec3,
    pub repeat_mode: GlyphRepeatMode,
    /// Fixed label per repeated instance; unset entries fall back to point labels.
    pub static_labels: [Option<String>; 3],
    pub font: Option<Arc<Font>>,
}

impl GlyphSetParameters {
    pub fn with_base_size(mut self, base_size: Vec3) -> Self {
        self.sizing.base_size = base_size;
        self
    }

    pub fn with_scale_factors(mut self, scale_factors: Vec3) -> Self {
        self.sizing.scale_factors = scale_factors;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.sizing.offset = offset;
        self
    }

    pub fn with_label_offset(mut self, label_offset: Vec3) -> Self {
        self.label_offset = label_offset;
        self
    }

    pub fn with_repeat_mode(mut self, repeat_mode: GlyphRepeatMode) -> Self {
        self.repeat_mode = repeat_mode;
        self
    }

    pub fn with_static_labels(mut self, static_labels: [Option<String>; 3]) -> Self {
        self.static_labels = static_labels;
        self
    }

    pub fn with_font(mut self, font: Option<Arc<Font>>) -> Self {
        self.font = font;
        self
    }
}

/// A glyph drawn once per point, possibly repeated per the repeat mode.
#[derive(Debug, Clone)]
pub struct GlyphSetPrimitive {
    glyph: Arc<GraphicsObject>,
    parameters: GlyphSetParameters,
}

impl GlyphSetPrimitive {
    pub fn new(glyph: Arc<GraphicsObject>, parameters: GlyphSetParameters) -> Self {
        Self { glyph, parameters }
    }

    /// The unit geometry instanced at every point.
    pub fn glyph(&self) -> &Arc<GraphicsObject> {
        &self.glyph
    }

    pub fn parameters(&self) -> &GlyphSetParameters {
        &self.parameters
    }

    pub fn repeat_mode(&self) -> GlyphRepeatMode {
        self.parameters.repeat_mode
    }

    /// Build a glyph set object holding `points`.
    pub fn into_object(
        self,
        name: impl Into<String>,
        points: &[GlyphPoint],
        labels: Option<&[String]>,
        object_id: i32,
    ) -> VertexArrayResult<GraphicsObject> {
        let mut object = GraphicsObject::new(name, Primitive::GlyphSet(Box::new(self)));
        let column = |select: fn(&GlyphPoint) -> Vec3| -> Vec<Triple> {
            points.iter().map(|point| to_triple(&select(point))).collect()
        };
        let positions = column(|point| point.point);
        let axis1 = column(|point| point.axis1);
        let axis2 = column(|point| point.axis2);
        let axis3 = column(|point| point.axis3);
        let scale = column(|point| point.scale);
        fill_glyph_vertex_array(
            object.vertices_mut(),
            None,
            &GlyphVertexData {
                points: &positions,
                axis1: Some(&axis1),
                axis2: Some(&axis2),
                axis3: Some(&axis3),
                scale: Some(&scale),
                labels,
                object_id,
                ..GlyphVertexData::default()
            },
        )?;
        Ok(object)
    }
}

/// One physical glyph drawn by a glyph set.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphInstance {
    pub point_index: usize,
    pub glyph_number: usize,
    pub axes: ResolvedAxes,
    pub label: Option<String>,
    pub label_position: Option<Vec3>,
}

impl GraphicsObject {
    /// Resolve every instance of a glyph set, in point then repeat order.
    ///
    /// Empty for objects that are not glyph sets.
    pub fn glyph_instances(&self) -> Vec<GlyphInstance> {
        let Some(glyph_set) = self.glyph_set() else {
            return Vec::new();
        };
        let parameters = glyph_set.parameters();
        let mode = parameters.repeat_mode;
        let store = self.vertices();
        let triple = |kind, index, fallback: Vec3| {
            store
                .attribute::<f32>(kind, index)
                .and_then(|values| <&Triple>::try_from(values).ok())
                .map_or(fallback, from_triple)
        };

        let count = store.number_of_vertices(VertexAttribute::Position);
        let mut instances = Vec::with_capacity(count * mode.number_of_glyphs());
        for point_index in 0..count {
            let input = GlyphPoint {
                point: triple(VertexAttribute::Position, point_index, Vec3::zeros()),
                axis1: triple(VertexAttribute::Axis1, point_index, Vec3::x()),
                axis2: triple(VertexAttribute::Axis2, point_index, Vec3::y()),
                axis3: triple(VertexAttribute::Axis3, point_index, Vec3::z()),
                scale: triple(VertexAttribute::Scale, point_index, Vec3::zeros()),
            };
            let point_label = store
                .attribute::<String>(VertexAttribute::Label, point_index)
                .and_then(|labels| labels.first())
                .filter(|label| !label.is_empty());

            for glyph_number in 0..mode.number_of_glyphs() {
                let axes = resolve_glyph_axes(mode, glyph_number, &parameters.sizing, &input);
                let label = if mode.glyph_number_has_label(glyph_number) {
                    parameters.static_labels[glyph_number]
                        .clone()
                        .or_else(|| point_label.filter(|_| glyph_number == 0).cloned())
                } else {
                    None
                };
                let label_position = label.as_ref().map(|_| {
                    let offset = &parameters.label_offset;
                    axes.point
                        + axes.axis1 * offset[0]
                        + axes.axis2 * offset[1]
                        + axes.axis3 * offset[2]
                });
                instances.push(GlyphInstance {
                    point_index,
                    glyph_number,
                    axes,
                    label,
                    label_position,
                });
            }
        }
        instances
    }
}
