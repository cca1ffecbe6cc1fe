//! Helpers that write one whole primitive into a vertex attribute store.
//!
//! Every helper first records the primitive's `ElementIndexCount` and
//! `ElementIndexStart`, so renderers can walk primitives without knowing how
//! they were produced.

use crate::math::Triple;

use super::VertexAttribute;
use super::error::{VertexArrayError, VertexArrayResult};
use super::store::VertexAttributeStore;
use super::strips::ElementShape;

/// Polygon type of a surface primitive, stored in the `Polygon` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum PolygonType {
    Quadrilateral = 0,
    #[default]
    Triangle = 1,
    GeneralPolygon = 2,
}

/// Per-vertex data field: `components` floats per vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataValues<'a> {
    pub components: usize,
    pub values: &'a [f32],
}

/// Input of [`fill_surface_vertex_array`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceVertexData<'a> {
    pub polygon: PolygonType,
    /// Points along the first parameter direction.
    pub n_xi1: usize,
    /// Points along the second parameter direction.
    pub n_xi2: usize,
    pub points: &'a [Triple],
    pub normals: Option<&'a [Triple]>,
    pub tangents: Option<&'a [Triple]>,
    pub texture_coordinates: Option<&'a [Triple]>,
    pub data: Option<DataValues<'a>>,
    /// Points are independent triangles rather than a structured grid; no strips are built.
    pub discontinuous: bool,
}

/// Input of [`fill_glyph_vertex_array`]: one glyph instance per point.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphVertexData<'a> {
    pub points: &'a [Triple],
    pub axis1: Option<&'a [Triple]>,
    pub axis2: Option<&'a [Triple]>,
    pub axis3: Option<&'a [Triple]>,
    pub scale: Option<&'a [Triple]>,
    pub label_density: Option<&'a [Triple]>,
    /// Label bound values, `values_per_point` floats per point.
    pub label_bounds: Option<DataValues<'a>>,
    pub labels: Option<&'a [String]>,
    /// Per-point identifiers, stored as `VertexId`.
    pub names: Option<&'a [i32]>,
    pub data: Option<DataValues<'a>>,
    /// Identifier of the whole primitive, indexed for fast lookup.
    pub object_id: i32,
}

/// Append a polyline primitive.
pub fn fill_line_vertex_array(
    store: &mut VertexAttributeStore,
    points: &[Triple],
    normals: Option<&[Triple]>,
    data: Option<DataValues<'_>>,
) -> VertexArrayResult<()> {
    let count = points.len();
    check_len("normals", normals.map(<[Triple]>::len), count)?;
    begin_primitive(store, count)?;
    add_triples(store, VertexAttribute::Position, points)?;
    if let Some(normals) = normals {
        add_triples(store, VertexAttribute::Normal, normals)?;
    }
    add_data(store, data, count)
}

/// Append a point set primitive, optionally labelled.
pub fn fill_pointset_vertex_array(
    store: &mut VertexAttributeStore,
    points: &[Triple],
    labels: Option<&[String]>,
    data: Option<DataValues<'_>>,
) -> VertexArrayResult<()> {
    let count = points.len();
    check_len("labels", labels.map(<[String]>::len), count)?;
    begin_primitive(store, count)?;
    add_triples(store, VertexAttribute::Position, points)?;
    if let Some(labels) = labels
        && count > 0
    {
        store.add_string_attribute(VertexAttribute::Label, 1, count, labels)?;
    }
    add_data(store, data, count)
}

/// Append a structured surface primitive and its strip tables.
pub fn fill_surface_vertex_array(
    store: &mut VertexAttributeStore,
    surface: &SurfaceVertexData<'_>,
) -> VertexArrayResult<()> {
    let count = surface.n_xi1 * surface.n_xi2;
    check_len("points", Some(surface.points.len()), count)?;
    check_len("normals", surface.normals.map(<[Triple]>::len), count)?;
    check_len("tangents", surface.tangents.map(<[Triple]>::len), count)?;
    check_len(
        "texture coordinates",
        surface.texture_coordinates.map(<[Triple]>::len),
        count,
    )?;

    let vertex_start = begin_primitive(store, count)?;
    store.add_unsigned_attribute(VertexAttribute::NumberOfXi1, 1, 1, &[surface.n_xi1 as u32])?;
    store.add_unsigned_attribute(VertexAttribute::NumberOfXi2, 1, 1, &[surface.n_xi2 as u32])?;
    add_triples(store, VertexAttribute::Position, surface.points)?;
    if let Some(normals) = surface.normals {
        add_triples(store, VertexAttribute::Normal, normals)?;
    }
    if let Some(tangents) = surface.tangents {
        add_triples(store, VertexAttribute::Tangent, tangents)?;
    }
    if let Some(texture_coordinates) = surface.texture_coordinates {
        add_triples(store, VertexAttribute::TextureCoordinate0, texture_coordinates)?;
    }
    store.add_integer_attribute(VertexAttribute::Polygon, 1, 1, &[surface.polygon as i32])?;
    add_data(store, surface.data, count)?;
    if surface.discontinuous {
        return Ok(());
    }
    store.fill_element_index(
        vertex_start,
        surface.n_xi1 as u32,
        surface.n_xi2 as u32,
        ElementShape::Unspecified,
    )
}

/// Write a glyph set primitive.
///
/// With `location == None` a new primitive is appended. With
/// `Some(primitive)` the per-point values of that existing primitive are
/// overwritten in place, which is how partial redraws update glyphs.
pub fn fill_glyph_vertex_array(
    store: &mut VertexAttributeStore,
    location: Option<usize>,
    glyphs: &GlyphVertexData<'_>,
) -> VertexArrayResult<()> {
    let count = glyphs.points.len();
    check_len("axis1", glyphs.axis1.map(<[Triple]>::len), count)?;
    check_len("axis2", glyphs.axis2.map(<[Triple]>::len), count)?;
    check_len("axis3", glyphs.axis3.map(<[Triple]>::len), count)?;
    check_len("scale", glyphs.scale.map(<[Triple]>::len), count)?;
    check_len("label density", glyphs.label_density.map(<[Triple]>::len), count)?;
    check_len("labels", glyphs.labels.map(<[String]>::len), count)?;
    check_len("names", glyphs.names.map(<[i32]>::len), count)?;

    let per_point = [
        (VertexAttribute::Position, Some(glyphs.points)),
        (VertexAttribute::Axis1, glyphs.axis1),
        (VertexAttribute::Axis2, glyphs.axis2),
        (VertexAttribute::Axis3, glyphs.axis3),
        (VertexAttribute::Scale, glyphs.scale),
        (VertexAttribute::LabelDensity, glyphs.label_density),
    ];

    match location {
        None => {
            begin_primitive(store, count)?;
            for (kind, triples) in per_point {
                if let Some(triples) = triples {
                    add_triples(store, kind, triples)?;
                }
            }
            if let Some(bounds) = glyphs.label_bounds {
                add_data_to(store, VertexAttribute::LabelBound, Some(bounds), count)?;
            }
            if let Some(labels) = glyphs.labels
                && count > 0
            {
                store.add_string_attribute(VertexAttribute::Label, 1, count, labels)?;
            }
            if let Some(names) = glyphs.names {
                store.add_integer_attribute(VertexAttribute::VertexId, 1, count, names)?;
            }
            store.add_integer_attribute(VertexAttribute::ObjectId, 1, 1, &[glyphs.object_id])?;
            store.add_fast_search_id(glyphs.object_id);
            store.add_integer_attribute(VertexAttribute::UpdateRequired, 1, 1, &[0])?;
            add_data(store, glyphs.data, count)
        }
        Some(primitive) => {
            let vertex_start = store
                .scalar::<u32>(VertexAttribute::ElementIndexStart, primitive)
                .ok_or_else(|| {
                    VertexArrayError::InvalidArgument(format!("no glyph primitive at {primitive}"))
                })? as usize;
            for (kind, triples) in per_point {
                if let Some(triples) = triples {
                    let values = triples.as_flattened();
                    store.replace_attribute_at(kind, vertex_start, 3, count, values)?;
                }
            }
            if let Some(bounds) = glyphs.label_bounds {
                store.replace_attribute_at(
                    VertexAttribute::LabelBound,
                    vertex_start,
                    bounds.components,
                    count,
                    bounds.values,
                )?;
            }
            if let Some(names) = glyphs.names {
                let kind = VertexAttribute::VertexId;
                store.replace_attribute_at(kind, vertex_start, 1, count, names)?;
            }
            if let Some(data) = glyphs.data {
                store.replace_attribute_at(
                    VertexAttribute::Data,
                    vertex_start,
                    data.components,
                    count,
                    data.values,
                )?;
            }
            Ok(())
        }
    }
}

/// Record count and start of a new primitive; returns its first vertex.
fn begin_primitive(store: &mut VertexAttributeStore, count: usize) -> VertexArrayResult<u32> {
    let vertex_start = store.number_of_vertices(VertexAttribute::Position) as u32;
    store.add_unsigned_attribute(VertexAttribute::ElementIndexCount, 1, 1, &[count as u32])?;
    store.add_unsigned_attribute(VertexAttribute::ElementIndexStart, 1, 1, &[vertex_start])?;
    Ok(vertex_start)
}

fn add_triples(
    store: &mut VertexAttributeStore,
    kind: VertexAttribute,
    triples: &[Triple],
) -> VertexArrayResult<()> {
    store.add_float_attribute(kind, 3, triples.len(), triples.as_flattened())
}

fn add_data(
    store: &mut VertexAttributeStore,
    data: Option<DataValues<'_>>,
    count: usize,
) -> VertexArrayResult<()> {
    add_data_to(store, VertexAttribute::Data, data, count)
}

fn add_data_to(
    store: &mut VertexAttributeStore,
    kind: VertexAttribute,
    data: Option<DataValues<'_>>,
    count: usize,
) -> VertexArrayResult<()> {
    match data {
        Some(data) => store.add_float_attribute(kind, data.components, count, data.values),
        None => Ok(()),
    }
}

fn check_len(what: &str, len: Option<usize>, expected: usize) -> VertexArrayResult<()> {
    match len {
        Some(len) if len != expected => Err(VertexArrayError::InvalidArgument(format!(
            "{len} {what} given for {expected} vertices"
        ))),
        _ => Ok(()),
    }
}
