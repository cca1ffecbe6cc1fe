//! Drawable objects handed to renderers.
//!
//! A [`GraphicsObject`] owns one primitive's vertex attributes plus the
//! material and spectrum it is drawn with. Objects can be chained with
//! [`GraphicsObject::set_next`] so that composite glyphs (an arrow triad
//! with labels, a colour bar with ticks) travel as one handle.

pub mod glyph_set;
pub mod resolve;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::font::Font;
use crate::material::Material;
use crate::spectrum::Spectrum;
use crate::vertex_array::{VertexAttribute, VertexAttributeStore};

pub use glyph_set::{GlyphInstance, GlyphSetParameters, GlyphSetPrimitive};
pub use resolve::{GlyphPoint, GlyphRepeatMode, GlyphSizing, ResolvedAxes, resolve_glyph_axes};

/// How consecutive polyline vertices are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolylineType {
    /// Each primitive is one connected strip.
    Continuous,
    /// Vertices pair up into separate segments.
    #[default]
    Discontinuous,
}

/// Marker drawn at each vertex of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointMarker {
    /// Nothing but the label.
    #[default]
    None,
    Point,
    Plus,
    Cross,
}

/// Extra decoration a renderer generates around a glyph at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphLabelsFunction {
    #[default]
    None,
    /// Tick marks and values along axis 1.
    AxesTicks,
    /// Grid lines spaced with the coordinate scaling.
    GridLines,
}

/// The primitive a graphics object holds.
#[derive(Debug, Clone)]
pub enum Primitive {
    Polyline {
        line_type: PolylineType,
        line_width: f32,
    },
    Surface,
    PointSet {
        marker: PointMarker,
        marker_size: f32,
        font: Option<Arc<Font>>,
    },
    GlyphSet(Box<GlyphSetPrimitive>),
}

impl Primitive {
    pub fn polyline(line_type: PolylineType) -> Self {
        Self::Polyline {
            line_type,
            line_width: 0.0,
        }
    }

    pub fn point_set(marker: PointMarker, marker_size: f32, font: Option<Arc<Font>>) -> Self {
        Self::PointSet {
            marker,
            marker_size,
            font,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Polyline { .. } => "polyline",
            Self::Surface => "surface",
            Self::PointSet { .. } => "point set",
            Self::GlyphSet(_) => "glyph set",
        }
    }
}

/// A named, renderable primitive with its vertex data.
#[derive(Debug)]
pub struct GraphicsObject {
    name: String,
    primitive: Primitive,
    default_material: Option<Arc<Material>>,
    spectrum: Option<Arc<Spectrum>>,
    labels_function: GlyphLabelsFunction,
    vertices: VertexAttributeStore,
    next: Option<Arc<GraphicsObject>>,
    generation: AtomicU64,
}

impl GraphicsObject {
    pub fn new(name: impl Into<String>, primitive: Primitive) -> Self {
        Self {
            name: name.into(),
            primitive,
            default_material: None,
            spectrum: None,
            labels_function: GlyphLabelsFunction::None,
            vertices: VertexAttributeStore::new(),
            next: None,
            generation: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn glyph_set(&self) -> Option<&GlyphSetPrimitive> {
        match &self.primitive {
            Primitive::GlyphSet(glyph_set) => Some(glyph_set),
            _ => None,
        }
    }

    pub fn default_material(&self) -> Option<&Arc<Material>> {
        self.default_material.as_ref()
    }

    pub fn set_default_material(&mut self, material: Option<Arc<Material>>) {
        self.default_material = material;
    }

    pub fn with_default_material(mut self, material: Option<Arc<Material>>) -> Self {
        self.default_material = material;
        self
    }

    pub fn spectrum(&self) -> Option<&Arc<Spectrum>> {
        self.spectrum.as_ref()
    }

    pub fn set_spectrum(&mut self, spectrum: Option<Arc<Spectrum>>) {
        self.spectrum = spectrum;
    }

    pub fn labels_function(&self) -> GlyphLabelsFunction {
        self.labels_function
    }

    pub fn set_labels_function(&mut self, labels_function: GlyphLabelsFunction) {
        self.labels_function = labels_function;
    }

    pub fn vertices(&self) -> &VertexAttributeStore {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut VertexAttributeStore {
        &mut self.vertices
    }

    /// Number of primitives recorded in the vertex store.
    pub fn primitive_count(&self) -> usize {
        self.vertices
            .number_of_vertices(VertexAttribute::ElementIndexCount)
    }

    pub fn next(&self) -> Option<&Arc<GraphicsObject>> {
        self.next.as_ref()
    }

    pub fn set_next(&mut self, next: Option<Arc<GraphicsObject>>) {
        self.next = next;
    }

    /// This object followed by every object chained after it.
    pub fn chain(&self) -> impl Iterator<Item = &GraphicsObject> {
        std::iter::successors(Some(self), |object| object.next.as_deref())
    }

    pub fn chain_len(&self) -> usize {
        self.chain().count()
    }

    /// Whether any object in the chain is a surface, directly or through a glyph set.
    pub fn contains_surface_primitives(&self) -> bool {
        self.chain().any(|object| match &object.primitive {
            Primitive::Surface => true,
            Primitive::GlyphSet(glyph_set) => glyph_set.glyph().contains_surface_primitives(),
            _ => false,
        })
    }

    /// Compile generation; renderers recompile when it advances.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Advance the compile generation of this object and its chain.
    pub fn mark_changed(&self) {
        for object in self.chain() {
            object.generation.fetch_add(1, Ordering::AcqRel);
        }
    }
}

/// Link `objects` front to back and return the head of the chain.
pub fn link_chain(objects: Vec<GraphicsObject>) -> Option<Arc<GraphicsObject>> {
    objects.into_iter().rev().fold(None, |next, mut object| {
        object.next = next;
        Some(Arc::new(object))
    })
}
