use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use zinc_core::font::Font;
use zinc_core::generators::{
    ArrowSolidShape, create_arrow_solid, create_cone, create_cylinder, create_sphere,
};
use zinc_core::graphics_object::GraphicsObject;
use zinc_core::material::Material;
use zinc_core::tessellation::Tessellation;

use crate::error::GlyphResult;

use super::{Glyph, GlyphCore};

/// Round shape whose facet count follows the tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircularShape {
    ArrowSolid { head_length: f32, head_width: f32 },
    Cone,
    ConeSolid,
    Cylinder,
    CylinderSolid,
    Sphere,
}

/// A glyph built once per circle division count.
#[derive(Debug)]
pub struct CircularGlyph {
    core: GlyphCore,
    shape: CircularShape,
    objects: Mutex<Vec<(u32, Arc<GraphicsObject>)>>,
}

impl CircularGlyph {
    pub fn new(name: impl Into<String>, shape: CircularShape) -> Arc<Self> {
        Arc::new(Self {
            core: GlyphCore::new(name),
            shape,
            objects: Mutex::new(Vec::new()),
        })
    }

    /// Solid arrow with a head `head_length` long and `head_width` across.
    pub fn arrow_solid(head_length: f32, head_width: f32) -> Arc<Self> {
        Self::new(
            "arrow_solid",
            CircularShape::ArrowSolid {
                head_length,
                head_width,
            },
        )
    }

    pub fn shape(&self) -> CircularShape {
        self.shape
    }

    fn build(&self, divisions: u32) -> GlyphResult<GraphicsObject> {
        let name = format!("{}_{divisions}", self.core.name());
        let object = match self.shape {
            CircularShape::ArrowSolid {
                head_length,
                head_width,
            } => create_arrow_solid(
                &name,
                &ArrowSolidShape::from_head(head_length, head_width),
                divisions,
            )?,
            CircularShape::Cone => create_cone(&name, divisions, false)?,
            CircularShape::ConeSolid => create_cone(&name, divisions, true)?,
            CircularShape::Cylinder => create_cylinder(&name, divisions, false)?,
            CircularShape::CylinderSolid => create_cylinder(&name, divisions, true)?,
            CircularShape::Sphere => create_sphere(&name, divisions, (divisions / 2).max(2))?,
        };
        Ok(object)
    }
}

impl Glyph for CircularGlyph {
    fn core(&self) -> &GlyphCore {
        &self.core
    }

    fn graphics_object(
        &self,
        tessellation: &Tessellation,
        _material: Option<&Arc<Material>>,
        _font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>> {
        let divisions = tessellation.circle_divisions();
        let mut objects = self.objects.lock();
        if let Some((_, object)) = objects.iter().find(|(cached, _)| *cached == divisions) {
            return Ok(Arc::clone(object));
        }
        log::debug!("building '{}' with {divisions} circle divisions", self.core.name());
        let object = Arc::new(self.build(divisions)?);
        objects.push((divisions, Arc::clone(&object)));
        Ok(object)
    }

    fn uses_circle_divisions(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
