use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;
use zinc_core::font::Font;
use zinc_core::graphics_object::GraphicsObject;
use zinc_core::manager::{ChangeFlags, ManagerMessage};
use zinc_core::material::Material;
use zinc_core::tessellation::Tessellation;

use crate::error::GlyphResult;

use super::{Glyph, GlyphCore, glyph_changed};

/// A glyph wrapping a prebuilt graphics object.
#[derive(Debug)]
pub struct StaticGlyph {
    core: GlyphCore,
    object: RwLock<Arc<GraphicsObject>>,
}

impl StaticGlyph {
    pub fn new(name: impl Into<String>, object: Arc<GraphicsObject>) -> Arc<Self> {
        Arc::new(Self {
            core: GlyphCore::new(name),
            object: RwLock::new(object),
        })
    }

    pub fn object(&self) -> Arc<GraphicsObject> {
        Arc::clone(&self.object.read())
    }

    /// Replace the wrapped object.
    pub fn set_object(&self, object: Arc<GraphicsObject>) {
        let changed = {
            let mut current = self.object.write();
            let changed = !Arc::ptr_eq(&current, &object);
            *current = object;
            changed
        };
        if changed {
            glyph_changed(self, ChangeFlags::DEFINITION);
        }
    }
}

impl Glyph for StaticGlyph {
    fn core(&self) -> &GlyphCore {
        &self.core
    }

    fn graphics_object(
        &self,
        _tessellation: &Tessellation,
        _material: Option<&Arc<Material>>,
        _font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>> {
        Ok(self.object())
    }

    /// Recompile chain members whose own material changed.
    fn material_change(&self, message: &ManagerMessage<Material>) {
        let object = self.object();
        let mut changed = false;
        for member in object.chain() {
            if let Some(material) = member.default_material()
                && message.object_change(material).affects_result()
            {
                member.mark_changed();
                changed = true;
            }
        }
        if changed {
            log::debug!("static glyph '{}' material changed", self.core.name());
            glyph_changed(self, ChangeFlags::DEPENDENCY);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
