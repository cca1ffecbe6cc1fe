//! Glyphs: named unit shapes instanced at points by glyph sets.
//!
//! Every glyph implements [`Glyph`], which hands out a graphics object for a
//! tessellation, material and font. Derived glyphs ([`AxesGlyph`],
//! [`ColourBarGlyph`]) build that object lazily and cache it until one of
//! their parameters or inputs changes.
//!
//! Glyphs are held as `Arc<dyn Glyph>` by a [`GlyphModule`](crate::GlyphModule)
//! and report their own changes through the module's manager.

mod axes;
mod circular;
mod colour_bar;
mod shape_type;
mod static_glyph;

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use zinc_core::font::Font;
use zinc_core::graphics_object::GraphicsObject;
use zinc_core::manager::{ChangeFlags, Managed, ManagerLink, ManagerMessage, check_rename};
use zinc_core::material::Material;
use zinc_core::spectrum::Spectrum;
use zinc_core::tessellation::Tessellation;

use crate::error::{GlyphResult, invalid_argument};

pub use axes::AxesGlyph;
pub use circular::{CircularGlyph, CircularShape};
pub use colour_bar::{ColourBarGlyph, ColourBarParameters, DEFAULT_NUMBER_FORMAT};
pub use shape_type::GlyphShapeType;
pub use static_glyph::StaticGlyph;

/// Behaviour shared by every glyph.
pub trait Glyph: Send + Sync + fmt::Debug + 'static {
    fn core(&self) -> &GlyphCore;

    /// The object to draw at each glyph point.
    ///
    /// `material` is the default material of the glyph set, `font` its label font.
    fn graphics_object(
        &self,
        tessellation: &Tessellation,
        material: Option<&Arc<Material>>,
        font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>>;

    /// Whether the object depends on the font passed to [`graphics_object`](Self::graphics_object).
    fn uses_font(&self) -> bool {
        false
    }

    /// Whether the object depends on the tessellation's circle divisions.
    fn uses_circle_divisions(&self) -> bool {
        false
    }

    fn material_change(&self, _message: &ManagerMessage<Material>) {}

    fn font_change(&self, _message: &ManagerMessage<Font>) {}

    fn spectrum_change(&self, _message: &ManagerMessage<Spectrum>) {}

    /// Changes to other glyphs of the same module.
    fn glyph_change(&self, _message: &ManagerMessage<dyn Glyph>) {}

    fn as_any(&self) -> &dyn Any;
}

/// Identity and manager state common to all glyphs.
pub struct GlyphCore {
    name: RwLock<String>,
    shape_type: RwLock<GlyphShapeType>,
    managed: AtomicBool,
    link: ManagerLink<dyn Glyph>,
}

impl GlyphCore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: RwLock::new(name.into()),
            shape_type: RwLock::new(GlyphShapeType::Invalid),
            managed: AtomicBool::new(false),
            link: ManagerLink::new(),
        }
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn shape_type(&self) -> GlyphShapeType {
        *self.shape_type.read()
    }

    pub fn is_managed(&self) -> bool {
        self.managed.load(Ordering::Acquire)
    }

    /// Whether a glyph module currently holds the glyph.
    pub fn is_in_module(&self) -> bool {
        self.link.is_managed()
    }

    pub fn link(&self) -> &ManagerLink<dyn Glyph> {
        &self.link
    }

    pub(crate) fn set_name_unchecked(&self, name: &str) {
        *self.name.write() = name.to_string();
    }

    pub(crate) fn set_shape_type(&self, shape_type: GlyphShapeType) {
        *self.shape_type.write() = shape_type;
    }

    pub(crate) fn set_managed_flag(&self, managed: bool) -> bool {
        self.managed.swap(managed, Ordering::AcqRel) != managed
    }
}

impl fmt::Debug for GlyphCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphCore")
            .field("name", &*self.name.read())
            .field("shape_type", &self.shape_type())
            .field("managed", &self.is_managed())
            .finish()
    }
}

impl Managed for dyn Glyph {
    fn name(&self) -> String {
        self.core().name()
    }

    fn manager_link(&self) -> &ManagerLink<Self> {
        self.core().link()
    }
}

impl dyn Glyph {
    pub fn name(&self) -> String {
        self.core().name()
    }

    /// Rename the glyph. Fails if another glyph of its module has the name.
    pub fn set_name(&self, name: &str) -> GlyphResult<()> {
        if name.is_empty() {
            return Err(invalid_argument("glyph name must not be empty"));
        }
        if check_rename(self, name)? {
            self.core().set_name_unchecked(name);
            self.core().link().object_changed(self, ChangeFlags::IDENTIFIER);
        }
        Ok(())
    }

    pub fn shape_type(&self) -> GlyphShapeType {
        self.core().shape_type()
    }

    pub fn is_managed(&self) -> bool {
        self.core().is_managed()
    }

    /// Managed glyphs stay in their module while nothing else refers to them.
    pub fn set_managed(&self, managed: bool) {
        if self.core().set_managed_flag(managed) {
            self.core().link().object_changed(self, ChangeFlags::DEFINITION);
        }
    }

    pub fn downcast_ref<T: Glyph>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Report a change of `glyph` to its module, if it has one.
pub(crate) fn glyph_changed<G: Glyph + ?Sized>(glyph: &G, flags: ChangeFlags) {
    glyph.core().link().object_changed(glyph, flags);
}

/// Whether the object `glyph` produces contains any surface.
pub fn contains_surface_primitives(
    glyph: &dyn Glyph,
    tessellation: &Tessellation,
    material: Option<&Arc<Material>>,
    font: Option<&Arc<Font>>,
) -> bool {
    glyph
        .graphics_object(tessellation, material, font)
        .is_ok_and(|object| object.contains_surface_primitives())
}

fn same_arc<T: ?Sized>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zinc_core::generators::create_line;

    fn line_glyph() -> Arc<dyn Glyph> {
        let object = Arc::new(create_line("line").unwrap());
        StaticGlyph::new("line", object)
    }

    #[test]
    fn test_name_and_managed_flag() {
        let glyph = line_glyph();
        assert_eq!(glyph.name(), "line");
        assert!(!glyph.is_managed());
        glyph.set_managed(true);
        assert!(glyph.is_managed());
        glyph.set_name("segment").unwrap();
        assert_eq!(glyph.name(), "segment");
        assert!(glyph.set_name("").is_err());
    }

    #[test]
    fn test_downcast() {
        let glyph = line_glyph();
        assert!(glyph.downcast_ref::<StaticGlyph>().is_some());
        assert!(glyph.downcast_ref::<AxesGlyph>().is_none());
    }

    #[test]
    fn test_contains_surface_primitives() {
        let tessellation = Tessellation::default();
        assert!(!contains_surface_primitives(&*line_glyph(), &tessellation, None, None));
        let cone: Arc<dyn Glyph> = CircularGlyph::new("cone", CircularShape::Cone);
        assert!(contains_surface_primitives(&*cone, &tessellation, None, None));
    }
}
