//! The glyph module: a registry of uniquely named glyphs.
//!
//! Glyphs are added either fully defined ([`GlyphModule::define_glyph`]) or
//! anonymously, in which case they receive a `tempN` name. Every change to a
//! held glyph is forwarded to the other glyphs (so axes follow their axis
//! glyph) and then to the module's notifiers as a [`GlyphModuleEvent`].
//!
//! Batches of changes bracketed by [`GlyphModule::begin_change`] and
//! [`GlyphModule::end_change`] reach notifiers as one event.

mod event;
mod standard;

use std::sync::Arc;

use parking_lot::Mutex;
use zinc_core::font::Font;
use zinc_core::graphics_object::GraphicsObject;
use zinc_core::manager::{ListenerList, Manager, ManagerMessage, Subscription};
use zinc_core::material::{Material, MaterialModule};
use zinc_core::spectrum::Spectrum;

use crate::error::{GlyphError, GlyphResult};
use crate::glyph::{AxesGlyph, ColourBarGlyph, Glyph, GlyphShapeType, StaticGlyph};

pub use event::GlyphModuleEvent;
pub use standard::StandardGlyphOptions;

pub struct GlyphModule {
    manager: Manager<dyn Glyph>,
    material_module: Arc<MaterialModule>,
    default_point_glyph: Mutex<Option<Arc<dyn Glyph>>>,
    notifiers: Arc<ListenerList<GlyphModuleEvent>>,
    _manager_subscription: Subscription,
}

impl GlyphModule {
    /// Create an empty module; `material_module` supplies the standard axis colours.
    pub fn new(material_module: Arc<MaterialModule>) -> Self {
        let manager: Manager<dyn Glyph> = Manager::new();
        let notifiers = Arc::new(ListenerList::new());

        let glyphs = manager.downgrade();
        let forward = Arc::clone(&notifiers);
        let manager_subscription = manager.subscribe(move |message: &ManagerMessage<dyn Glyph>| {
            if let Some(manager) = glyphs.upgrade() {
                for glyph in manager.objects() {
                    glyph.glyph_change(message);
                }
            }
            if !forward.is_empty() {
                forward.dispatch(&GlyphModuleEvent::from_message(message));
            }
        });

        Self {
            manager,
            material_module,
            default_point_glyph: Mutex::new(None),
            notifiers,
            _manager_subscription: manager_subscription,
        }
    }

    pub fn manager(&self) -> &Manager<dyn Glyph> {
        &self.manager
    }

    pub fn material_module(&self) -> &Arc<MaterialModule> {
        &self.material_module
    }

    pub fn begin_change(&self) {
        self.manager.begin_change();
    }

    pub fn end_change(&self) {
        self.manager.end_change();
    }

    /// Name, tag and add `glyph` as a managed glyph.
    ///
    /// Returns `Ok(false)` without adding anything if `name` is already taken.
    pub fn define_glyph(
        &self,
        name: &str,
        glyph: Arc<dyn Glyph>,
        shape_type: GlyphShapeType,
    ) -> GlyphResult<bool> {
        if self.manager.is_name_in_use(name) {
            log::debug!("glyph '{name}' already defined");
            return Ok(false);
        }
        check_not_in_module(&*glyph)?;
        glyph.set_name(name)?;
        glyph.set_managed(true);
        glyph.core().set_shape_type(shape_type);
        self.add_glyph(glyph)?;
        Ok(true)
    }

    /// Wrap `object` in a managed static glyph named after it.
    ///
    /// Returns `Ok(false)` if a glyph with the object's name already exists.
    pub fn define_glyph_static(
        &self,
        object: impl Into<Arc<GraphicsObject>>,
        shape_type: GlyphShapeType,
    ) -> GlyphResult<bool> {
        let object = object.into();
        let name = object.name().to_string();
        if self.manager.is_name_in_use(&name) {
            log::debug!("glyph '{name}' already defined");
            return Ok(false);
        }
        let glyph = StaticGlyph::new(name, object);
        glyph.core().set_shape_type(shape_type);
        glyph.core().set_managed_flag(true);
        self.add_glyph(glyph)?;
        Ok(true)
    }

    pub fn find_glyph_by_name(&self, name: &str) -> Option<Arc<dyn Glyph>> {
        self.manager.find_by_name(name)
    }

    /// First glyph in name order carrying `shape_type`.
    pub fn find_glyph_by_shape_type(&self, shape_type: GlyphShapeType) -> Option<Arc<dyn Glyph>> {
        self.manager.find(|glyph| glyph.shape_type() == shape_type)
    }

    /// Snapshot of the glyphs in name order.
    pub fn glyph_iter(&self) -> impl Iterator<Item = Arc<dyn Glyph>> {
        self.manager.objects().into_iter()
    }

    pub fn len(&self) -> usize {
        self.manager.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manager.is_empty()
    }

    /// Add `glyph`, renaming it to a free `tempN` if it is unnamed or its
    /// name is taken.
    pub fn add_glyph(&self, glyph: Arc<dyn Glyph>) -> GlyphResult<()> {
        check_not_in_module(&*glyph)?;
        let name = glyph.name();
        if name.is_empty() || self.manager.is_name_in_use(&name) {
            let temporary = self.temporary_name();
            log::debug!("adding glyph '{name}' as '{temporary}'");
            glyph.core().set_name_unchecked(&temporary);
        }
        self.manager.add(glyph)?;
        Ok(())
    }

    fn temporary_name(&self) -> String {
        let mut number = self.manager.len();
        loop {
            number += 1;
            let candidate = format!("temp{number}");
            if !self.manager.is_name_in_use(&candidate) {
                return candidate;
            }
        }
    }

    /// Add an unmanaged static glyph drawing a copy of some graphics.
    ///
    /// The object's default material is cleared so it draws with the
    /// material of whatever glyph set uses it.
    pub fn create_static_glyph_from_graphics_object(
        &self,
        mut object: GraphicsObject,
    ) -> GlyphResult<Arc<dyn Glyph>> {
        object.set_default_material(None);
        let glyph: Arc<dyn Glyph> = StaticGlyph::new(self.temporary_name(), Arc::new(object));
        self.add_glyph(Arc::clone(&glyph))?;
        Ok(glyph)
    }

    /// Add a new unmanaged axes glyph drawing three scaled copies of `axis_glyph`.
    pub fn create_axes_glyph(
        &self,
        axis_glyph: Arc<dyn Glyph>,
        axis_width: f32,
    ) -> GlyphResult<Arc<AxesGlyph>> {
        let axes = AxesGlyph::new(axis_glyph, axis_width)?;
        self.add_glyph(axes.clone())?;
        Ok(axes)
    }

    /// Add a new unmanaged colour bar for `spectrum` with default parameters.
    pub fn create_colour_bar_glyph(
        &self,
        spectrum: Arc<Spectrum>,
    ) -> GlyphResult<Arc<ColourBarGlyph>> {
        let colour_bar = ColourBarGlyph::new(spectrum);
        self.add_glyph(colour_bar.clone())?;
        Ok(colour_bar)
    }

    /// Glyph used for points when none is chosen.
    pub fn default_point_glyph(&self) -> Option<Arc<dyn Glyph>> {
        self.default_point_glyph.lock().clone()
    }

    pub fn set_default_point_glyph(&self, glyph: Option<Arc<dyn Glyph>>) {
        *self.default_point_glyph.lock() = glyph;
    }

    /// Forward material changes to every glyph, delivering the resulting
    /// glyph changes as one event.
    pub fn material_change(&self, message: &ManagerMessage<Material>) {
        self.forward(|glyph| glyph.material_change(message));
    }

    pub fn font_change(&self, message: &ManagerMessage<Font>) {
        self.forward(|glyph| glyph.font_change(message));
    }

    pub fn spectrum_change(&self, message: &ManagerMessage<Spectrum>) {
        self.forward(|glyph| glyph.spectrum_change(message));
    }

    fn forward(&self, notify: impl Fn(&dyn Glyph)) {
        self.begin_change();
        for glyph in self.glyph_iter() {
            notify(&*glyph);
        }
        self.end_change();
    }

    /// Register a listener for glyph changes.
    pub fn subscribe(
        &self,
        callback: impl Fn(&GlyphModuleEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.notifiers.subscribe(callback)
    }

    /// Remove unmanaged glyphs nothing outside the module refers to.
    ///
    /// Returns the number removed.
    pub fn remove_unused_unmanaged(&self) -> usize {
        let default_point_glyph = self.default_point_glyph();
        let mut removed = 0;
        for glyph in self.manager.objects() {
            let is_default = default_point_glyph
                .as_ref()
                .is_some_and(|default| Arc::ptr_eq(default, &glyph));
            // one reference held by the manager, one by this loop
            if !glyph.is_managed() && !is_default && Arc::strong_count(&glyph) == 2 {
                log::debug!("removing unused glyph '{}'", glyph.name());
                self.manager.remove(&*glyph);
                removed += 1;
            }
        }
        removed
    }
}

fn check_not_in_module(glyph: &dyn Glyph) -> GlyphResult<()> {
    if glyph.core().is_in_module() {
        let name = glyph.name();
        log::error!("glyph '{name}' is already in a glyph module");
        return Err(GlyphError::AlreadyManaged(name));
    }
    Ok(())
}

impl Drop for GlyphModule {
    fn drop(&mut self) {
        self.notifiers.dispatch(&GlyphModuleEvent::module_destroyed());
    }
}

impl std::fmt::Debug for GlyphModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphModule")
            .field("glyphs", &self.manager.len())
            .field("notifiers", &self.notifiers.len())
            .finish()
    }
}
