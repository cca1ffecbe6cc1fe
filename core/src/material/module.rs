//! Registry of named materials.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::CoreResult;
use crate::manager::{Manager, ManagerMessage, Subscription};

use super::{Colour, Material};

/// Owns the managed materials of one context.
pub struct MaterialModule {
    manager: Manager<Material>,
    default_material: Mutex<Option<Arc<Material>>>,
}

impl MaterialModule {
    pub fn new() -> Self {
        Self {
            manager: Manager::new(),
            default_material: Mutex::new(None),
        }
    }

    pub fn manager(&self) -> &Manager<Material> {
        &self.manager
    }

    /// Create a managed material. Fails if `name` is taken.
    pub fn create_material(&self, name: &str) -> CoreResult<Arc<Material>> {
        let material = Material::new(name);
        self.manager.add(Arc::clone(&material))?;
        Ok(material)
    }

    pub fn find_material_by_name(&self, name: &str) -> Option<Arc<Material>> {
        self.manager.find_by_name(name)
    }

    pub fn default_material(&self) -> Option<Arc<Material>> {
        self.default_material.lock().clone()
    }

    pub fn set_default_material(&self, material: Option<Arc<Material>>) {
        *self.default_material.lock() = material;
    }

    /// Define `default`, `black`, `white`, `red`, `green`, `blue`, `gold` and
    /// `silver` if they do not exist yet. Existing materials are left alone.
    pub fn define_standard_materials(&self) -> CoreResult<()> {
        const STANDARD: [(&str, Colour); 8] = [
            ("default", Colour::WHITE),
            ("black", Colour::BLACK),
            ("white", Colour::WHITE),
            ("red", Colour::RED),
            ("green", Colour::GREEN),
            ("blue", Colour::BLUE),
            ("gold", Colour::new(1.0, 0.8, 0.0)),
            ("silver", Colour::new(0.7, 0.7, 0.7)),
        ];

        self.begin_change();
        let result = STANDARD.iter().try_for_each(|(name, colour)| {
            if self.manager.is_name_in_use(name) {
                return Ok(());
            }
            let material = Material::with_colour(*name, *colour);
            self.manager.add(material)
        });
        self.end_change();
        result?;

        if self.default_material().is_none() {
            self.set_default_material(self.find_material_by_name("default"));
        }
        Ok(())
    }

    pub fn begin_change(&self) {
        self.manager.begin_change();
    }

    pub fn end_change(&self) {
        self.manager.end_change();
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&ManagerMessage<Material>) + Send + Sync + 'static,
    ) -> Subscription {
        self.manager.subscribe(callback)
    }
}

impl Default for MaterialModule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{ChangeFlags, Managed};

    #[test]
    fn test_standard_materials() {
        let module = MaterialModule::new();
        module.define_standard_materials().unwrap();
        let red = module.find_material_by_name("red").unwrap();
        assert_eq!(red.diffuse(), Colour::RED);
        assert!(red.is_managed());
        assert_eq!(module.default_material().unwrap().name(), "default");

        // second call is a no-op
        module.define_standard_materials().unwrap();
        assert_eq!(module.manager().len(), 8);
    }

    #[test]
    fn test_material_change_notifies() {
        let module = MaterialModule::new();
        let material = module.create_material("m").unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let target = material.clone();
        let _subscription = module.subscribe(move |message| {
            sink.lock().push(message.object_change(&target));
        });

        material.set_diffuse(Colour::RED);
        material.set_diffuse(Colour::RED);
        assert_eq!(*received.lock(), vec![ChangeFlags::DEFINITION]);
    }

    #[test]
    fn test_rename_rejects_duplicate() {
        let module = MaterialModule::new();
        let a = module.create_material("a").unwrap();
        module.create_material("b").unwrap();
        assert!(a.set_name("b").is_err());
        assert!(a.set_name("c").is_ok());
        assert!(module.find_material_by_name("c").is_some());
        assert!(module.create_material("c").is_err());
    }
}
