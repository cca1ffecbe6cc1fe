//! Graphical materials.
//!
//! A [`Material`] is a named, shared set of lighting colours. Materials held
//! by a [`MaterialModule`] report every change to the module's listeners, which
//! is how glyphs built with a material learn they must rebuild.
//!
//! Private materials (never added to a module) are used for the fixed axis
//! colours of solid axes glyphs.

mod module;
mod types;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CoreResult, invalid_argument};
use crate::manager::{ChangeFlags, Managed, ManagerLink, check_rename};

pub use module::MaterialModule;
pub use types::Colour;

#[derive(Debug, Clone, PartialEq)]
struct MaterialState {
    name: String,
    ambient: Colour,
    diffuse: Colour,
    emission: Colour,
    specular: Colour,
    alpha: f32,
    shininess: f32,
}

/// A named surface material.
#[derive(Debug)]
pub struct Material {
    state: RwLock<MaterialState>,
    link: ManagerLink<Material>,
}

impl Material {
    /// Create an unmanaged material with white diffuse colour.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(MaterialState {
                name: name.into(),
                ambient: Colour::WHITE,
                diffuse: Colour::WHITE,
                emission: Colour::BLACK,
                specular: Colour::BLACK,
                alpha: 1.0,
                shininess: 0.0,
            }),
            link: ManagerLink::new(),
        })
    }

    /// Create an unmanaged material with the given ambient and diffuse colour.
    pub fn with_colour(name: impl Into<String>, colour: Colour) -> Arc<Self> {
        let material = Self::new(name);
        {
            let mut state = material.state.write();
            state.ambient = colour;
            state.diffuse = colour;
        }
        material
    }

    pub fn set_name(&self, name: &str) -> CoreResult<()> {
        if name.is_empty() {
            return Err(invalid_argument("material name must not be empty"));
        }
        if check_rename(self, name)? {
            self.state.write().name = name.to_string();
            self.link.object_changed(self, ChangeFlags::IDENTIFIER);
        }
        Ok(())
    }

    pub fn is_managed(&self) -> bool {
        self.link.is_managed()
    }

    pub fn ambient(&self) -> Colour {
        self.state.read().ambient
    }

    pub fn set_ambient(&self, colour: Colour) {
        self.update(|state| replace(&mut state.ambient, colour));
    }

    pub fn diffuse(&self) -> Colour {
        self.state.read().diffuse
    }

    pub fn set_diffuse(&self, colour: Colour) {
        self.update(|state| replace(&mut state.diffuse, colour));
    }

    pub fn emission(&self) -> Colour {
        self.state.read().emission
    }

    pub fn set_emission(&self, colour: Colour) {
        self.update(|state| replace(&mut state.emission, colour));
    }

    pub fn specular(&self) -> Colour {
        self.state.read().specular
    }

    pub fn set_specular(&self, colour: Colour) {
        self.update(|state| replace(&mut state.specular, colour));
    }

    pub fn alpha(&self) -> f32 {
        self.state.read().alpha
    }

    /// Set opacity; must lie in `[0, 1]`.
    pub fn set_alpha(&self, alpha: f32) -> CoreResult<()> {
        check_unit_interval("alpha", alpha)?;
        self.update(|state| replace(&mut state.alpha, alpha));
        Ok(())
    }

    pub fn shininess(&self) -> f32 {
        self.state.read().shininess
    }

    /// Set shininess; must lie in `[0, 1]`.
    pub fn set_shininess(&self, shininess: f32) -> CoreResult<()> {
        check_unit_interval("shininess", shininess)?;
        self.update(|state| replace(&mut state.shininess, shininess));
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut MaterialState) -> bool) {
        let changed = apply(&mut self.state.write());
        if changed {
            self.link.object_changed(self, ChangeFlags::DEFINITION);
        }
    }
}

impl Managed for Material {
    fn name(&self) -> String {
        self.state.read().name.clone()
    }

    fn manager_link(&self) -> &ManagerLink<Self> {
        &self.link
    }
}

/// Store `value` in `slot`; true if it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn check_unit_interval(what: &str, value: f32) -> CoreResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid_argument(format!("{what} {value} outside [0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_defaults() {
        let material = Material::new("plain");
        assert_eq!(material.name(), "plain");
        assert_eq!(material.diffuse(), Colour::WHITE);
        assert_eq!(material.alpha(), 1.0);
        assert!(!material.is_managed());
    }

    #[test]
    fn test_alpha_range_checked() {
        let material = Material::new("m");
        assert!(material.set_alpha(0.5).is_ok());
        assert!(matches!(material.set_alpha(1.5), Err(CoreError::InvalidArgument(_))));
        assert!(material.set_alpha(-0.1).is_err());
        assert_eq!(material.alpha(), 0.5);
    }

    #[test]
    fn test_with_colour() {
        let red = Material::with_colour("red", Colour::new(1.0, 0.0, 0.0));
        assert_eq!(red.diffuse(), Colour::new(1.0, 0.0, 0.0));
        assert_eq!(red.ambient(), Colour::new(1.0, 0.0, 0.0));
    }
}
