//! Spectra: mappings from data values to colours.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{CoreResult, invalid_argument};
use crate::manager::{
    ChangeFlags, Managed, Manager, ManagerLink, ManagerMessage, Subscription, check_rename,
};
use crate::material::Colour;

/// How a component turns its normalised value into a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColourMapping {
    /// Blue through cyan, green and yellow to red.
    #[default]
    Rainbow,
    Red,
    Green,
    Blue,
    Monochrome,
    WhiteToBlue,
    WhiteToRed,
    WhiteToGreen,
}

impl ColourMapping {
    /// Colour at normalised position `t` in `[0, 1]`.
    pub fn colour_at(self, t: f32) -> Colour {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Rainbow => {
                if t < 0.25 {
                    Colour::new(0.0, 4.0 * t, 1.0)
                } else if t < 0.5 {
                    Colour::new(0.0, 1.0, 1.0 - 4.0 * (t - 0.25))
                } else if t < 0.75 {
                    Colour::new(4.0 * (t - 0.5), 1.0, 0.0)
                } else {
                    Colour::new(1.0, 1.0 - 4.0 * (t - 0.75), 0.0)
                }
            }
            Self::Red => Colour::new(t, 0.0, 0.0),
            Self::Green => Colour::new(0.0, t, 0.0),
            Self::Blue => Colour::new(0.0, 0.0, t),
            Self::Monochrome => Colour::new(t, t, t),
            Self::WhiteToBlue => Colour::WHITE.lerp(Colour::BLUE, t),
            Self::WhiteToRed => Colour::WHITE.lerp(Colour::RED, t),
            Self::WhiteToGreen => Colour::WHITE.lerp(Colour::GREEN, t),
        }
    }
}

/// One band of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumComponent {
    pub range_minimum: f64,
    pub range_maximum: f64,
    pub colour_mapping: ColourMapping,
    pub reverse: bool,
}

impl SpectrumComponent {
    pub fn new(range_minimum: f64, range_maximum: f64, colour_mapping: ColourMapping) -> Self {
        Self {
            range_minimum,
            range_maximum,
            colour_mapping,
            reverse: false,
        }
    }

    fn contains(&self, value: f64) -> bool {
        (self.range_minimum..=self.range_maximum).contains(&value)
    }

    fn colour(&self, value: f64) -> Colour {
        let span = self.range_maximum - self.range_minimum;
        let mut t = if span > 0.0 {
            ((value - self.range_minimum) / span) as f32
        } else {
            0.0
        };
        if self.reverse {
            t = 1.0 - t;
        }
        self.colour_mapping.colour_at(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SpectrumState {
    name: String,
    minimum: f64,
    maximum: f64,
    components: Vec<SpectrumComponent>,
}

/// A named data-to-colour mapping over a numeric range.
#[derive(Debug)]
pub struct Spectrum {
    state: RwLock<SpectrumState>,
    link: ManagerLink<Spectrum>,
}

impl Spectrum {
    /// Create an unmanaged spectrum over `[0, 1]` with no components.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(SpectrumState {
                name: name.into(),
                minimum: 0.0,
                maximum: 1.0,
                components: Vec::new(),
            }),
            link: ManagerLink::new(),
        })
    }

    pub fn set_name(&self, name: &str) -> CoreResult<()> {
        if name.is_empty() {
            return Err(invalid_argument("spectrum name must not be empty"));
        }
        if check_rename(self, name)? {
            self.state.write().name = name.to_string();
            self.link.object_changed(self, ChangeFlags::IDENTIFIER);
        }
        Ok(())
    }

    pub fn minimum(&self) -> f64 {
        self.state.read().minimum
    }

    pub fn maximum(&self) -> f64 {
        self.state.read().maximum
    }

    /// Set the range, rescaling component ranges proportionally.
    pub fn set_minimum_and_maximum(&self, minimum: f64, maximum: f64) -> CoreResult<()> {
        if minimum > maximum {
            return Err(invalid_argument(format!(
                "spectrum minimum {minimum} exceeds maximum {maximum}"
            )));
        }
        self.update(|state| {
            if state.minimum == minimum && state.maximum == maximum {
                return false;
            }
            let old_minimum = state.minimum;
            let old_span = state.maximum - old_minimum;
            let rescale =
                |value: f64| minimum + (value - old_minimum) / old_span * (maximum - minimum);
            for component in &mut state.components {
                if old_span > 0.0 {
                    component.range_minimum = rescale(component.range_minimum);
                    component.range_maximum = rescale(component.range_maximum);
                } else {
                    component.range_minimum = minimum;
                    component.range_maximum = maximum;
                }
            }
            state.minimum = minimum;
            state.maximum = maximum;
            true
        });
        Ok(())
    }

    pub fn components(&self) -> Vec<SpectrumComponent> {
        self.state.read().components.clone()
    }

    /// Append a component and recompute the range.
    pub fn add_component(&self, component: SpectrumComponent) -> CoreResult<()> {
        if component.range_minimum > component.range_maximum {
            return Err(invalid_argument("spectrum component range is inverted"));
        }
        self.update(|state| {
            state.components.push(component);
            recalculate(state);
            true
        });
        Ok(())
    }

    pub fn clear_components(&self) {
        self.update(|state| {
            let had_components = !state.components.is_empty();
            state.components.clear();
            had_components
        });
    }

    /// Reset the range to the union of the component ranges.
    ///
    /// Without components the range is left unchanged.
    pub fn calculate_range(&self) {
        self.update(recalculate);
    }

    /// Colour for `value`, using the component whose range contains it.
    ///
    /// Values outside every component use the nearest end of the spectrum.
    pub fn value_to_colour(&self, value: f64) -> Colour {
        let state = self.state.read();
        let component = state
            .components
            .iter()
            .rev()
            .find(|component| component.contains(value))
            .or_else(|| {
                if value < state.minimum {
                    state.components.first()
                } else {
                    state.components.last()
                }
            });
        match component {
            Some(component) => component.colour(value),
            None => {
                let span = state.maximum - state.minimum;
                let t = if span > 0.0 {
                    ((value - state.minimum) / span) as f32
                } else {
                    0.0
                };
                ColourMapping::Rainbow.colour_at(t)
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SpectrumState) -> bool) {
        let changed = apply(&mut self.state.write());
        if changed {
            self.link.object_changed(self, ChangeFlags::DEFINITION);
        }
    }
}

fn recalculate(state: &mut SpectrumState) -> bool {
    let Some(first) = state.components.first() else {
        return false;
    };
    let (minimum, maximum) = state.components.iter().fold(
        (first.range_minimum, first.range_maximum),
        |(minimum, maximum), component| {
            (
                minimum.min(component.range_minimum),
                maximum.max(component.range_maximum),
            )
        },
    );
    let changed = state.minimum != minimum || state.maximum != maximum;
    state.minimum = minimum;
    state.maximum = maximum;
    changed
}

impl Managed for Spectrum {
    fn name(&self) -> String {
        self.state.read().name.clone()
    }

    fn manager_link(&self) -> &ManagerLink<Self> {
        &self.link
    }
}

/// Owns the managed spectra of one context.
pub struct SpectrumModule {
    manager: Manager<Spectrum>,
    default_spectrum: Mutex<Option<Arc<Spectrum>>>,
}

impl SpectrumModule {
    pub fn new() -> Self {
        Self {
            manager: Manager::new(),
            default_spectrum: Mutex::new(None),
        }
    }

    pub fn manager(&self) -> &Manager<Spectrum> {
        &self.manager
    }

    pub fn create_spectrum(&self, name: &str) -> CoreResult<Arc<Spectrum>> {
        let spectrum = Spectrum::new(name);
        self.manager.add(Arc::clone(&spectrum))?;
        Ok(spectrum)
    }

    pub fn find_spectrum_by_name(&self, name: &str) -> Option<Arc<Spectrum>> {
        self.manager.find_by_name(name)
    }

    /// The default spectrum: `default`, a rainbow over `[0, 1]`, created on first request.
    pub fn default_spectrum(&self) -> CoreResult<Arc<Spectrum>> {
        if let Some(spectrum) = self.default_spectrum.lock().clone() {
            return Ok(spectrum);
        }
        let spectrum = match self.find_spectrum_by_name("default") {
            Some(spectrum) => spectrum,
            None => {
                let spectrum = Spectrum::new("default");
                spectrum.add_component(SpectrumComponent::new(0.0, 1.0, ColourMapping::Rainbow))?;
                self.manager.add(Arc::clone(&spectrum))?;
                spectrum
            }
        };
        *self.default_spectrum.lock() = Some(Arc::clone(&spectrum));
        Ok(spectrum)
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&ManagerMessage<Spectrum>) + Send + Sync + 'static,
    ) -> Subscription {
        self.manager.subscribe(callback)
    }
}

impl Default for SpectrumModule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_from_components() {
        let spectrum = Spectrum::new("s");
        spectrum.calculate_range();
        assert_eq!((spectrum.minimum(), spectrum.maximum()), (0.0, 1.0));

        spectrum
            .add_component(SpectrumComponent::new(-2.0, 3.0, ColourMapping::Rainbow))
            .unwrap();
        spectrum
            .add_component(SpectrumComponent::new(1.0, 10.0, ColourMapping::Red))
            .unwrap();
        assert_eq!((spectrum.minimum(), spectrum.maximum()), (-2.0, 10.0));
    }

    #[test]
    fn test_set_range_rescales_components() {
        let spectrum = Spectrum::new("s");
        spectrum
            .add_component(SpectrumComponent::new(0.0, 1.0, ColourMapping::Rainbow))
            .unwrap();
        spectrum.set_minimum_and_maximum(10.0, 20.0).unwrap();
        let component = spectrum.components()[0];
        assert_eq!((component.range_minimum, component.range_maximum), (10.0, 20.0));

        spectrum.calculate_range();
        assert_eq!((spectrum.minimum(), spectrum.maximum()), (10.0, 20.0));
        assert!(spectrum.set_minimum_and_maximum(5.0, 1.0).is_err());
    }

    #[test]
    fn test_rainbow_ends() {
        let spectrum = Spectrum::new("s");
        spectrum
            .add_component(SpectrumComponent::new(0.0, 1.0, ColourMapping::Rainbow))
            .unwrap();
        assert_eq!(spectrum.value_to_colour(0.0), Colour::BLUE);
        assert_eq!(spectrum.value_to_colour(1.0), Colour::RED);
        assert_eq!(spectrum.value_to_colour(5.0), Colour::RED);
    }

    #[test]
    fn test_default_spectrum() {
        let module = SpectrumModule::new();
        let spectrum = module.default_spectrum().unwrap();
        assert_eq!(spectrum.name(), "default");
        assert!(Arc::ptr_eq(&spectrum, &module.default_spectrum().unwrap()));
        assert_eq!(spectrum.components().len(), 1);
    }
}
