use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use zinc_core::font::Font;
use zinc_core::graphics_object::{
    GlyphPoint, GlyphRepeatMode, GlyphSetParameters, GlyphSetPrimitive, GlyphSizing, GraphicsObject,
    link_chain,
};
use zinc_core::manager::{ChangeFlags, ManagerMessage};
use zinc_core::material::Material;
use zinc_core::math::Vec3;
use zinc_core::tessellation::Tessellation;

use crate::error::{GlyphError, GlyphResult, invalid_argument};

use super::{Glyph, GlyphCore, glyph_changed, same_arc};

/// Label position along each axis, as a fraction of the axis length.
const LABEL_OFFSET: f32 = 1.1;

#[derive(Debug, Default)]
struct AxesState {
    axis_width: f32,
    labels: [Option<String>; 3],
    materials: [Option<Arc<Material>>; 3],
    built: Option<BuiltAxes>,
}

#[derive(Debug)]
struct BuiltAxes {
    axis_object: Arc<GraphicsObject>,
    material: Option<Arc<Material>>,
    font: Option<Arc<Font>>,
    object: Arc<GraphicsObject>,
}

/// Three copies of an axis glyph along x, y and z, optionally labelled.
///
/// With no per-axis material the triad is one glyph set repeated in
/// [`GlyphRepeatMode::Axes3D`]. Setting any axis material splits it into a
/// chain of three glyph sets so each axis can carry its own material.
#[derive(Debug)]
pub struct AxesGlyph {
    core: GlyphCore,
    axis_glyph: Arc<dyn Glyph>,
    state: Mutex<AxesState>,
}

fn axis_index(axis_number: u32) -> GlyphResult<usize> {
    match axis_number {
        1..=3 => Ok(axis_number as usize - 1),
        _ => {
            log::error!("axes glyph: axis number {axis_number} out of range");
            Err(GlyphError::AxisOutOfRange(axis_number))
        }
    }
}

fn check_axis_width(axis_width: f32) -> GlyphResult<()> {
    if axis_width >= 0.0 {
        Ok(())
    } else {
        Err(invalid_argument(format!("axes glyph: axis width {axis_width} is negative")))
    }
}

impl AxesGlyph {
    pub fn new(axis_glyph: Arc<dyn Glyph>, axis_width: f32) -> GlyphResult<Arc<Self>> {
        check_axis_width(axis_width)?;
        Ok(Arc::new(Self {
            core: GlyphCore::new(""),
            axis_glyph,
            state: Mutex::new(AxesState {
                axis_width,
                ..AxesState::default()
            }),
        }))
    }

    pub fn axis_glyph(&self) -> &Arc<dyn Glyph> {
        &self.axis_glyph
    }

    pub fn axis_width(&self) -> f32 {
        self.state.lock().axis_width
    }

    pub fn set_axis_width(&self, axis_width: f32) -> GlyphResult<()> {
        check_axis_width(axis_width)?;
        self.update(|state| {
            let changed = state.axis_width != axis_width;
            state.axis_width = axis_width;
            changed
        });
        Ok(())
    }

    /// Label of axis 1, 2 or 3; `None` when unset or out of range.
    pub fn axis_label(&self, axis_number: u32) -> Option<String> {
        let index = axis_index(axis_number).ok()?;
        self.state.lock().labels[index].clone()
    }

    /// Set or clear (with `None` or an empty string) the label of an axis.
    pub fn set_axis_label(&self, axis_number: u32, label: Option<&str>) -> GlyphResult<()> {
        let index = axis_index(axis_number)?;
        let label = label.filter(|label| !label.is_empty()).map(str::to_string);
        self.update(|state| {
            let changed = state.labels[index] != label;
            state.labels[index] = label;
            changed
        });
        Ok(())
    }

    pub fn axis_material(&self, axis_number: u32) -> Option<Arc<Material>> {
        let index = axis_index(axis_number).ok()?;
        self.state.lock().materials[index].clone()
    }

    /// Material overriding the default material for one axis.
    pub fn set_axis_material(
        &self,
        axis_number: u32,
        material: Option<Arc<Material>>,
    ) -> GlyphResult<()> {
        let index = axis_index(axis_number)?;
        self.update(|state| {
            let changed = !same_arc(state.materials[index].as_ref(), material.as_ref());
            state.materials[index] = material;
            changed
        });
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut AxesState) -> bool) {
        let changed = {
            let mut state = self.state.lock();
            let changed = apply(&mut state);
            if changed {
                state.built = None;
            }
            changed
        };
        if changed {
            glyph_changed(self, ChangeFlags::DEFINITION);
        }
    }

    fn invalidate(&self, flags: ChangeFlags) {
        self.state.lock().built = None;
        glyph_changed(self, flags);
    }

    fn build(
        &self,
        state: &AxesState,
        axis_object: &Arc<GraphicsObject>,
        material: Option<&Arc<Material>>,
        font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>> {
        let name = self.core.name();
        let width = state.axis_width;
        let sizing = GlyphSizing {
            base_size: Vec3::new(1.0, width, width),
            scale_factors: Vec3::zeros(),
            offset: Vec3::zeros(),
        };
        let font = state
            .labels
            .iter()
            .any(Option::is_some)
            .then(|| font.cloned())
            .flatten();
        let parameters = GlyphSetParameters {
            sizing,
            label_offset: Vec3::new(LABEL_OFFSET, 0.0, 0.0),
            font,
            ..GlyphSetParameters::default()
        };

        if state.materials.iter().all(Option::is_none) {
            let parameters = parameters
                .with_repeat_mode(GlyphRepeatMode::Axes3D)
                .with_static_labels(state.labels.clone());
            let object = GlyphSetPrimitive::new(Arc::clone(axis_object), parameters)
                .into_object(name, &[GlyphPoint::default()], None, 0)?
                .with_default_material(material.cloned());
            return Ok(Arc::new(object));
        }

        let frame = [Vec3::x(), Vec3::y(), Vec3::z()];
        let objects = (0..3)
            .map(|axis| {
                let point = GlyphPoint {
                    axis1: frame[axis],
                    axis2: frame[(axis + 1) % 3],
                    axis3: frame[(axis + 2) % 3],
                    ..GlyphPoint::default()
                };
                let parameters = parameters
                    .clone()
                    .with_static_labels([state.labels[axis].clone(), None, None]);
                let object_name = match axis {
                    0 => name.clone(),
                    _ => format!("{name}_axis{}", axis + 1),
                };
                let axis_material = state.materials[axis].clone().or_else(|| material.cloned());
                GlyphSetPrimitive::new(Arc::clone(axis_object), parameters)
                    .into_object(object_name, &[point], None, 0)
                    .map(|object| object.with_default_material(axis_material))
            })
            .collect::<Result<Vec<_>, _>>()?;
        link_chain(objects).ok_or(GlyphError::BuildFailed(name))
    }
}

impl Glyph for AxesGlyph {
    fn core(&self) -> &GlyphCore {
        &self.core
    }

    fn graphics_object(
        &self,
        tessellation: &Tessellation,
        material: Option<&Arc<Material>>,
        font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>> {
        let axis_object = self.axis_glyph.graphics_object(tessellation, material, font)?;
        let mut state = self.state.lock();
        if let Some(built) = &state.built
            && Arc::ptr_eq(&built.axis_object, &axis_object)
            && same_arc(built.material.as_ref(), material)
            && same_arc(built.font.as_ref(), font)
        {
            log::trace!("axes glyph '{}' reused", self.core.name());
            return Ok(Arc::clone(&built.object));
        }

        state.built = None;
        log::debug!("building axes glyph '{}'", self.core.name());
        let object = self.build(&state, &axis_object, material, font)?;
        state.built = Some(BuiltAxes {
            axis_object,
            material: material.cloned(),
            font: font.cloned(),
            object: Arc::clone(&object),
        });
        Ok(object)
    }

    fn uses_font(&self) -> bool {
        self.state.lock().labels.iter().any(Option::is_some)
    }

    fn uses_circle_divisions(&self) -> bool {
        self.axis_glyph.uses_circle_divisions()
    }

    fn material_change(&self, message: &ManagerMessage<Material>) {
        let changed = self
            .state
            .lock()
            .materials
            .iter()
            .flatten()
            .any(|material| message.object_change(material).affects_result());
        if changed {
            self.invalidate(ChangeFlags::DEPENDENCY);
        }
    }

    fn font_change(&self, message: &ManagerMessage<Font>) {
        let changed = {
            let state = self.state.lock();
            state
                .built
                .as_ref()
                .and_then(|built| built.font.as_ref())
                .is_some_and(|font| message.object_change(font).affects_result())
        };
        if changed {
            self.invalidate(ChangeFlags::DEPENDENCY);
        }
    }

    fn glyph_change(&self, message: &ManagerMessage<dyn Glyph>) {
        if message.object_change(&*self.axis_glyph).affects_result() {
            self.invalidate(ChangeFlags::DEPENDENCY);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::StaticGlyph;
    use zinc_core::generators::create_arrow_line;
    use zinc_core::math::approx_eq;

    fn axes() -> Arc<AxesGlyph> {
        let axis = Arc::new(create_arrow_line("axis", 0.1, 0.5).unwrap());
        AxesGlyph::new(StaticGlyph::new("axis", axis), 0.1).unwrap()
    }

    fn build(glyph: &AxesGlyph) -> Arc<GraphicsObject> {
        glyph
            .graphics_object(&Tessellation::default(), None, None)
            .unwrap()
    }

    #[test]
    fn test_cached_until_changed() {
        let glyph = axes();
        let first = build(&glyph);
        assert!(Arc::ptr_eq(&first, &build(&glyph)));

        glyph.set_axis_width(0.1).unwrap();
        assert!(Arc::ptr_eq(&first, &build(&glyph)));

        glyph.set_axis_width(0.2).unwrap();
        let rebuilt = build(&glyph);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        let axes = rebuilt.glyph_instances()[0].axes;
        assert!(approx_eq(&axes.axis3, &Vec3::new(0.0, 0.0, 0.2), 1e-6));
    }

    #[test]
    fn test_axis_material_splits_chain() {
        let glyph = axes();
        assert_eq!(build(&glyph).chain_len(), 1);

        let green = Material::new("green");
        glyph.set_axis_material(2, Some(Arc::clone(&green))).unwrap();
        let split = build(&glyph);
        assert_eq!(split.chain_len(), 3);
        let second = split.chain().nth(1).unwrap();
        assert!(Arc::ptr_eq(second.default_material().unwrap(), &green));
        assert!(split.default_material().is_none());

        let instances = second.glyph_instances();
        assert_eq!(instances.len(), 1);
        assert!(approx_eq(&instances[0].axes.axis1, &Vec3::y(), 1e-6));
    }

    #[test]
    fn test_labels_at_axis_tips() {
        let glyph = axes();
        for (axis, label) in ["x", "y", "z"].into_iter().enumerate() {
            glyph.set_axis_label(axis as u32 + 1, Some(label)).unwrap();
        }
        assert!(glyph.uses_font());
        let instances = build(&glyph).glyph_instances();
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[1].label.as_deref(), Some("y"));
        assert!(approx_eq(
            &instances[2].label_position.unwrap(),
            &Vec3::new(0.0, 0.0, LABEL_OFFSET),
            1e-6
        ));

        glyph.set_axis_label(2, Some("")).unwrap();
        assert_eq!(glyph.axis_label(2), None);
    }

    #[test]
    fn test_invalid_arguments() {
        let glyph = axes();
        assert_eq!(glyph.set_axis_label(4, Some("w")), Err(GlyphError::AxisOutOfRange(4)));
        assert_eq!(glyph.set_axis_material(0, None), Err(GlyphError::AxisOutOfRange(0)));
        assert!(glyph.set_axis_width(-1.0).is_err());
        assert_eq!(glyph.axis_width(), 0.1);
        assert_eq!(glyph.axis_label(9), None);
    }
}
