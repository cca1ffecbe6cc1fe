use std::any::Any;
use std::f32::consts::PI;
use std::sync::Arc;

use parking_lot::Mutex;
use zinc_core::font::Font;
use zinc_core::format::{NumberFormat, numerical_format_string_size};
use zinc_core::graphics_object::{GraphicsObject, PointMarker, PolylineType, Primitive, link_chain};
use zinc_core::manager::{ChangeFlags, ManagerMessage};
use zinc_core::material::Material;
use zinc_core::math::{Triple, Vec3, rescale_in_place, to_triple};
use zinc_core::spectrum::Spectrum;
use zinc_core::tessellation::Tessellation;
use zinc_core::vertex_array::{
    DataValues, PolygonType, SurfaceVertexData, fill_line_vertex_array, fill_pointset_vertex_array,
    fill_surface_vertex_array,
};

use crate::error::{GlyphError, GlyphResult, invalid_argument};

use super::{Glyph, GlyphCore, glyph_changed, same_arc};

pub const DEFAULT_NUMBER_FORMAT: &str = "%+.4e";

/// Geometry and labelling of a colour bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourBarParameters {
    /// Bar direction; its length is the bar length.
    pub axis: Vec3,
    pub centre: Vec3,
    /// Tick direction; its length is the bar radius.
    pub side_axis: Vec3,
    /// Length the bar continues past each end of the spectrum range.
    pub extend_length: f32,
    pub label_divisions: u32,
    pub tick_length: f32,
    pub number_format: String,
}

impl Default for ColourBarParameters {
    fn default() -> Self {
        Self {
            axis: Vec3::new(0.0, 1.0, 0.0),
            centre: Vec3::zeros(),
            side_axis: Vec3::new(0.1, 0.0, 0.0),
            extend_length: 0.06,
            label_divisions: 10,
            tick_length: 0.04,
            number_format: DEFAULT_NUMBER_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ColourBarState {
    parameters: ColourBarParameters,
    label_material: Option<Arc<Material>>,
    built: Option<BuiltColourBar>,
}

#[derive(Debug)]
struct BuiltColourBar {
    tessellation: Tessellation,
    material: Option<Arc<Material>>,
    font: Option<Arc<Font>>,
    range: (f64, f64),
    object: Arc<GraphicsObject>,
}

/// A spectrum drawn as a round bar with ticks and value labels.
///
/// The built object is a chain of three: the bar surface carrying spectrum
/// values as data, the tick polyline and the label point set. There are
/// `label_divisions + 1` ticks and labels, from the spectrum minimum at the
/// bar's start to its maximum at the end.
#[derive(Debug)]
pub struct ColourBarGlyph {
    core: GlyphCore,
    spectrum: Arc<Spectrum>,
    state: Mutex<ColourBarState>,
}

fn check_non_negative(what: &str, value: f32) -> GlyphResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_argument(format!("colour bar: {what} {value} is negative")))
    }
}

impl ColourBarGlyph {
    pub fn new(spectrum: Arc<Spectrum>) -> Arc<Self> {
        Arc::new(Self {
            core: GlyphCore::new(""),
            spectrum,
            state: Mutex::new(ColourBarState::default()),
        })
    }

    pub fn spectrum(&self) -> &Arc<Spectrum> {
        &self.spectrum
    }

    pub fn parameters(&self) -> ColourBarParameters {
        self.state.lock().parameters.clone()
    }

    pub fn axis(&self) -> Vec3 {
        self.state.lock().parameters.axis
    }

    pub fn set_axis(&self, axis: Vec3) {
        self.update(|state| replace(&mut state.parameters.axis, axis));
    }

    pub fn centre(&self) -> Vec3 {
        self.state.lock().parameters.centre
    }

    pub fn set_centre(&self, centre: Vec3) {
        self.update(|state| replace(&mut state.parameters.centre, centre));
    }

    pub fn side_axis(&self) -> Vec3 {
        self.state.lock().parameters.side_axis
    }

    pub fn set_side_axis(&self, side_axis: Vec3) {
        self.update(|state| replace(&mut state.parameters.side_axis, side_axis));
    }

    pub fn extend_length(&self) -> f32 {
        self.state.lock().parameters.extend_length
    }

    pub fn set_extend_length(&self, extend_length: f32) -> GlyphResult<()> {
        check_non_negative("extend length", extend_length)?;
        self.update(|state| replace(&mut state.parameters.extend_length, extend_length));
        Ok(())
    }

    pub fn label_divisions(&self) -> u32 {
        self.state.lock().parameters.label_divisions
    }

    pub fn set_label_divisions(&self, label_divisions: u32) -> GlyphResult<()> {
        if label_divisions == 0 {
            return Err(invalid_argument("colour bar: label divisions must be positive"));
        }
        self.update(|state| replace(&mut state.parameters.label_divisions, label_divisions));
        Ok(())
    }

    pub fn label_material(&self) -> Option<Arc<Material>> {
        self.state.lock().label_material.clone()
    }

    /// Material for the labels; `None` draws them with the bar's material.
    pub fn set_label_material(&self, material: Option<Arc<Material>>) {
        self.update(|state| {
            let changed = !same_arc(state.label_material.as_ref(), material.as_ref());
            state.label_material = material;
            changed
        });
    }

    pub fn number_format(&self) -> String {
        self.state.lock().parameters.number_format.clone()
    }

    /// Set the printf-style label format, e.g. `%+.4e`.
    ///
    /// The format must hold exactly one `e`, `f` or `g` conversion with
    /// bounded width and precision.
    pub fn set_number_format(&self, number_format: &str) -> GlyphResult<()> {
        let size = numerical_format_string_size(number_format).map_err(|error| {
            log::error!("colour bar: {error}");
            GlyphError::from(error)
        })?;
        log::trace!("colour bar number format '{number_format}' needs {size} bytes");
        self.update(|state| {
            replace(&mut state.parameters.number_format, number_format.to_string())
        });
        Ok(())
    }

    pub fn tick_length(&self) -> f32 {
        self.state.lock().parameters.tick_length
    }

    pub fn set_tick_length(&self, tick_length: f32) -> GlyphResult<()> {
        check_non_negative("tick length", tick_length)?;
        self.update(|state| replace(&mut state.parameters.tick_length, tick_length));
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut ColourBarState) -> bool) {
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

    fn invalidate(&self) {
        self.state.lock().built = None;
        glyph_changed(self, ChangeFlags::DEPENDENCY);
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Everything one build of the bar reads.
struct BarInput<'a> {
    name: String,
    parameters: &'a ColourBarParameters,
    range: (f64, f64),
    tessellation: &'a Tessellation,
    material: Option<&'a Arc<Material>>,
    label_material: Option<&'a Arc<Material>>,
    font: Option<&'a Arc<Font>>,
}

fn build_colour_bar(
    input: &BarInput<'_>,
    spectrum: &Arc<Spectrum>,
) -> GlyphResult<Arc<GraphicsObject>> {
    let parameters = input.parameters;
    let format = NumberFormat::parse(&parameters.number_format)?;
    let length = parameters.axis.norm();
    let radius = parameters.side_axis.norm();
    let along = if length > 0.0 {
        parameters.axis / length
    } else {
        Vec3::zeros()
    };
    let mut side = parameters.side_axis - along * parameters.side_axis.dot(&along);
    if length == 0.0 || !rescale_in_place(&mut side, 1.0) {
        log::warn!(
            "colour bar '{}': axis {:?} and side axis {:?} are colinear",
            input.name,
            parameters.axis,
            parameters.side_axis
        );
        return Err(GlyphError::ColinearAxes);
    }
    let third = along.cross(&side);
    let start = parameters.centre - parameters.axis * 0.5;
    let (minimum, maximum) = input.range;
    let value_at = |fraction: f64| minimum + (maximum - minimum) * fraction;

    // bar stations along the axis, extensions held at the end values
    let segments = parameters.label_divisions * input.tessellation.refinement_factor();
    let mut stations: Vec<f32> = (0..=segments)
        .map(|i| length * i as f32 / segments as f32)
        .collect();
    if parameters.extend_length > 0.0 {
        stations.insert(0, -parameters.extend_length);
        stations.push(length + parameters.extend_length);
    }

    let divisions = input.tessellation.circle_divisions();
    let around = divisions as usize + 1;
    let mut points = Vec::with_capacity(around * stations.len());
    let mut normals = Vec::with_capacity(around * stations.len());
    let mut values = Vec::with_capacity(around * stations.len());
    for &station in &stations {
        let value = value_at(f64::from((station / length).clamp(0.0, 1.0))) as f32;
        for k in 0..around {
            let theta = k as f32 * 2.0 * PI / divisions as f32;
            let radial = side * theta.cos() + third * theta.sin();
            points.push(to_triple(&(start + along * station + radial * radius)));
            normals.push(to_triple(&radial));
            values.push(value);
        }
    }
    let mut bar = GraphicsObject::new(input.name.clone(), Primitive::Surface)
        .with_default_material(input.material.cloned());
    bar.set_spectrum(Some(Arc::clone(spectrum)));
    fill_surface_vertex_array(
        bar.vertices_mut(),
        &SurfaceVertexData {
            polygon: PolygonType::Quadrilateral,
            n_xi1: around,
            n_xi2: stations.len(),
            points: &points,
            normals: Some(&normals),
            data: Some(DataValues {
                components: 1,
                values: &values,
            }),
            ..SurfaceVertexData::default()
        },
    )?;

    let divisions = parameters.label_divisions;
    let mut tick_points: Vec<Triple> = Vec::with_capacity(2 * (divisions as usize + 1));
    let mut label_points: Vec<Triple> = Vec::with_capacity(divisions as usize + 1);
    let mut labels = Vec::with_capacity(divisions as usize + 1);
    for i in 0..=divisions {
        let fraction = f64::from(i) / f64::from(divisions);
        let base = start + along * (length * fraction as f32) + side * radius;
        let tip = base + side * parameters.tick_length;
        tick_points.push(to_triple(&base));
        tick_points.push(to_triple(&tip));
        label_points.push(to_triple(&tip));
        labels.push(format.format(value_at(fraction)));
    }

    let mut ticks = GraphicsObject::new(
        format!("{}_ticks", input.name),
        Primitive::polyline(PolylineType::Discontinuous),
    )
    .with_default_material(input.material.cloned());
    fill_line_vertex_array(ticks.vertices_mut(), &tick_points, None, None)?;

    let mut label_object = GraphicsObject::new(
        format!("{}_labels", input.name),
        Primitive::point_set(PointMarker::None, 0.0, input.font.cloned()),
    )
    .with_default_material(input.label_material.or(input.material).cloned());
    fill_pointset_vertex_array(
        label_object.vertices_mut(),
        &label_points,
        Some(&labels[..]),
        None,
    )?;

    link_chain(vec![bar, ticks, label_object])
        .ok_or_else(|| GlyphError::BuildFailed(input.name.clone()))
}

impl Glyph for ColourBarGlyph {
    fn core(&self) -> &GlyphCore {
        &self.core
    }

    fn graphics_object(
        &self,
        tessellation: &Tessellation,
        material: Option<&Arc<Material>>,
        font: Option<&Arc<Font>>,
    ) -> GlyphResult<Arc<GraphicsObject>> {
        // may notify a range change back to this glyph, so before locking
        self.spectrum.calculate_range();
        let range = (self.spectrum.minimum(), self.spectrum.maximum());

        let mut state = self.state.lock();
        if let Some(built) = &state.built
            && built.tessellation == *tessellation
            && built.range == range
            && same_arc(built.material.as_ref(), material)
            && same_arc(built.font.as_ref(), font)
        {
            return Ok(Arc::clone(&built.object));
        }

        state.built = None;
        log::debug!("building colour bar '{}' over [{}, {}]", self.core.name(), range.0, range.1);
        let object = build_colour_bar(
            &BarInput {
                name: self.core.name(),
                parameters: &state.parameters,
                range,
                tessellation,
                material,
                label_material: state.label_material.as_ref(),
                font,
            },
            &self.spectrum,
        )?;
        state.built = Some(BuiltColourBar {
            tessellation: *tessellation,
            material: material.cloned(),
            font: font.cloned(),
            range,
            object: Arc::clone(&object),
        });
        Ok(object)
    }

    fn uses_font(&self) -> bool {
        true
    }

    fn uses_circle_divisions(&self) -> bool {
        true
    }

    fn material_change(&self, message: &ManagerMessage<Material>) {
        let changed = self
            .state
            .lock()
            .label_material
            .as_ref()
            .is_some_and(|material| message.object_change(material).affects_result());
        if changed {
            self.invalidate();
        }
    }

    fn spectrum_change(&self, message: &ManagerMessage<Spectrum>) {
        if message.object_change(&self.spectrum).affects_result() {
            log::debug!("colour bar '{}' spectrum changed", self.core.name());
            self.invalidate();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zinc_core::vertex_array::VertexAttribute;

    fn colour_bar() -> Arc<ColourBarGlyph> {
        ColourBarGlyph::new(Spectrum::new("spectrum"))
    }

    fn build(glyph: &ColourBarGlyph) -> GlyphResult<Arc<GraphicsObject>> {
        glyph.graphics_object(&Tessellation::default(), None, None)
    }

    #[test]
    fn test_ticks_and_labels() {
        let glyph = colour_bar();
        let object = build(&glyph).unwrap();
        assert_eq!(object.chain_len(), 3);

        let ticks = object.chain().nth(1).unwrap();
        assert_eq!(ticks.vertices().number_of_vertices(VertexAttribute::Position), 22);

        let labels = object.chain().nth(2).unwrap().vertices();
        assert_eq!(labels.number_of_vertices(VertexAttribute::Label), 11);
        let label = |i| labels.attribute::<String>(VertexAttribute::Label, i).unwrap()[0].clone();
        assert_eq!(label(0), "+0.0000e+00");
        assert_eq!(label(5), "+5.0000e-01");
        assert_eq!(label(10), "+1.0000e+00");
    }

    #[test]
    fn test_bar_carries_spectrum_values() {
        let glyph = colour_bar();
        glyph.spectrum().set_minimum_and_maximum(10.0, 20.0).unwrap();
        let object = build(&glyph).unwrap();
        assert!(Arc::ptr_eq(object.spectrum().unwrap(), glyph.spectrum()));
        let data = object
            .vertices()
            .vertex_buffer::<f32>(VertexAttribute::Data)
            .unwrap()
            .values()
            .to_vec();
        assert_eq!(data.first(), Some(&10.0));
        assert_eq!(data.last(), Some(&20.0));
        assert!(data.iter().all(|value| (10.0..=20.0).contains(value)));
    }

    #[test]
    fn test_colinear_axes_fail() {
        let glyph = colour_bar();
        glyph.set_side_axis(Vec3::new(0.0, 0.5, 0.0));
        assert!(matches!(build(&glyph), Err(GlyphError::ColinearAxes)));
        glyph.set_side_axis(Vec3::new(0.0, 0.0, 0.1));
        assert!(build(&glyph).is_ok());
    }

    #[test]
    fn test_setters_validate_and_invalidate() {
        let glyph = colour_bar();
        let first = build(&glyph).unwrap();
        glyph.set_label_divisions(10).unwrap();
        assert!(Arc::ptr_eq(&first, &build(&glyph).unwrap()));

        assert!(glyph.set_label_divisions(0).is_err());
        assert!(glyph.set_tick_length(-0.1).is_err());
        assert!(glyph.set_extend_length(-1.0).is_err());
        assert!(glyph.set_number_format("%d").is_err());
        assert!(glyph.set_number_format("%500.2f").is_err());
        assert_eq!(glyph.number_format(), DEFAULT_NUMBER_FORMAT);

        glyph.set_number_format("%.2f units").unwrap();
        let rebuilt = build(&glyph).unwrap();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        let labels = rebuilt.chain().nth(2).unwrap().vertices();
        assert_eq!(
            labels.attribute::<String>(VertexAttribute::Label, 10),
            Some(&["1.00 units".to_string()][..])
        );
    }
}
