//! The standard glyph catalog.

use std::sync::Arc;

use zinc_core::generators::{
    AxesStyle, create_arrow_line, create_axes, create_cross, create_cube_solid,
    create_cube_wireframe, create_line, create_point, create_sheet, create_sphere,
};
use zinc_core::graphics_object::{GlyphLabelsFunction, PointMarker};

use crate::error::{GlyphError, GlyphResult};
use crate::glyph::{AxesGlyph, CircularGlyph, CircularShape, Glyph, GlyphShapeType};

use super::GlyphModule;

/// Sizes used when defining the standard axes glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardGlyphOptions {
    /// Width of the line axes glyphs relative to their length.
    pub axes_width: f32,
    pub solid_axes_width: f32,
    /// Also define the extra glyphs of the cmgui command line.
    pub cmgui: bool,
}

impl Default for StandardGlyphOptions {
    fn default() -> Self {
        Self {
            axes_width: 0.1,
            solid_axes_width: 0.25,
            cmgui: false,
        }
    }
}

impl StandardGlyphOptions {
    pub fn with_cmgui(mut self, cmgui: bool) -> Self {
        self.cmgui = cmgui;
        self
    }
}

fn axes_with_labels(
    axis: &Arc<dyn Glyph>,
    width: f32,
    labels: [&str; 3],
) -> GlyphResult<Arc<AxesGlyph>> {
    let axes = AxesGlyph::new(Arc::clone(axis), width)?;
    for (axis_number, label) in (1..).zip(labels) {
        axes.set_axis_label(axis_number, Some(label))?;
    }
    Ok(axes)
}

impl GlyphModule {
    /// Define the standard glyphs with default sizes.
    pub fn define_standard_glyphs(&self) -> GlyphResult<()> {
        self.define_standard_glyphs_with(&StandardGlyphOptions::default())
    }

    /// Define every standard glyph whose name is not yet in use.
    ///
    /// The coloured axes are only defined if the material module has
    /// `red`, `green` and `blue` materials. The `point` glyph becomes the
    /// default point glyph unless one is already set.
    pub fn define_standard_glyphs_with(&self, options: &StandardGlyphOptions) -> GlyphResult<()> {
        self.begin_change();
        let result = self.define_catalog(options);
        self.end_change();
        if options.cmgui && result.is_ok() {
            return self.define_standard_cmgui_glyphs();
        }
        result
    }

    fn define_catalog(&self, options: &StandardGlyphOptions) -> GlyphResult<()> {
        log::debug!("defining standard glyphs");
        let arrow = create_arrow_line("arrow", 1.0 / 3.0, 0.5)?;
        self.define_glyph_static(arrow, GlyphShapeType::Arrow)?;
        self.define_glyph(
            "arrow_solid",
            CircularGlyph::arrow_solid(1.0 / 3.0, 1.0 / 3.0),
            GlyphShapeType::ArrowSolid,
        )?;
        self.define_glyph_static(create_arrow_line("axis", 0.1, 0.5)?, GlyphShapeType::Axis)?;
        self.define_glyph(
            "axis_solid",
            CircularGlyph::arrow_solid(0.1, 1.0 / 3.0),
            GlyphShapeType::AxisSolid,
        )?;
        self.define_glyph(
            "cone",
            CircularGlyph::new("cone", CircularShape::Cone),
            GlyphShapeType::Cone,
        )?;
        self.define_glyph(
            "cone_solid",
            CircularGlyph::new("cone_solid", CircularShape::ConeSolid),
            GlyphShapeType::ConeSolid,
        )?;
        self.define_glyph_static(create_cross("cross")?, GlyphShapeType::Cross)?;
        self.define_glyph_static(create_cube_solid("cube_solid")?, GlyphShapeType::CubeSolid)?;
        self.define_glyph_static(
            create_cube_wireframe("cube_wireframe")?,
            GlyphShapeType::CubeWireframe,
        )?;
        self.define_glyph(
            "cylinder",
            CircularGlyph::new("cylinder", CircularShape::Cylinder),
            GlyphShapeType::Cylinder,
        )?;
        self.define_glyph(
            "cylinder_solid",
            CircularGlyph::new("cylinder_solid", CircularShape::CylinderSolid),
            GlyphShapeType::CylinderSolid,
        )?;
        self.define_glyph_static(create_sphere("diamond", 4, 2)?, GlyphShapeType::Diamond)?;
        self.define_glyph_static(create_line("line")?, GlyphShapeType::Line)?;
        let point = create_point("point", PointMarker::Point, 0.0)?;
        if self.define_glyph_static(point, GlyphShapeType::Point)?
            && self.default_point_glyph().is_none()
        {
            self.set_default_point_glyph(self.find_glyph_by_name("point"));
        }
        self.define_glyph_static(create_sheet("sheet", false)?, GlyphShapeType::Sheet)?;
        self.define_glyph(
            "sphere",
            CircularGlyph::new("sphere", CircularShape::Sphere),
            GlyphShapeType::Sphere,
        )?;

        let axis = self
            .find_glyph_by_shape_type(GlyphShapeType::Axis)
            .ok_or_else(|| GlyphError::BuildFailed("axis".to_string()))?;
        let arrow_solid = self
            .find_glyph_by_shape_type(GlyphShapeType::ArrowSolid)
            .ok_or_else(|| GlyphError::BuildFailed("arrow_solid".to_string()))?;
        let axes_sets = [
            (
                &axis,
                options.axes_width,
                "axes",
                GlyphShapeType::Axes,
                GlyphShapeType::Axes123,
                GlyphShapeType::AxesXyz,
            ),
            (
                &arrow_solid,
                options.solid_axes_width,
                "axes_solid",
                GlyphShapeType::AxesSolid,
                GlyphShapeType::AxesSolid123,
                GlyphShapeType::AxesSolidXyz,
            ),
        ];
        for (axis_glyph, width, name, plain, numbered, lettered) in axes_sets {
            self.define_glyph(name, AxesGlyph::new(Arc::clone(axis_glyph), width)?, plain)?;
            self.define_glyph(
                &format!("{name}_123"),
                axes_with_labels(axis_glyph, width, ["1", "2", "3"])?,
                numbered,
            )?;
            self.define_glyph(
                &format!("{name}_xyz"),
                axes_with_labels(axis_glyph, width, ["x", "y", "z"])?,
                lettered,
            )?;
        }

        let materials = self.material_module();
        let colours = (
            materials.find_material_by_name("red"),
            materials.find_material_by_name("green"),
            materials.find_material_by_name("blue"),
        );
        if let (Some(red), Some(green), Some(blue)) = colours {
            let coloured = [
                (&axis, options.axes_width, "axes_colour", GlyphShapeType::AxesColour),
                (
                    &arrow_solid,
                    options.solid_axes_width,
                    "axes_solid_colour",
                    GlyphShapeType::AxesSolidColour,
                ),
            ];
            for (axis_glyph, width, name, shape_type) in coloured {
                let axes = AxesGlyph::new(Arc::clone(axis_glyph), width)?;
                axes.set_axis_material(1, Some(Arc::clone(&red)))?;
                axes.set_axis_material(2, Some(Arc::clone(&green)))?;
                axes.set_axis_material(3, Some(Arc::clone(&blue)))?;
                self.define_glyph(name, axes, shape_type)?;
            }
        } else {
            log::debug!("red, green and blue materials missing; coloured axes not defined");
        }
        Ok(())
    }

    /// Define the extra glyphs used by the cmgui command line.
    ///
    /// Requires the standard `axis` glyph for `axes_fsn`; it is skipped without.
    pub fn define_standard_cmgui_glyphs(&self) -> GlyphResult<()> {
        self.begin_change();
        let result = self.define_cmgui_catalog();
        self.end_change();
        result
    }

    fn define_cmgui_catalog(&self) -> GlyphResult<()> {
        log::debug!("defining cmgui glyphs");
        if let Some(axis) = self.find_glyph_by_shape_type(GlyphShapeType::Axis) {
            let axes = axes_with_labels(&axis, 0.1, ["f", "s", "n"])?;
            self.define_glyph("axes_fsn", axes, GlyphShapeType::Invalid)?;
        }

        let grid_lines = create_axes(
            "grid_lines",
            &AxesStyle {
                head_length: 0.0,
                half_head_width: 0.0,
                label_offset: 0.1,
                ..AxesStyle::default()
            },
        )?;
        let mut grid_lines = Arc::try_unwrap(grid_lines)
            .map_err(|_| GlyphError::BuildFailed("grid_lines".to_string()))?;
        grid_lines.set_labels_function(GlyphLabelsFunction::GridLines);
        self.define_glyph_static(grid_lines, GlyphShapeType::Invalid)?;

        let mut line_ticks = create_line("line_ticks")?;
        line_ticks.set_labels_function(GlyphLabelsFunction::AxesTicks);
        self.define_glyph_static(line_ticks, GlyphShapeType::Invalid)?;

        self.define_glyph_static(create_sheet("textured_sheet", true)?, GlyphShapeType::Invalid)?;
        Ok(())
    }
}
