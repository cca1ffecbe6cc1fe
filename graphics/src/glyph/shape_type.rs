use std::fmt;
use std::str::FromStr;

use crate::error::{GlyphError, invalid_argument};

/// Catalog tag of a glyph, used to find standard glyphs by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphShapeType {
    /// Custom or user-defined glyph.
    #[default]
    Invalid,
    None,
    Arrow,
    ArrowSolid,
    Axis,
    AxisSolid,
    Cone,
    ConeSolid,
    Cross,
    CubeSolid,
    CubeWireframe,
    Cylinder,
    CylinderSolid,
    Diamond,
    Line,
    Point,
    Sheet,
    Sphere,
    Axes,
    Axes123,
    AxesXyz,
    AxesColour,
    AxesSolid,
    AxesSolid123,
    AxesSolidXyz,
    AxesSolidColour,
    ColourBar,
}

impl GlyphShapeType {
    pub const ALL: [Self; 27] = [
        Self::Invalid,
        Self::None,
        Self::Arrow,
        Self::ArrowSolid,
        Self::Axis,
        Self::AxisSolid,
        Self::Cone,
        Self::ConeSolid,
        Self::Cross,
        Self::CubeSolid,
        Self::CubeWireframe,
        Self::Cylinder,
        Self::CylinderSolid,
        Self::Diamond,
        Self::Line,
        Self::Point,
        Self::Sheet,
        Self::Sphere,
        Self::Axes,
        Self::Axes123,
        Self::AxesXyz,
        Self::AxesColour,
        Self::AxesSolid,
        Self::AxesSolid123,
        Self::AxesSolidXyz,
        Self::AxesSolidColour,
        Self::ColourBar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::None => "NONE",
            Self::Arrow => "ARROW",
            Self::ArrowSolid => "ARROW_SOLID",
            Self::Axis => "AXIS",
            Self::AxisSolid => "AXIS_SOLID",
            Self::Cone => "CONE",
            Self::ConeSolid => "CONE_SOLID",
            Self::Cross => "CROSS",
            Self::CubeSolid => "CUBE_SOLID",
            Self::CubeWireframe => "CUBE_WIREFRAME",
            Self::Cylinder => "CYLINDER",
            Self::CylinderSolid => "CYLINDER_SOLID",
            Self::Diamond => "DIAMOND",
            Self::Line => "LINE",
            Self::Point => "POINT",
            Self::Sheet => "SHEET",
            Self::Sphere => "SPHERE",
            Self::Axes => "AXES",
            Self::Axes123 => "AXES_123",
            Self::AxesXyz => "AXES_XYZ",
            Self::AxesColour => "AXES_COLOUR",
            Self::AxesSolid => "AXES_SOLID",
            Self::AxesSolid123 => "AXES_SOLID_123",
            Self::AxesSolidXyz => "AXES_SOLID_XYZ",
            Self::AxesSolidColour => "AXES_SOLID_COLOUR",
            Self::ColourBar => "COLOUR_BAR",
        }
    }
}

impl fmt::Display for GlyphShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlyphShapeType {
    type Err = GlyphError;

    /// Parses the upper case names; `INVALID` is not a parseable name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .filter(|shape_type| *shape_type != Self::Invalid)
            .find(|shape_type| shape_type.as_str() == name)
            .ok_or_else(|| invalid_argument(format!("unknown glyph shape type '{name}'")))
    }
}
