//! Glyph repetition and per-instance axes resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, invalid_argument};
use crate::math::{Vec3, rescale_in_place, sign_of, triple_product};

/// How many physical glyphs are drawn per glyph point, and how they are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphRepeatMode {
    /// One glyph per point.
    #[default]
    None,
    /// A second glyph pointing the opposite way.
    Mirror,
    /// Two orthonormalised glyphs along axis 1 and axis 2.
    Axes2D,
    /// Three orthonormalised glyphs, one per axis.
    Axes3D,
}

impl GlyphRepeatMode {
    pub const ALL: [Self; 4] = [Self::None, Self::Mirror, Self::Axes2D, Self::Axes3D];

    pub fn number_of_glyphs(self) -> usize {
        match self {
            Self::None => 1,
            Self::Mirror | Self::Axes2D => 2,
            Self::Axes3D => 3,
        }
    }

    /// Whether instance `glyph_number` draws a label.
    pub fn glyph_number_has_label(self, glyph_number: usize) -> bool {
        match self {
            Self::None | Self::Mirror => glyph_number == 0,
            Self::Axes2D => glyph_number < 2,
            Self::Axes3D => glyph_number < 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Mirror => "MIRROR",
            Self::Axes2D => "AXES_2D",
            Self::Axes3D => "AXES_3D",
        }
    }
}

impl fmt::Display for GlyphRepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlyphRepeatMode {
    type Err = CoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| invalid_argument(format!("unknown glyph repeat mode '{name}'")))
    }
}

/// Orientation data supplied for one glyph point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPoint {
    pub point: Vec3,
    pub axis1: Vec3,
    pub axis2: Vec3,
    pub axis3: Vec3,
    pub scale: Vec3,
}

impl Default for GlyphPoint {
    fn default() -> Self {
        Self {
            point: Vec3::zeros(),
            axis1: Vec3::x(),
            axis2: Vec3::y(),
            axis3: Vec3::z(),
            scale: Vec3::zeros(),
        }
    }
}

/// Sizing shared by every point of a glyph set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSizing {
    /// Minimum length of each axis, kept even when the data scale is zero.
    pub base_size: Vec3,
    /// Multiplier applied to the data scale on each axis.
    pub scale_factors: Vec3,
    /// Fraction of each final axis the glyph origin is moved back by.
    pub offset: Vec3,
}

impl Default for GlyphSizing {
    fn default() -> Self {
        Self {
            base_size: Vec3::repeat(1.0),
            scale_factors: Vec3::repeat(1.0),
            offset: Vec3::zeros(),
        }
    }
}

/// Final frame of one drawn glyph instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAxes {
    pub point: Vec3,
    pub axis1: Vec3,
    pub axis2: Vec3,
    pub axis3: Vec3,
}

/// Compute the frame of instance `glyph_number` of a repeated glyph.
///
/// `None` and `Mirror` scale each supplied axis independently and keep the
/// result right-handed. `Axes2D` and `Axes3D` scale uniformly along the
/// primary dimension and rebuild axes 2 and 3 from axis 1 by cross
/// products. A colinear pair leaves the affected axis at zero length.
pub fn resolve_glyph_axes(
    mode: GlyphRepeatMode,
    glyph_number: usize,
    sizing: &GlyphSizing,
    input: &GlyphPoint,
) -> ResolvedAxes {
    match mode {
        GlyphRepeatMode::None | GlyphRepeatMode::Mirror => {
            resolve_general(mode, glyph_number, sizing, input)
        }
        GlyphRepeatMode::Axes2D | GlyphRepeatMode::Axes3D => {
            resolve_orthonormal(mode, glyph_number, sizing, input)
        }
    }
}

fn resolve_general(
    mode: GlyphRepeatMode,
    glyph_number: usize,
    sizing: &GlyphSizing,
    input: &GlyphPoint,
) -> ResolvedAxes {
    let scale = &input.scale;
    let axis_scale = Vec3::from_fn(|j, _| {
        sign_of(scale[j]) * sizing.base_size[j] + scale[j] * sizing.scale_factors[j]
    });

    let mut axis1 = input.axis1 * axis_scale[0];
    let mut axis2 = input.axis2 * axis_scale[1];
    let mut axis3 = input.axis3 * axis_scale[2];
    let mut point = input.point
        + axis1 * sizing.offset[0]
        + axis2 * sizing.offset[1]
        + axis3 * sizing.offset[2];

    if mode == GlyphRepeatMode::Mirror && glyph_number == 1 {
        axis1 = -axis1;
        axis2 = -axis2;
        axis3 = -axis3;
        if scale[0] < 0.0 {
            // origin moves to the far end of axis 1
            point -= axis1;
        }
    }

    if triple_product(&axis1, &axis2, &axis3) < 0.0 {
        axis3 = -axis3;
    }

    ResolvedAxes {
        point,
        axis1,
        axis2,
        axis3,
    }
}

fn resolve_orthonormal(
    mode: GlyphRepeatMode,
    glyph_number: usize,
    sizing: &GlyphSizing,
    input: &GlyphPoint,
) -> ResolvedAxes {
    let base = &sizing.base_size;
    let factors = &sizing.scale_factors;
    let scale = &input.scale;

    let axis_scale =
        Vec3::from_fn(|k, _| sign_of(scale[k]) * base[0] + scale[k] * factors[0]);
    let point = input.point
        + input.axis1 * (sizing.offset[0] * axis_scale[0])
        + input.axis2 * (sizing.offset[1] * axis_scale[1])
        + input.axis3 * (sizing.offset[2] * axis_scale[2]);

    let (use_axis1, use_axis2) = match glyph_number {
        0 => (input.axis1, input.axis2),
        1 if mode == GlyphRepeatMode::Axes2D => (input.axis2, input.axis1),
        1 => (input.axis2, input.axis3),
        _ => (input.axis3, input.axis1),
    };
    let use_scale = scale[glyph_number.min(2)];

    let axis1 = use_axis1 * (base[0] + use_scale * factors[0]);

    let mut axis3 = axis1.cross(&use_axis2);
    let mut length3 = base[2] + use_scale * factors[2];
    if mode == GlyphRepeatMode::Axes2D && glyph_number > 0 {
        length3 = -length3;
    }
    if !rescale_in_place(&mut axis3, length3) {
        log::warn!("glyph instance {glyph_number}: axis 3 degenerates, source axes are colinear");
    }

    let mut axis2 = axis3.cross(&axis1);
    if !rescale_in_place(&mut axis2, base[1] + use_scale * factors[1]) {
        log::warn!("glyph instance {glyph_number}: axis 2 degenerates");
    }

    ResolvedAxes {
        point,
        axis1,
        axis2,
        axis3,
    }
}
