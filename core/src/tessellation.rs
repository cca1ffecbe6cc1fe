//! Quality settings for curved glyph geometry.

use crate::error::{CoreResult, invalid_argument};

/// Fewest divisions a circle may be approximated with.
pub const MINIMUM_CIRCLE_DIVISIONS: u32 = 3;

/// Resolution used when approximating curved shapes by polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tessellation {
    circle_divisions: u32,
    refinement_factor: u32,
}

impl Tessellation {
    pub fn new(circle_divisions: u32) -> CoreResult<Self> {
        Self::default().with_circle_divisions(circle_divisions)
    }

    /// Set the number of segments around a circle; at least 3.
    pub fn with_circle_divisions(mut self, circle_divisions: u32) -> CoreResult<Self> {
        if circle_divisions < MINIMUM_CIRCLE_DIVISIONS {
            return Err(invalid_argument(format!(
                "need at least {MINIMUM_CIRCLE_DIVISIONS} circle divisions, got {circle_divisions}"
            )));
        }
        self.circle_divisions = circle_divisions;
        Ok(self)
    }

    /// Set the element refinement factor; at least 1.
    pub fn with_refinement_factor(mut self, refinement_factor: u32) -> CoreResult<Self> {
        if refinement_factor == 0 {
            return Err(invalid_argument("refinement factor must be positive"));
        }
        self.refinement_factor = refinement_factor;
        Ok(self)
    }

    pub fn circle_divisions(&self) -> u32 {
        self.circle_divisions
    }

    pub fn refinement_factor(&self) -> u32 {
        self.refinement_factor
    }
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            circle_divisions: 12,
            refinement_factor: 1,
        }
    }
}
