//! # Zinc Graphics
//!
//! Glyphs and the registry that names them.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Glyph`] - Trait every glyph implements, with static, circular,
//!   [`AxesGlyph`] and [`ColourBarGlyph`] implementations
//! - [`GlyphModule`] - Registry of named glyphs with change events and the
//!   standard glyph catalog
//! - [`GraphicsContext`] - Material, font, spectrum and glyph modules wired together
//! - [`Renderer`] - Contract for drawing built graphics objects, with a
//!   [`DummyRenderer`] for testing
//!
//! ## Example
//!
//! ```ignore
//! use zinc_graphics::{GraphicsContext, StandardGlyphOptions};
//!
//! let context = GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default())?;
//! let axes = context.glyph_module().find_glyph_by_name("axes_xyz").unwrap();
//! let object = axes.graphics_object(&Tessellation::default(), None, None)?;
//! renderer.render(&object)?;
//! ```

pub mod context;
pub mod error;
pub mod glyph;
pub mod module;
pub mod renderer;

// Re-export main types for convenience
pub use context::GraphicsContext;
pub use error::{GlyphError, GlyphResult};
pub use glyph::{
    AxesGlyph, CircularGlyph, CircularShape, ColourBarGlyph, ColourBarParameters, Glyph,
    GlyphCore, GlyphShapeType, StaticGlyph, contains_surface_primitives,
};
pub use module::{GlyphModule, GlyphModuleEvent, StandardGlyphOptions};
#[cfg(feature = "dummy")]
pub use renderer::DummyRenderer;
pub use renderer::{RenderError, RenderResult, Renderer};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    zinc_core::init();
    log::info!("Zinc Graphics v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_renderer() {
        let renderer = DummyRenderer::new();
        assert_eq!(renderer.name(), "Dummy Renderer");
    }
}
