//! Common utilities for glyph integration tests.

use std::sync::Arc;

use zinc_core::graphics_object::GraphicsObject;
use zinc_core::math::Vec3;
use zinc_core::tessellation::Tessellation;
use zinc_graphics::renderer::ExecutedObject;
use zinc_graphics::{DummyRenderer, Glyph, GraphicsContext, Renderer, StandardGlyphOptions};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Test Context
// ============================================================================

/// A standard graphics context plus a dummy renderer.
pub struct TestContext {
    pub context: GraphicsContext,
    pub renderer: DummyRenderer,
    pub tessellation: Tessellation,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_options(&StandardGlyphOptions::default())
    }

    pub fn with_options(options: &StandardGlyphOptions) -> Self {
        init_logging();
        Self {
            context: GraphicsContext::with_standard_definitions(options)
                .expect("standard definitions"),
            renderer: DummyRenderer::new(),
            tessellation: Tessellation::default(),
        }
    }

    pub fn glyph(&self, name: &str) -> Arc<dyn Glyph> {
        self.context
            .glyph_module()
            .find_glyph_by_name(name)
            .unwrap_or_else(|| panic!("no glyph named '{name}'"))
    }

    pub fn build(&self, glyph: &dyn Glyph) -> Arc<GraphicsObject> {
        glyph
            .graphics_object(&self.tessellation, None, None)
            .expect("glyph builds")
    }

    /// Build and render the named glyph, returning what was drawn.
    pub fn draw(&mut self, name: &str) -> Vec<ExecutedObject> {
        let object = self.build(&*self.glyph(name));
        self.renderer.render(&object).expect("render");
        self.renderer.take_executed()
    }
}

// ============================================================================
// Input Generation
// ============================================================================

/// Deterministic xorshift generator for sampled inputs.
pub struct Sampler(u64);

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Uniform in `[-1, 1)`.
    pub fn next(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 40) as f32 / (1u64 << 23) as f32 - 1.0
    }

    pub fn vector(&mut self) -> Vec3 {
        Vec3::new(self.next(), self.next(), self.next())
    }
}
