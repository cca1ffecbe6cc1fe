//! Renderer abstraction consumed by glyph users.
//!
//! A renderer turns a built graphics object chain into a backend-resident
//! form once ([`Renderer::compile`]) and draws that form any number of times
//! ([`Renderer::execute`]). Nothing flows back into the glyph library.
//!
//! # Available Renderers
//!
//! - `dummy` (default): records what it was asked to draw, for tests and tools

#[cfg(feature = "dummy")]
mod dummy;

use thiserror::Error;
use zinc_core::graphics_object::GraphicsObject;

#[cfg(feature = "dummy")]
pub use dummy::{DummyRenderer, ExecutedObject};

/// Errors that can occur while compiling or drawing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to compile '{name}': {reason}")]
    CompileFailed { name: String, reason: String },

    #[error("'{0}' was executed before being compiled")]
    NotCompiled(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Sum of the compile generations of every object in the chain.
///
/// Changes whenever any member is marked changed.
pub fn chain_generation(object: &GraphicsObject) -> u64 {
    object.chain().map(GraphicsObject::generation).sum()
}

pub trait Renderer {
    /// Build the backend form of `object` and every object chained after it.
    fn compile(&mut self, object: &GraphicsObject) -> RenderResult<()>;

    /// Draw the compiled form of `object`.
    fn execute(&mut self, object: &GraphicsObject) -> RenderResult<()>;

    /// [`chain_generation`] of `object` when it was last compiled.
    fn compiled_generation(&self, object: &GraphicsObject) -> Option<u64>;

    /// Compile `object` if it changed since it was last compiled, then draw it.
    fn render(&mut self, object: &GraphicsObject) -> RenderResult<()> {
        let generation = chain_generation(object);
        if self.compiled_generation(object) != Some(generation) {
            self.compile(object)?;
        }
        self.execute(object)
    }
}
