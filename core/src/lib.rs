//! # Zinc Core
//!
//! Geometry side of the glyph library: the vertex attribute store, the
//! graphics objects built on it, the unit shape builders used as glyphs,
//! and glyph axes resolution. Also the shared named objects glyphs depend
//! on (materials, fonts, spectra) and the change-notifying managers that
//! own them.

pub mod error;
pub mod font;
pub mod format;
pub mod generators;
pub mod graphics_object;
pub mod manager;
pub mod material;
pub mod math;
pub mod spectrum;
pub mod tessellation;
pub mod vertex_array;

pub use error::{CoreError, CoreResult};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() {
    log::info!("Zinc Core v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
