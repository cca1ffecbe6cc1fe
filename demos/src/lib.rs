//! # Zinc Demos
//!
//! Command line tools built on the glyph library.
//!
//! ## Available Demos
//!
//! - `glyph_dump` - Prints the geometry of the standard glyph catalog

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
