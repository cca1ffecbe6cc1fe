//! Graphics context owning the modules glyphs depend on.

use std::sync::Arc;

use zinc_core::font::FontModule;
use zinc_core::manager::Subscription;
use zinc_core::material::MaterialModule;
use zinc_core::spectrum::SpectrumModule;

use crate::error::GlyphResult;
use crate::module::{GlyphModule, StandardGlyphOptions};

/// Material, font, spectrum and glyph modules wired together.
///
/// Material, font and spectrum changes are forwarded to every glyph of the
/// glyph module, so derived glyphs rebuild when something they draw with
/// changes.
pub struct GraphicsContext {
    materials: Arc<MaterialModule>,
    fonts: Arc<FontModule>,
    spectra: Arc<SpectrumModule>,
    glyphs: Arc<GlyphModule>,
    _subscriptions: Vec<Subscription>,
}

impl GraphicsContext {
    /// Create a context with empty modules.
    pub fn new() -> Self {
        let materials = Arc::new(MaterialModule::new());
        let fonts = Arc::new(FontModule::new());
        let spectra = Arc::new(SpectrumModule::new());
        let glyphs = Arc::new(GlyphModule::new(Arc::clone(&materials)));

        let subscriptions = vec![
            {
                let glyphs = Arc::downgrade(&glyphs);
                materials.subscribe(move |message| {
                    if let Some(glyphs) = glyphs.upgrade() {
                        glyphs.material_change(message);
                    }
                })
            },
            {
                let glyphs = Arc::downgrade(&glyphs);
                fonts.subscribe(move |message| {
                    if let Some(glyphs) = glyphs.upgrade() {
                        glyphs.font_change(message);
                    }
                })
            },
            {
                let glyphs = Arc::downgrade(&glyphs);
                spectra.subscribe(move |message| {
                    if let Some(glyphs) = glyphs.upgrade() {
                        glyphs.spectrum_change(message);
                    }
                })
            },
        ];

        Self {
            materials,
            fonts,
            spectra,
            glyphs,
            _subscriptions: subscriptions,
        }
    }

    /// Create a context with the standard materials, default font and
    /// spectrum, and the standard glyphs.
    pub fn with_standard_definitions(options: &StandardGlyphOptions) -> GlyphResult<Self> {
        let context = Self::new();
        context.materials.define_standard_materials()?;
        context.fonts.default_font()?;
        context.spectra.default_spectrum()?;
        context.glyphs.define_standard_glyphs_with(options)?;
        log::debug!(
            "graphics context ready with {} glyphs",
            context.glyphs.len()
        );
        Ok(context)
    }

    pub fn material_module(&self) -> &Arc<MaterialModule> {
        &self.materials
    }

    pub fn font_module(&self) -> &Arc<FontModule> {
        &self.fonts
    }

    pub fn spectrum_module(&self) -> &Arc<SpectrumModule> {
        &self.spectra
    }

    pub fn glyph_module(&self) -> &Arc<GlyphModule> {
        &self.glyphs
    }
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zinc_core::material::Colour;
    use zinc_core::spectrum::{ColourMapping, Spectrum, SpectrumComponent};
    use zinc_core::tessellation::Tessellation;

    use crate::glyph::{AxesGlyph, ColourBarGlyph, Glyph};

    #[test]
    fn test_material_change_rebuilds_coloured_axes() {
        let context =
            GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default()).unwrap();
        let glyph = context.glyph_module().find_glyph_by_name("axes_colour").unwrap();
        let axes = glyph.downcast_ref::<AxesGlyph>().unwrap();
        let tessellation = Tessellation::default();
        let before = axes.graphics_object(&tessellation, None, None).unwrap();
        assert!(Arc::ptr_eq(&before, &axes.graphics_object(&tessellation, None, None).unwrap()));

        let green = context.material_module().find_material_by_name("green").unwrap();
        green.set_diffuse(Colour::new(0.0, 0.5, 0.0));
        let after = axes.graphics_object(&tessellation, None, None).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_spectrum_change_rebuilds_colour_bar() {
        let context =
            GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default()).unwrap();
        let spectrum = context.spectrum_module().default_spectrum().unwrap();
        let bar = context
            .glyph_module()
            .create_colour_bar_glyph(Arc::clone(&spectrum))
            .unwrap();
        let tessellation = Tessellation::default();
        let before = bar.graphics_object(&tessellation, None, None).unwrap();

        // inside the existing range, so only the notification can rebuild
        spectrum
            .add_component(SpectrumComponent::new(0.25, 0.75, ColourMapping::Monochrome))
            .unwrap();
        assert_eq!((spectrum.minimum(), spectrum.maximum()), (0.0, 1.0));
        let after = bar.graphics_object(&tessellation, None, None).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_unmanaged_spectrum_change_keeps_colour_bar() {
        let spectrum = Spectrum::new("loose");
        spectrum
            .add_component(SpectrumComponent::new(0.0, 1.0, ColourMapping::Rainbow))
            .unwrap();
        let bar = ColourBarGlyph::new(Arc::clone(&spectrum));
        let tessellation = Tessellation::default();
        let before = bar.graphics_object(&tessellation, None, None).unwrap();

        spectrum
            .add_component(SpectrumComponent::new(0.25, 0.75, ColourMapping::Monochrome))
            .unwrap();
        let after = bar.graphics_object(&tessellation, None, None).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }
}
