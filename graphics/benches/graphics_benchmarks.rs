use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use zinc_core::material::MaterialModule;
use zinc_core::math::Vec3;
use zinc_core::spectrum::Spectrum;
use zinc_core::tessellation::Tessellation;
use zinc_graphics::{
    AxesGlyph, ColourBarGlyph, DummyRenderer, Glyph, GlyphModule, GraphicsContext, Renderer,
    StandardGlyphOptions,
};

// ---------------------------------------------------------------------------
// Catalog construction
// ---------------------------------------------------------------------------

fn bench_define_standard_glyphs(c: &mut Criterion) {
    let materials = Arc::new(MaterialModule::new());
    materials.define_standard_materials().unwrap();
    c.bench_function("define_standard_glyphs", |b| {
        b.iter(|| {
            let module = GlyphModule::new(Arc::clone(&materials));
            module.define_standard_glyphs().unwrap();
            black_box(module.len());
        });
    });
}

// ---------------------------------------------------------------------------
// Derived glyph rebuilds
// ---------------------------------------------------------------------------

fn bench_axes_rebuild(c: &mut Criterion) {
    let context =
        GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default()).unwrap();
    let axis = context.glyph_module().find_glyph_by_name("axis_solid").unwrap();
    let axes = AxesGlyph::new(axis, 0.25).unwrap();
    let tessellation = Tessellation::default();
    let mut width = 0.25;
    c.bench_function("axes_solid_rebuild", |b| {
        b.iter(|| {
            width = if width == 0.25 { 0.3 } else { 0.25 };
            axes.set_axis_width(width).unwrap();
            black_box(axes.graphics_object(&tessellation, None, None).unwrap());
        });
    });
}

fn bench_axes_cached(c: &mut Criterion) {
    let context =
        GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default()).unwrap();
    let axes = context.glyph_module().find_glyph_by_name("axes_solid_colour").unwrap();
    let tessellation = Tessellation::default();
    c.bench_function("axes_solid_colour_cached", |b| {
        b.iter(|| black_box(axes.graphics_object(&tessellation, None, None).unwrap()));
    });
}

fn bench_colour_bar_rebuild(c: &mut Criterion) {
    let bar = ColourBarGlyph::new(Spectrum::new("bench"));
    let tessellation = Tessellation::new(48).unwrap();
    let mut flip = false;
    c.bench_function("colour_bar_rebuild_48", |b| {
        b.iter(|| {
            flip = !flip;
            bar.set_centre(Vec3::new(if flip { 1.0 } else { 0.0 }, 0.0, 0.0));
            black_box(bar.graphics_object(&tessellation, None, None).unwrap());
        });
    });
}

// ---------------------------------------------------------------------------
// Dummy renderer
// ---------------------------------------------------------------------------

fn bench_dummy_render_catalog(c: &mut Criterion) {
    let context =
        GraphicsContext::with_standard_definitions(&StandardGlyphOptions::default()).unwrap();
    let tessellation = Tessellation::default();
    let objects: Vec<_> = context
        .glyph_module()
        .glyph_iter()
        .map(|glyph| glyph.graphics_object(&tessellation, None, None).unwrap())
        .collect();
    c.bench_function("dummy_render_standard_catalog", |b| {
        b.iter(|| {
            let mut renderer = DummyRenderer::new();
            for object in &objects {
                renderer.render(object).unwrap();
            }
            black_box(renderer.take_executed().len());
        });
    });
}

criterion_group!(
    benches,
    bench_define_standard_glyphs,
    bench_axes_rebuild,
    bench_axes_cached,
    bench_colour_bar_rebuild,
    bench_dummy_render_catalog,
);
criterion_main!(benches);
