//! # Glyph Dump
//!
//! Builds the standard glyph catalog and prints what the dummy renderer
//! draws for each glyph.
//!
//! ```bash
//! cargo run -p zinc-demos --bin glyph_dump -- --glyph axes_xyz --instances
//! ```

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use zinc_core::tessellation::Tessellation;
use zinc_graphics::renderer::ExecutedObject;
use zinc_graphics::{DummyRenderer, GraphicsContext, Renderer, StandardGlyphOptions};

/// Print the geometry of the standard glyphs.
#[derive(Parser, Debug)]
#[command(name = "glyph_dump", about = "Print the geometry of the standard glyphs")]
struct Args {
    /// Only dump the glyph with this name.
    #[arg(long)]
    glyph: Option<String>,

    /// Circle divisions used by round glyphs.
    #[arg(long, default_value = "12")]
    circle_divisions: u32,

    /// Print the resolved instances of glyph sets.
    #[arg(long)]
    instances: bool,

    /// Also define the cmgui glyphs.
    #[arg(long)]
    cmgui: bool,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    zinc_graphics::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let context = GraphicsContext::with_standard_definitions(
        &StandardGlyphOptions::default().with_cmgui(args.cmgui),
    )?;
    let tessellation = Tessellation::new(args.circle_divisions)?;
    let module = context.glyph_module();

    let glyphs = match &args.glyph {
        Some(name) => vec![
            module
                .find_glyph_by_name(name)
                .ok_or_else(|| format!("no glyph named '{name}'"))?,
        ],
        None => module.glyph_iter().collect(),
    };
    log::info!("dumping {} of {} glyphs", glyphs.len(), module.len());

    let mut renderer = DummyRenderer::new();
    for glyph in glyphs {
        let object = glyph.graphics_object(&tessellation, None, None)?;
        renderer.render(&object)?;
        println!("{} [{}]", glyph.name(), glyph.shape_type());
        for drawn in renderer.take_executed() {
            print_object(&drawn, args.instances);
        }
    }
    Ok(())
}

fn print_object(drawn: &ExecutedObject, instances: bool) {
    println!(
        "  {} ({}): {} primitives, {} vertices",
        drawn.name, drawn.kind, drawn.primitive_count, drawn.vertex_count
    );
    if !instances {
        return;
    }
    for instance in &drawn.glyph_instances {
        let axes = &instance.axes;
        println!(
            "    point {} glyph {}: origin {:?} axes {:?} {:?} {:?}",
            instance.point_index,
            instance.glyph_number,
            axes.point.as_slice(),
            axes.axis1.as_slice(),
            axes.axis2.as_slice(),
            axes.axis3.as_slice()
        );
        if let (Some(label), Some(position)) = (&instance.label, &instance.label_position) {
            println!("      label '{label}' at {:?}", position.as_slice());
        }
    }
}
