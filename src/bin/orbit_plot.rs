use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use plotters::prelude::*;

use astral_sim::file::load_catalog;
use astral_sim::model::SystemCatalog;

/// Draws a top-down view of every orbit in a catalog.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value = "assets/solar-system.json")]
    catalog: PathBuf,

    #[arg(long, default_value = "plots/orbits.png")]
    output: PathBuf,

    /// Points per orbit
    #[arg(long, default_value_t = 360)]
    segments: usize,
}

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("couldn't load catalog {}", args.catalog.display()))?;

    if let Some(dir) = args.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("couldn't create {}", dir.display()))?;
    }
    draw_plot(&args.output, &catalog, args.segments)
        .map_err(|e| anyhow::anyhow!("couldn't draw {}: {}", args.output.display(), e))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

// World space is y-up, so the orbital plane is x-z
fn draw_plot(
    path: &Path,
    catalog: &SystemCatalog,
    segments: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let extent = catalog
        .iter()
        .map(|body| body.orbit.apoapsis() + body.radius() as f64)
        .fold(1.0, f64::max) as f32
        * 1.05;

    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(catalog.name(), ("sans-serif", 24).into_font().color(&WHITE))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .axis_style(WHITE.mix(0.5))
        .light_line_style(WHITE.mix(0.05))
        .bold_line_style(WHITE.mix(0.1))
        .label_style(("sans-serif", 12).into_font().color(&WHITE))
        .draw()?;

    for body in catalog.iter() {
        let c = body.info.color;
        let color = RGBColor(
            (c.x * 255.0) as u8,
            (c.y * 255.0) as u8,
            (c.z * 255.0) as u8,
        );

        if body.orbit.semimajor_axis() > 0.0 {
            chart.draw_series(LineSeries::new(
                body.orbit
                    .sample_path(segments)
                    .chain(body.orbit.sample_path(segments).take(1))
                    .map(|p| (p.x as f32, p.z as f32)),
                &color,
            ))?;
        }

        let p = body.position;
        chart.draw_series(std::iter::once(Circle::new(
            (p.x as f32, p.z as f32),
            4,
            color.filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}
