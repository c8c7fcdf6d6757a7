use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing::info;
use tracing_subscriber::EnvFilter;

use astral_sim::config::Config;
use astral_sim::file::load_catalog;
use astral_sim::gui::Simulation;
use astral_sim::simulation::SimulationContext;

#[derive(Debug, Parser)]
#[command(about = "Interactive 3D view of a planetary system")]
struct Args {
    /// System catalog to load
    #[arg(long, default_value = "assets/solar-system.json")]
    catalog: PathBuf,

    /// Settings file; defaults are used if it doesn't exist
    #[arg(long, default_value = "assets/astral.toml")]
    config: PathBuf,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load_or_default(Some(&args.config))
        .with_context(|| format!("couldn't read settings from {}", args.config.display()))?;
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("couldn't load catalog {}", args.catalog.display()))?;

    let window_config = config.window.clone();
    let mut window = Window::new_with_size(
        &window_config.title,
        window_config.width,
        window_config.height,
    );
    window.set_light(Light::StickToCamera);
    if window_config.framerate_limit > 0 {
        window.set_framerate_limit(Some(window_config.framerate_limit));
    }

    info!(
        catalog = catalog.name(),
        bodies = catalog.len(),
        "starting simulation"
    );
    let context = SimulationContext::new(catalog, config);
    let simulation = Simulation::new(context, &mut window);
    window.render_loop(simulation);

    Ok(())
}
