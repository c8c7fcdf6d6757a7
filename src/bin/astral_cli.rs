use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use astral_sim::file::load_catalog;

/// Prints the orbital characteristics of a body in a catalog.
#[derive(Debug, Parser)]
struct Args {
    /// Body to describe, case-insensitive
    name: String,

    #[arg(long, default_value = "assets/solar-system.json")]
    catalog: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("couldn't load catalog {}", args.catalog.display()))?;

    let mut found = false;
    for body in catalog.iter() {
        if body.name().to_lowercase() != args.name.to_lowercase() {
            continue;
        }
        found = true;

        let orbit = &body.orbit;
        println!("Orbital characteristics for {} ({})", body.name(), body.info.kind);
        println!("- Semi-major axis: {}", orbit.semimajor_axis());
        println!("- Semi-minor axis: {}", orbit.semiminor_axis());
        println!("- Apoapsis: {}", orbit.apoapsis());
        println!("- Periapsis: {}", orbit.periapsis());
        println!("- Orbital eccentricity: {}", orbit.eccentricity());
        println!("- Orbital inclination: {}", orbit.inclination_degrees());
        println!("- Argument of periapsis: {}", orbit.arg_periapse_degrees());
        println!("- LAN: {}", orbit.long_asc_node_degrees());
        println!("- Mean anomaly at epoch: {}", orbit.mean_anomaly_at_epoch_degrees());
        println!("- Sidereal orbital period: {} s", orbit.period());
        println!("- Path length: {}", orbit.circumference());
        println!("- Rotation period: {} s", body.info.rotation_period);
        println!();
    }

    if !found {
        anyhow::bail!("no body named {:?} in {}", args.name, catalog.name());
    }
    Ok(())
}
