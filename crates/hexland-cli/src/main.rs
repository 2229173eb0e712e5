use anyhow::{bail, Context};
use clap::Parser;
use hexland_core::config::WorldConfig;
use hexland_core::world::World;
use std::fs;
use std::path::PathBuf;

/// Headless ecosystem runner: builds a world from a seed, ticks it a fixed
/// number of steps, and emits a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "hexland")]
struct Args {
    /// RNG seed; equal seeds and arguments reproduce equal summaries.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 2000)]
    steps: usize,

    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// World rings generated around the origin.
    #[arg(long, default_value_t = 12)]
    radius: u32,

    #[arg(long, default_value_t = 30)]
    hares: usize,

    #[arg(long, default_value_t = 8)]
    foxes: usize,

    #[arg(long, default_value_t = 3)]
    wolves: usize,

    #[arg(long, default_value_t = 10)]
    salmon: usize,

    /// Sample metrics every N ticks (the final tick is always sampled).
    #[arg(long, default_value_t = 10)]
    sample_every: usize,

    /// Hexagon size used for pixel-space positions in snapshots.
    #[arg(long, default_value_t = 18.0)]
    hex_size: f32,

    /// Write the JSON summary to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.dt.is_finite() || args.dt <= 0.0 {
        bail!("dt must be positive and finite, got {}", args.dt);
    }

    let config = WorldConfig {
        seed: args.seed,
        hex_size: args.hex_size,
        world_radius: args.radius,
        initial_hares: args.hares,
        initial_foxes: args.foxes,
        initial_wolves: args.wolves,
        initial_salmon: args.salmon,
    };
    let mut world = World::try_new(config).context("failed to build world")?;

    log::info!(
        "running {} steps at dt {} (seed {})",
        args.steps,
        args.dt,
        args.seed
    );
    let summary = world.run(args.steps, args.dt, args.sample_every);
    let counts = &summary.final_counts;
    log::info!(
        "finished: {} hares, {} foxes, {} wolves, {} salmon ({} births, {} deaths)",
        counts.hares,
        counts.foxes,
        counts.wolves,
        counts.salmon,
        summary.total_births,
        summary.total_deaths,
    );

    let json = serde_json::to_string_pretty(&summary).context("failed to serialize summary")?;
    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
