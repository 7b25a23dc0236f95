use std::{fs::File, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use lumen::TraceConfig;
use lumen_random::{
    rand::{rngs::StdRng, SeedableRng},
    random_scene,
};

/// Generate a random scene and write it as JSON.
#[derive(Parser)]
#[command(name = "gen_rand_scene")]
struct Args {
    /// Where to write the scene
    output: PathBuf,
    #[arg(long, default_value_t = 4)]
    lights: usize,
    #[arg(long, default_value_t = 12)]
    mirrors: usize,
    /// Seed for reproducible scenes, a random one is used if absent
    #[arg(long)]
    seed: Option<u64>,
    /// Also write the default trace configuration
    #[arg(long)]
    with_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = random_scene(&mut rng, args.lights, args.mirrors);
    let config = TraceConfig::default();
    let json = lumen_json::serialize_scene(&scene, args.with_config.then_some(&config));

    let file = File::create(&args.output)
        .with_context(|| format!("could not create {}", args.output.display()))?;
    lumen_json::serde_json::to_writer_pretty(file, &json)?;

    info!(
        "wrote {} lights and {} mirrors to {}",
        scene.lights.len(),
        scene.mirrors.len(),
        args.output.display()
    );

    Ok(())
}
