use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use log::info;
use lumen_json::{read_scene, serde_json, JsonSer};

/// Trace every light of a JSON scene and print the per-light reflection data.
#[derive(Parser)]
#[command(name = "run_scene_json")]
struct Args {
    /// The scene to trace
    scene: PathBuf,
    /// Where to write the results, standard output if absent
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
    /// Only output the segments of each light
    #[arg(long)]
    beams: bool,
    /// Override the scene's ray count for radial lights
    #[arg(long)]
    radial_rays: Option<usize>,
    /// Override the scene's ray count for conic lights
    #[arg(long)]
    conic_rays: Option<usize>,
    /// Override the scene's reflection cap
    #[arg(long)]
    max_bounces: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let file = File::open(&args.scene)
        .with_context(|| format!("could not open {}", args.scene.display()))?;
    let (scene, mut config) = read_scene(BufReader::new(file))
        .with_context(|| format!("invalid scene {}", args.scene.display()))?;

    if let Some(n) = args.radial_rays {
        config = config.with_radial_rays(n);
    }
    if let Some(n) = args.conic_rays {
        config = config.with_conic_rays(n);
    }
    if let Some(n) = args.max_bounces {
        config = config.with_max_bounces(n);
    }
    config.validate()?;

    info!(
        "tracing {} lights against {} mirrors",
        scene.lights.len(),
        scene.mirrors.len()
    );

    let json = if args.beams {
        scene.beams(&config).to_json()
    } else {
        scene.reflection_data(&config).to_json()
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("could not create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &json)?;
    } else {
        serde_json::to_writer(&mut out, &json)?;
    }
    writeln!(out)?;

    Ok(())
}
