use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{PpmWriter, Scene, SceneDescription};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let description = match &args.scene {
        Some(path) => SceneDescription::from_path(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, rendering the demo scene");
            SceneDescription::demo()
        }
    };

    let Scene { world, mut camera } = description.build().context("Failed to build scene")?;
    args.apply_overrides(camera.config_mut());

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = PpmWriter::new(BufWriter::new(out));

    camera
        .render(&world, &mut rng, &mut sink)
        .context("Render failed")?;

    if let Some(path) = &args.output {
        log::info!("Saved to {}", path.display());
    }
    Ok(())
}
