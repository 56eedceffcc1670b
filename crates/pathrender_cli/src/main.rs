//! `pathrender` - render a scene file to an image.

mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use pathrender_core::load_scene;
use pathrender_renderer::{render, ImageFormat, SceneConfig};
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.clone().into());

    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();

    let description = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let config = SceneConfig::from_description(&description);
    let settings = args.render_settings(&config);

    let path = args.output_path(&config, chrono::Local::now().naive_local());
    ImageFormat::from_path(&path)
        .with_context(|| format!("Cannot write {}", path.display()))?;

    let image = render(
        &config.camera,
        &config.scene,
        config.width,
        config.height,
        &settings,
    )
    .context("Render failed")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    image
        .save(&path)
        .with_context(|| format!("Failed to write image {}", path.display()))?;

    log::info!("Wrote {} in {:.2?}", path.display(), start.elapsed());
    Ok(())
}
