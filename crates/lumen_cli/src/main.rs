//! `lumen` - render a built-in scene to a PPM or PNG file.

mod cli;
mod config;
mod scenes;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use cli::Args;
use config::RenderConfig;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::from(args.log_level))
        .init();

    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate().context("Invalid render settings")?;

    let start = Instant::now();
    let mut scene = scenes::build(config.scene);
    config.apply(&mut scene.camera);
    log::info!("Built {:?} scene in {:.2?}", config.scene, start.elapsed());

    if scene.lights.is_empty() {
        log::warn!("Scene has no lights to sample; relying on material sampling only");
    }

    let image = lumen_renderer::render(&mut scene.camera, &scene.world, &scene.lights);

    lumen_renderer::save(&image, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    log::info!("Total time: {:.2?}", start.elapsed());
    Ok(())
}
