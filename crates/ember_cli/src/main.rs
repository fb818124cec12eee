//! `ember` - render a scene of planes and spheres to an image file.

mod cli;
mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::{load_scene, Scene};
use ember_renderer::{render_with_progress, save_image, Camera};
use log::info;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let scene = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            info!("No scene file given, using the built-in scene");
            Scene::default_scene()
        }
    };

    let camera = Camera::new()
        .with_resolution(args.width, args.height)
        .with_position(args.camera, args.look_at);
    let config = args.render_config();

    // Log every 10% step once
    let mut last_step = 0;
    let image = render_with_progress(&scene, &camera, &config, |percent| {
        let step = (percent / 10.0) as u32;
        if step > last_step {
            last_step = step;
            info!("Progress: {}%", step * 10);
        }
    })
    .context("Render failed")?;

    save_image(&image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
