mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{render, save, SceneDesc};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let config = args.render_config();
    config.validate().context("Invalid render settings")?;

    let scene = match &args.scene_file {
        Some(path) => SceneDesc::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => SceneDesc::builtin(args.scene.into(), args.seed),
    };

    if let Some(path) = &args.dump_scene {
        let json = scene.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write scene to {}", path.display()))?;
        log::info!("Wrote scene to {}", path.display());
        return Ok(());
    }

    let world = scene.build_world().context("Invalid scene")?;
    let camera = scene
        .build_camera(config.aspect_ratio())
        .context("Invalid camera")?;
    log::info!("Scene has {} spheres", world.len());

    let image = render(&camera, &world, &config)?;
    save(&image, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    Ok(())
}
