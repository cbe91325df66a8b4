use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::{default_threads, BuiltinScene, RenderConfig, Sampling, MAX_DEPTH};

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes selectable with `--scene`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SceneArg {
    TwoSpheres,
    Materials,
    Random,
}

impl From<SceneArg> for BuiltinScene {
    fn from(scene: SceneArg) -> Self {
        match scene {
            SceneArg::TwoSpheres => BuiltinScene::TwoSpheres,
            SceneArg::Materials => BuiltinScene::Materials,
            SceneArg::Random => BuiltinScene::Random,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Monte Carlo path tracer for sphere scenes")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 200)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 100)]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value_t = 100)]
    pub samples: u32,

    /// Maximum number of bounces per path
    #[arg(long, default_value_t = MAX_DEPTH)]
    pub max_depth: u32,

    /// Number of render threads (defaults to the available parallelism)
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Base seed for the per-thread samplers and the random scene
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Sample only pixel centres instead of jittering inside each pixel
    #[arg(long)]
    pub center_samples: bool,

    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "materials")]
    pub scene: SceneArg,

    /// JSON scene file; overrides --scene
    #[arg(long)]
    pub scene_file: Option<PathBuf>,

    /// Write the selected scene as JSON to this path and exit
    #[arg(long)]
    pub dump_scene: Option<PathBuf>,

    /// Output file path (.ppm for ASCII PPM, otherwise by extension, e.g. .png)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Set the logging level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples,
            max_depth: self.max_depth,
            threads: self.threads.unwrap_or_else(default_threads),
            seed: self.seed,
            sampling: if self.center_samples {
                Sampling::PixelCenter
            } else {
                Sampling::Jittered
            },
        }
    }
}
