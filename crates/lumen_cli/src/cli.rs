use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::config::{RenderConfig, SceneKind};

/// Log levels selectable on the command line
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

/// Command line arguments. Flags given here override the config file.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// JSON render configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Built-in scene to render
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Base seed for the random streams
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file path (.ppm or .png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overwrite config values with any flags that were given.
    pub fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
    }
}
