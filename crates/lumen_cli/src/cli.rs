use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_renderer::CameraConfig;
use std::path::PathBuf;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Render a sphere scene to a plain-text PPM image")]
pub struct Args {
    /// Scene description (JSON). The built-in demo scene is used if omitted.
    pub scene: Option<PathBuf>,

    /// Output file; writes to stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Override the number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Override the maximum bounce depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for the random generator, for reproducible renders
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command line overrides on top of the scene's camera settings.
    pub fn apply_overrides(&self, config: &mut CameraConfig) {
        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["lumen"]).unwrap();
        assert!(args.scene.is_none());
        assert!(args.output.is_none());
        assert_eq!(args.log_level, LogLevel::Info);

        let mut config = CameraConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, CameraConfig::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "lumen",
            "scene.json",
            "-o",
            "out.ppm",
            "--width",
            "64",
            "-s",
            "8",
            "--max-depth",
            "3",
            "--seed",
            "42",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.ppm")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);

        let mut config = CameraConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.image_width, 64);
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Args::try_parse_from(["lumen", "--width", "wide"]).is_err());
    }
}
