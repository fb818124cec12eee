use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ember_math::Vec3;
use ember_renderer::{RenderConfig, TileOrder};
use log::LevelFilter;

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

/// Parse `x,y,z` into a vector.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }

    let mut xyz = [0.0f32; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid component '{part}': {e}"))?;
    }
    Ok(Vec3::from_array(xyz))
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(about = "A tiled CPU path tracer for planes and spheres")]
pub struct Args {
    /// Scene file (JSON); the built-in scene is used when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Output image (.bmp or .png)
    #[arg(short, long, default_value = "render.bmp")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(short = 's', long = "samples", default_value_t = 64)]
    pub samples_per_pixel: u32,

    /// Maximum bounces per path
    #[arg(short = 'b', long = "bounces", default_value_t = 32)]
    pub max_bounces: u32,

    /// Tile edge in pixels (derived from the thread count when omitted)
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Worker threads; the main thread renders alongside them (all cores when omitted)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Seed for the per-tile random generators
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Render tiles from the image center outward
    #[arg(long)]
    pub spiral: bool,

    /// Camera position as x,y,z
    #[arg(long, default_value = "0,1,5", value_parser = parse_vec3, allow_hyphen_values = true)]
    pub camera: Vec3,

    /// Point the camera looks at, as x,y,z
    #[arg(long, default_value = "0,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
    pub look_at: Vec3,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Build the render configuration from the parsed flags.
    pub fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            samples_per_pixel: self.samples_per_pixel,
            max_bounces: self.max_bounces,
            tile_size: self.tile_size,
            thread_count: self.threads.unwrap_or(defaults.thread_count),
            tile_order: if self.spiral {
                TileOrder::Spiral
            } else {
                TileOrder::Scanline
            },
            seed: self.seed,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vec3() {
        assert_eq!(parse_vec3("0,1,5"), Ok(Vec3::new(0.0, 1.0, 5.0)));
        assert_eq!(parse_vec3(" -1.5, 2 ,3e1"), Ok(Vec3::new(-1.5, 2.0, 30.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,3,4").is_err());
        assert!(parse_vec3("1,two,3").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ember"]).unwrap();

        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("render.bmp"));
        assert_eq!((args.width, args.height), (800, 800));
        assert_eq!(args.camera, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(args.look_at, Vec3::ZERO);

        let config = args.render_config();
        assert_eq!(config.samples_per_pixel, 64);
        assert_eq!(config.max_bounces, 32);
        assert_eq!(config.tile_order, TileOrder::Scanline);
        assert!(config.thread_count >= 1);
    }

    #[test]
    fn test_render_flags() {
        let args = Args::try_parse_from([
            "ember", "--samples", "16", "-b", "8", "--tile-size", "32", "-t", "3", "--seed",
            "7", "--spiral", "--camera", "-2,1,4", "--width", "320",
        ])
        .unwrap();

        assert_eq!(args.camera, Vec3::new(-2.0, 1.0, 4.0));
        assert_eq!(args.width, 320);

        let config = args.render_config();
        assert_eq!(config.samples_per_pixel, 16);
        assert_eq!(config.max_bounces, 8);
        assert_eq!(config.tile_size, Some(32));
        assert_eq!(config.thread_count, 3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.tile_order, TileOrder::Spiral);
    }

    #[test]
    fn test_bad_vector_rejected() {
        assert!(Args::try_parse_from(["ember", "--camera", "1,2"]).is_err());
    }
}
