//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use winit::dpi::LogicalSize;

use pyramid_engine::logging::LoggingConfig;
use pyramid_engine::window::RuntimeConfig;

use crate::config::{TextureSource, ViewerConfig};
use crate::frame::{MovementKeys, DEFAULT_MOVEMENT_SPEED};
use crate::kernel::KernelPreset;

#[derive(Debug, Parser)]
#[command(name = "pyramid-viewer", version, about = "Rotating textured pyramid")]
pub struct Cli {
    /// Image file (PNG/JPEG/BMP) for the pyramid's faces; defaults to a checkerboard
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,

    /// Convolution kernel pushed to the shaders
    /// (normal, gaussianBlur, sharpen, edgeDetect, emboss, boxBlur)
    #[arg(long, default_value = "normal")]
    pub kernel: KernelPreset,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Offset added per held key per frame
    #[arg(long, default_value_t = DEFAULT_MOVEMENT_SPEED)]
    pub speed: f32,

    /// Move with the arrow keys instead of H/J/K/L
    #[arg(long)]
    pub arrow_keys: bool,

    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..Default::default()
        }
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
            ..Default::default()
        }
    }

    pub fn viewer(&self) -> ViewerConfig {
        ViewerConfig {
            speed: self.speed,
            keys: if self.arrow_keys {
                MovementKeys::ARROWS
            } else {
                MovementKeys::VI
            },
            kernel: self.kernel,
            texture: match &self.texture {
                Some(path) => TextureSource::File(path.clone()),
                None => TextureSource::Checkerboard,
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pyramid-viewer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        let viewer = cli.viewer();
        assert_eq!(viewer.kernel, KernelPreset::Normal);
        assert_eq!(viewer.keys, MovementKeys::VI);
        assert_eq!(viewer.speed, 0.01);
        assert_eq!(viewer.texture, TextureSource::Checkerboard);

        let runtime = cli.runtime();
        assert_eq!(runtime.title, "pyramid");
        assert_eq!(runtime.initial_size, LogicalSize::new(1280.0, 720.0));
        assert!(cli.logging().env_filter.is_none());
    }

    #[test]
    fn flags_map_onto_configs() {
        let cli = parse(&[
            "--texture",
            "stone.png",
            "--kernel",
            "edgeDetect",
            "--width",
            "800",
            "--height",
            "600",
            "--speed",
            "0.05",
            "--arrow-keys",
            "--log",
            "debug",
        ]);
        let viewer = cli.viewer();
        assert_eq!(viewer.kernel, KernelPreset::EdgeDetect);
        assert_eq!(viewer.keys, MovementKeys::ARROWS);
        assert_eq!(viewer.speed, 0.05);
        assert_eq!(viewer.texture, TextureSource::File("stone.png".into()));
        assert_eq!(cli.runtime().initial_size, LogicalSize::new(800.0, 600.0));
        assert_eq!(cli.logging().env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn rejects_unknown_kernel() {
        let args = ["pyramid-viewer", "--kernel", "blurry"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn rejects_zero_size() {
        let args = ["pyramid-viewer", "--width", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
