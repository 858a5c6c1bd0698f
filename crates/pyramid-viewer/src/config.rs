use std::path::PathBuf;

use pyramid_engine::render::Color;

use crate::frame::{MovementKeys, DEFAULT_MOVEMENT_SPEED};
use crate::kernel::KernelPreset;
use crate::transform::Projection;

/// Where the pyramid's texture comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TextureSource {
    /// Procedural checkerboard.
    #[default]
    Checkerboard,
    /// Image file decoded at startup; falls back to the checkerboard on error.
    File(PathBuf),
}

/// Viewer settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub speed: f32,
    pub keys: MovementKeys,
    pub kernel: KernelPreset,
    pub texture: TextureSource,
    pub projection: Projection,
    pub clear_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVEMENT_SPEED,
            keys: MovementKeys::VI,
            kernel: KernelPreset::Normal,
            texture: TextureSource::Checkerboard,
            projection: Projection::default(),
            clear_color: Color::BLACK,
        }
    }
}
