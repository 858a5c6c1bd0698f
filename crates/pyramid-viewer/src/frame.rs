//! Per-frame scene state and its update step.
//!
//! `update` touches nothing but the [`FrameContext`] it is given, so the
//! whole per-tick algorithm runs in tests without a window or GPU.

use glam::{Mat4, Vec2};

use pyramid_engine::coords::Resolution;
use pyramid_engine::input::{InputSnapshot, Key};

use crate::transform::model_view;

/// Offset added per held key per frame.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 0.01;

/// Keys that move the pyramid's screen offset.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MovementKeys {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl MovementKeys {
    /// H/L/K/J.
    pub const VI: Self = Self {
        left: Key::H,
        right: Key::L,
        up: Key::K,
        down: Key::J,
    };

    pub const ARROWS: Self = Self {
        left: Key::ArrowLeft,
        right: Key::ArrowRight,
        up: Key::ArrowUp,
        down: Key::ArrowDown,
    };

    /// Direction of travel for the current key set; opposing keys cancel.
    pub fn direction(&self, input: &InputSnapshot) -> Vec2 {
        let axis = |neg: Key, pos: Key| {
            let mut v = 0.0;
            if input.key_down(neg) {
                v -= 1.0;
            }
            if input.key_down(pos) {
                v += 1.0;
            }
            v
        };
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up))
    }
}

impl Default for MovementKeys {
    fn default() -> Self {
        Self::VI
    }
}

/// Fixed inputs of the update step.
#[derive(Debug, Copy, Clone)]
pub struct UpdateParams {
    pub resolution: Resolution,
    pub keys: MovementKeys,
    pub speed: f32,
}

/// Scene state owned by the frame loop.
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// Screen-space offset pushed as `uPos`.
    pub pos: Vec2,
    /// Seconds since the loop started running, pushed as `uTime`.
    pub elapsed: f32,
    /// Normalized pointer pushed as `uMouse`.
    pub mouse: Vec2,
    pub projection: Mat4,
    pub model_view: Mat4,
}

impl FrameContext {
    pub fn new(projection: Mat4) -> Self {
        Self {
            pos: Vec2::ZERO,
            elapsed: 0.0,
            mouse: Vec2::ZERO,
            projection,
            model_view: Mat4::IDENTITY,
        }
    }
}

/// One tick: record time, move by held keys, normalize the pointer and
/// rebuild the model-view matrix. The projection is never touched.
pub fn update(ctx: &mut FrameContext, input: &InputSnapshot, elapsed: f32, params: &UpdateParams) {
    ctx.elapsed = elapsed;

    ctx.pos += params.keys.direction(input) * params.speed;

    let (x, y) = input.pointer();
    ctx.mouse = Vec2::from(params.resolution.normalize_pointer(x, y));

    ctx.model_view = model_view(elapsed);
}
