/// Drawing-surface resolution in logical pixels.
///
/// Invariant: both dimensions are positive. Captured once at startup and never
/// changed afterwards, even if the window is resized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Returns `None` if either dimension is zero.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// Width over height.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Resolution as a float pair, as uploaded to shaders.
    #[inline]
    pub fn as_f32(self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Maps a pointer position to `[-0.5, 0.5]` on both axes, +Y up.
    ///
    /// `(0, 0)` (top-left) maps to `(-0.5, 0.5)`; the bottom-right corner to `(0.5, -0.5)`.
    #[inline]
    pub fn normalize_pointer(self, x: f32, y: f32) -> [f32; 2] {
        let [w, h] = self.as_f32();
        [x / w - 0.5, 0.5 - y / h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(w: u32, h: u32) -> Resolution {
        Resolution::new(w, h).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn zero_dimension_rejected() {
        assert!(Resolution::new(0, 600).is_none());
        assert!(Resolution::new(800, 0).is_none());
    }

    #[test]
    fn aspect_is_width_over_height() {
        assert_eq!(res(800, 400).aspect(), 2.0);
    }

    // ── pointer normalization ─────────────────────────────────────────────

    #[test]
    fn top_left_maps_to_minus_half_plus_half() {
        assert_eq!(res(800, 600).normalize_pointer(0.0, 0.0), [-0.5, 0.5]);
    }

    #[test]
    fn bottom_right_maps_to_plus_half_minus_half() {
        assert_eq!(res(800, 600).normalize_pointer(800.0, 600.0), [0.5, -0.5]);
    }

    #[test]
    fn center_maps_to_origin() {
        assert_eq!(res(800, 600).normalize_pointer(400.0, 300.0), [0.0, 0.0]);
    }
}
