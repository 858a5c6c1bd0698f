//! Projection and model-view matrices.
//!
//! Depth maps to wgpu's 0..1 clip range (`perspective_rh`), not GL's -1..1.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Distance from the eye to the pyramid's centre.
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Perspective parameters. The matrix is built once at startup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Model-view at `elapsed` seconds: translate back, then spin half a turn per
/// second about X and Y. Always rebuilt from identity.
pub fn model_view(elapsed: f32) -> Mat4 {
    let angle = elapsed * PI;
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
        * Mat4::from_rotation_x(angle)
        * Mat4::from_rotation_y(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    // ── model-view ────────────────────────────────────────────────────────

    #[test]
    fn model_view_at_zero_is_pure_translation() {
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        assert!(approx(model_view(0.0), expected));
    }

    #[test]
    fn model_view_after_one_second_is_half_turn() {
        // Rx(π)·Ry(π) is a half turn about Z.
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0))
            * Mat4::from_rotation_z(PI);
        assert!(approx(model_view(1.0), expected));
    }

    #[test]
    fn model_view_keeps_pyramid_centre_in_front_of_camera() {
        for t in [0.0, 0.3, 1.7, 42.0] {
            let centre = model_view(t).transform_point3(Vec3::ZERO);
            assert!((centre - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
        }
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_defaults() {
        let p = Projection::default();
        assert_eq!(p.fov_y_degrees, 45.0);
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 100.0);
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth_range() {
        let m = Projection::default().matrix(800.0 / 600.0);
        let near = m.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn projection_scales_x_by_aspect() {
        let m = Projection::default().matrix(2.0);
        let focal = 1.0 / (22.5_f32.to_radians()).tan();
        assert!((m.y_axis.y - focal).abs() < 1e-5);
        assert!((m.x_axis.x - focal / 2.0).abs() < 1e-5);
    }
}
