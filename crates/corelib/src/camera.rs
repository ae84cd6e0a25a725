use crate::{Mat4, Vec3};

pub const MIN_FOV_Y_DEG: f32 = 1.0;
pub const MAX_FOV_Y_DEG: f32 = 179.0;

/// Perspective camera driven directly by its view matrix (right-handed).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub view: Mat4,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new_perspective(view: Mat4, fov_y_deg: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            view,
            fov_y_deg,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Projection with depth in [0,1], as wgpu expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    /// Rotate the view about its local X axis.
    #[inline]
    pub fn pitch(&mut self, angle: f32) {
        self.view *= Mat4::from_axis_angle(Vec3::X, angle);
    }

    /// Rotate the view about its local Y axis.
    #[inline]
    pub fn yaw(&mut self, angle: f32) {
        self.view *= Mat4::from_axis_angle(Vec3::Y, angle);
    }

    pub fn zoom(&mut self, delta_deg: f32) {
        self.fov_y_deg = (self.fov_y_deg + delta_deg).clamp(MIN_FOV_Y_DEG, MAX_FOV_Y_DEG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::new_perspective(Mat4::IDENTITY, 90.0, 1.0, 0.1, 10.0);
        cam.zoom(500.0);
        assert_eq!(cam.fov_y_deg, MAX_FOV_Y_DEG);
        cam.zoom(-500.0);
        assert_eq!(cam.fov_y_deg, MIN_FOV_Y_DEG);
    }

    #[test]
    fn pitch_then_reverse_is_identity() {
        let mut cam = Camera::new_perspective(Mat4::IDENTITY, 90.0, 1.0, 0.1, 10.0);
        cam.pitch(0.3);
        cam.pitch(-0.3);
        assert!(cam.view.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }
}
