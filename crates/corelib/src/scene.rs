//! The single hard-coded scene: a spinning model lit by one movable point light.

use crate::{
    Mat4, Vec3,
    camera::Camera,
    controls::{Controls, axis},
    light::PointLight,
    vec3,
};

/// Light travel speed, units per second.
pub const LIGHT_SPEED: f32 = 2.0;

#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub camera: Camera,
    pub model: Mat4,
    pub light: PointLight,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::new_perspective(
                Mat4::from_translation(vec3(0.0, -2.0, -6.0)),
                90.0,
                4.0 / 3.0,
                0.01,
                100.0,
            ),
            model: Mat4::IDENTITY,
            light: PointLight::new(vec3(5.0, 3.0, 1.0), 5.0),
        }
    }
}

impl Scene {
    /// Advance by `dt` seconds under the held `controls`.
    pub fn update(&mut self, dt: f32, controls: &Controls) {
        if !controls.pause_spin {
            self.model *= Mat4::from_axis_angle(Vec3::Y, dt);
        }

        let step = dt * LIGHT_SPEED;
        self.light.position += vec3(
            axis(controls.light_right, controls.light_left),
            axis(controls.light_up, controls.light_down),
            axis(controls.light_forward, controls.light_back),
        ) * step;
        self.light
            .grow(axis(controls.radius_grow, controls.radius_shrink) * dt);

        let lift = axis(controls.model_up, controls.model_down) * dt;
        if lift != 0.0 {
            self.model *= Mat4::from_translation(vec3(0.0, lift, 0.0));
        }

        let pitch = axis(controls.cam_pitch_up, controls.cam_pitch_down) * dt;
        if pitch != 0.0 {
            self.camera.pitch(pitch);
        }
        let yaw = axis(controls.cam_yaw_right, controls.cam_yaw_left) * dt;
        if yaw != 0.0 {
            self.camera.yaw(yaw);
        }

        let zoom = axis(controls.fov_wider, controls.fov_narrower) * dt;
        if zoom != 0.0 {
            self.camera.zoom(zoom);
        }
    }

    #[inline]
    pub fn flame_matrix(&self) -> Mat4 {
        self.light.flame_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_update_only_spins_model() {
        let mut scene = Scene::default();
        let before = scene;
        scene.update(0.5, &Controls::default());
        assert_eq!(scene.light, before.light);
        assert!(!scene.model.abs_diff_eq(before.model, 1e-6));
        let spun = scene.model.transform_vector3(Vec3::X);
        assert!(spun.abs_diff_eq(vec3(0.5f32.cos(), 0.0, -(0.5f32.sin())), 1e-5));
    }

    #[test]
    fn space_freezes_spin() {
        let mut scene = Scene::default();
        let controls = Controls {
            pause_spin: true,
            ..Default::default()
        };
        scene.update(1.0, &controls);
        assert_eq!(scene.model, Mat4::IDENTITY);
    }

    #[test]
    fn light_moves_at_twice_dt() {
        let mut scene = Scene::default();
        let controls = Controls {
            light_left: true,
            light_up: true,
            light_forward: true,
            ..Default::default()
        };
        scene.update(0.25, &controls);
        assert!(
            scene
                .light
                .position
                .abs_diff_eq(vec3(4.5, 3.5, 1.5), 1e-6)
        );
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut scene = Scene::default();
        let controls = Controls {
            pause_spin: true,
            light_left: true,
            light_right: true,
            radius_grow: true,
            radius_shrink: true,
            ..Default::default()
        };
        scene.update(1.0, &controls);
        assert_eq!(scene.light, Scene::default().light);
    }

    #[test]
    fn radius_and_fov_follow_dt() {
        let mut scene = Scene::default();
        let controls = Controls {
            radius_grow: true,
            fov_wider: true,
            ..Default::default()
        };
        scene.update(0.5, &controls);
        assert!((scene.light.radius - 5.5).abs() < 1e-6);
        assert!((scene.camera.fov_y_deg - 90.5).abs() < 1e-6);
    }

    #[test]
    fn model_lifts_along_local_y() {
        let mut scene = Scene::default();
        let controls = Controls {
            pause_spin: true,
            model_up: true,
            ..Default::default()
        };
        scene.update(0.5, &controls);
        let origin = scene.model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(vec3(0.0, 0.5, 0.0), 1e-6));
    }
}
