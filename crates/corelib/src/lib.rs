//! Core types: math re-exports, Camera, PointLight, Scene.
//! Renderer-agnostic; the platform layer feeds `Controls` in, the renderer reads matrices out.

pub use glam::{Mat4, Vec3, vec3};

pub mod camera;
pub mod controls;
pub mod light;
pub mod scene;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_proj_is_finite() {
        let cam = camera::Camera::new_perspective(
            Mat4::from_translation(vec3(0.0, -2.0, -6.0)),
            90.0,
            4.0 / 3.0,
            0.01,
            100.0,
        );
        let a = cam.proj().to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn default_scene_sits_in_front_of_camera() {
        let scene = scene::Scene::default();
        let origin = scene.camera.view.transform_point3(Vec3::ZERO);
        assert!((origin - vec3(0.0, -2.0, -6.0)).length() < 1e-6);
    }
}
