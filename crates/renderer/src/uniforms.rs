//! Uniform blocks shared with `data/vertex.wgsl` and `data/frag.wgsl`.

use bytemuck::{Pod, Zeroable};
use corelib::scene::Scene;

/// Per-frame block (group 0, binding 0). Layout mirrors the WGSL `Frame` struct.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    pub light_radius: f32,
    pub screen_size: [f32; 2],
    pub _pad: [f32; 2],
}

impl FrameUniform {
    /// `screen_size` is the plane the dither volume was generated for.
    pub fn new(scene: &Scene, screen_size: [f32; 2]) -> Self {
        Self {
            proj: scene.camera.proj().to_cols_array_2d(),
            view: scene.camera.view.to_cols_array_2d(),
            light_pos: scene.light.position.to_array(),
            light_radius: scene.light.radius,
            screen_size,
            _pad: [0.0; 2],
        }
    }
}

/// Per-draw block (group 1, binding 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn new(model: glam::Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn frame_layout_matches_wgsl() {
        assert_eq!(size_of::<FrameUniform>(), 160);
        assert_eq!(offset_of!(FrameUniform, light_pos), 128);
        assert_eq!(offset_of!(FrameUniform, light_radius), 140);
        assert_eq!(offset_of!(FrameUniform, screen_size), 144);
        assert_eq!(size_of::<ObjectUniform>(), 64);
    }

    #[test]
    fn frame_carries_scene_light() {
        let scene = Scene::default();
        let u = FrameUniform::new(&scene, [800.0, 600.0]);
        assert_eq!(u.light_pos, [5.0, 3.0, 1.0]);
        assert_eq!(u.light_radius, 5.0);
        assert_eq!(u.screen_size, [800.0, 600.0]);
    }
}
