/// Snapshot of the keys that drive the scene; filled by the platform layer each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    /// Space: freeze the model spin.
    pub pause_spin: bool,
    pub light_left: bool,
    pub light_right: bool,
    pub light_up: bool,
    pub light_down: bool,
    pub light_forward: bool,
    pub light_back: bool,
    pub radius_grow: bool,
    pub radius_shrink: bool,
    pub model_up: bool,
    pub model_down: bool,
    pub cam_pitch_up: bool,
    pub cam_pitch_down: bool,
    pub cam_yaw_left: bool,
    pub cam_yaw_right: bool,
    pub fov_wider: bool,
    pub fov_narrower: bool,
}

/// `+1` if only `pos` is held, `-1` if only `neg`, otherwise 0.
#[inline]
pub fn axis(pos: bool, neg: bool) -> f32 {
    f32::from(u8::from(pos)) - f32::from(u8::from(neg))
}
