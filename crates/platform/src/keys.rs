//! Held-key tracking and the key bindings that drive the scene.

use std::collections::HashSet;

use corelib::controls::Controls;
use winit::keyboard::KeyCode;

/// Keys currently pressed, updated from keyboard events.
#[derive(Debug, Default)]
pub struct HeldKeys {
    held: HashSet<KeyCode>,
}

impl HeldKeys {
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Drop everything, e.g. when the window loses focus and releases go unseen.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn controls(&self) -> Controls {
        let k = |key| self.is_held(key);
        Controls {
            pause_spin: k(KeyCode::Space),
            light_left: k(KeyCode::ArrowLeft),
            light_right: k(KeyCode::ArrowRight),
            light_up: k(KeyCode::ArrowUp),
            light_down: k(KeyCode::ArrowDown),
            light_forward: k(KeyCode::KeyW),
            light_back: k(KeyCode::KeyS),
            radius_grow: k(KeyCode::KeyD),
            radius_shrink: k(KeyCode::KeyA),
            model_up: k(KeyCode::KeyR),
            model_down: k(KeyCode::KeyF),
            cam_pitch_up: k(KeyCode::Numpad8),
            cam_pitch_down: k(KeyCode::Numpad2),
            cam_yaw_left: k(KeyCode::Numpad4),
            cam_yaw_right: k(KeyCode::Numpad6),
            fov_wider: k(KeyCode::PageUp),
            fov_narrower: k(KeyCode::PageDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_held_is_default_controls() {
        assert_eq!(HeldKeys::default().controls(), Controls::default());
    }

    #[test]
    fn press_and_release() {
        let mut keys = HeldKeys::default();
        keys.set(KeyCode::ArrowLeft, true);
        keys.set(KeyCode::Space, true);
        let c = keys.controls();
        assert!(c.light_left && c.pause_spin);
        assert!(!c.light_right);

        keys.set(KeyCode::ArrowLeft, false);
        assert!(!keys.controls().light_left);
        keys.clear();
        assert_eq!(keys.controls(), Controls::default());
    }

    #[test]
    fn numpad_drives_camera() {
        let mut keys = HeldKeys::default();
        keys.set(KeyCode::Numpad8, true);
        keys.set(KeyCode::Numpad6, true);
        let c = keys.controls();
        assert!(c.cam_pitch_up && c.cam_yaw_right);
    }
}
