use crate::{Mat4, Vec3};

/// Radius the flame sprite is modelled at; it is scaled by `radius / FLAME_BASE_RADIUS`.
pub const FLAME_BASE_RADIUS: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub radius: f32,
}

impl PointLight {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    pub fn grow(&mut self, amount: f32) {
        self.radius = (self.radius + amount).max(0.0);
    }

    /// Model matrix for the flame sprite marking this light.
    pub fn flame_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.radius / FLAME_BASE_RADIUS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn flame_scales_with_radius() {
        let light = PointLight::new(vec3(5.0, 3.0, 1.0), 10.0);
        let m = light.flame_matrix();
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(light.position, 1e-6));
        assert!(m.transform_vector3(Vec3::X).abs_diff_eq(vec3(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn radius_never_goes_negative() {
        let mut light = PointLight::new(Vec3::ZERO, 0.5);
        light.grow(-2.0);
        assert_eq!(light.radius, 0.0);
    }
}
