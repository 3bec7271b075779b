//! Constant acceleration applied to an entity's velocity.

use engine_math::Vec2;

use crate::component::{Body, Component};
use crate::error::ComponentError;

/// Standard downward acceleration in world units per second squared.
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.8);

/// Adds `acceleration · dt` to the body's velocity every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    acceleration: Vec2,
    enabled: bool,
}

impl Gravity {
    /// Gravity pulling along `acceleration`.
    #[must_use]
    pub fn new(acceleration: Vec2) -> Self {
        Self {
            acceleration,
            enabled: true,
        }
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    #[must_use]
    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl Component for Gravity {
    fn type_name(&self) -> &'static str {
        "gravity"
    }

    fn update(&mut self, body: &mut Body, dt: f32) -> Result<(), ComponentError> {
        if !self.enabled {
            return Ok(());
        }
        body.velocity += self.acceleration * dt;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pulls_down() {
        let mut body = Body::default();
        let mut gravity = Gravity::default();
        gravity.update(&mut body, 1.0).unwrap();
        assert_eq!(body.velocity, DEFAULT_GRAVITY);
    }

    #[test]
    fn test_custom_acceleration_scales_with_dt() {
        let mut body = Body::default();
        body.velocity = Vec2::new(1.0, 0.0);
        let mut gravity = Gravity::new(Vec2::new(2.0, 4.0));
        gravity.update(&mut body, 0.25).unwrap();
        assert_eq!(body.velocity, Vec2::new(1.5, 1.0));
    }

    #[test]
    fn test_disabled_gravity_does_nothing() {
        let mut body = Body::default();
        let mut gravity = Gravity::default();
        gravity.set_enabled(false);
        gravity.update(&mut body, 1.0).unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);

        gravity.set_enabled(true);
        gravity.set_acceleration(Vec2::new(0.0, 1.0));
        gravity.update(&mut body, 1.0).unwrap();
        assert_eq!(body.velocity, Vec2::new(0.0, 1.0));
        assert_eq!(gravity.acceleration(), Vec2::new(0.0, 1.0));
    }
}
