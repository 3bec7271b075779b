//! Velocity integration.

use crate::component::{Body, Component};
use crate::error::ComponentError;

/// Moves the body by `velocity · dt` every update, optionally clamping the
/// speed first.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematic {
    max_speed: Option<f32>,
}

impl Kinematic {
    /// Integrate velocity, clamping its length to `max_speed`.
    #[must_use]
    pub fn with_max_speed(max_speed: f32) -> Self {
        Self {
            max_speed: Some(max_speed),
        }
    }

    #[must_use]
    pub fn max_speed(&self) -> Option<f32> {
        self.max_speed
    }
}

impl Component for Kinematic {
    fn type_name(&self) -> &'static str {
        "kinematic"
    }

    fn update(&mut self, body: &mut Body, dt: f32) -> Result<(), ComponentError> {
        if let Some(max_speed) = self.max_speed {
            body.velocity = body.velocity.clamp_length_max(max_speed);
        }
        body.transform.translation += body.velocity * dt;

        if !body.transform.translation.is_finite() {
            return Err(ComponentError::NonFinite {
                component: "kinematic",
                quantity: "translation",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_math::Vec2;

    use super::*;

    #[test]
    fn test_integrates_velocity() {
        let mut body = Body::default();
        body.velocity = Vec2::new(2.0, -1.0);
        Kinematic::default().update(&mut body, 0.5).unwrap();
        assert_eq!(body.transform.translation, Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_clamps_speed() {
        let mut body = Body::default();
        body.velocity = Vec2::new(10.0, 0.0);
        Kinematic::with_max_speed(4.0).update(&mut body, 1.0).unwrap();
        assert_eq!(body.velocity, Vec2::new(4.0, 0.0));
        assert_eq!(body.transform.translation, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_non_finite_translation_is_an_error() {
        let mut body = Body::default();
        body.velocity = Vec2::new(f32::NAN, 0.0);
        let err = Kinematic::default().update(&mut body, 1.0).unwrap_err();
        assert!(matches!(err, ComponentError::NonFinite { component: "kinematic", .. }));
    }
}
