//! Purpose-specific sensor colliders.
//!
//! Every sensor is a non-collidable box; the presets below only differ in
//! their interaction tag and callback.

use crate::collider::Collider;
use crate::entity::EntityId;
use crate::interaction::InteractionType;

/// A box that deals damage to the hurt boxes it touches.
#[must_use]
pub fn hit_box() -> Collider {
    Collider::sensor(InteractionType::HitBox)
}

/// A box that receives damage; `on_hurt` is called with the hitting entity.
#[must_use]
pub fn hurt_box(on_hurt: impl FnMut(EntityId) + 'static) -> Collider {
    Collider::sensor(InteractionType::HurtBox).with_callback(on_hurt)
}

/// Ground contact surface; touching jumper sensors get their jumps back.
#[must_use]
pub fn jump_reset() -> Collider {
    Collider::sensor(InteractionType::JumpReset)
}

/// A jumper's ground sensor. Contacts it records are delivered to the
/// entity's [`Jumper`](crate::jumper::Jumper) component.
#[must_use]
pub fn jumper_sensor() -> Collider {
    Collider::sensor(InteractionType::Jumper)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::collider::ColliderBehavior;

    #[test]
    fn test_presets_are_sensors() {
        for sensor in [hit_box(), hurt_box(|_| {}), jump_reset(), jumper_sensor()] {
            assert_eq!(sensor.behavior(), ColliderBehavior::NonCollidable);
        }
    }

    #[test]
    fn test_presets_pair_up() {
        assert!(hit_box().interacts_with(&hurt_box(|_| {})));
        assert!(jump_reset().interacts_with(&jumper_sensor()));
        assert!(!hit_box().interacts_with(&jump_reset()));
        assert!(!jumper_sensor().interacts_with(&Collider::solid()));
    }

    #[test]
    fn test_hurt_box_invokes_callback() {
        let hurt = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hurt);
        let mut sensor = hurt_box(move |_| counter.set(counter.get() + 1));
        sensor.fire_callback(EntityId::new(1, 0));
        sensor.fire_callback(EntityId::new(2, 0));
        assert_eq!(hurt.get(), 2);
    }
}
