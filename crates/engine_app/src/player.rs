//! Demo behaviors used by the built-in scenes.

use engine_component::{Collider, Color, DrawRectangle, Gravity, Jumper, Kinematic, Label, sensors};
use engine_math::{Transform2D, Vec2};
use engine_world::{Behavior, Entity, EntityContext, Key, WorldError};
use tracing::debug;

/// A platformer character steered with the arrow keys; space or up jumps.
#[derive(Debug, Clone)]
pub struct Player {
    speed: f32,
    jump_speed: f32,
    left: bool,
    right: bool,
    jump_requested: bool,
}

impl Player {
    #[must_use]
    pub fn new(speed: f32, jump_speed: f32) -> Self {
        Self {
            speed,
            jump_speed,
            left: false,
            right: false,
            jump_requested: false,
        }
    }

    /// A player entity with its body, ground sensor and physics components.
    #[must_use]
    pub fn entity(self, spawn: Vec2, size: Vec2, max_jumps: u32) -> Entity {
        // Thin sensor along the bottom edge, poking slightly below the body.
        let feet = Transform2D::from_translation_and_scale(Vec2::new(0.0, -1.0), Vec2::new(0.9, 0.1));
        Entity::with_behavior_of(self)
            .with_transform(Transform2D::rectangle(spawn, size))
            .with_z_level(2)
            .with_component(Jumper::new(max_jumps))
            .with_component(Gravity::default())
            .with_component(Kinematic::default())
            .with_component(Collider::solid())
            .with_component(sensors::jumper_sensor().with_local_transform(feet))
            .with_component(DrawRectangle::new(Color::GREEN))
    }

    fn direction(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    fn set_key(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Up | Key::Space => self.jump_requested = pressed,
            _ => return true,
        }
        false
    }
}

impl Behavior for Player {
    fn type_name(&self) -> &'static str {
        "player"
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, _dt: f32) -> Result<(), WorldError> {
        let id = ctx.id();
        let mut velocity = ctx.velocity();
        velocity.x = self.direction() * self.speed;

        if self.jump_requested {
            self.jump_requested = false;
            if let Some(jumper) = ctx.component_mut::<Jumper>() {
                let jump = jumper.try_jump(Vec2::new(0.0, self.jump_speed));
                if jump != Vec2::ZERO {
                    debug!(entity = %id, jumps = jumper.jump_count(), "jump");
                    velocity.y = jump.y;
                }
            }
        }

        ctx.set_velocity(velocity);
        Ok(())
    }

    fn late_update(&mut self, ctx: &mut EntityContext<'_>) -> Result<(), WorldError> {
        // Standing on something: stop falling.
        let grounded = ctx.component::<Jumper>().is_some_and(Jumper::is_grounded);
        if grounded && ctx.velocity().y < 0.0 {
            ctx.body_mut().velocity.y = 0.0;
        }
        Ok(())
    }

    fn on_key_press(&mut self, _ctx: &mut EntityContext<'_>, key: Key) -> Result<bool, WorldError> {
        Ok(self.set_key(key, true))
    }

    fn on_key_release(&mut self, _ctx: &mut EntityContext<'_>, key: Key) -> Result<bool, WorldError> {
        // Releasing the jump key must not cancel a jump requested this frame.
        if matches!(key, Key::Up | Key::Space) {
            return Ok(false);
        }
        Ok(self.set_key(key, false))
    }
}

/// A static platform whose top resets jumps.
#[must_use]
pub fn platform(center: Vec2, size: Vec2, color: Color) -> Entity {
    Entity::new("platform")
        .with_transform(Transform2D::rectangle(center, size))
        .with_component(Collider::static_body())
        .with_component(sensors::jump_reset())
        .with_component(DrawRectangle::new(color))
}

/// A pushable solid box.
#[must_use]
pub fn pushable(center: Vec2, size: Vec2) -> Entity {
    Entity::new("crate")
        .with_transform(Transform2D::rectangle(center, size))
        .with_z_level(1)
        .with_component(Collider::solid())
        .with_component(DrawRectangle::new(Color::rgb(150, 100, 50)))
}

/// A text label drawn above everything else.
#[must_use]
pub fn title(text: &str, position: Vec2) -> Entity {
    Entity::new("title")
        .with_transform(Transform2D::from_translation(position))
        .with_z_level(engine_world::MAX_Z_LEVEL)
        .with_component(Label::new(text, 14.0, Color::WHITE))
}
