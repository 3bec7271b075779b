//! Jump counting with ground-contact reset.

use engine_math::Vec2;

use crate::component::{Body, Component, Contact, ContactSource};
use crate::error::ComponentError;
use crate::interaction::InteractionType;

/// Tracks how many jumps were made since the entity last touched a
/// jump-reset surface.
///
/// Ground contact is reported by a [`jumper_sensor`](crate::sensors::jumper_sensor)
/// on the same entity. Walking off a ledge without jumping costs one jump,
/// so a single-jump entity cannot jump in mid-air after falling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jumper {
    jump_count: u32,
    max_jumps: u32,
    was_grounded: bool,
    grounded: bool,
}

impl Jumper {
    /// A jumper allowed `max_jumps` jumps between ground contacts.
    #[must_use]
    pub fn new(max_jumps: u32) -> Self {
        Self {
            jump_count: 0,
            max_jumps,
            was_grounded: false,
            grounded: false,
        }
    }

    /// Returns `desired` if a jump is allowed (counting it), otherwise zero.
    pub fn try_jump(&mut self, desired: Vec2) -> Vec2 {
        if !self.can_jump() {
            return Vec2::ZERO;
        }
        self.jump_count += 1;
        desired
    }

    #[must_use]
    pub fn jump_count(&self) -> u32 {
        self.jump_count
    }

    #[must_use]
    pub fn max_jumps(&self) -> u32 {
        self.max_jumps
    }

    #[must_use]
    pub fn can_jump(&self) -> bool {
        self.jump_count < self.max_jumps
    }

    /// Returns `true` if ground contact was reported since the last update.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn reset_jumps(&mut self) {
        self.jump_count = 0;
    }

    pub fn set_max_jumps(&mut self, max_jumps: u32) {
        self.max_jumps = max_jumps;
    }
}

impl Default for Jumper {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Component for Jumper {
    fn type_name(&self) -> &'static str {
        "jumper"
    }

    fn update(&mut self, _body: &mut Body, _dt: f32) -> Result<(), ComponentError> {
        // Left the ground without jumping.
        if self.was_grounded && !self.grounded && self.jump_count == 0 {
            self.jump_count += 1;
        }
        self.was_grounded = self.grounded;
        self.grounded = false;
        Ok(())
    }

    fn on_contact(&mut self, contact: &Contact) {
        if contact.source == ContactSource::Collider(InteractionType::Jumper) {
            self.grounded = true;
            self.reset_jumps();
        }
    }
}
