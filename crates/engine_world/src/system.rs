//! Whole-world passes run once per frame.

use crate::behavior::AsAny;
use crate::error::WorldError;
use crate::game_state::GameState;

/// A pass over the whole store, run after every entity has updated and
/// before any entity late-updates.
///
/// Systems run in registration order.
pub trait System: AsAny + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn update(&mut self, state: &mut GameState, dt: f32) -> Result<(), WorldError>;
}
