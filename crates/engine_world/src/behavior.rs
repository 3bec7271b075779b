//! Entity-specific logic.
//!
//! Components are reusable capabilities; a [`Behavior`] is the one piece of
//! logic that makes an entity *this* kind of entity (a player, a button, a
//! spawner). Every hook receives an [`EntityContext`] giving access to the
//! entity's own body and components, and a [`Commands`] queue for
//! structural changes that the store applies once the hook returns.

use std::any::Any;

use engine_component::{Body, ComponentError, ComponentKind, ComponentVariant, Contact, EntityId, Surface};
use engine_math::{Transform2D, Vec2};

use crate::commands::Commands;
use crate::error::WorldError;
use crate::event::{Key, MouseButton};

/// Dynamic downcasting support for trait objects.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Entity-specific logic attached to an [`Entity`](crate::Entity).
///
/// Input handlers return `Ok(true)` to let the event propagate to the next
/// entity and `Ok(false)` to consume it.
pub trait Behavior: AsAny + 'static {
    /// The entity type this behavior implements; used for lookups by type.
    fn type_name(&self) -> &'static str;

    /// Second construction phase, run once the entity has an id.
    fn init(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    /// Runs before the entity's components update.
    fn update(&mut self, _ctx: &mut EntityContext<'_>, _dt: f32) -> Result<(), WorldError> {
        Ok(())
    }

    /// Runs after the entity's components have applied deferred work.
    fn late_update(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), WorldError> {
        Ok(())
    }

    /// A detector on this entity touched another entity this frame.
    fn on_contact(&mut self, _ctx: &mut EntityContext<'_>, _contact: &Contact) -> Result<(), WorldError> {
        Ok(())
    }

    /// Drawn before the entity's components.
    fn draw(&self, _body: &Body, _surface: &mut dyn Surface) -> Result<(), ComponentError> {
        Ok(())
    }

    /// A mouse button was released inside the entity's rectangle.
    fn on_click(
        &mut self,
        _ctx: &mut EntityContext<'_>,
        _button: MouseButton,
        _position: Vec2,
    ) -> Result<bool, WorldError> {
        Ok(true)
    }

    fn on_key_press(&mut self, _ctx: &mut EntityContext<'_>, _key: Key) -> Result<bool, WorldError> {
        Ok(true)
    }

    fn on_key_release(&mut self, _ctx: &mut EntityContext<'_>, _key: Key) -> Result<bool, WorldError> {
        Ok(true)
    }
}

/// Downcast a behavior trait object to its concrete type.
pub(crate) fn downcast_ref<B: Behavior>(behavior: &dyn Behavior) -> Option<&B> {
    behavior.as_any().downcast_ref::<B>()
}

pub(crate) fn downcast_mut<B: Behavior>(behavior: &mut dyn Behavior) -> Option<&mut B> {
    behavior.as_any_mut().downcast_mut::<B>()
}

/// What a behavior hook may touch: its own entity and the command queue.
pub struct EntityContext<'a> {
    pub(crate) id: EntityId,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: &'a [EntityId],
    pub(crate) body: &'a mut Body,
    pub(crate) components: &'a mut Vec<ComponentKind>,
    pub(crate) commands: &'a mut Commands,
}

impl EntityContext<'_> {
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        self.children
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &*self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut *self.body
    }

    #[must_use]
    pub fn transform(&self) -> Transform2D {
        self.body.transform
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.body.velocity = velocity;
    }

    /// First component of type `T` on this entity.
    #[must_use]
    pub fn component<T: ComponentVariant>(&self) -> Option<&T> {
        self.components.iter().find_map(T::from_kind)
    }

    pub fn component_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(T::from_kind_mut)
    }

    pub fn add_component(&mut self, component: impl Into<ComponentKind>) {
        self.components.push(component.into());
    }

    /// Queue for spawning and removing entities.
    pub fn commands(&mut self) -> &mut Commands {
        &mut *self.commands
    }
}
