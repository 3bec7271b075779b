//! The entity: a body, its components and an optional behavior.

use engine_component::{Body, Component, ComponentError, ComponentKind, ComponentVariant, Contact, EntityId, Surface};
use engine_math::{Transform2D, Vec2};

use crate::behavior::{self, Behavior, EntityContext};
use crate::commands::Commands;
use crate::error::WorldError;
use crate::event::Event;

/// Highest z level; entities on higher levels are drawn later.
pub const MAX_Z_LEVEL: u8 = 5;

/// A game object.
///
/// Built as a plain value, then handed to the
/// [`GameState`](crate::GameState), which assigns its id and owns it until
/// removal.
pub struct Entity {
    id: Option<EntityId>,
    type_name: &'static str,
    body: Body,
    z_level: u8,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    components: Vec<ComponentKind>,
    behavior: Option<Box<dyn Behavior>>,
    /// Added while a frame was in progress; joins the simulation next frame.
    pending: bool,
}

impl Entity {
    /// An entity of the given type with the identity transform and no
    /// components.
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            id: None,
            type_name,
            body: Body::default(),
            z_level: 0,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            behavior: None,
            pending: false,
        }
    }

    /// An entity whose type name comes from its behavior.
    #[must_use]
    pub fn with_behavior_of(behavior: impl Behavior) -> Self {
        let type_name = behavior.type_name();
        Self::new(type_name).with_behavior(behavior)
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.body.transform = transform;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.body.velocity = velocity;
        self
    }

    /// Set the draw level, clamped to [`MAX_Z_LEVEL`].
    #[must_use]
    pub fn with_z_level(mut self, z_level: u8) -> Self {
        self.z_level = z_level.min(MAX_Z_LEVEL);
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: impl Into<ComponentKind>) -> Self {
        self.components.push(component.into());
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Behavior) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// The id assigned by the store, or `None` before the entity is added.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns `true` if the entity was spawned during the frame in
    /// progress. Pending entities are skipped by every phase of that frame,
    /// systems included.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[must_use]
    pub fn transform(&self) -> Transform2D {
        self.body.transform
    }

    pub fn set_transform(&mut self, transform: Transform2D) {
        self.body.transform = transform;
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.body.velocity = velocity;
    }

    #[must_use]
    pub fn z_level(&self) -> u8 {
        self.z_level
    }

    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Returns `true` if `point` lies strictly inside the body rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.body.transform.contains_point(point)
    }

    pub fn add_component(&mut self, component: impl Into<ComponentKind>) {
        self.components.push(component.into());
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentKind] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [ComponentKind] {
        &mut self.components
    }

    /// First component of type `T`.
    #[must_use]
    pub fn get_component<T: ComponentVariant>(&self) -> Option<&T> {
        self.components.iter().find_map(T::from_kind)
    }

    pub fn get_component_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(T::from_kind_mut)
    }

    /// Every component of type `T`, in insertion order.
    pub fn get_components<T: ComponentVariant>(&self) -> impl Iterator<Item = &T> {
        self.components.iter().filter_map(T::from_kind)
    }

    pub fn get_components_mut<T: ComponentVariant>(&mut self) -> impl Iterator<Item = &mut T> {
        self.components.iter_mut().filter_map(T::from_kind_mut)
    }

    #[must_use]
    pub fn has_component<T: ComponentVariant>(&self) -> bool {
        self.get_component::<T>().is_some()
    }

    /// Drop every component of type `T`; returns how many were removed.
    pub fn remove_components<T: ComponentVariant>(&mut self) -> usize {
        let before = self.components.len();
        self.components.retain(|kind| T::from_kind(kind).is_none());
        before - self.components.len()
    }

    #[must_use]
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    /// The behavior, if it is a `B`.
    #[must_use]
    pub fn behavior<B: Behavior>(&self) -> Option<&B> {
        behavior::downcast_ref(self.behavior.as_deref()?)
    }

    pub fn behavior_mut<B: Behavior>(&mut self) -> Option<&mut B> {
        behavior::downcast_mut(self.behavior.as_deref_mut()?)
    }

    pub(crate) fn assign(&mut self, id: EntityId, parent: Option<EntityId>) {
        self.id = Some(id);
        if parent.is_some() {
            self.parent = parent;
        }
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub(crate) fn add_child_id(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child_id(&mut self, child: EntityId) {
        self.children.retain(|&id| id != child);
    }

    /// Run `hook` on the behavior with a context over this entity.
    fn with_behavior_ctx<R>(
        &mut self,
        id: EntityId,
        commands: &mut Commands,
        default: R,
        hook: impl FnOnce(&mut dyn Behavior, &mut EntityContext<'_>) -> Result<R, WorldError>,
    ) -> Result<R, WorldError> {
        let Some(behavior) = self.behavior.as_deref_mut() else {
            return Ok(default);
        };
        let mut ctx = EntityContext {
            id,
            parent: self.parent,
            children: &self.children,
            body: &mut self.body,
            components: &mut self.components,
            commands,
        };
        hook(behavior, &mut ctx)
    }

    pub(crate) fn init(&mut self, id: EntityId, commands: &mut Commands) -> Result<(), WorldError> {
        self.with_behavior_ctx(id, commands, (), |behavior, ctx| behavior.init(ctx))
    }

    /// Behavior first, then every component in insertion order.
    pub(crate) fn update(&mut self, id: EntityId, dt: f32, commands: &mut Commands) -> Result<(), WorldError> {
        self.with_behavior_ctx(id, commands, (), |behavior, ctx| behavior.update(ctx, dt))?;
        for component in &mut self.components {
            component.update(&mut self.body, dt)?;
        }
        Ok(())
    }

    /// Deliver this frame's contacts, apply deferred component work, then
    /// run the behavior's late update.
    pub(crate) fn late_update(&mut self, id: EntityId, commands: &mut Commands) -> Result<(), WorldError> {
        let contacts: Vec<Contact> = self
            .components
            .iter_mut()
            .flat_map(ComponentKind::take_contacts)
            .collect();

        for contact in &contacts {
            for component in &mut self.components {
                component.on_contact(contact);
            }
            self.with_behavior_ctx(id, commands, (), |behavior, ctx| behavior.on_contact(ctx, contact))?;
        }

        for component in &mut self.components {
            component.late_update(&mut self.body)?;
        }
        self.with_behavior_ctx(id, commands, (), |behavior, ctx| behavior.late_update(ctx))
    }

    pub(crate) fn draw(&self, surface: &mut dyn Surface) -> Result<(), ComponentError> {
        if let Some(behavior) = self.behavior.as_deref() {
            behavior.draw(&self.body, surface)?;
        }
        for component in &self.components {
            component.draw(&self.body, surface)?;
        }
        Ok(())
    }

    /// Offer `event` to the behavior; returns whether it should propagate.
    pub(crate) fn handle_event(
        &mut self,
        id: EntityId,
        event: &Event,
        commands: &mut Commands,
    ) -> Result<bool, WorldError> {
        match *event {
            Event::MouseUp { button, position } if self.contains_point(position) => {
                self.with_behavior_ctx(id, commands, true, |behavior, ctx| {
                    behavior.on_click(ctx, button, position)
                })
            }
            Event::KeyPressed(key) => {
                self.with_behavior_ctx(id, commands, true, |behavior, ctx| behavior.on_key_press(ctx, key))
            }
            Event::KeyReleased(key) => {
                self.with_behavior_ctx(id, commands, true, |behavior, ctx| behavior.on_key_release(ctx, key))
            }
            _ => Ok(true),
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("body", &self.body)
            .field("z_level", &self.z_level)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.components)
            .field("behavior", &self.behavior.as_ref().map(|b| b.type_name()))
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{Collider, ContactSource, Gravity, InteractionType, Jumper, Kinematic, sensors};

    use super::*;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        contacts: Vec<EntityId>,
        clicks: u32,
    }

    impl Behavior for Counter {
        fn type_name(&self) -> &'static str {
            "counter"
        }

        fn update(&mut self, ctx: &mut EntityContext<'_>, _dt: f32) -> Result<(), WorldError> {
            self.updates += 1;
            ctx.set_velocity(Vec2::new(1.0, 0.0));
            Ok(())
        }

        fn on_contact(&mut self, _ctx: &mut EntityContext<'_>, contact: &Contact) -> Result<(), WorldError> {
            self.contacts.push(contact.other);
            Ok(())
        }

        fn on_click(&mut self, _ctx: &mut EntityContext<'_>, _button: crate::MouseButton, _position: Vec2) -> Result<bool, WorldError> {
            self.clicks += 1;
            Ok(false)
        }
    }

    const ID: EntityId = EntityId::new(0, 0);

    #[test]
    fn test_component_lookup() {
        let mut entity = Entity::new("thing")
            .with_component(Gravity::default())
            .with_component(Collider::solid())
            .with_component(sensors::hit_box());

        assert!(entity.has_component::<Gravity>());
        assert!(!entity.has_component::<Jumper>());
        assert_eq!(entity.get_components::<Collider>().count(), 2);

        entity.get_component_mut::<Gravity>().unwrap().set_enabled(false);
        assert!(!entity.get_component::<Gravity>().unwrap().is_enabled());

        assert_eq!(entity.remove_components::<Collider>(), 2);
        assert_eq!(entity.components().len(), 1);
    }

    #[test]
    fn test_z_level_is_clamped() {
        assert_eq!(Entity::new("a").with_z_level(9).z_level(), MAX_Z_LEVEL);
        assert_eq!(Entity::new("a").with_z_level(2).z_level(), 2);
    }

    #[test]
    fn test_update_runs_behavior_before_components() {
        // The behavior sets the velocity; the kinematic component must see it
        // in the same update.
        let mut entity = Entity::with_behavior_of(Counter::default()).with_component(Kinematic::default());
        let mut commands = Commands::new();
        entity.update(ID, 0.5, &mut commands).unwrap();

        assert_eq!(entity.transform().translation, Vec2::new(0.5, 0.0));
        assert_eq!(entity.behavior::<Counter>().unwrap().updates, 1);
        assert_eq!(entity.type_name(), "counter");
    }

    #[test]
    fn test_late_update_delivers_contacts() {
        let other = EntityId::new(9, 1);
        let mut entity = Entity::with_behavior_of(Counter::default())
            .with_component(Jumper::new(1))
            .with_component(sensors::jumper_sensor());

        for collider in entity.get_components_mut::<Collider>() {
            collider.fire_callback(other);
        }
        entity.late_update(ID, &mut Commands::new()).unwrap();

        assert!(entity.get_component::<Jumper>().unwrap().is_grounded());
        assert_eq!(entity.behavior::<Counter>().unwrap().contacts, vec![other]);

        // Contacts are consumed.
        entity.late_update(ID, &mut Commands::new()).unwrap();
        assert_eq!(entity.behavior::<Counter>().unwrap().contacts.len(), 1);
    }

    #[test]
    fn test_contact_source_is_the_local_detector() {
        let contact = Contact {
            source: ContactSource::Collider(InteractionType::Jumper),
            other: ID,
        };
        let mut jumper = Jumper::new(1);
        jumper.on_contact(&contact);
        assert!(jumper.is_grounded());
    }

    #[test]
    fn test_click_requires_point_inside() {
        let mut entity = Entity::with_behavior_of(Counter::default())
            .with_transform(Transform2D::from_translation(Vec2::new(3.0, 3.0)));
        let mut commands = Commands::new();

        let outside = Event::MouseUp {
            button: crate::MouseButton::Left,
            position: Vec2::ZERO,
        };
        assert!(entity.handle_event(ID, &outside, &mut commands).unwrap());

        let inside = Event::MouseUp {
            button: crate::MouseButton::Left,
            position: Vec2::new(3.5, 2.5),
        };
        assert!(!entity.handle_event(ID, &inside, &mut commands).unwrap());
        assert_eq!(entity.behavior::<Counter>().unwrap().clicks, 1);
    }

    #[test]
    fn test_behavior_downcast_to_wrong_type() {
        struct Other;
        impl Behavior for Other {
            fn type_name(&self) -> &'static str {
                "other"
            }
        }

        let entity = Entity::with_behavior_of(Counter::default());
        assert!(entity.behavior::<Other>().is_none());
        assert!(Entity::new("plain").behavior::<Counter>().is_none());
    }
}
