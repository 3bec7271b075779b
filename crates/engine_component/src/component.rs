//! Core [`Component`] trait and the closed set of component variants.
//!
//! A component is a capability object owned by exactly one entity. It may
//! take part in any of the per-frame phases:
//!
//! - `update`: once per frame, before the systems run;
//! - `late_update`: once per frame, after the systems (notably the collision
//!   system) have run; deferred work such as collision push-apart lands here;
//! - `draw`: once per frame, after the simulation step.
//!
//! Components never see their entity directly. The entity hands each hook an
//! explicit [`Body`] (transform and velocity), which is the only shared state
//! a component may read or change.
//!
//! [`ComponentKind`] is the closed set of components the engine knows about.
//! Entities store `ComponentKind`s and dispatch every phase through it;
//! [`ComponentVariant`] gives typed access to a single variant.

use engine_math::{Transform2D, Vec2};
use serde::{Deserialize, Serialize};

use crate::collider::Collider;
use crate::draw::{DrawRectangle, Label};
use crate::entity::EntityId;
use crate::error::ComponentError;
use crate::gravity::Gravity;
use crate::grid_collider::GridCollider;
use crate::interaction::InteractionType;
use crate::jumper::Jumper;
use crate::kinematic::Kinematic;
use crate::render::Surface;

/// Entity-owned spatial state that components act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World transform of the entity; the unit rectangle under this
    /// transform is the entity's footprint.
    pub transform: Transform2D,
    /// Velocity in world units per second.
    pub velocity: Vec2,
}

impl Body {
    /// A resting body with the given transform.
    #[must_use]
    pub fn new(transform: Transform2D) -> Self {
        Self {
            transform,
            velocity: Vec2::ZERO,
        }
    }
}

/// Which detector recorded a [`Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactSource {
    /// A box collider with the given interaction tag.
    Collider(InteractionType),
    /// A grid collider sharing a cell.
    Grid,
}

/// A collision callback recorded during the collision pass and delivered to
/// the owning entity's components during late update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    /// The detector on *this* entity that fired.
    pub source: ContactSource,
    /// The entity that was touched.
    pub other: EntityId,
}

/// The per-frame hooks shared by every component.
///
/// Every hook has a no-op default so a component only implements the phases
/// it cares about.
pub trait Component {
    /// A human-readable name for this component type.
    fn type_name(&self) -> &'static str;

    /// Draw the component for the current frame.
    fn draw(&self, _body: &Body, _surface: &mut dyn Surface) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Advance the component's state by `dt` seconds.
    fn update(&mut self, _body: &mut Body, _dt: f32) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Apply work deferred from the current frame.
    fn late_update(&mut self, _body: &mut Body) -> Result<(), ComponentError> {
        Ok(())
    }

    /// React to a contact recorded by a detector on the same entity.
    fn on_contact(&mut self, _contact: &Contact) {}
}

/// The closed set of components an entity can own.
#[derive(Debug)]
pub enum ComponentKind {
    Collider(Collider),
    GridCollider(GridCollider),
    Gravity(Gravity),
    Jumper(Jumper),
    Kinematic(Kinematic),
    DrawRectangle(DrawRectangle),
    Label(Label),
}

impl ComponentKind {
    /// Drain the contacts recorded by this component, if it is a detector.
    pub fn take_contacts(&mut self) -> Vec<Contact> {
        match self {
            Self::Collider(collider) => {
                let source = ContactSource::Collider(collider.interaction());
                collider
                    .take_contacts()
                    .into_iter()
                    .map(|other| Contact { source, other })
                    .collect()
            }
            Self::GridCollider(grid) => grid
                .take_contacts()
                .into_iter()
                .map(|other| Contact {
                    source: ContactSource::Grid,
                    other,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn as_component(&self) -> &dyn Component {
        match self {
            Self::Collider(c) => c,
            Self::GridCollider(c) => c,
            Self::Gravity(c) => c,
            Self::Jumper(c) => c,
            Self::Kinematic(c) => c,
            Self::DrawRectangle(c) => c,
            Self::Label(c) => c,
        }
    }

    fn as_component_mut(&mut self) -> &mut dyn Component {
        match self {
            Self::Collider(c) => c,
            Self::GridCollider(c) => c,
            Self::Gravity(c) => c,
            Self::Jumper(c) => c,
            Self::Kinematic(c) => c,
            Self::DrawRectangle(c) => c,
            Self::Label(c) => c,
        }
    }
}

impl Component for ComponentKind {
    fn type_name(&self) -> &'static str {
        self.as_component().type_name()
    }

    fn draw(&self, body: &Body, surface: &mut dyn Surface) -> Result<(), ComponentError> {
        self.as_component().draw(body, surface)
    }

    fn update(&mut self, body: &mut Body, dt: f32) -> Result<(), ComponentError> {
        self.as_component_mut().update(body, dt)
    }

    fn late_update(&mut self, body: &mut Body) -> Result<(), ComponentError> {
        self.as_component_mut().late_update(body)
    }

    fn on_contact(&mut self, contact: &Contact) {
        self.as_component_mut().on_contact(contact);
    }
}

/// Typed access to one variant of [`ComponentKind`].
pub trait ComponentVariant: Component + Sized + 'static {
    /// Borrow the variant if `kind` holds it.
    fn from_kind(kind: &ComponentKind) -> Option<&Self>;

    /// Mutably borrow the variant if `kind` holds it.
    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self>;
}

macro_rules! component_variant {
    ($($variant:ident),* $(,)?) => {
        $(
            impl ComponentVariant for $variant {
                fn from_kind(kind: &ComponentKind) -> Option<&Self> {
                    match kind {
                        ComponentKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
                    match kind {
                        ComponentKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for ComponentKind {
                fn from(inner: $variant) -> Self {
                    ComponentKind::$variant(inner)
                }
            }
        )*
    };
}

component_variant!(
    Collider,
    GridCollider,
    Gravity,
    Jumper,
    Kinematic,
    DrawRectangle,
    Label,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors;

    #[test]
    fn test_variant_access() {
        let mut kind = ComponentKind::from(Gravity::default());
        assert!(Gravity::from_kind(&kind).is_some());
        assert!(Collider::from_kind(&kind).is_none());

        Gravity::from_kind_mut(&mut kind).unwrap().set_enabled(false);
        assert!(!Gravity::from_kind(&kind).unwrap().is_enabled());
    }

    #[test]
    fn test_type_name_dispatch() {
        assert_eq!(ComponentKind::from(Collider::solid()).type_name(), "collider");
        assert_eq!(ComponentKind::from(Jumper::new(2)).type_name(), "jumper");
        assert_eq!(ComponentKind::from(Kinematic::default()).type_name(), "kinematic");
    }

    #[test]
    fn test_update_dispatches_to_variant() {
        let mut body = Body::default();
        let mut kind = ComponentKind::from(Gravity::new(Vec2::new(0.0, -10.0)));
        kind.update(&mut body, 0.5).unwrap();
        assert_eq!(body.velocity, Vec2::new(0.0, -5.0));
    }

    #[test]
    fn test_take_contacts_tags_the_source() {
        let other = EntityId::new(4, 0);
        let mut kind = ComponentKind::from(sensors::jumper_sensor());
        if let ComponentKind::Collider(collider) = &mut kind {
            collider.fire_callback(other);
        }

        let contacts = kind.take_contacts();
        assert_eq!(
            contacts,
            vec![Contact {
                source: ContactSource::Collider(InteractionType::Jumper),
                other,
            }]
        );
        assert!(kind.take_contacts().is_empty());
    }

    #[test]
    fn test_non_detectors_have_no_contacts() {
        let mut kind = ComponentKind::from(Gravity::default());
        assert!(kind.take_contacts().is_empty());
    }
}
