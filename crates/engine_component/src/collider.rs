//! Axis-aligned box colliders.
//!
//! A [`Collider`] is one box attached to an entity. Its box is the unit
//! rectangle under `body transform · local transform`, where the local
//! transform lets a collider cover only part of its entity (a ground sensor
//! at the feet, a hurt box inside the sprite).
//!
//! ## Frame protocol
//!
//! 1. The collision system calls [`Collider::sync`] on every collider, which
//!    snapshots the world transform for the rest of the pass.
//! 2. Candidate pairs are resolved with [`Collider::handle_collision`]. Any
//!    positional correction is only *recorded* through
//!    [`Collider::update_translation`], so every decision in the pass is
//!    made against the same set of boxes.
//! 3. [`Component::late_update`] applies the accumulated translation to the
//!    body and clears it.
//!
//! ## Resolution
//!
//! | this | other | effect |
//! |---|---|---|
//! | solid | solid | smallest push-apart vector split 50/50 |
//! | solid | static | this takes the whole correction |
//! | static | solid | other takes the whole correction |
//! | any | non-collidable | none (sensor) |
//! | static | static | none, reported as [`Resolution::Unsupported`] |

use engine_math::{Aabb, Transform2D, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::component::{Body, Component};
use crate::entity::EntityId;
use crate::error::ComponentError;
use crate::interaction::InteractionType;

/// Callback invoked with the *other* entity's id when a collision fires.
pub type CollisionCallback = Box<dyn FnMut(EntityId)>;

/// How a collider responds physically to overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderBehavior {
    /// Immovable; pushes solids out but never moves itself.
    Static,
    /// Detects overlaps and fires callbacks; never moves anything.
    NonCollidable,
    /// Pushed out of other solid and static bodies.
    Solid,
}

/// Geometric shape of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Shape {
    /// The unit rectangle under the collider's world transform.
    #[default]
    Aabb,
}

/// Outcome of resolving one collider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Overlapping bodies; deferred translations were recorded.
    Pushed,
    /// At least one side is a sensor; no translation.
    Sensor,
    /// The boxes do not overlap; nothing to do.
    Separated,
    /// The pairing has no resolution rule; nothing was done.
    Unsupported,
}

impl Resolution {
    /// Whether the pair counts as handled, i.e. callbacks should fire.
    ///
    /// Only shape pairings the collider cannot test would be unhandled, and
    /// every current shape pairing has a test.
    #[must_use]
    pub fn is_handled(self) -> bool {
        match self {
            Self::Pushed | Self::Sensor | Self::Separated | Self::Unsupported => true,
        }
    }
}

/// One axis-aligned box attached to an entity.
pub struct Collider {
    behavior: ColliderBehavior,
    shape: Shape,
    interaction: InteractionType,
    local: Transform2D,
    world: Transform2D,
    pending_translation: Option<Vec2>,
    callback: Option<CollisionCallback>,
    contacts: Vec<EntityId>,
}

impl Collider {
    /// Create a collider covering its entity's whole footprint.
    #[must_use]
    pub fn new(behavior: ColliderBehavior, interaction: InteractionType) -> Self {
        Self {
            behavior,
            shape: Shape::Aabb,
            interaction,
            local: Transform2D::IDENTITY,
            world: Transform2D::IDENTITY,
            pending_translation: None,
            callback: None,
            contacts: Vec::new(),
        }
    }

    /// A movable physical body.
    #[must_use]
    pub fn solid() -> Self {
        Self::new(ColliderBehavior::Solid, InteractionType::Solid)
    }

    /// An immovable physical body (walls, floors).
    #[must_use]
    pub fn static_body() -> Self {
        Self::new(ColliderBehavior::Static, InteractionType::Solid)
    }

    /// A sensor with the given interaction tag.
    #[must_use]
    pub fn sensor(interaction: InteractionType) -> Self {
        Self::new(ColliderBehavior::NonCollidable, interaction)
    }

    /// Place the box relative to the entity's transform.
    #[must_use]
    pub fn with_local_transform(mut self, local: Transform2D) -> Self {
        self.local = local;
        self
    }

    /// Replace the interaction tag.
    #[must_use]
    pub fn with_interaction(mut self, interaction: InteractionType) -> Self {
        self.interaction = interaction;
        self
    }

    /// Install a callback fired with the other entity's id on collision.
    #[must_use]
    pub fn with_callback(mut self, callback: impl FnMut(EntityId) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn behavior(&self) -> ColliderBehavior {
        self.behavior
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionType {
        self.interaction
    }

    #[must_use]
    pub fn local_transform(&self) -> Transform2D {
        self.local
    }

    /// Snapshot the world transform from the owning body's transform.
    pub fn sync(&mut self, body_transform: &Transform2D) {
        self.world = body_transform.compose(&self.local);
    }

    /// The world transform captured by the last [`Collider::sync`].
    #[must_use]
    pub fn get_transform(&self) -> Transform2D {
        self.world
    }

    /// World-space box of this collider.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_transform(&self.world)
    }

    /// Returns `true` if the two boxes strictly overlap on both axes.
    #[must_use]
    pub fn bounds_collide(&self, other: &Collider) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Returns `true` if the interaction tags allow testing this pair.
    #[must_use]
    pub fn interacts_with(&self, other: &Collider) -> bool {
        self.interaction.interacts_with(other.interaction)
    }

    /// Resolve a collision between `self` and `other`.
    ///
    /// Positional effects are recorded as deferred translations on the
    /// colliders; nothing moves until [`Component::late_update`].
    pub fn resolve_collision(&mut self, other: &mut Collider) -> Resolution {
        match (self.shape, other.shape) {
            (Shape::Aabb, Shape::Aabb) => self.resolve_aabb(other),
        }
    }

    /// Resolve a collision and report whether the pair was handled.
    ///
    /// Every shape pairing has a rule, so the pair is always handled;
    /// behavior pairings without a rule are still reported through
    /// [`Collider::resolve_collision`] as [`Resolution::Unsupported`].
    pub fn handle_collision(&mut self, other: &mut Collider) -> bool {
        self.resolve_collision(other).is_handled()
    }

    fn resolve_aabb(&mut self, other: &mut Collider) -> Resolution {
        use ColliderBehavior::{NonCollidable, Solid, Static};

        if self.behavior == NonCollidable || other.behavior == NonCollidable {
            return Resolution::Sensor;
        }

        let bounds = self.bounds();
        let other_bounds = other.bounds();
        if !bounds.overlaps(&other_bounds) {
            return Resolution::Separated;
        }

        let translation = minimum_translation(&bounds, &other_bounds);
        match (self.behavior, other.behavior) {
            (Solid, Solid) => {
                other.update_translation(translation / 2.0);
                self.update_translation(-translation / 2.0);
            }
            (Solid, Static) => self.update_translation(-translation),
            (Static, Solid) => other.update_translation(translation),
            (Static, Static) => {
                warn!(
                    this = ?self.world.translation,
                    other = ?other.world.translation,
                    "overlapping static colliders cannot be resolved"
                );
                return Resolution::Unsupported;
            }
            (NonCollidable, _) | (_, NonCollidable) => return Resolution::Sensor,
        }
        Resolution::Pushed
    }

    /// Fire the collision callback for a collision with `other`.
    pub fn fire_callback(&mut self, other: EntityId) {
        self.contacts.push(other);
        if let Some(callback) = self.callback.as_mut() {
            callback(other);
        }
    }

    /// Accumulate a deferred translation for this frame.
    pub fn update_translation(&mut self, delta: Vec2) {
        match self.pending_translation.as_mut() {
            Some(pending) => *pending += delta,
            None => self.pending_translation = Some(delta),
        }
    }

    /// The translation accumulated since the last late update.
    #[must_use]
    pub fn pending_translation(&self) -> Option<Vec2> {
        self.pending_translation
    }

    /// Contacts recorded since they were last taken.
    #[must_use]
    pub fn contacts(&self) -> &[EntityId] {
        &self.contacts
    }

    /// Drain the recorded contacts.
    pub fn take_contacts(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.contacts)
    }
}

/// The smallest of the four axis-aligned vectors that separate `this` from
/// `other`, in the order left, right, down, up; earlier candidates win ties.
///
/// Moving `other` by the result (or `this` by its negation) ends the overlap.
fn minimum_translation(this: &Aabb, other: &Aabb) -> Vec2 {
    let candidates = [
        Vec2::new(this.min.x - other.max.x, 0.0),
        Vec2::new(this.max.x - other.min.x, 0.0),
        Vec2::new(0.0, this.min.y - other.max.y),
        Vec2::new(0.0, this.max.y - other.min.y),
    ];

    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.length_squared() < best.length_squared() {
            best = *candidate;
        }
    }
    best
}

impl Component for Collider {
    fn type_name(&self) -> &'static str {
        "collider"
    }

    fn late_update(&mut self, body: &mut Body) -> Result<(), ComponentError> {
        if let Some(translation) = self.pending_translation.take()
            && self.behavior == ColliderBehavior::Solid
        {
            body.transform.translation += translation;
        }
        self.sync(&body.transform);
        Ok(())
    }
}

impl std::fmt::Debug for Collider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collider")
            .field("behavior", &self.behavior)
            .field("shape", &self.shape)
            .field("interaction", &self.interaction)
            .field("local", &self.local)
            .field("world", &self.world)
            .field("pending_translation", &self.pending_translation)
            .field("has_callback", &self.callback.is_some())
            .field("contacts", &self.contacts)
            .finish()
    }
}
