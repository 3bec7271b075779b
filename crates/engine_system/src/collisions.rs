//! The per-frame collision pass.
//!
//! Every frame the system:
//!
//! 1. snapshots every collider's world transform ([`Collider::sync`]);
//! 2. inserts every collider, in store order, into a fresh
//!    [`SpatialGrid`], collecting the candidate pairs each insertion
//!    reports;
//! 3. resolves each pair `(new, existing)` with
//!    `new.resolve_collision(existing)` and, when handled, fires both
//!    collision callbacks with the other side's entity id.
//!
//! Resolution only records deferred translations, and every box was
//! snapshotted before the first pair was resolved, so the outcome does not
//! depend on the order pairs are visited. The translations are applied by
//! the colliders during the entities' late update. Entities spawned during
//! the current frame are not collided until the next one.

use engine_component::{Collider, ComponentKind, EntityId, Resolution};
use engine_world::{GameState, System, WorldError};
use tracing::debug;

use crate::config::GridConfig;
use crate::grid::{GridElement, SpatialGrid};

/// Counters for the last collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionStats {
    /// Colliders synced this pass.
    pub colliders: usize,
    /// Candidate pairs reported by the broad phase.
    pub candidates: usize,
    /// Candidate pairs handled by the narrow phase.
    pub resolved: usize,
    /// Handled pairs whose behaviors have no resolution rule.
    pub unsupported: usize,
}

/// Addresses one collider: an entity and the component's position in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColliderKey {
    entity: EntityId,
    index: usize,
}

/// Broad phase + narrow phase collision over every [`Collider`].
#[derive(Debug, Default)]
pub struct CollisionSystem {
    config: GridConfig,
    stats: CollisionStats,
}

impl CollisionSystem {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            stats: CollisionStats::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Counters from the most recent pass.
    #[must_use]
    pub fn stats(&self) -> CollisionStats {
        self.stats
    }

    /// Run one collision pass over `state`.
    pub fn run(&mut self, state: &mut GameState) -> CollisionStats {
        let mut stats = CollisionStats::default();
        let mut grid = SpatialGrid::new(self.config);
        let mut pairs = Vec::new();

        for entity in state.iter_mut() {
            let Some(id) = entity.id() else {
                continue;
            };
            // Spawned this frame: it would miss the late update that applies
            // the resolution.
            if entity.is_pending() {
                continue;
            }
            let transform = entity.transform();
            for (index, component) in entity.components_mut().iter_mut().enumerate() {
                let ComponentKind::Collider(collider) = component else {
                    continue;
                };
                collider.sync(&transform);
                stats.colliders += 1;

                let key = ColliderKey { entity: id, index };
                let hits = grid.insert(GridElement {
                    key,
                    owner: id,
                    bounds: collider.bounds(),
                    interaction: collider.interaction(),
                });
                pairs.extend(hits.into_iter().map(|existing| (key, existing)));
            }
        }

        for (new, existing) in pairs {
            stats.candidates += 1;
            let Some((this, other)) = collider_pair(state, new, existing) else {
                continue;
            };
            let resolution = this.resolve_collision(other);
            if resolution.is_handled() {
                stats.resolved += 1;
                if resolution == Resolution::Unsupported {
                    stats.unsupported += 1;
                }
                this.fire_callback(existing.entity);
                other.fire_callback(new.entity);
            }
        }

        debug!(
            colliders = stats.colliders,
            candidates = stats.candidates,
            resolved = stats.resolved,
            unsupported = stats.unsupported,
            "collision pass"
        );
        self.stats = stats;
        stats
    }
}

/// Both colliders of a candidate pair, borrowed mutably at once.
fn collider_pair(
    state: &mut GameState,
    this: ColliderKey,
    other: ColliderKey,
) -> Option<(&mut Collider, &mut Collider)> {
    let (this_entity, other_entity) = state.pair_mut(this.entity, other.entity)?;
    let ComponentKind::Collider(this) = this_entity.components_mut().get_mut(this.index)? else {
        return None;
    };
    let ComponentKind::Collider(other) = other_entity.components_mut().get_mut(other.index)? else {
        return None;
    };
    Some((this, other))
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collisions"
    }

    fn update(&mut self, state: &mut GameState, _dt: f32) -> Result<(), WorldError> {
        self.run(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use engine_component::{InteractionType, Jumper, sensors};
    use engine_math::{Transform2D, Vec2};
    use engine_world::{Behavior, Entity, EntityContext};

    use super::*;

    /// Spawns a solid at `at` the first time it updates.
    struct SolidSpawner {
        at: Option<Vec2>,
    }

    impl Behavior for SolidSpawner {
        fn type_name(&self) -> &'static str {
            "solid_spawner"
        }

        fn update(&mut self, ctx: &mut EntityContext<'_>, _dt: f32) -> Result<(), WorldError> {
            if let Some(at) = self.at.take() {
                ctx.commands().spawn(solid_at(at.x, at.y));
            }
            Ok(())
        }
    }

    fn world() -> GameState {
        let mut state = GameState::new();
        state.add_system(CollisionSystem::default());
        state
    }

    fn solid_at(x: f32, y: f32) -> Entity {
        Entity::new("box")
            .with_transform(Transform2D::from_translation(Vec2::new(x, y)))
            .with_component(Collider::solid())
    }

    fn stats(state: &GameState) -> CollisionStats {
        state.get_system::<CollisionSystem>().unwrap().stats()
    }

    fn position(state: &GameState, id: EntityId) -> Vec2 {
        state.get(id).unwrap().transform().translation
    }

    #[test]
    fn test_overlapping_solids_are_pushed_apart_evenly() {
        let mut state = world();
        let a = state.add_entity(solid_at(0.0, 0.0)).unwrap();
        let b = state.add_entity(solid_at(1.5, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(position(&state, a), Vec2::new(-0.25, 0.0));
        assert_eq!(position(&state, b), Vec2::new(1.75, 0.0));
        assert_eq!(
            stats(&state),
            CollisionStats {
                colliders: 2,
                candidates: 1,
                resolved: 1,
                unsupported: 0,
            }
        );
    }

    #[test]
    fn test_outcome_does_not_depend_on_store_order() {
        let mut state = world();
        let b = state.add_entity(solid_at(1.5, 0.0)).unwrap();
        let a = state.add_entity(solid_at(0.0, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(position(&state, a), Vec2::new(-0.25, 0.0));
        assert_eq!(position(&state, b), Vec2::new(1.75, 0.0));
        assert_eq!(stats(&state).candidates, 1);
    }

    #[test]
    fn test_static_floor_pushes_solid_out() {
        let mut state = world();
        let floor = state
            .add_entity(
                Entity::new("floor")
                    .with_transform(Transform2D::from_translation_and_scale(Vec2::new(0.0, -1.0), Vec2::new(5.0, 1.0)))
                    .with_component(Collider::static_body()),
            )
            .unwrap();
        let crate_id = state.add_entity(solid_at(0.0, 0.5)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(position(&state, floor), Vec2::new(0.0, -1.0));
        assert_eq!(position(&state, crate_id), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_sensor_reports_solid_without_moving() {
        let touched = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&touched);

        let mut state = world();
        let sensor = state
            .add_entity(
                Entity::new("sensor").with_component(
                    Collider::sensor(InteractionType::Solid).with_callback(move |other| log.borrow_mut().push(other)),
                ),
            )
            .unwrap();
        let solid = state.add_entity(solid_at(0.5, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(*touched.borrow(), vec![solid]);
        assert_eq!(position(&state, sensor), Vec2::ZERO);
        assert_eq!(position(&state, solid), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn test_hurt_box_learns_who_hit_it() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&hits);

        let mut state = world();
        let hitter = state.add_entity(Entity::new("sword").with_component(sensors::hit_box())).unwrap();
        state
            .add_entity(
                Entity::new("slime").with_component(sensors::hurt_box(move |other| log.borrow_mut().push(other))),
            )
            .unwrap();
        // A solid on top of both never reaches the hit/hurt boxes.
        state.add_entity(solid_at(0.0, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(*hits.borrow(), vec![hitter]);
        assert_eq!(stats(&state).candidates, 1);
    }

    #[test]
    fn test_overlapping_statics_are_counted_as_unsupported() {
        let mut state = world();
        let statics: Vec<_> = (0..2)
            .map(|_| {
                state
                    .add_entity(Entity::new("wall").with_component(Collider::static_body()))
                    .unwrap()
            })
            .collect();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(stats(&state).unsupported, 1);
        assert_eq!(stats(&state).resolved, 1);
        for id in statics {
            assert_eq!(position(&state, id), Vec2::ZERO);
        }
    }

    #[test]
    fn test_entities_outside_the_grid_never_collide() {
        let mut state = world();
        let a = state.add_entity(solid_at(40.0, 40.0)).unwrap();
        state.add_entity(solid_at(40.5, 40.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(stats(&state).colliders, 2);
        assert_eq!(stats(&state).candidates, 0);
        assert_eq!(position(&state, a), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_large_overlap_reported_once() {
        let mut state = world();
        for x in [0.0, 0.5] {
            state
                .add_entity(
                    Entity::new("slab")
                        .with_transform(Transform2D::from_translation_and_scale(Vec2::new(x, 0.0), Vec2::splat(3.0)))
                        .with_component(Collider::solid()),
                )
                .unwrap();
        }

        state.advance_state(1.0 / 60.0).unwrap();
        assert_eq!(stats(&state).candidates, 1);
    }

    #[test]
    fn test_colliders_of_one_entity_ignore_each_other() {
        let mut state = world();
        state
            .add_entity(
                Entity::new("double")
                    .with_component(Collider::solid())
                    .with_component(Collider::solid()),
            )
            .unwrap();

        state.advance_state(1.0 / 60.0).unwrap();
        assert_eq!(stats(&state).colliders, 2);
        assert_eq!(stats(&state).candidates, 0);
    }

    #[test]
    fn test_jumper_lands_on_jump_reset() {
        let mut state = world();
        state
            .add_entity(
                Entity::new("ground")
                    .with_transform(Transform2D::from_translation_and_scale(Vec2::new(0.0, -1.0), Vec2::new(4.0, 1.0)))
                    .with_component(Collider::static_body())
                    .with_component(sensors::jump_reset()),
            )
            .unwrap();
        let feet = Transform2D::from_translation_and_scale(Vec2::new(0.0, -1.0), Vec2::new(0.5, 0.25));
        let player = state
            .add_entity(
                Entity::new("player")
                    .with_transform(Transform2D::from_translation(Vec2::new(0.0, 1.0)))
                    .with_component(Jumper::new(1))
                    .with_component(sensors::jumper_sensor().with_local_transform(feet)),
            )
            .unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        let jumper = state.get(player).unwrap().get_component::<Jumper>().unwrap();
        assert!(jumper.is_grounded());
        assert!(jumper.can_jump());
    }

    #[test]
    fn test_solid_spawned_mid_frame_is_corrected_once() {
        let mut state = world();
        let a = state.add_entity(solid_at(0.0, 0.0)).unwrap();
        state
            .add_entity(Entity::with_behavior_of(SolidSpawner {
                at: Some(Vec2::new(1.5, 0.0)),
            }))
            .unwrap();

        // The spawn lands in the store but waits for its first full frame.
        state.advance_state(1.0 / 60.0).unwrap();
        assert_eq!(stats(&state).colliders, 1);
        let spawned = state
            .entities_by_type("box")
            .into_iter()
            .find(|&id| id != a)
            .unwrap();
        assert!(!state.get(spawned).unwrap().is_pending());
        assert_eq!(position(&state, spawned), Vec2::new(1.5, 0.0));

        state.advance_state(1.0 / 60.0).unwrap();
        state.advance_state(1.0 / 60.0).unwrap();

        // Pushed apart exactly once: the boxes end up touching.
        assert_eq!(position(&state, a), Vec2::new(-0.25, 0.0));
        assert_eq!(position(&state, spawned), Vec2::new(1.75, 0.0));
        assert_eq!(stats(&state).candidates, 0);
    }

    #[test]
    fn test_zero_dimension_config_does_not_abort_the_frame() {
        let json = r#"{"x_dim": 0, "y_dim": 3, "bounds": {"min": [-5.0, -5.0], "max": [5.0, 5.0]}}"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        let mut state = GameState::new();
        state.add_system(CollisionSystem::new(config));
        let a = state.add_entity(solid_at(0.0, 0.0)).unwrap();
        state.add_entity(solid_at(1.5, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();

        assert_eq!(stats(&state).candidates, 1);
        assert_eq!(position(&state, a), Vec2::new(-0.25, 0.0));
    }

    #[test]
    fn test_removed_entities_drop_out_of_the_next_pass() {
        let mut state = world();
        let a = state.add_entity(solid_at(0.0, 0.0)).unwrap();
        state.add_entity(solid_at(1.9, 0.0)).unwrap();

        state.advance_state(1.0 / 60.0).unwrap();
        assert_eq!(stats(&state).candidates, 1);

        state.remove_entity(a);
        state.advance_state(1.0 / 60.0).unwrap();
        assert_eq!(stats(&state).colliders, 1);
        assert_eq!(stats(&state).candidates, 0);
    }
}
