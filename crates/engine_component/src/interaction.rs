//! Interaction types for collider filtering.
//!
//! Every collider carries an [`InteractionType`] tag. The tag's
//! [`InteractionMask`] lists the tags it is willing to be tested against;
//! a pair is only considered by the broad phase when each side's mask
//! accepts the other side's tag. Untagged colliders only meet other untagged
//! colliders.

use serde::{Deserialize, Serialize};

/// The role a collider plays when deciding what it may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionType {
    /// No role; meets only other unspecified colliders.
    #[default]
    Unspecified,
    /// Deals damage outward.
    HitBox,
    /// Receives damage.
    HurtBox,
    /// Physical body (solid or static).
    Solid,
    /// Ground contact surface that resets jumps.
    JumpReset,
    /// A jumper's ground sensor.
    Jumper,
}

impl InteractionType {
    /// The bit identifying this type inside an [`InteractionMask`].
    #[must_use]
    pub const fn bit(self) -> u16 {
        match self {
            Self::Unspecified => 0,
            Self::HitBox => 1 << 0,
            Self::HurtBox => 1 << 1,
            Self::Solid => 1 << 2,
            Self::JumpReset => 1 << 3,
            Self::Jumper => 1 << 4,
        }
    }

    /// The set of types this type is willing to interact with.
    #[must_use]
    pub const fn mask(self) -> InteractionMask {
        match self {
            Self::Unspecified => InteractionMask::ALL,
            Self::HitBox => InteractionMask::of(Self::HurtBox),
            Self::HurtBox => InteractionMask::of(Self::HitBox),
            Self::Solid => InteractionMask::of(Self::Solid),
            Self::JumpReset => InteractionMask::of(Self::Jumper),
            Self::Jumper => InteractionMask::of(Self::JumpReset),
        }
    }

    /// Returns `true` if colliders tagged `self` and `other` should be tested
    /// against each other.
    #[must_use]
    pub const fn interacts_with(self, other: InteractionType) -> bool {
        (self.mask().contains(other) && other.mask().contains(self))
            || (self.bit() == 0 && other.bit() == 0)
    }
}

/// A set of [`InteractionType`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InteractionMask(pub u16);

impl InteractionMask {
    /// Accepts nothing.
    pub const NONE: Self = Self(0);

    /// Accepts every tagged type.
    pub const ALL: Self = Self(u16::MAX);

    /// A mask holding a single type.
    #[must_use]
    pub const fn of(ty: InteractionType) -> Self {
        Self(ty.bit())
    }

    /// The union of two masks.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if `ty` is in the mask.
    #[must_use]
    pub const fn contains(self, ty: InteractionType) -> bool {
        self.0 & ty.bit() != 0
    }
}
