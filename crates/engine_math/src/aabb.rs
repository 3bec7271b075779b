//! Axis-aligned bounding boxes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::transform::Transform2D;

/// An axis-aligned box described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    /// Bottom-left corner.
    pub min: Vec2,
    /// Top-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Build a box from two corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Build a box from its centre and half-extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self::from_corners(center - half_extents, center + half_extents)
    }

    /// The world-space box covered by the unit rectangle under `transform`.
    #[must_use]
    pub fn from_transform(transform: &Transform2D) -> Self {
        Self::from_corners(transform.bottom_left(), transform.top_right())
    }

    /// Returns `true` if the boxes overlap on both axes.
    ///
    /// The comparison is strict: boxes that only share an edge or a corner
    /// do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        other.max.x > self.min.x
            && self.max.x > other.min.x
            && other.max.y > self.min.y
            && self.max.y > other.min.y
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Half of the box's side lengths.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) / 2.0
    }

    /// The box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f32, y: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec2::new(x, y), Vec2::ONE)
    }

    #[test]
    fn test_from_transform_matches_corners() {
        let t = Transform2D::from_translation_and_scale(Vec2::new(1.0, 2.0), Vec2::new(0.5, 1.5));
        let aabb = Aabb::from_transform(&t);
        assert_eq!(aabb.min, Vec2::new(0.5, 0.5));
        assert_eq!(aabb.max, Vec2::new(1.5, 3.5));
        assert_eq!(aabb.center(), t.translation);
        assert_eq!(aabb.half_extents(), t.scale);
    }

    #[test]
    fn test_negative_scale_is_normalised() {
        let t = Transform2D::from_translation_and_scale(Vec2::ZERO, Vec2::new(-1.0, 2.0));
        let aabb = Aabb::from_transform(&t);
        assert_eq!(aabb.min, Vec2::new(-1.0, -2.0));
        assert_eq!(aabb.max, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_overlap() {
        assert!(unit_at(0.0, 0.0).overlaps(&unit_at(1.5, 0.5)));
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(3.0, 0.0)));
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(0.0, -2.5)));
    }

    #[test]
    fn test_shared_edge_is_not_an_overlap() {
        // Right edge of the first box and left edge of the second at x = 1.
        let a = unit_at(0.0, 0.0);
        let b = unit_at(2.0, 0.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        // Shared corner only.
        assert!(!a.overlaps(&unit_at(2.0, 2.0)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let offsets = [-2.5_f32, -2.0, -1.25, -0.5, 0.0, 0.75, 1.999, 2.0, 3.0];
        let scales = [0.25_f32, 1.0, 1.75];
        for &dx in &offsets {
            for &dy in &offsets {
                for &sx in &scales {
                    for &sy in &scales {
                        let a = unit_at(0.0, 0.0);
                        let b = Aabb::from_center_half_extents(Vec2::new(dx, dy), Vec2::new(sx, sy));
                        assert_eq!(a.overlaps(&b), b.overlaps(&a), "dx={dx} dy={dy} sx={sx} sy={sy}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_translated() {
        let moved = unit_at(0.0, 0.0).translated(Vec2::new(1.0, -1.0));
        assert_eq!(moved, unit_at(1.0, -1.0));
    }
}
