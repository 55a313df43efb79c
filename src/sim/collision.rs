//! Axis-aligned box overlap and tile snapping
//!
//! Everything collides as a rectangle: `pos` is the top-left corner, `size`
//! extends right and down (screen coordinates, +y is down).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Anything with a collision box
pub trait Body {
    fn aabb(&self) -> Aabb;

    fn overlaps(&self, other: &impl Body) -> bool {
        self.aabb().overlaps(&other.aabb())
    }
}

impl Body for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

/// Left edge of the tile column after the one containing `x`
#[inline]
pub fn snap_after_tile(x: f32) -> f32 {
    (x / TILE_SIZE).floor() * TILE_SIZE + TILE_SIZE
}

/// Start of the tile column containing `edge`, minus `extent`
#[inline]
pub fn snap_before_tile(edge: f32, extent: f32) -> f32 {
    (edge / TILE_SIZE).floor() * TILE_SIZE - extent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0));
        let b = Aabb::new(Vec2::new(8.0, 8.0), Vec2::new(16.0, 16.0));
        let c = Aabb::new(Vec2::new(16.0, 0.0), Vec2::new(16.0, 16.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching edges only
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_snap_helpers() {
        assert_eq!(snap_after_tile(17.5), 32.0);
        assert_eq!(snap_after_tile(0.0), 16.0);
        assert_eq!(snap_before_tile(49.0, 16.0), 32.0);
        assert_eq!(snap_before_tile(48.0, 16.0), 32.0);
    }

    #[test]
    fn test_center() {
        let a = Aabb::new(Vec2::new(10.0, 20.0), Vec2::new(16.0, 8.0));
        assert_eq!(a.center(), Vec2::new(18.0, 24.0));
    }
}
