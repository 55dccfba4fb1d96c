//! Geometry helpers shared by every collision test
//!
//! Balls are circles, the player and shots are axis-aligned rectangles.
//! Screen coordinates: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(pos: Vec2, width: f32, height: f32) -> Self {
        Self { pos, width, height }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Point of the rectangle nearest to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Circle vs rectangle overlap
///
/// Clamps the circle center onto the rectangle and compares the distance to
/// that nearest point with the radius. Touching counts as a hit.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    distance(center, rect.clamp_point(center)) <= radius
}

/// Circle vs circle overlap (touching does not count)
#[inline]
pub fn circle_intersects_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    distance(c1, c2) < r1 + r2
}
