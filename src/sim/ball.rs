//! Balls: particles with a discrete size that split when shot

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use crate::consts::{BALL_MASS, BALL_RADII, MAX_BALL_SIZE};

/// Clamp a requested size onto the valid levels (1, 2, 3 stay, anything else is 4)
#[inline]
pub fn normalize_size(size: u8) -> u8 {
    match size {
        1..=3 => size,
        _ => MAX_BALL_SIZE,
    }
}

/// Radius for a size level
#[inline]
pub fn radius_for_size(size: u8) -> f32 {
    BALL_RADII[(normalize_size(size) - 1) as usize]
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub body: Particle,
    /// Size level in 1..=4
    pub size: u8,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: u8) -> Self {
        let size = normalize_size(size);
        Self {
            body: Particle::new(id, pos, vel, radius_for_size(size), BALL_MASS),
            size,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.body.id
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    /// Break the ball after a hit
    ///
    /// Size 1 balls vanish (`None`). Bigger balls yield a left and a right
    /// child one size smaller, placed one parent radius to each side and below
    /// the parent, pushed apart horizontally and always launched upward.
    /// `next_id` is only called when children are produced.
    pub fn split(&self, mut next_id: impl FnMut() -> u32) -> Option<[Ball; 2]> {
        if self.size <= 1 {
            return None;
        }

        let r = self.radius();
        let pos = self.pos();
        let vx = self.body.vel.x.abs();
        let vy = -self.body.vel.y.abs();
        let child_size = self.size - 1;

        let left = Ball::new(
            next_id(),
            Vec2::new(pos.x - r, pos.y + r),
            Vec2::new(-vx, vy),
            child_size,
        );
        let right = Ball::new(
            next_id(),
            Vec2::new(pos.x + r, pos.y + r),
            Vec2::new(vx, vy),
            child_size,
        );
        Some([left, right])
    }
}
