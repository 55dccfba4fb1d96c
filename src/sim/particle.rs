//! Circular rigid bodies
//!
//! A particle moves one velocity step per tick. Bounded motion reflects it off
//! the arena walls; gravity is applied separately so a floor bounce can use
//! the vertical speed from before this tick's gravity impulse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::WALL_INSET;

/// A moving circle with mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    /// Position at the start of the last motion step (rewind target)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Velocity before the last gravity application
    pub prev_vel: Vec2,
    pub radius: f32,
    pub mass: f32,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            vel,
            prev_vel: vel,
            radius,
            mass,
        }
    }

    /// Advance by one velocity step with no walls
    pub fn move_free(&mut self) {
        self.prev_pos = self.pos;
        self.pos += self.vel;
    }

    /// Advance by one velocity step inside a `width` x `height` box
    ///
    /// Any axis whose edge crossed a wall is pushed back to one pixel inside
    /// and has its velocity component inverted. Vertical bounces restore the
    /// pre-gravity speed first so the impulse from this tick is not reflected.
    /// Both edges of each axis are checked every time; an oversized particle
    /// ends up clamped by the last check.
    pub fn move_bounded(&mut self, width: f32, height: f32) {
        self.prev_pos = self.pos;
        self.pos += self.vel;

        let r = self.radius;

        if self.pos.x + r > width {
            self.pos.x = width - r - WALL_INSET;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x - r < 0.0 {
            self.pos.x = r + WALL_INSET;
            self.vel.x = -self.vel.x;
        }

        if self.pos.y + r > height {
            self.pos.y = height - r - WALL_INSET;
            self.vel.y = -self.prev_vel.y;
        }
        if self.pos.y - r < 0.0 {
            self.pos.y = r + WALL_INSET;
            self.vel.y = -self.prev_vel.y;
        }
    }

    /// Accelerate downward by `g`, remembering the previous vertical speed
    pub fn apply_gravity(&mut self, g: f32) {
        self.prev_vel.y = self.vel.y;
        self.vel.y += g;
    }
}

/// Two-body elastic collision
///
/// Both particles are rewound to their previous positions, then velocities
/// are exchanged along the line between their centers so that momentum and
/// kinetic energy are conserved. Coincident centers leave velocities alone.
pub fn resolve_elastic_collision(a: &mut Particle, b: &mut Particle) {
    a.pos = a.prev_pos;
    b.pos = b.prev_pos;

    let delta = a.pos - b.pos;
    let dist_sq = delta.length_squared();
    let total_mass = a.mass + b.mass;
    if dist_sq <= f32::EPSILON || total_mass <= 0.0 {
        return;
    }

    let rel_vel = a.vel - b.vel;
    let impulse = rel_vel.dot(delta) / dist_sq;

    let va = a.vel - (2.0 * b.mass / total_mass) * impulse * delta;
    let vb = b.vel + (2.0 * a.mass / total_mass) * impulse * delta;

    a.vel = va;
    b.vel = vb;
}
