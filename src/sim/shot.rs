//! Shots: a beam that grows upward from where it was fired

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{Rect, circle_intersects_rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    /// Top-left corner; `pos.y` is the beam tip and rises every tick
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Growth per tick
    pub speed: f32,
}

impl Shot {
    /// A zero-height shot whose base sits at `origin`
    pub fn new(id: u32, origin: Vec2, width: f32, speed: f32) -> Self {
        Self {
            id,
            pos: origin,
            width,
            height: 0.0,
            speed,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    /// Grow one step, or report that the tip already reached the ceiling
    ///
    /// Returns `true` when the shot must be discarded.
    pub fn advance_or_expire(&mut self) -> bool {
        if self.pos.y > 0.0 {
            self.height += self.speed;
            self.pos.y -= self.speed;
            false
        } else {
            true
        }
    }

    pub fn collides_with_ball(&self, ball: &Ball) -> bool {
        circle_intersects_rect(ball.pos(), ball.radius(), &self.rect())
    }
}
