//! The player character: a box sliding along the arena floor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::{Rect, circle_intersects_rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl PlayerCharacter {
    pub fn new(id: u32, pos: Vec2, width: f32, height: f32) -> Self {
        Self {
            id,
            pos,
            width,
            height,
        }
    }

    /// Standing on the floor, horizontally centered
    pub fn centered(id: u32, arena_width: f32, arena_height: f32, width: f32, height: f32) -> Self {
        Self::new(
            id,
            Vec2::new((arena_width - width) / 2.0, arena_height - height),
            width,
            height,
        )
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    /// Horizontal center (shots leave from here)
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Step right; with a container width the box stays inside `[0, width]`
    pub fn move_right(&mut self, step: f32, container_width: Option<f32>) {
        self.pos.x += step;
        self.clamp_x(container_width);
    }

    /// Step left; with a container width the box stays inside `[0, width]`
    pub fn move_left(&mut self, step: f32, container_width: Option<f32>) {
        self.pos.x -= step;
        self.clamp_x(container_width);
    }

    fn clamp_x(&mut self, container_width: Option<f32>) {
        if let Some(width) = container_width {
            let max_x = (width - self.width).max(0.0);
            self.pos.x = self.pos.x.clamp(0.0, max_x);
        }
    }

    pub fn collides_with_ball(&self, ball: &Ball) -> bool {
        circle_intersects_rect(ball.pos(), ball.radius(), &self.rect())
    }
}
