//! Session state
//!
//! Everything one playthrough needs lives in `Session`; the host only touches
//! it through `tick` and the queued input.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::player::PlayerCharacter;
use super::shot::Shot;
use crate::config::{Config, ConfigError};

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Every ball destroyed with lives left
    Won,
    /// Out of lives
    Lost,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionPhase::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Playing => "playing",
            SessionPhase::Won => "won",
            SessionPhase::Lost => "lost",
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: Config,
    pub phase: SessionPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Session clock, advanced by the tick interval
    pub time_ms: f64,
    pub lives: u8,
    /// Hits are ignored while `time_ms` is below this
    pub invulnerable_until: Option<f64>,
    pub player: PlayerCharacter,
    /// Live balls; collision checks walk them in this order
    pub balls: Vec<Ball>,
    /// Live shots in firing order
    pub shots: Vec<Shot>,
    /// Next entity ID (shared by player, balls and shots)
    next_id: u32,
}

impl Session {
    /// Validate `config` and set up the opening position
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = PlayerCharacter::centered(
            1,
            config.arena_width,
            config.arena_height,
            config.player_width,
            config.player_height,
        );

        let mut session = Self {
            phase: SessionPhase::Playing,
            time_ticks: 0,
            time_ms: 0.0,
            lives: config.player_lives,
            invulnerable_until: None,
            player,
            balls: Vec::with_capacity(config.initial_ball_count),
            shots: Vec::with_capacity(config.max_shots),
            next_id: 2,
            config,
        };
        session.spawn_initial_balls();

        log::info!(
            "Session started: {}x{} arena, {} balls, {} lives, seed {}",
            session.config.arena_width,
            session.config.arena_height,
            session.balls.len(),
            session.lives,
            session.config.seed
        );

        Ok(session)
    }

    fn spawn_initial_balls(&mut self) {
        let mut rng = Pcg32::seed_from_u64(self.config.seed);
        let (min, max) = (self.config.spawn_min, self.config.spawn_max);

        for _ in 0..self.config.initial_ball_count {
            let pos = Vec2::new(
                rng.random_range(min.x..=max.x),
                rng.random_range(min.y..=max.y),
            );
            let vx = if rng.random_bool(0.5) {
                self.config.ball_speed_x
            } else {
                -self.config.ball_speed_x
            };
            let id = self.allocate_id();
            self.balls
                .push(Ball::new(id, pos, Vec2::new(vx, 0.0), self.config.initial_ball_size));
        }
    }

    /// Allocate a new entity ID
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Arena size used for bounded motion and player clamping
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.config.arena_width, self.config.arena_height)
    }

    /// Adopt a new arena size (e.g. the renderer's bounding box)
    ///
    /// The player is put back on the floor and inside the new width.
    pub fn resize_arena(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            log::warn!("Ignoring arena resize to {}x{}", width, height);
            return;
        }
        self.config.arena_width = width;
        self.config.arena_height = height;
        self.player.pos.y = height - self.player.height;
        self.player.move_left(0.0, Some(width));
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_until
            .is_some_and(|until| self.time_ms < until)
    }

    /// Take a hit unless invulnerable; returns whether a life was lost
    pub fn register_hit(&mut self) -> bool {
        if self.is_invulnerable() || self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        self.invulnerable_until = Some(self.time_ms + self.config.invulnerability_ms);
        log::debug!("Player hit at {:.0}ms, {} lives left", self.time_ms, self.lives);
        true
    }

    /// Fire a shot from the player's center
    ///
    /// Rejected (`None`) when `max_shots` are already in flight or the
    /// session is over.
    pub fn fire_shot(&mut self) -> Option<&Shot> {
        if self.phase.is_terminal() || self.shots.len() >= self.config.max_shots {
            return None;
        }
        let id = self.allocate_id();
        let origin = Vec2::new(
            self.player.center_x() - self.config.shot_width / 2.0,
            self.player.pos.y,
        );
        self.shots
            .push(Shot::new(id, origin, self.config.shot_width, self.config.shot_speed));
        self.shots.last()
    }

    /// Remove the ball at `index` and append its children, if any
    ///
    /// Returns the removed ball's id and the ids of the children. Panics if
    /// `index` is out of bounds, like `Vec::remove`.
    pub fn break_ball(&mut self, index: usize) -> (u32, Option<[u32; 2]>) {
        let ball = self.balls.remove(index);
        let children = ball.split(|| self.allocate_id());
        match children {
            Some([left, right]) => {
                let ids = [left.id(), right.id()];
                log::debug!("Ball {} (size {}) split into {:?}", ball.id(), ball.size, ids);
                self.balls.push(left);
                self.balls.push(right);
                (ball.id(), Some(ids))
            }
            None => {
                log::debug!("Ball {} destroyed", ball.id());
                (ball.id(), None)
            }
        }
    }

    /// Phase implied by the current lives and balls
    pub fn evaluate_phase(&self) -> SessionPhase {
        if self.lives == 0 {
            SessionPhase::Lost
        } else if self.balls.is_empty() {
            SessionPhase::Won
        } else {
            SessionPhase::Playing
        }
    }
}
