//! Session options
//!
//! Loaded from JSON (missing fields fall back to defaults) and validated
//! before a session is created.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a configuration was refused
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("initial ball size must be between 1 and 4 (got {0})")]
    InvalidBallSize(u8),
    #[error("spawn area {min:?}..{max:?} must be ordered and inside the arena")]
    InvalidSpawnBounds { min: Vec2, max: Vec2 },
    #[error("player {width}x{height} does not fit in the arena")]
    PlayerDoesNotFit { width: f32, height: f32 },
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Balls ===
    pub initial_ball_count: usize,
    pub initial_ball_size: u8,
    /// Ball centers are spawned uniformly inside `spawn_min..=spawn_max`
    pub spawn_min: Vec2,
    pub spawn_max: Vec2,
    pub ball_speed_x: f32,
    pub gravity: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_step: f32,
    pub player_lives: u8,
    pub invulnerability_ms: f64,

    // === Shots ===
    pub shot_speed: f32,
    pub shot_width: f32,
    pub max_shots: usize,
    /// Reproduce the old expiry pass that skips the shot after a removed one
    pub legacy_shot_removal: bool,

    // === Timing ===
    pub tick_interval_ms: f64,
    /// Seed for ball placement
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            initial_ball_count: INITIAL_BALL_COUNT,
            initial_ball_size: MAX_BALL_SIZE,
            spawn_min: Vec2::new(100.0, 100.0),
            spawn_max: Vec2::new(700.0, 200.0),
            ball_speed_x: BALL_SPEED_X,
            gravity: GRAVITY,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_step: PLAYER_STEP,
            player_lives: PLAYER_LIVES,
            invulnerability_ms: INVULNERABILITY_MS,

            shot_speed: SHOT_SPEED,
            shot_width: SHOT_WIDTH,
            max_shots: MAX_SHOTS,
            legacy_shot_removal: false,

            tick_interval_ms: TICK_INTERVAL_MS,
            seed: 0,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl Config {
    /// Parse a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Loading config from {}", path.display());
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations a session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 11] = [
            ("arena_width", self.arena_width as f64),
            ("arena_height", self.arena_height as f64),
            ("ball_speed_x", self.ball_speed_x as f64),
            ("gravity", self.gravity as f64),
            ("player_width", self.player_width as f64),
            ("player_height", self.player_height as f64),
            ("player_step", self.player_step as f64),
            ("shot_speed", self.shot_speed as f64),
            ("shot_width", self.shot_width as f64),
            ("invulnerability_ms", self.invulnerability_ms),
            ("tick_interval_ms", self.tick_interval_ms),
        ];
        for (field, value) in positive {
            require_positive(field, value)?;
        }
        require_positive("max_shots", self.max_shots as f64)?;
        require_positive("player_lives", self.player_lives as f64)?;

        if !(1..=MAX_BALL_SIZE).contains(&self.initial_ball_size) {
            return Err(ConfigError::InvalidBallSize(self.initial_ball_size));
        }

        let (min, max) = (self.spawn_min, self.spawn_max);
        let arena = Vec2::new(self.arena_width, self.arena_height);
        let ordered = min.x <= max.x && min.y <= max.y;
        let inside = min.cmpge(Vec2::ZERO).all() && max.cmple(arena).all();
        if !(ordered && inside && min.is_finite() && max.is_finite()) {
            return Err(ConfigError::InvalidSpawnBounds { min, max });
        }

        if self.player_width > self.arena_width || self.player_height > self.arena_height {
            return Err(ConfigError::PlayerDoesNotFit {
                width: self.player_width,
                height: self.player_height,
            });
        }

        Ok(())
    }
}
