//! Super Pang - shoot the bouncing balls until none are left
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particles, collisions, session state)
//! - `config`: Session options with validation
//! - `renderer`: Sink trait for whatever draws the session
//! - `web`: Browser bridge (wasm32 only)

pub mod config;
pub mod renderer;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Config, ConfigError};
pub use renderer::{Renderer, present};
pub use sim::{Session, SessionDelta, SessionPhase, TickInput, tick};

/// Default game tuning. All distances are pixels, all speeds are per tick.
pub mod consts {
    /// Host tick cadence (30 Hz)
    pub const TICK_INTERVAL_MS: f64 = 1000.0 / 30.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ball radius per size level (index = size - 1)
    pub const BALL_RADII: [f32; 4] = [10.0, 20.0, 40.0, 70.0];
    /// Largest ball size; anything outside 1..=3 normalizes to this
    pub const MAX_BALL_SIZE: u8 = 4;
    pub const BALL_MASS: f32 = 1.0;
    pub const INITIAL_BALL_COUNT: usize = 2;
    /// Horizontal speed of freshly spawned balls
    pub const BALL_SPEED_X: f32 = 3.0;
    /// Downward acceleration (px/tick²)
    pub const GRAVITY: f32 = 0.3;

    /// Player character box
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_STEP: f32 = 10.0;
    pub const PLAYER_LIVES: u8 = 3;
    pub const INVULNERABILITY_MS: f64 = 2000.0;

    /// Shots
    pub const SHOT_SPEED: f32 = 10.0;
    pub const SHOT_WIDTH: f32 = 4.0;
    pub const MAX_SHOTS: usize = 2;

    /// Inset applied when a particle is pushed back off a wall
    pub const WALL_INSET: f32 = 1.0;
}
