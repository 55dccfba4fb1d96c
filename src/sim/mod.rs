//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (vector order, never hash order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod geometry;
pub mod particle;
pub mod player;
pub mod shot;
pub mod state;
pub mod tick;

pub use ball::{Ball, radius_for_size};
pub use geometry::{Rect, circle_intersects_circle, circle_intersects_rect, distance};
pub use particle::{Particle, resolve_elastic_collision};
pub use player::PlayerCharacter;
pub use shot::Shot;
pub use state::{Session, SessionPhase};
pub use tick::{EntityKind, EntityView, GameEvent, SessionDelta, Shape, TickInput, tick};
