//! Renderer seam
//!
//! The simulation never draws. Whatever owns the visuals (SVG, canvas, a
//! terminal) implements `Renderer` and receives the tick deltas through
//! `present`. Renderers never mutate session state.

use glam::Vec2;

use crate::sim::{EntityView, GameEvent, Session, SessionDelta};

pub trait Renderer {
    /// A new visual primitive for `view`
    fn create(&mut self, view: &EntityView);
    /// Move/resize an existing primitive
    fn update(&mut self, view: &EntityView);
    fn remove(&mut self, id: u32);
    /// Toggle visibility of `id` for `duration_ms`
    fn blink(&mut self, id: u32, duration_ms: f64);
    /// Rendered arena size, if the renderer knows it
    fn arena_bounds(&self) -> Option<Vec2> {
        None
    }
}

/// Draw every live entity (first frame or after a reset)
pub fn present_all(session: &Session, renderer: &mut impl Renderer) {
    for view in session.entity_views() {
        renderer.create(&view);
    }
}

/// Replay one tick's changes
pub fn present(delta: &SessionDelta, renderer: &mut impl Renderer) {
    for id in &delta.destroyed {
        renderer.remove(*id);
    }
    for view in &delta.created {
        renderer.create(view);
    }
    for view in &delta.moved {
        renderer.update(view);
    }
    for event in &delta.events {
        if let GameEvent::PlayerHit { id, blink_ms, .. } = event {
            renderer.blink(*id, *blink_ms);
        }
    }
}

/// Adopt the renderer's arena size as the container for bounded motion
pub fn sync_arena(session: &mut Session, renderer: &impl Renderer) {
    if let Some(bounds) = renderer.arena_bounds() {
        if bounds != session.arena_size() {
            log::info!("Arena resized to {}x{}", bounds.x, bounds.y);
            session.resize_arena(bounds.x, bounds.y);
        }
    }
}
