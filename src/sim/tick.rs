//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically and reports what
//! changed so a renderer can follow along.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::Rect;
use super::player::PlayerCharacter;
use super::shot::Shot;
use super::state::{Session, SessionPhase};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire a shot (rejected at the shot limit)
    pub fire: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Ball { size: u8 },
    Shot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect(Rect),
}

/// What a renderer needs to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub shape: Shape,
}

impl From<&Ball> for EntityView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id(),
            kind: EntityKind::Ball { size: ball.size },
            shape: Shape::Circle {
                center: ball.pos(),
                radius: ball.radius(),
            },
        }
    }
}

impl From<&Shot> for EntityView {
    fn from(shot: &Shot) -> Self {
        Self {
            id: shot.id,
            kind: EntityKind::Shot,
            shape: Shape::Rect(shot.rect()),
        }
    }
}

impl From<&PlayerCharacter> for EntityView {
    fn from(player: &PlayerCharacter) -> Self {
        Self {
            id: player.id,
            kind: EntityKind::Player,
            shape: Shape::Rect(player.rect()),
        }
    }
}

/// Gameplay events raised during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { id: u32 },
    /// Fire requested with the maximum number of shots in flight
    ShotRejected,
    ShotExpired { id: u32 },
    BallSplit { parent: u32, children: [u32; 2] },
    BallDestroyed { id: u32 },
    /// Player lost a life; blink for `blink_ms`
    PlayerHit { id: u32, lives: u8, blink_ms: f64 },
    PhaseChanged(SessionPhase),
}

/// Everything that changed during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDelta {
    /// Entities that appeared this tick (final positions)
    pub created: Vec<EntityView>,
    /// Entities that existed before this tick and still do
    pub moved: Vec<EntityView>,
    /// Entities that existed before this tick and are gone
    pub destroyed: Vec<u32>,
    pub events: Vec<GameEvent>,
    pub phase: SessionPhase,
}

impl SessionDelta {
    fn new(phase: SessionPhase) -> Self {
        Self {
            created: Vec::new(),
            moved: Vec::new(),
            destroyed: Vec::new(),
            events: Vec::new(),
            phase,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Tracks entity churn within a tick; something born and killed in the
/// same tick never reaches the renderer
#[derive(Default)]
struct Churn {
    born: Vec<u32>,
    died: Vec<u32>,
}

impl Churn {
    fn born(&mut self, id: u32) {
        self.born.push(id);
    }

    fn died(&mut self, id: u32) {
        if let Some(i) = self.born.iter().position(|&b| b == id) {
            self.born.swap_remove(i);
        } else {
            self.died.push(id);
        }
    }
}

impl Session {
    /// Views of every live entity (for the first frame)
    pub fn entity_views(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(1 + self.balls.len() + self.shots.len());
        views.push(EntityView::from(&self.player));
        views.extend(self.balls.iter().map(EntityView::from));
        views.extend(self.shots.iter().map(EntityView::from));
        views
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) -> SessionDelta {
    let mut delta = SessionDelta::new(session.phase);

    // Nothing moves once the session is decided
    if session.phase.is_terminal() {
        return delta;
    }

    let mut churn = Churn::default();
    let arena = session.arena_size();

    // Player input
    let step = session.config.player_step;
    match (input.move_left, input.move_right) {
        (true, false) => session.player.move_left(step, Some(arena.x)),
        (false, true) => session.player.move_right(step, Some(arena.x)),
        _ => {}
    }
    if input.fire {
        match session.fire_shot().map(|shot| shot.id) {
            Some(id) => {
                churn.born(id);
                delta.events.push(GameEvent::ShotFired { id });
            }
            None => delta.events.push(GameEvent::ShotRejected),
        }
    }

    advance_shots(session, &mut delta, &mut churn);

    let gravity = session.config.gravity;
    for ball in &mut session.balls {
        ball.body.apply_gravity(gravity);
        ball.body.move_bounded(arena.x, arena.y);
    }

    resolve_shot_hits(session, &mut delta, &mut churn);

    // Player vs balls
    let touched = session
        .balls
        .iter()
        .any(|ball| session.player.collides_with_ball(ball));
    if touched && session.register_hit() {
        delta.events.push(GameEvent::PlayerHit {
            id: session.player.id,
            lives: session.lives,
            blink_ms: session.config.invulnerability_ms,
        });
    }

    for view in session.entity_views() {
        if churn.born.contains(&view.id) {
            delta.created.push(view);
        } else {
            delta.moved.push(view);
        }
    }
    delta.destroyed = churn.died;

    session.time_ticks += 1;
    session.time_ms += session.config.tick_interval_ms;

    let phase = session.evaluate_phase();
    if phase != session.phase {
        log::info!(
            "Session {} after {} ticks ({} lives left)",
            phase.as_str(),
            session.time_ticks,
            session.lives
        );
        session.phase = phase;
        delta.events.push(GameEvent::PhaseChanged(phase));
    }
    delta.phase = phase;

    delta
}

/// Grow every shot in firing order, dropping the ones past the ceiling
///
/// The legacy pass steps over the shot that slides into a removed shot's
/// slot, leaving it untouched until the next tick.
fn advance_shots(session: &mut Session, delta: &mut SessionDelta, churn: &mut Churn) {
    let legacy = session.config.legacy_shot_removal;
    let mut i = 0;
    while i < session.shots.len() {
        if session.shots[i].advance_or_expire() {
            let shot = session.shots.remove(i);
            log::debug!("Shot {} left the arena", shot.id);
            churn.died(shot.id);
            delta.events.push(GameEvent::ShotExpired { id: shot.id });
            if legacy {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
}

/// Each shot breaks at most one ball: the first colliding one in ball order
fn resolve_shot_hits(session: &mut Session, delta: &mut SessionDelta, churn: &mut Churn) {
    let mut i = 0;
    while i < session.shots.len() {
        let shot = &session.shots[i];
        let Some(index) = session
            .balls
            .iter()
            .position(|ball| shot.collides_with_ball(ball))
        else {
            i += 1;
            continue;
        };

        let shot = session.shots.remove(i);
        churn.died(shot.id);

        let (parent, children) = session.break_ball(index);
        churn.died(parent);
        match children {
            Some(children) => {
                children.iter().for_each(|&id| churn.born(id));
                delta.events.push(GameEvent::BallSplit { parent, children });
            }
            None => delta.events.push(GameEvent::BallDestroyed { id: parent }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const FIRE: TickInput = TickInput {
        move_left: false,
        move_right: false,
        fire: true,
    };

    /// One small ball parked against the left wall, clear of player and shots
    fn quiet_session(config: Config) -> Session {
        let mut session = Session::new(Config {
            initial_ball_count: 1,
            initial_ball_size: 1,
            ..config
        })
        .unwrap();
        let ball = &mut session.balls[0];
        ball.body.pos = Vec2::new(15.0, 300.0);
        ball.body.vel = Vec2::ZERO;
        ball.body.prev_vel = Vec2::ZERO;
        session
    }

    fn place_ball(session: &mut Session, pos: Vec2, size: u8) -> u32 {
        let id = session.allocate_id();
        session.balls.push(Ball::new(id, pos, Vec2::ZERO, size));
        id
    }

    fn place_shot(session: &mut Session, pos: Vec2) -> u32 {
        let id = session.allocate_id();
        let (width, speed) = (session.config.shot_width, session.config.shot_speed);
        session.shots.push(Shot::new(id, pos, width, speed));
        id
    }

    #[test]
    fn test_player_input() {
        let mut session = quiet_session(Config::default());
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut session, &left);
        assert_eq!(session.player.pos.x, 370.0);

        for _ in 0..100 {
            tick(&mut session, &left);
        }
        assert_eq!(session.player.pos.x, 0.0);

        // Both directions cancel out
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut session, &both);
        assert_eq!(session.player.pos.x, 0.0);
    }

    #[test]
    fn test_both_directions_hold_still_at_right_wall() {
        let mut session = quiet_session(Config::default());
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut session, &right);
        }
        assert_eq!(session.player.pos.x, 760.0);

        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        tick(&mut session, &both);
        assert_eq!(session.player.pos.x, 760.0);
    }

    #[test]
    fn test_fire_reports_created_shot() {
        let mut session = quiet_session(Config::default());
        let delta = tick(&mut session, &FIRE);

        let id = session.shots[0].id;
        assert!(delta.events.contains(&GameEvent::ShotFired { id }));
        let created: Vec<u32> = delta.created.iter().map(|v| v.id).collect();
        assert_eq!(created, vec![id]);
        // Already grown one step
        assert_eq!(session.shots[0].pos.y, 530.0);
        assert!(delta.moved.iter().any(|v| v.kind == EntityKind::Player));
    }

    #[test]
    fn test_fire_rejected_at_limit() {
        let mut session = quiet_session(Config::default());
        tick(&mut session, &FIRE);
        tick(&mut session, &FIRE);
        let delta = tick(&mut session, &FIRE);
        assert!(delta.events.contains(&GameEvent::ShotRejected));
        assert_eq!(session.shots.len(), 2);
    }

    #[test]
    fn test_shot_expires_at_ceiling() {
        let mut session = quiet_session(Config::default());
        tick(&mut session, &FIRE);
        let id = session.shots[0].id;

        // Base at 540, speed 10: tip reaches 0 on tick 54, removed on tick 55
        for n in 2..=54 {
            let delta = tick(&mut session, &TickInput::default());
            assert!(delta.destroyed.is_empty(), "expired early on tick {}", n);
        }
        assert_eq!(session.shots[0].pos.y, 0.0);

        let delta = tick(&mut session, &TickInput::default());
        assert!(delta.events.contains(&GameEvent::ShotExpired { id }));
        assert_eq!(delta.destroyed, vec![id]);
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_expiry_visits_every_shot() {
        let mut session = quiet_session(Config::default());
        for x in [100.0, 200.0, 300.0] {
            place_shot(&mut session, Vec2::new(x, 0.0));
        }
        tick(&mut session, &TickInput::default());
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_legacy_expiry_skips_next_shot() {
        let mut session = quiet_session(Config {
            legacy_shot_removal: true,
            ..Default::default()
        });
        let ids: Vec<u32> = [100.0, 200.0, 300.0]
            .into_iter()
            .map(|x| place_shot(&mut session, Vec2::new(x, 0.0)))
            .collect();

        tick(&mut session, &TickInput::default());
        assert_eq!(session.shots.len(), 1);
        assert_eq!(session.shots[0].id, ids[1]);

        tick(&mut session, &TickInput::default());
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_shot_splits_ball() {
        let mut session = quiet_session(Config::default());
        session.balls.clear();
        let parent = place_ball(&mut session, Vec2::new(400.0, 300.0), 4);
        let shot = place_shot(&mut session, Vec2::new(398.0, 380.0));

        let delta = tick(&mut session, &TickInput::default());

        let children = delta
            .events
            .iter()
            .find_map(|e| match e {
                GameEvent::BallSplit { parent: p, children } if *p == parent => Some(*children),
                _ => None,
            })
            .expect("ball should split");
        assert_eq!(children[1], children[0] + 1);
        assert!(children[0] > shot);

        assert!(session.shots.is_empty());
        assert_eq!(session.balls.len(), 2);
        assert!(session.balls.iter().all(|b| b.size == 3));
        assert!(session.balls.iter().all(|b| b.body.vel.y <= 0.0));

        let mut destroyed = delta.destroyed.clone();
        destroyed.sort();
        assert_eq!(destroyed, vec![parent, shot]);
        let created: Vec<u32> = delta.created.iter().map(|v| v.id).collect();
        assert_eq!(created, children.to_vec());
    }

    #[test]
    fn test_shot_breaks_first_ball_in_order_only() {
        let mut session = quiet_session(Config::default());
        session.balls.clear();
        let first = place_ball(&mut session, Vec2::new(400.0, 300.0), 4);
        let second = place_ball(&mut session, Vec2::new(400.0, 300.0), 4);
        place_shot(&mut session, Vec2::new(398.0, 380.0));

        tick(&mut session, &TickInput::default());

        assert_eq!(session.balls.len(), 3);
        assert_eq!(session.balls[0].id(), second);
        assert!(session.balls.iter().all(|b| b.id() != first));
    }

    #[test]
    fn test_smallest_ball_destroyed_wins() {
        let mut session = quiet_session(Config::default());
        session.balls.clear();
        let ball = place_ball(&mut session, Vec2::new(400.0, 360.0), 1);
        place_shot(&mut session, Vec2::new(398.0, 380.0));

        let delta = tick(&mut session, &TickInput::default());
        assert!(delta.events.contains(&GameEvent::BallDestroyed { id: ball }));
        assert!(delta.events.contains(&GameEvent::PhaseChanged(SessionPhase::Won)));
        assert_eq!(session.phase, SessionPhase::Won);

        // Frozen afterwards
        let delta = tick(&mut session, &FIRE);
        assert!(delta.events.is_empty());
        assert!(delta.moved.is_empty());
        assert_eq!(delta.phase, SessionPhase::Won);
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_invulnerability_during_contact() {
        let mut session = quiet_session(Config::default());
        let window = session.config.invulnerability_ms;
        session.balls.clear();
        place_ball(&mut session, Vec2::new(400.0, 560.0), 2);

        let mut hits = Vec::new();
        while hits.len() < 2 {
            // Keep the ball sitting on the player
            let ball = &mut session.balls[0];
            ball.body.pos = Vec2::new(400.0, 560.0);
            ball.body.vel = Vec2::ZERO;

            let now = session.time_ms;
            let delta = tick(&mut session, &TickInput::default());
            if delta
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
            {
                hits.push(now);
            }
            assert!(session.time_ticks < 200);
        }

        assert_eq!(hits[0], 0.0);
        assert!(hits[1] >= window);
        assert!(hits[1] < window + 2.0 * session.config.tick_interval_ms);
        assert_eq!(session.lives, 1);
    }

    #[test]
    fn test_falling_ball_loses_last_life() {
        let mut session = quiet_session(Config {
            player_lives: 1,
            ..Default::default()
        });
        session.balls.clear();
        place_ball(&mut session, Vec2::new(400.0, 300.0), 2);

        let mut lost_at = None;
        for n in 1..=200u32 {
            let delta = tick(&mut session, &TickInput::default());
            assert_ne!(delta.phase, SessionPhase::Won);
            if delta.phase == SessionPhase::Lost {
                let hit = GameEvent::PlayerHit {
                    id: session.player.id,
                    lives: 0,
                    blink_ms: 2000.0,
                };
                assert!(delta.events.contains(&hit));
                lost_at = Some(n);
                break;
            }
        }
        assert!(lost_at.is_some());
        assert_eq!(session.phase, SessionPhase::Lost);
        assert_eq!(session.balls.len(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = Session::new(Config::default()).unwrap();
        let mut b = Session::new(Config::default()).unwrap();

        let inputs = [
            TickInput {
                move_left: true,
                ..Default::default()
            },
            FIRE,
            TickInput::default(),
            TickInput {
                move_right: true,
                fire: true,
                ..Default::default()
            },
        ];
        for _ in 0..50 {
            for input in &inputs {
                assert_eq!(tick(&mut a, input), tick(&mut b, input));
            }
        }
        assert_eq!(a.balls, b.balls);
        assert_eq!(a.shots, b.shots);
        assert_eq!(a.time_ticks, b.time_ticks);
    }
}
