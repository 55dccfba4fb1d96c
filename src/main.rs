//! Super Pang entry point
//!
//! Native builds run a headless session driven by a simple autopilot and log
//! the outcome. The browser build goes through `super_pang::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use super_pang::sim::{GameEvent, Session, SessionPhase, TickInput, tick};
    use super_pang::{Config, ConfigError};

    /// Five minutes of play at the default cadence
    const MAX_TICKS: u64 = 30 * 60 * 5;

    pub fn load_config(path: Option<String>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::from_file(path),
            None => Ok(Config::default()),
        }
    }

    /// Chase the lowest ball and keep firing
    fn autopilot(session: &Session) -> TickInput {
        let target = session
            .balls
            .iter()
            .max_by(|a, b| {
                a.pos()
                    .y
                    .partial_cmp(&b.pos().y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|ball| ball.pos().x);

        let center = session.player.center_x();
        let step = session.config.player_step;
        let (move_left, move_right) = match target {
            Some(x) if x < center - step => (true, false),
            Some(x) if x > center + step => (false, true),
            _ => (false, false),
        };

        TickInput {
            move_left,
            move_right,
            fire: true,
        }
    }

    pub fn run(config: Config) -> Result<SessionPhase, ConfigError> {
        let mut session = Session::new(config)?;
        let mut splits = 0u32;

        while session.time_ticks < MAX_TICKS {
            let input = autopilot(&session);
            let delta = tick(&mut session, &input);

            for event in &delta.events {
                match event {
                    GameEvent::BallSplit { .. } | GameEvent::BallDestroyed { .. } => splits += 1,
                    GameEvent::PlayerHit { lives, .. } => {
                        log::info!("Hit at tick {}, {} lives left", session.time_ticks, lives)
                    }
                    _ => {}
                }
            }

            if delta.is_terminal() {
                break;
            }
        }

        log::info!(
            "Finished: {} after {} ticks ({:.1}s), {} balls popped, {} left",
            session.phase.as_str(),
            session.time_ticks,
            session.time_ms / 1000.0,
            splits,
            session.balls.len()
        );
        Ok(session.phase)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Super Pang (headless) starting...");

    let result = headless::load_config(std::env::args().nth(1)).and_then(headless::run);
    match result {
        Ok(phase) => println!("{}", phase.as_str()),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is super_pang::web::WebSession, this is just to satisfy the compiler
}
