//! Browser bridge
//!
//! The page owns the animation loop and the SVG scene; it calls `tick` once
//! per fixed interval and applies the returned JSON delta.

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::sim::{Session, TickInput, tick};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    });
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Start a session; an empty string uses the default config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebSession, JsValue> {
        init_logging();
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json).map_err(js_error)?
        };
        let session = Session::new(config).map_err(js_error)?;
        Ok(Self { session })
    }

    /// Run one tick and return the delta as JSON
    pub fn tick(
        &mut self,
        move_left: bool,
        move_right: bool,
        fire: bool,
    ) -> Result<String, JsValue> {
        let input = TickInput {
            move_left,
            move_right,
            fire,
        };
        let delta = tick(&mut self.session, &input);
        serde_json::to_string(&delta).map_err(js_error)
    }

    /// Every live entity as JSON (first frame)
    pub fn entities(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.entity_views()).map_err(js_error)
    }

    /// Use the rendered arena box as the container
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize_arena(width, height);
    }

    pub fn phase(&self) -> String {
        self.session.phase.as_str().to_string()
    }

    pub fn lives(&self) -> u8 {
        self.session.lives
    }

    #[wasm_bindgen(js_name = tickIntervalMs)]
    pub fn tick_interval_ms(&self) -> f64 {
        self.session.config.tick_interval_ms
    }
}
