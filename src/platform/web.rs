//! Browser bindings
//!
//! Thin `wasm_bindgen` wrappers around the sessions. The page drives them
//! from `requestAnimationFrame` and key handlers, and draws from the JSON
//! snapshots.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::platform::FrameClock;
use crate::session::{RunnerSession, StackSession};
use crate::settings::{RunnerVariant, Settings};

fn seed_from(settings: &Settings) -> u64 {
    settings
        .seed
        .unwrap_or_else(|| js_sys::Date::now() as u64)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Runner game for the page
#[wasm_bindgen]
pub struct WebRunner {
    session: RunnerSession,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebRunner {
    /// `variant` overrides the stored setting when it names a rule set
    #[wasm_bindgen(constructor)]
    pub fn new(variant: Option<String>) -> WebRunner {
        let settings = Settings::load();
        let variant = variant
            .as_deref()
            .and_then(RunnerVariant::from_str)
            .unwrap_or(settings.runner_variant);
        WebRunner {
            session: RunnerSession::new(variant, seed_from(&settings), HighScores::load()),
            clock: FrameClock::new(),
        }
    }

    /// Feed host frame time in seconds; returns sim frames run
    pub fn frame(&mut self, dt: f32) -> u32 {
        let steps = self.clock.update(dt);
        self.session.step_n(steps);
        steps
    }

    pub fn jump(&mut self) {
        self.session.jump();
    }

    pub fn super_jump(&mut self) {
        self.session.super_jump();
    }

    pub fn flight_on(&mut self) {
        self.session.activate_flight();
    }

    pub fn flight_off(&mut self) {
        self.session.deactivate_flight();
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.clock.reset();
    }

    pub fn is_game_over(&self) -> bool {
        self.session.state().is_game_over()
    }

    /// Full state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(self.session.state())
    }

    /// Events since the last call, as a JSON array
    pub fn events(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.drain_events())
    }
}

/// Block stack game for the page
#[wasm_bindgen]
pub struct WebStack {
    session: StackSession,
}

#[wasm_bindgen]
impl WebStack {
    /// Start at page time `now_ms` (e.g. `performance.now()`)
    #[wasm_bindgen(constructor)]
    pub fn new(now_ms: f64) -> Result<WebStack, JsValue> {
        let settings = Settings::load();
        let session = StackSession::new(
            settings.stack.clone(),
            seed_from(&settings),
            HighScores::load(),
            now_ms.max(0.0) as u64,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebStack { session })
    }

    /// Run every drop tick due by `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        self.session.poll(now_ms.max(0.0) as u64)
    }

    pub fn move_left(&mut self) {
        self.session.move_left();
    }

    pub fn move_right(&mut self) {
        self.session.move_right();
    }

    pub fn soft_drop(&mut self) {
        self.session.soft_drop();
    }

    pub fn rotate(&mut self) {
        self.session.rotate();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Full state as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        to_json(self.session.state())
    }

    /// Events since the last call, as a JSON array
    pub fn events(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.drain_events())
    }
}
