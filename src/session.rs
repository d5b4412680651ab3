//! Sessions: a simulation wired to the high score table
//!
//! The sims only know their in-memory best score. A session seeds that value
//! from storage at start, forwards commands, and writes every new best back
//! as soon as the sim reports it. Events are buffered for the host.

use crate::error::ConfigError;
use crate::highscores::{GameId, HighScores};
use crate::settings::RunnerVariant;
use crate::sim::runner::{RunnerEvent, RunnerState};
use crate::sim::stack::{DropTimer, StackConfig, StackEvent, StackState};

/// Runner game plus persistence
#[derive(Debug)]
pub struct RunnerSession {
    state: RunnerState,
    scores: HighScores,
    events: Vec<RunnerEvent>,
}

impl RunnerSession {
    pub fn new(variant: RunnerVariant, seed: u64, scores: HighScores) -> Self {
        let best = scores.get(GameId::Runner);
        log::info!(
            "Runner {} started (seed {}, best {})",
            variant.as_str(),
            seed,
            best
        );
        Self {
            state: RunnerState::new(variant, seed, best),
            scores,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Advance one frame
    pub fn step(&mut self) {
        self.state.advance();
        self.sync();
    }

    /// Advance `frames` frames
    pub fn step_n(&mut self, frames: u32) {
        for _ in 0..frames {
            self.step();
        }
    }

    pub fn jump(&mut self) {
        self.state.jump();
        self.sync();
    }

    pub fn super_jump(&mut self) {
        self.state.super_jump();
        self.sync();
    }

    pub fn activate_flight(&mut self) {
        self.state.activate_flight();
    }

    pub fn deactivate_flight(&mut self) {
        self.state.deactivate_flight();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.sync();
    }

    /// Remove and return events since the last drain
    pub fn drain_events(&mut self) -> Vec<RunnerEvent> {
        std::mem::take(&mut self.events)
    }

    fn sync(&mut self) {
        for event in self.state.drain_events() {
            match event {
                RunnerEvent::NewHighScore { score } | RunnerEvent::GameOver { score } => {
                    self.scores.record(GameId::Runner, score);
                }
                _ => {}
            }
            self.events.push(event);
        }
    }
}

/// Block stack game, its drop timer and persistence
#[derive(Debug)]
pub struct StackSession {
    state: StackState,
    timer: DropTimer,
    scores: HighScores,
    events: Vec<StackEvent>,
}

impl StackSession {
    /// Start a game at host time `now_ms`
    pub fn new(
        config: StackConfig,
        seed: u64,
        scores: HighScores,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        let best = scores.get(GameId::Stack);
        let mut state = StackState::new(config, seed, best)?;
        state.run_effects(now_ms);
        let timer = DropTimer::start(&state, now_ms);
        log::info!("Stack started (seed {}, best {})", seed, best);
        Ok(Self {
            state,
            timer,
            scores,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    /// Fire every drop tick and deferred effect due by `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let fired = self.timer.poll(&mut self.state, now_ms);
        self.sync();
        fired
    }

    pub fn move_left(&mut self) {
        self.state.move_left();
    }

    pub fn move_right(&mut self) {
        self.state.move_right();
    }

    pub fn soft_drop(&mut self) {
        self.state.soft_drop();
        self.sync();
    }

    pub fn rotate(&mut self) {
        self.state.rotate();
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    pub fn toggle_pause(&mut self) {
        if self.state.paused {
            self.state.resume();
        } else {
            self.state.pause();
        }
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.sync();
    }

    /// Remove and return events since the last drain
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    fn sync(&mut self) {
        for event in self.state.drain_events() {
            match event {
                StackEvent::NewHighScore { score }
                | StackEvent::GameOver { score }
                | StackEvent::Won { score } => {
                    self.scores.record(GameId::Stack, score);
                }
                _ => {}
            }
            self.events.push(event);
        }
    }
}
