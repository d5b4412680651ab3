//! Re-armed drop timer
//!
//! Emulates a single-shot host timer that is re-armed after every tick with
//! the *current* drop interval, so a level-up speed change applies from the
//! next tick on. Pausing suppresses the tick but the timer keeps re-arming.

use serde::Serialize;

use super::state::StackState;

#[derive(Debug, Clone, Serialize)]
pub struct DropTimer {
    /// Host time (ms) at which the next tick fires
    next_due_ms: u64,
}

impl DropTimer {
    /// Arm the first tick one interval after `now_ms`
    pub fn start(state: &StackState, now_ms: u64) -> Self {
        Self {
            next_due_ms: now_ms + state.game_speed_ms,
        }
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Fire every tick due by `now_ms`. Returns the number of timer firings.
    pub fn poll(&mut self, state: &mut StackState, now_ms: u64) -> u32 {
        let mut fired = 0;
        while self.next_due_ms <= now_ms {
            let at = self.next_due_ms;
            state.run_effects(at);
            state.tick();
            self.next_due_ms = at + state.game_speed_ms.max(1);
            fired += 1;
        }
        state.run_effects(now_ms);
        fired
    }
}
