//! Block stack tick, placement, scoring and commands

use super::state::{StackEffect, StackEvent, StackPhase, StackState};
use crate::consts::stack::{LINE_SCORES, MAX_COMBO_MULTIPLIER};

/// Points for one placement clearing `lines` rows.
///
/// `combo` is the streak before this placement. Fractions are floored, with
/// the 10% steps kept in exact integer tenths.
pub fn line_clear_points(lines: u32, combo: u32, level: u32) -> u64 {
    let Some(&base) = LINE_SCORES.get(lines as usize) else {
        return 0;
    };
    let multiplier = (combo + 1).min(MAX_COMBO_MULTIPLIER) as u64;
    let combo_bonus = base * multiplier / 10;
    let level_tenths = 10 + level.saturating_sub(1) as u64;
    (base + combo_bonus) * level_tenths / 10
}

impl StackState {
    /// One gravity step: fall a row or lock in place
    pub fn tick(&mut self) {
        if !self.is_playing() || self.paused {
            return;
        }
        self.move_down();
    }

    fn move_down(&mut self) {
        if self.is_valid_move(self.current_x, self.current_y + 1, &self.current) {
            self.current_y += 1;
        } else {
            self.commit();
        }
    }

    /// Lock the current piece, score, and bring in the next one
    fn commit(&mut self) {
        self.board
            .place(self.current_x, self.current_y, &self.current);
        self.events.push(StackEvent::PiecePlaced {
            kind: self.current.kind,
        });

        let cleared = self.board.clear_lines();
        self.score_lines(cleared);

        match self.check_level_up() {
            LevelOutcome::Won => return,
            // Board and pieces were already replaced
            LevelOutcome::LeveledUp => return,
            LevelOutcome::Same => {}
        }

        self.spawn_next();
        if !self.is_valid_move(self.current_x, self.current_y, &self.current) {
            self.game_over();
        }
    }

    /// Apply the scoring rules for one placement
    fn score_lines(&mut self, cleared: u32) {
        if cleared == 0 {
            self.combo = 0;
            return;
        }

        let points = line_clear_points(cleared, self.combo, self.level);
        self.score += points;
        self.combo += 1;
        self.lines += cleared as u64;
        self.events.push(StackEvent::LinesCleared {
            count: cleared,
            points,
            combo: self.combo,
        });
        log::debug!(
            "Cleared {} line(s) for {} points (combo {})",
            cleared,
            points,
            self.combo
        );

        if self.score > self.high_score {
            self.high_score = self.score;
            self.events
                .push(StackEvent::NewHighScore { score: self.high_score });
        }
    }

    fn check_level_up(&mut self) -> LevelOutcome {
        if self.score < self.points_needed {
            return LevelOutcome::Same;
        }

        if self.level >= self.config.max_level {
            self.phase = StackPhase::Won;
            log::info!("Stack won at level {} with {} points", self.level, self.score);
            self.events.push(StackEvent::Won { score: self.score });
            return LevelOutcome::Won;
        }

        self.level += 1;
        self.score = 0;
        self.points_needed = self.config.points_for_level(self.level);
        self.game_speed_ms = self.config.speed_for_level(self.level);
        self.board.clear();
        self.spawn_fresh();

        log::info!(
            "Level {} (need {} points, drop every {}ms)",
            self.level,
            self.points_needed,
            self.game_speed_ms
        );
        self.events.push(StackEvent::LevelUp {
            level: self.level,
            points_needed: self.points_needed,
        });
        LevelOutcome::LeveledUp
    }

    fn game_over(&mut self) {
        self.phase = StackPhase::GameOver;
        log::info!(
            "Stack game over: score {} at level {} (best {})",
            self.score,
            self.level,
            self.high_score
        );
        self.events.push(StackEvent::GameOver { score: self.score });
        if self.config.auto_restart {
            let due = self.clock_ms + self.config.game_over_delay_ms;
            self.effects.schedule(due, StackEffect::AutoRestart);
        }
    }

    /// Run deferred effects that are due at `now_ms`
    pub fn run_effects(&mut self, now_ms: u64) {
        self.clock_ms = self.clock_ms.max(now_ms);
        for effect in self.effects.drain_due(self.clock_ms) {
            match effect {
                StackEffect::AutoRestart => self.start_fresh(),
            }
        }
    }

    /// Reset everything but the high score and start a new game
    fn start_fresh(&mut self) {
        self.effects.advance_generation();
        self.reset_progress();
        self.spawn_fresh();
        self.phase = StackPhase::Playing;
        self.events.push(StackEvent::Restarted);
    }

    fn can_act(&self) -> bool {
        self.is_playing() && !self.paused
    }

    pub fn move_left(&mut self) {
        if self.can_act() && self.is_valid_move(self.current_x - 1, self.current_y, &self.current) {
            self.current_x -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.can_act() && self.is_valid_move(self.current_x + 1, self.current_y, &self.current) {
            self.current_x += 1;
        }
    }

    /// Move down one row, locking the piece if it cannot
    pub fn soft_drop(&mut self) {
        if self.can_act() {
            self.move_down();
        }
    }

    /// Rotate in place; rejected if the turned piece would not fit
    pub fn rotate(&mut self) {
        if !self.can_act() {
            return;
        }
        let rotated = self.current.rotated();
        if self.is_valid_move(self.current_x, self.current_y, &rotated) {
            self.current = rotated;
        }
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Start over after a win or game over
    pub fn restart(&mut self) {
        if self.phase != StackPhase::Playing {
            self.start_fresh();
        }
    }
}

enum LevelOutcome {
    Same,
    LeveledUp,
    Won,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stack::piece::{Piece, PieceColor, PieceKind};
    use crate::sim::stack::state::StackConfig;

    fn new_state() -> StackState {
        StackState::new(StackConfig::default(), 77, 0).unwrap()
    }

    fn with_piece(state: &mut StackState, kind: PieceKind) {
        state.current = Piece::new(kind);
        state.current_x = 4;
        state.current_y = 0;
    }

    /// Fill row `row` except for columns in `holes`
    fn fill_row_except(state: &mut StackState, row: usize, holes: &[usize]) {
        for col in 0..state.board.width() {
            if !holes.contains(&col) {
                state.board.set(col, row, Some(PieceColor::Red));
            }
        }
    }

    fn drop_to_floor(state: &mut StackState) {
        while state.is_playing() {
            let y = state.current_y;
            state.tick();
            if state.current_y <= y {
                break;
            }
        }
    }

    #[test]
    fn test_scoring_table() {
        assert_eq!(line_clear_points(1, 0, 1), 110);
        assert_eq!(line_clear_points(2, 0, 1), 275);
        assert_eq!(line_clear_points(2, 2, 1), 325);
        assert_eq!(line_clear_points(4, 10, 1), 825);
        // 10% per level above 1
        assert_eq!(line_clear_points(2, 0, 3), 330);
        assert_eq!(line_clear_points(0, 3, 5), 0);
    }

    #[test]
    fn test_tick_moves_down_then_locks() {
        let mut state = new_state();
        with_piece(&mut state, PieceKind::O);
        state.tick();
        assert_eq!(state.current_y, 1);

        drop_to_floor(&mut state);
        // O locked on the floor, a new piece is at the top
        assert_eq!(state.board.filled_count(), 4);
        assert!(state.board.cell(4, 19).is_some());
        assert!(state.board.cell(5, 18).is_some());
        assert_eq!(state.current_y, 0);
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_two_line_clear_scores_and_combo() {
        let mut state = new_state();
        fill_row_except(&mut state, 18, &[4, 5]);
        fill_row_except(&mut state, 19, &[4, 5]);
        with_piece(&mut state, PieceKind::O);
        drop_to_floor(&mut state);

        assert_eq!(state.score, 275);
        assert_eq!(state.combo, 1);
        assert_eq!(state.lines, 2);
        assert!(state.board.is_empty());
        assert!(state.events.contains(&StackEvent::NewHighScore { score: 275 }));
    }

    #[test]
    fn test_combo_multiplier_applies() {
        let mut state = new_state();
        state.combo = 2;
        fill_row_except(&mut state, 18, &[4, 5]);
        fill_row_except(&mut state, 19, &[4, 5]);
        with_piece(&mut state, PieceKind::O);
        drop_to_floor(&mut state);
        assert_eq!(state.score, 325);
        assert_eq!(state.combo, 3);
    }

    #[test]
    fn test_non_clearing_placement_resets_combo() {
        let mut state = new_state();
        state.combo = 4;
        with_piece(&mut state, PieceKind::O);
        drop_to_floor(&mut state);
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_level_up_resets_score_and_board() {
        let mut state = new_state();
        state.score = 400;
        fill_row_except(&mut state, 19, &[4, 5]);
        fill_row_except(&mut state, 18, &[4, 5]);
        fill_row_except(&mut state, 10, &[4, 5]);
        with_piece(&mut state, PieceKind::O);
        drop_to_floor(&mut state);

        assert_eq!(state.level, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.points_needed, 1000);
        assert_eq!(state.game_speed_ms, 910);
        assert!(state.board.is_empty());
        assert!(state.is_playing());
        assert!(state.events.contains(&StackEvent::LevelUp {
            level: 2,
            points_needed: 1000
        }));
        // High score tracks the pre-reset score
        assert_eq!(state.high_score, 675);
    }

    #[test]
    fn test_max_level_wins_instead_of_leveling() {
        let mut state = new_state();
        state.level = 10;
        state.points_needed = state.config.points_for_level(10);
        state.score = state.points_needed - 1;
        fill_row_except(&mut state, 19, &[4, 5]);
        fill_row_except(&mut state, 18, &[4, 5]);
        with_piece(&mut state, PieceKind::O);
        drop_to_floor(&mut state);

        assert_eq!(state.phase, StackPhase::Won);
        assert_eq!(state.level, 10);

        // Frozen until restarted
        let y = state.current_y;
        state.tick();
        state.move_left();
        assert_eq!(state.current_y, y);

        state.restart();
        assert!(state.is_playing());
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert!(state.board.is_empty());
    }

    #[test]
    fn test_blocked_spawn_is_game_over_then_auto_restart() {
        let mut state = new_state();
        // Two holes per row so nothing ever clears; the spawn area is solid
        for row in 0..state.board.height() {
            fill_row_except(&mut state, row, &[8, 9]);
        }
        // Vertical I resting on the floor in column 9
        state.current = Piece::new(PieceKind::I).rotated();
        state.current_x = 9;
        state.current_y = 16;
        state.clock_ms = 5_000;
        state.high_score = 10;

        state.tick();
        assert_eq!(state.phase, StackPhase::GameOver);
        assert!(state.events.iter().any(|e| matches!(e, StackEvent::GameOver { .. })));

        // Frozen while the message shows
        state.tick();
        state.run_effects(6_000);
        assert_eq!(state.phase, StackPhase::GameOver);

        state.run_effects(5_000 + state.config.game_over_delay_ms);
        assert!(state.is_playing());
        assert!(state.board.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.high_score, 10);
    }

    #[test]
    fn test_manual_restart_cancels_auto_restart() {
        let mut state = new_state();
        state.clock_ms = 0;
        state.phase = StackPhase::Playing;
        state.game_over();
        state.restart();
        assert!(state.is_playing());

        // Play on a little, then let the stale auto restart come due
        fill_row_except(&mut state, 19, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let filled = state.board.filled_count();
        state.run_effects(10_000);
        assert_eq!(state.board.filled_count(), filled);
        assert!(!state.events.is_empty());
        let restarts = state
            .events
            .iter()
            .filter(|e| matches!(e, StackEvent::Restarted))
            .count();
        assert_eq!(restarts, 1);
    }

    #[test]
    fn test_rotation_rejected_when_blocked() {
        let mut state = new_state();
        with_piece(&mut state, PieceKind::I);
        state.current_y = 10;
        // Rotated I would occupy column 4 rows 10..=13
        state.board.set(4, 12, Some(PieceColor::Blue));
        let before = state.current.clone();
        state.rotate();
        assert_eq!(state.current, before);

        state.board.set(4, 12, None);
        state.rotate();
        assert_eq!(state.current.shape.width(), 1);
    }

    #[test]
    fn test_rotation_rejected_at_wall() {
        let mut state = new_state();
        with_piece(&mut state, PieceKind::I);
        state.current = state.current.rotated();
        state.current_x = 8;
        state.current_y = 5;
        let before = state.current.clone();
        state.rotate();
        assert_eq!(state.current, before);
    }

    #[test]
    fn test_horizontal_moves_stop_at_walls() {
        let mut state = new_state();
        with_piece(&mut state, PieceKind::O);
        for _ in 0..20 {
            state.move_left();
        }
        assert_eq!(state.current_x, 0);
        for _ in 0..20 {
            state.move_right();
        }
        assert_eq!(state.current_x, 8);
    }

    #[test]
    fn test_pause_suppresses_tick_and_commands() {
        let mut state = new_state();
        with_piece(&mut state, PieceKind::T);
        state.pause();
        state.tick();
        state.soft_drop();
        state.move_left();
        assert_eq!((state.current_x, state.current_y), (4, 0));
        state.resume();
        state.tick();
        assert_eq!(state.current_y, 1);
    }
}
