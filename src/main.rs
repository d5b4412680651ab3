//! Lava Stack entry point
//!
//! On the web the page drives `WebRunner` / `WebStack` directly. Natively
//! this binary runs both games headless under a simple autopilot, which is
//! handy for soak testing the sims and the score file.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use serde_json::json;

    use lava_stack::consts::FRAME_RATE;
    use lava_stack::consts::runner::PLAYER_X;
    use lava_stack::sim::runner::{RunnerEvent, RunnerState};
    use lava_stack::sim::stack::{Piece, StackEvent, StackPhase, StackState};
    use lava_stack::{GameId, HighScores, RunnerSession, RunnerVariant, Settings, StackSession};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Game {
        Runner,
        Stack,
        Both,
    }

    #[derive(Parser, Debug)]
    #[command(author, version, about)]
    struct Cli {
        /// Which game to run
        #[arg(long, value_enum, default_value_t = Game::Both)]
        game: Game,
        /// Frames to simulate per game (60 per second)
        #[arg(long, default_value_t = 3600)]
        frames: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Runner rule set: v1 or v2
        #[arg(long)]
        variant: Option<String>,
        /// High score file (JSON); scores stay in memory when omitted
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Settings file (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    pub fn run() {
        env_logger::init();
        let cli = Cli::parse();

        let mut settings = match &cli.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(name) = &cli.variant {
            match RunnerVariant::from_str(name) {
                Some(variant) => settings.runner_variant = variant,
                None => log::warn!(
                    "Unknown runner variant {:?}, keeping {}",
                    name,
                    settings.runner_variant.as_str()
                ),
            }
        }
        let seed = cli.seed.or(settings.seed).unwrap_or_else(time_seed);
        let scores = match &cli.scores {
            Some(path) => HighScores::load_from(path),
            None => HighScores::in_memory(),
        };

        log::info!("Lava Stack (native) starting, seed {}", seed);

        let mut report = serde_json::Map::new();
        if matches!(cli.game, Game::Runner | Game::Both) {
            report.insert(
                "runner".to_string(),
                run_runner(settings.runner_variant, seed, cli.frames, &scores),
            );
        }
        if matches!(cli.game, Game::Stack | Game::Both) {
            match run_stack(&settings, seed, cli.frames, &scores) {
                Ok(summary) => {
                    report.insert("stack".to_string(), summary);
                }
                Err(e) => log::error!("Stack config rejected: {}", e),
            }
        }

        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode report: {}", e),
        }
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn run_runner(
        variant: RunnerVariant,
        seed: u64,
        frames: u32,
        scores: &HighScores,
    ) -> serde_json::Value {
        let mut session = RunnerSession::new(variant, seed, scores.clone());
        let mut runs = 1u32;
        let mut best_run = 0u64;
        let mut hearts_lost = 0u32;

        for _ in 0..frames {
            runner_autopilot(&mut session);
            session.step();

            for event in session.drain_events() {
                match event {
                    RunnerEvent::GameOver { score } => {
                        best_run = best_run.max(score);
                    }
                    RunnerEvent::HeartLost { .. } => hearts_lost += 1,
                    RunnerEvent::SpeedIncreased { percent } => {
                        log::debug!("Runner speed +{}%", percent);
                    }
                    _ => {}
                }
            }
            if session.state().is_game_over() {
                session.restart();
                runs += 1;
            }
        }

        let state = session.state();
        best_run = best_run.max(state.score);
        json!({
            "variant": variant.as_str(),
            "runs": runs,
            "bestRun": best_run,
            "heartsLost": hearts_lost,
            "highScore": scores.get(GameId::Runner),
            "seconds": frames / FRAME_RATE,
        })
    }

    /// Jump when the next unpassed obstacle is close; fly while wings last
    fn runner_autopilot(session: &mut RunnerSession) {
        let state = session.state();
        let lookahead = state.game_speed * 10.0;
        let threat = next_obstacle_distance(state).is_some_and(|d| d < lookahead);
        let player = &state.player;
        let can_fly = player.has_wings && !player.wings_recharging && player.wings_power > 20.0;
        let flying = player.wings_active;

        if threat && can_fly {
            session.activate_flight();
        } else if threat {
            session.jump();
        } else if flying {
            session.deactivate_flight();
        }
    }

    fn next_obstacle_distance(state: &RunnerState) -> Option<f32> {
        let front = state.player.rect.right();
        state
            .obstacles
            .iter()
            .filter(|o| !o.passed && o.rect.right() >= PLAYER_X)
            .map(|o| o.rect.left() - front)
            .filter(|d| *d >= 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }

    fn run_stack(
        settings: &Settings,
        seed: u64,
        frames: u32,
        scores: &HighScores,
    ) -> Result<serde_json::Value, lava_stack::ConfigError> {
        let mut session = StackSession::new(settings.stack.clone(), seed, scores.clone(), 0)?;
        let mut games = 1u32;
        let mut wins = 0u32;
        let mut best_level = 1u32;
        let mut lines = 0u64;

        // One placement every 20 frames, drop timer polled every frame
        for frame in 0..frames as u64 {
            let now_ms = frame * 1000 / FRAME_RATE as u64;
            if frame % 20 == 0 && session.state().is_playing() {
                stack_autopilot(&mut session);
            }
            session.poll(now_ms);

            for event in session.drain_events() {
                match event {
                    StackEvent::LinesCleared { count, .. } => lines += count as u64,
                    StackEvent::LevelUp { level, .. } => best_level = best_level.max(level),
                    StackEvent::Won { .. } => wins += 1,
                    StackEvent::Restarted => games += 1,
                    _ => {}
                }
            }
            // A win never restarts by itself
            let phase = session.state().phase;
            let waiting = phase == StackPhase::GameOver && !settings.stack.auto_restart;
            if phase == StackPhase::Won || waiting {
                session.restart();
            }
        }

        Ok(json!({
            "games": games,
            "wins": wins,
            "bestLevel": best_level,
            "lines": lines,
            "highScore": scores.get(GameId::Stack),
        }))
    }

    /// Pick the rotation and column with the best resting board, then drop
    fn stack_autopilot(session: &mut StackSession) {
        let Some((turns, column)) = best_placement(session.state()) else {
            return;
        };

        for _ in 0..turns {
            session.rotate();
        }
        for _ in 0..session.state().board.width() {
            let x = session.state().current_x;
            if x == column {
                break;
            }
            if x < column {
                session.move_right();
            } else {
                session.move_left();
            }
            if session.state().current_x == x {
                break;
            }
        }
        // Drop until the piece locks
        for _ in 0..=session.state().board.height() + 4 {
            let y = session.state().current_y;
            session.soft_drop();
            if session.state().current_y != y + 1 {
                break;
            }
        }
    }

    fn best_placement(state: &StackState) -> Option<(u32, i32)> {
        let mut piece = state.current.clone();
        let mut best: Option<(i64, u32, i32)> = None;

        for turns in 0..4u32 {
            let width = state.board.width() as i32 - piece.shape.width() as i32;
            for x in 0..=width {
                if let Some(value) = evaluate(state, &piece, x) {
                    if best.is_none_or(|(v, _, _)| value > v) {
                        best = Some((value, turns, x));
                    }
                }
            }
            piece = piece.rotated();
        }
        best.map(|(_, turns, x)| (turns, x))
    }

    /// Higher is better: cleared lines minus holes and stack height
    fn evaluate(state: &StackState, piece: &Piece, x: i32) -> Option<i64> {
        let board = &state.board;
        if !board.is_valid_move(x, state.current_y, piece) {
            return None;
        }
        let mut y = state.current_y;
        while board.is_valid_move(x, y + 1, piece) {
            y += 1;
        }

        let mut after = board.clone();
        after.place(x, y, piece);
        let cleared = after.clear_lines() as i64;

        let mut holes = 0i64;
        let mut height = 0i64;
        for col in 0..after.width() {
            let top = (0..after.height()).find(|&row| after.cell(col, row).is_some());
            if let Some(top) = top {
                height = height.max((after.height() - top) as i64);
                holes += (top..after.height())
                    .filter(|&row| after.cell(col, row).is_none())
                    .count() as i64;
            }
        }
        Some(cleared * 40 - holes * 15 - height * 3)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is lava_stack::wasm_start, this is just to satisfy the compiler
}
