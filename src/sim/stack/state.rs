//! Block stack state, configuration and progression rules

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::piece::{Piece, PieceKind};
use crate::consts::stack::*;
use crate::error::ConfigError;
use crate::sim::schedule::EffectQueue;

/// Board size and progression curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub initial_speed_ms: u64,
    pub min_speed_ms: u64,
    pub base_points_for_level: u64,
    pub max_level: u32,
    /// How long the game-over message shows before a fresh game starts
    pub game_over_delay_ms: u64,
    /// Start a fresh game automatically after the game-over delay
    pub auto_restart: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            initial_speed_ms: INITIAL_SPEED_MS,
            min_speed_ms: MIN_SPEED_MS,
            base_points_for_level: BASE_POINTS_FOR_LEVEL,
            max_level: MAX_LEVEL,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            auto_restart: true,
        }
    }
}

impl StackConfig {
    /// Check the fixed shape table and curve against this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.max_level == 0 {
            return Err(ConfigError::NoLevels);
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err(ConfigError::SpeedRange {
                initial_ms: self.initial_speed_ms,
                min_ms: self.min_speed_ms,
            });
        }
        for kind in PieceKind::ALL {
            // Every orientation must fit, since rotation happens in place
            let mut shape = kind.shape();
            for _ in 0..4 {
                if shape.width() > self.board_width || shape.height() > self.board_height {
                    return Err(ConfigError::PieceTooLarge {
                        kind: kind.as_str(),
                        piece_width: shape.width(),
                        piece_height: shape.height(),
                        width: self.board_width,
                        height: self.board_height,
                    });
                }
                shape = shape.rotated();
            }
        }
        Ok(())
    }

    /// Drop interval for a level, linear from initial to minimum
    pub fn speed_for_level(&self, level: u32) -> u64 {
        let step = (self.initial_speed_ms - self.min_speed_ms) / self.max_level as u64;
        self.initial_speed_ms
            .saturating_sub(level.saturating_sub(1) as u64 * step)
            .max(self.min_speed_ms)
    }

    /// Score needed to leave `level`
    pub fn points_for_level(&self, level: u32) -> u64 {
        self.base_points_for_level * level as u64
    }
}

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackPhase {
    Playing,
    /// Board filled at spawn; waiting for restart
    GameOver,
    /// Cleared the top level; waiting for restart
    Won,
}

/// Deferred stack effects (time unit: milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackEffect {
    AutoRestart,
}

/// Things that happened during a tick or command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StackEvent {
    PiecePlaced { kind: PieceKind },
    LinesCleared { count: u32, points: u64, combo: u32 },
    NewHighScore { score: u64 },
    LevelUp { level: u32, points_needed: u64 },
    Won { score: u64 },
    GameOver { score: u64 },
    Restarted,
}

/// Complete block stack session state
#[derive(Debug, Clone, Serialize)]
pub struct StackState {
    pub config: StackConfig,
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub phase: StackPhase,
    pub paused: bool,
    pub board: Board,
    pub current: Piece,
    /// Origin of the current piece (column, row); row may be negative
    pub current_x: i32,
    pub current_y: i32,
    /// Look-ahead piece shown in the preview
    pub next: Piece,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
    pub points_needed: u64,
    pub combo: u32,
    /// Lines cleared across the whole session
    pub lines: u64,
    pub game_speed_ms: u64,
    /// Host clock at the last poll (ms)
    pub clock_ms: u64,
    pub(crate) effects: EffectQueue<StackEffect>,
    #[serde(skip)]
    pub events: Vec<StackEvent>,
}

impl StackState {
    /// Create a game; fails only if the configuration cannot hold the pieces
    pub fn new(config: StackConfig, seed: u64, high_score: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = random_piece(&mut rng);
        let next = random_piece(&mut rng);
        let mut state = Self {
            board: Board::new(config.board_width, config.board_height),
            points_needed: config.points_for_level(1),
            game_speed_ms: config.initial_speed_ms,
            config,
            seed,
            rng,
            phase: StackPhase::Playing,
            paused: false,
            current,
            current_x: 0,
            current_y: 0,
            next,
            score: 0,
            high_score,
            level: 1,
            combo: 0,
            lines: 0,
            clock_ms: 0,
            effects: EffectQueue::new(),
            events: Vec::new(),
        };
        state.center_current();
        Ok(state)
    }

    /// Remove and return pending events
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == StackPhase::Playing
    }

    /// Points still missing for the next level
    pub fn points_to_next_level(&self) -> u64 {
        self.points_needed.saturating_sub(self.score)
    }

    pub fn is_valid_move(&self, x: i32, y: i32, piece: &Piece) -> bool {
        self.board.is_valid_move(x, y, piece)
    }

    /// Place the current piece at the spawn origin
    fn center_current(&mut self) {
        let width = self.config.board_width as i32;
        self.current_x = width / 2 - self.current.shape.width() as i32 / 2;
        self.current_y = 0;
    }

    /// Promote the look-ahead piece and generate a new one
    pub(crate) fn spawn_next(&mut self) {
        let next = random_piece(&mut self.rng);
        self.current = std::mem::replace(&mut self.next, next);
        self.center_current();
    }

    /// Discard both pieces and draw two fresh ones
    pub(crate) fn spawn_fresh(&mut self) {
        self.next = random_piece(&mut self.rng);
        self.spawn_next();
    }

    /// Reinitialise progression and board, keeping the high score
    pub(crate) fn reset_progress(&mut self) {
        self.board.clear();
        self.score = 0;
        self.level = 1;
        self.combo = 0;
        self.lines = 0;
        self.game_speed_ms = self.config.initial_speed_ms;
        self.points_needed = self.config.points_for_level(1);
        self.paused = false;
    }
}

fn random_piece(rng: &mut Pcg32) -> Piece {
    let kind = PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())];
    Piece::new(kind)
}
