//! Runner state and entity types
//!
//! The runner state exclusively owns every entity list. Entities are plain
//! values; none is referenced from two collections.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::runner::*;
use crate::settings::RunnerVariant;
use crate::sim::rect::{Bounded, Rect};
use crate::sim::schedule::EffectQueue;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunnerPhase {
    Running,
    GameOver,
}

/// The player's runner
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub rect: Rect,
    pub vel_y: f32,
    pub jumping: bool,
    pub has_wings: bool,
    pub wings_active: bool,
    pub wings_recharging: bool,
    pub on_platform: bool,
    pub is_invincible: bool,
    /// Flight resource, always within [0, 100]
    pub wings_power: f32,
    /// Flap animation phase (radians, grows forever)
    pub wing_angle: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(PLAYER_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            vel_y: 0.0,
            jumping: false,
            has_wings: false,
            wings_active: false,
            wings_recharging: false,
            on_platform: false,
            is_invincible: false,
            wings_power: 0.0,
            wing_angle: 0.0,
        }
    }
}

impl Player {
    /// Grant wings with a full tank
    pub fn grant_wings(&mut self) {
        self.has_wings = true;
        self.wings_power = WINGS_MAX_POWER;
        self.wings_recharging = false;
    }

    /// Return to the start height after losing a heart
    pub fn respawn(&mut self) {
        self.rect.pos.y = PLAYER_START_Y;
        self.vel_y = 0.0;
        self.jumping = false;
        self.on_platform = false;
        self.wings_active = false;
    }
}

/// A lava block to jump over
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    pub rect: Rect,
    /// Set once the player has cleared it (scored exactly once)
    pub passed: bool,
    /// Distance from the spawn edge this obstacle must travel before the next spawns
    pub gap: f32,
}

/// Super-jump pad
#[derive(Debug, Clone, Serialize)]
pub struct PowerBoost {
    pub rect: Rect,
    pub used: bool,
}

/// Floating wings pickup
#[derive(Debug, Clone, Serialize)]
pub struct WingPickup {
    pub rect: Rect,
    pub collected: bool,
}

/// Staircase step, solid from above
#[derive(Debug, Clone, Serialize)]
pub struct Platform {
    pub rect: Rect,
}

impl Bounded for Player {
    fn bounds(&self) -> &Rect {
        &self.rect
    }
    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

impl Bounded for Obstacle {
    fn bounds(&self) -> &Rect {
        &self.rect
    }
    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

impl Bounded for PowerBoost {
    fn bounds(&self) -> &Rect {
        &self.rect
    }
    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

impl Bounded for WingPickup {
    fn bounds(&self) -> &Rect {
        &self.rect
    }
    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

impl Bounded for Platform {
    fn bounds(&self) -> &Rect {
        &self.rect
    }
    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

/// Deferred runner effects (time unit: frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunnerEffect {
    EndInvincibility,
}

/// Things that happened during a step, for renderers, toasts and persistence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RunnerEvent {
    ObstaclePassed { score: u64 },
    NewHighScore { score: u64 },
    /// Speed went up; `percent` is relative to the base speed
    SpeedIncreased { percent: u32 },
    PowerBoost { at: Vec2 },
    PlatformsSpawned { count: usize },
    Landed { at: Vec2 },
    WingsAcquired,
    HeartLost { remaining: u8 },
    InvincibilityEnded,
    GameOver { score: u64 },
    Restarted,
}

/// Complete runner session state
#[derive(Debug, Clone, Serialize)]
pub struct RunnerState {
    pub variant: RunnerVariant,
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub phase: RunnerPhase,
    /// Frames advanced this run
    pub frame: u64,
    pub score: u64,
    pub high_score: u64,
    pub game_speed: f32,
    /// Obstacles spawned this run
    pub block_count: u32,
    /// Remaining health (V2 only; V1 keeps it at 1)
    pub hearts: u8,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub power_boosts: Vec<PowerBoost>,
    pub wing_pickups: Vec<WingPickup>,
    pub platforms: Vec<Platform>,
    /// Wings granted this run (V2 threshold grant fires once)
    pub wings_granted: bool,
    pub(crate) effects: EffectQueue<RunnerEffect>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<RunnerEvent>,
}

impl RunnerState {
    /// Create a new run with a starting obstacle
    pub fn new(variant: RunnerVariant, seed: u64, high_score: u64) -> Self {
        let mut state = Self {
            variant,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunnerPhase::Running,
            frame: 0,
            score: 0,
            high_score,
            game_speed: BASE_GAME_SPEED,
            block_count: 0,
            hearts: variant.starting_hearts(),
            player: Player::default(),
            obstacles: Vec::new(),
            power_boosts: Vec::new(),
            wing_pickups: Vec::new(),
            platforms: Vec::new(),
            wings_granted: false,
            effects: EffectQueue::new(),
            events: Vec::new(),
        };
        state.spawn_obstacle();
        state
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunnerPhase::GameOver
    }

    /// Remove and return pending events
    pub fn drain_events(&mut self) -> Vec<RunnerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Speed relative to the base speed, as a whole percentage increase
    pub fn speed_percent(&self) -> u32 {
        ((self.game_speed / BASE_GAME_SPEED - 1.0) * 100.0).round() as u32
    }

    /// Spawn an obstacle at the right edge, with the cadence-driven extras
    pub fn spawn_obstacle(&mut self) {
        self.block_count += 1;
        let height = self
            .rng
            .random_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT);
        let gap = self.rng.random_range(MIN_GAP..MAX_GAP);

        if self.block_count == WINGS_AT_BLOCK && !self.wings_granted {
            match self.variant {
                RunnerVariant::V1 => self.wing_pickups.push(WingPickup {
                    rect: Rect::new(
                        ARENA_WIDTH,
                        WING_PICKUP_Y,
                        WING_PICKUP_SIZE,
                        WING_PICKUP_SIZE,
                    ),
                    collected: false,
                }),
                RunnerVariant::V2 => self.award_wings(),
            }
        }

        if self.block_count % self.variant.speed_up_every() == 0 {
            self.game_speed *= SPEED_STEP;
            let percent = self.speed_percent();
            log::info!("Speed increased to {:.2} (+{}%)", self.game_speed, percent);
            self.events.push(RunnerEvent::SpeedIncreased { percent });
        }

        self.obstacles.push(Obstacle {
            rect: Rect::new(
                ARENA_WIDTH,
                ARENA_HEIGHT - height,
                OBSTACLE_WIDTH,
                height,
            ),
            passed: false,
            gap,
        });

        if self.block_count % BOOST_EVERY == 0 {
            let fraction = BOOST_OFFSET_MIN + self.rng.random::<f32>() * BOOST_OFFSET_SPAN;
            self.spawn_power_boost(ARENA_WIDTH + gap * fraction);
        }

        log::debug!(
            "Spawned obstacle #{} (height {:.1}, gap {:.1})",
            self.block_count,
            height,
            gap
        );
    }

    pub(crate) fn spawn_power_boost(&mut self, x: f32) {
        self.power_boosts.push(PowerBoost {
            rect: Rect::new(x, BOOST_Y, BOOST_SIZE, BOOST_SIZE),
            used: false,
        });
    }

    /// Lay the five-step staircase ahead of a used boost
    pub(crate) fn spawn_staircase(&mut self, boost: &Rect) {
        for step in 0..PLATFORM_STEPS {
            let x = boost.left() + PLATFORM_FIRST_DX + step as f32 * PLATFORM_STEP_DX;
            let y = ARENA_HEIGHT - PLATFORM_FIRST_RISE - step as f32 * PLATFORM_STEP_RISE;
            self.platforms.push(Platform {
                rect: Rect::new(x, y, PLATFORM_WIDTH, PLATFORM_HEIGHT),
            });
        }
        self.events.push(RunnerEvent::PlatformsSpawned {
            count: PLATFORM_STEPS,
        });
    }

    /// Wings are granted at most once per run
    pub(crate) fn award_wings(&mut self) {
        if self.wings_granted {
            return;
        }
        self.wings_granted = true;
        self.player.grant_wings();
        log::info!("Wings acquired");
        self.events.push(RunnerEvent::WingsAcquired);
    }

    /// Add a point and track the high score
    pub(crate) fn add_point(&mut self) {
        self.score += 1;
        self.events.push(RunnerEvent::ObstaclePassed { score: self.score });
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events
                .push(RunnerEvent::NewHighScore { score: self.high_score });
        }
    }

    /// Reinitialise every run field, keeping the high score
    pub fn reset(&mut self) {
        self.effects.advance_generation();
        self.phase = RunnerPhase::Running;
        self.frame = 0;
        self.score = 0;
        self.game_speed = BASE_GAME_SPEED;
        self.block_count = 0;
        self.hearts = self.variant.starting_hearts();
        self.player = Player::default();
        self.obstacles.clear();
        self.power_boosts.clear();
        self.wing_pickups.clear();
        self.platforms.clear();
        self.wings_granted = false;
        self.spawn_obstacle();
        self.events.push(RunnerEvent::Restarted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_has_one_obstacle() {
        let state = RunnerState::new(RunnerVariant::V1, 7, 0);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.block_count, 1);
        let o = &state.obstacles[0];
        assert_eq!(o.rect.left(), ARENA_WIDTH);
        assert_eq!(o.rect.bottom(), ARENA_HEIGHT);
        assert!(o.rect.size.y >= OBSTACLE_MIN_HEIGHT && o.rect.size.y < OBSTACLE_MAX_HEIGHT);
        assert!(o.gap >= MIN_GAP && o.gap < MAX_GAP);
    }

    #[test]
    fn test_boost_every_tenth_spawn_within_gap_window() {
        let mut state = RunnerState::new(RunnerVariant::V1, 42, 0);
        while state.block_count < BOOST_EVERY {
            assert!(state.power_boosts.is_empty());
            state.spawn_obstacle();
        }
        assert_eq!(state.power_boosts.len(), 1);
        let obstacle = state.obstacles.last().unwrap();
        let boost = &state.power_boosts[0];
        let lo = obstacle.rect.left() + obstacle.gap * 0.3;
        let hi = obstacle.rect.left() + obstacle.gap * 0.7;
        assert!(boost.rect.left() >= lo && boost.rect.left() <= hi);
    }

    #[test]
    fn test_speed_up_cadence_per_variant() {
        let mut v1 = RunnerState::new(RunnerVariant::V1, 1, 0);
        let mut v2 = RunnerState::new(RunnerVariant::V2, 1, 0);
        for _ in 1..10 {
            v1.spawn_obstacle();
            v2.spawn_obstacle();
        }
        assert_eq!(v1.game_speed, BASE_GAME_SPEED);
        assert!((v2.game_speed - BASE_GAME_SPEED * SPEED_STEP).abs() < 1e-5);
        for _ in 10..15 {
            v1.spawn_obstacle();
        }
        assert!((v1.game_speed - BASE_GAME_SPEED * SPEED_STEP).abs() < 1e-5);
        assert_eq!(v1.speed_percent(), 5);
    }

    #[test]
    fn test_wings_arrival_per_variant() {
        let mut v1 = RunnerState::new(RunnerVariant::V1, 3, 0);
        let mut v2 = RunnerState::new(RunnerVariant::V2, 3, 0);
        while v1.block_count < WINGS_AT_BLOCK {
            v1.spawn_obstacle();
            v2.spawn_obstacle();
        }
        assert_eq!(v1.wing_pickups.len(), 1);
        assert!(!v1.player.has_wings);
        assert!(v2.wing_pickups.is_empty());
        assert!(v2.player.has_wings);
        assert_eq!(v2.player.wings_power, WINGS_MAX_POWER);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = RunnerState::new(RunnerVariant::V2, 9, 12);
        state.score = 30;
        state.high_score = 30;
        state.hearts = 0;
        state.phase = RunnerPhase::GameOver;
        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 30);
        assert_eq!(state.hearts, MAX_HEARTS);
        assert_eq!(state.obstacles.len(), 1);
        assert!(!state.is_game_over());
    }
}
