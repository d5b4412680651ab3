//! Per-frame runner update and input commands
//!
//! One `advance` call is one rendered frame. Physics constants are tuned per
//! frame, so hosts should pace calls with `platform::FrameClock`.

use glam::Vec2;

use super::state::{RunnerEffect, RunnerEvent, RunnerPhase, RunnerState};
use crate::consts::runner::*;
use crate::settings::RunnerVariant;
use crate::sim::rect::{Bounded, scroll_and_cull};

impl RunnerState {
    /// Advance the run by one frame
    pub fn advance(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.frame += 1;

        for effect in self.effects.drain_due(self.frame) {
            match effect {
                RunnerEffect::EndInvincibility => {
                    self.player.is_invincible = false;
                    self.events.push(RunnerEvent::InvincibilityEnded);
                }
            }
        }

        self.player.wing_angle += WING_FLAP_SPEED;

        if self.player.has_wings {
            self.update_wings();
        }

        self.player.vel_y += GRAVITY;
        self.player.rect.pos.y += self.player.vel_y;

        if self.variant.has_platforms() {
            self.resolve_platforms();
        }

        if !self.player.on_platform && self.player.rect.bottom() > ARENA_HEIGHT {
            self.player.rect.set_bottom(ARENA_HEIGHT);
            self.player.vel_y = 0.0;
            self.player.jumping = false;
        }

        let dx = self.game_speed;
        scroll_and_cull(&mut self.platforms, dx);
        scroll_and_cull(&mut self.obstacles, dx);
        scroll_and_cull(&mut self.power_boosts, dx);
        scroll_and_cull(&mut self.wing_pickups, dx);

        self.update_obstacles();
        if self.is_game_over() {
            return;
        }

        self.update_power_boosts();
        self.update_wing_pickups();

        let spawn_due = match self.obstacles.last() {
            None => true,
            Some(last) => ARENA_WIDTH - last.rect.left() >= last.gap,
        };
        if spawn_due {
            self.spawn_obstacle();
        }
    }

    /// Drain or regenerate wing power
    fn update_wings(&mut self) {
        let player = &mut self.player;
        if player.wings_active && player.wings_power > 0.0 {
            player.wings_power = (player.wings_power - WINGS_DEPLETION).max(0.0);
            player.vel_y = FLIGHT_LIFT;

            if player.wings_power == 0.0 {
                player.wings_recharging = true;
                player.wings_active = false;
            }
        } else if !player.wings_active && player.wings_power < WINGS_MAX_POWER {
            player.wings_power += WINGS_RECHARGE;
            if player.wings_power >= WINGS_MAX_POWER {
                player.wings_power = WINGS_MAX_POWER;
                player.wings_recharging = false;
            }
        }
    }

    /// Land on the first platform whose top band contains the player's feet
    fn resolve_platforms(&mut self) {
        let was_on_platform = self.player.on_platform;
        self.player.on_platform = false;

        if self.player.vel_y < 0.0 {
            return;
        }

        let feet = self.player.rect.bottom();
        let landing = self.platforms.iter().find(|p| {
            let top = p.rect.top();
            feet >= top - PLATFORM_SNAP_ABOVE
                && feet <= top + PLATFORM_SNAP_BELOW
                && self.player.rect.overlaps_x(&p.rect)
        });

        if let Some(platform) = landing {
            let top = platform.rect.top();
            self.player.rect.set_bottom(top);
            self.player.vel_y = 0.0;
            self.player.jumping = false;
            self.player.on_platform = true;
            if !was_on_platform {
                let at = Vec2::new(self.player.rect.left(), top);
                self.events.push(RunnerEvent::Landed { at });
            }
        }
    }

    /// Collide with and score obstacles
    fn update_obstacles(&mut self) {
        let mut hit = false;
        let mut newly_passed = 0;

        for obstacle in &mut self.obstacles {
            if !self.player.is_invincible && !hit && self.player.overlaps(&*obstacle) {
                hit = true;
            }

            if !obstacle.passed && obstacle.rect.right() < self.player.rect.left() {
                obstacle.passed = true;
                newly_passed += 1;
            }
        }

        for _ in 0..newly_passed {
            self.add_point();
        }

        if hit {
            self.take_hit();
        }
    }

    /// Apply obstacle damage according to the variant
    fn take_hit(&mut self) {
        match self.variant {
            RunnerVariant::V1 => self.game_over(),
            RunnerVariant::V2 => {
                self.hearts = self.hearts.saturating_sub(1);
                if self.hearts == 0 {
                    self.game_over();
                    return;
                }
                log::info!("Heart lost, {} remaining", self.hearts);
                self.events.push(RunnerEvent::HeartLost {
                    remaining: self.hearts,
                });
                self.player.respawn();
                self.player.is_invincible = true;
                // A fresh life: anything queued by the previous one is void
                self.effects.advance_generation();
                self.effects
                    .schedule(self.frame + INVINCIBILITY_FRAMES, RunnerEffect::EndInvincibility);
            }
        }
    }

    fn game_over(&mut self) {
        self.phase = RunnerPhase::GameOver;
        self.player.wings_active = false;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        log::info!(
            "Runner game over: score {} (best {})",
            self.score,
            self.high_score
        );
        self.events.push(RunnerEvent::GameOver { score: self.score });
    }

    /// Super-jump off the first unused boost the player touches
    fn update_power_boosts(&mut self) {
        let touched = self
            .power_boosts
            .iter_mut()
            .find(|b| !b.used && b.rect.overlaps(&self.player.rect));

        let Some(boost) = touched else {
            return;
        };
        boost.used = true;
        let boost_rect = boost.rect;

        self.player.vel_y = SUPER_JUMP_FORCE;
        self.player.jumping = true;
        self.player.on_platform = false;
        self.events.push(RunnerEvent::PowerBoost {
            at: boost_rect.pos,
        });

        if self.variant.has_platforms() {
            self.spawn_staircase(&boost_rect);
        }
    }

    fn update_wing_pickups(&mut self) {
        let touched = self
            .wing_pickups
            .iter_mut()
            .find(|p| !p.collected && p.rect.overlaps(&self.player.rect));

        if let Some(pickup) = touched {
            pickup.collected = true;
            self.award_wings();
        }
    }

    /// Jump from the ground or a platform; ignored while airborne
    pub fn jump(&mut self) {
        self.jump_with(JUMP_FORCE);
    }

    /// Boost-strength jump, same airborne rule
    pub fn super_jump(&mut self) {
        self.jump_with(SUPER_JUMP_FORCE);
    }

    fn jump_with(&mut self, force: f32) {
        if self.is_game_over() || self.player.jumping {
            return;
        }
        self.player.jumping = true;
        self.player.on_platform = false;
        self.player.vel_y = force;
    }

    /// Start flying if wings are charged
    pub fn activate_flight(&mut self) {
        let player = &mut self.player;
        if self.phase == RunnerPhase::Running
            && player.has_wings
            && player.wings_power > 0.0
            && !player.wings_recharging
        {
            player.wings_active = true;
        }
    }

    pub fn deactivate_flight(&mut self) {
        self.player.wings_active = false;
    }

    /// Start a new run after game over
    pub fn restart(&mut self) {
        if self.is_game_over() {
            self.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::runner::state::{Obstacle, Platform};
    use proptest::prelude::*;

    /// A run with no obstacles near the player
    fn quiet_run(variant: RunnerVariant) -> RunnerState {
        let mut state = RunnerState::new(variant, 1234, 0);
        // Push the starting obstacle far away with a huge gap so nothing spawns
        state.obstacles[0].rect.pos.x = 10_000.0;
        state.obstacles[0].gap = 100_000.0;
        state
    }

    fn settle(state: &mut RunnerState) {
        for _ in 0..60 {
            state.advance();
        }
    }

    fn obstacle_at(x: f32) -> Obstacle {
        Obstacle {
            rect: Rect::new(x, ARENA_HEIGHT - 40.0, OBSTACLE_WIDTH, 40.0),
            passed: false,
            gap: 100_000.0,
        }
    }

    #[test]
    fn test_player_lands_on_floor() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        assert_eq!(state.player.rect.bottom(), ARENA_HEIGHT);
        assert_eq!(state.player.vel_y, 0.0);
        assert!(!state.player.jumping);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        state.jump();
        assert_eq!(state.player.vel_y, JUMP_FORCE);
        state.advance();
        let vel = state.player.vel_y;
        state.jump();
        assert_eq!(state.player.vel_y, vel);
    }

    #[test]
    fn test_obstacle_scores_once() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        // Just past the player's left edge after one scroll, but not overlapping
        state.obstacles.push(Obstacle {
            rect: Rect::new(
                PLAYER_X - OBSTACLE_WIDTH - 1.0 + state.game_speed,
                ARENA_HEIGHT - 40.0,
                OBSTACLE_WIDTH,
                40.0,
            ),
            passed: false,
            gap: 100_000.0,
        });
        state.advance();
        assert_eq!(state.score, 1);
        assert_eq!(state.high_score, 1);
        assert!(state.events.contains(&RunnerEvent::NewHighScore { score: 1 }));
        for _ in 0..10 {
            state.advance();
        }
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_v1_collision_ends_run() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        state.obstacles.push(obstacle_at(PLAYER_X + state.game_speed));
        state.advance();
        assert!(state.is_game_over());
        assert!(state.events.contains(&RunnerEvent::GameOver { score: 0 }));

        // Further frames and jumps are no-ops
        let frame = state.frame;
        state.advance();
        state.jump();
        assert_eq!(state.frame, frame);

        state.restart();
        assert!(!state.is_game_over());
        assert_eq!(state.obstacles.len(), 1);
    }

    #[test]
    fn test_v2_heart_loss_and_invincibility() {
        let mut state = quiet_run(RunnerVariant::V2);
        settle(&mut state);
        state.hearts = 2;
        state.obstacles.push(obstacle_at(PLAYER_X + state.game_speed));
        state.advance();

        assert_eq!(state.hearts, 1);
        assert!(!state.is_game_over());
        assert!(state.player.is_invincible);
        assert_eq!(state.player.rect.top(), PLAYER_START_Y);
        assert_eq!(state.player.vel_y, 0.0);

        // Drop the player straight back into a fresh obstacle
        state.obstacles.push(obstacle_at(PLAYER_X));
        state.player.rect.set_bottom(ARENA_HEIGHT);
        state.advance();
        assert_eq!(state.hearts, 1);

        for _ in 0..INVINCIBILITY_FRAMES {
            state.advance();
        }
        assert!(!state.player.is_invincible);
        assert!(state.events.contains(&RunnerEvent::InvincibilityEnded));
    }

    #[test]
    fn test_v2_last_heart_ends_run() {
        let mut state = quiet_run(RunnerVariant::V2);
        settle(&mut state);
        state.hearts = 1;
        state.obstacles.push(obstacle_at(PLAYER_X + state.game_speed));
        state.advance();
        assert_eq!(state.hearts, 0);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_restart_cancels_pending_invincibility_expiry() {
        let mut state = quiet_run(RunnerVariant::V2);
        settle(&mut state);
        state.obstacles.push(obstacle_at(PLAYER_X + state.game_speed));
        state.advance();
        assert!(state.player.is_invincible);

        state.phase = RunnerPhase::GameOver;
        state.restart();
        // Make the new life invincible through some other path, then run past
        // the old expiry frame: the stale effect must not clear it.
        state.player.is_invincible = true;
        state.obstacles[0].rect.pos.x = 10_000.0;
        state.obstacles[0].gap = 100_000.0;
        for _ in 0..(INVINCIBILITY_FRAMES + 70) {
            state.advance();
        }
        assert!(state.player.is_invincible);
    }

    #[test]
    fn test_power_boost_super_jump() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        state.spawn_power_boost(PLAYER_X + state.game_speed);
        state.advance();
        assert!(state.power_boosts[0].used);
        assert!(state.player.jumping);
        // Gravity has not been applied since the impulse
        assert_eq!(state.player.vel_y, SUPER_JUMP_FORCE);
        assert!(state.platforms.is_empty());
    }

    #[test]
    fn test_v2_power_boost_spawns_staircase() {
        let mut state = quiet_run(RunnerVariant::V2);
        settle(&mut state);
        state.spawn_power_boost(PLAYER_X + state.game_speed);
        state.advance();
        assert_eq!(state.platforms.len(), PLATFORM_STEPS);
        let tops: Vec<f32> = state.platforms.iter().map(|p| p.rect.top()).collect();
        assert!(tops.windows(2).all(|w| w[1] < w[0]));
        let lefts: Vec<f32> = state.platforms.iter().map(|p| p.rect.left()).collect();
        assert!(lefts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_v2_platform_landing() {
        let mut state = quiet_run(RunnerVariant::V2);
        settle(&mut state);
        let top = ARENA_HEIGHT - 100.0;
        state.platforms.push(Platform {
            rect: Rect::new(PLAYER_X - 100.0, top, 1000.0, PLATFORM_HEIGHT),
        });
        // Falling with feet just above the platform
        state.player.rect.set_bottom(top - 2.0);
        state.player.vel_y = 1.0;
        state.player.jumping = true;
        state.advance();

        assert!(state.player.on_platform);
        assert_eq!(state.player.rect.bottom(), top);
        assert!(!state.player.jumping);
        let landings = state
            .events
            .iter()
            .filter(|e| matches!(e, RunnerEvent::Landed { .. }))
            .count();
        assert_eq!(landings, 1);

        // Standing still keeps us on it without re-triggering the landing
        state.events.clear();
        state.advance();
        assert!(state.player.on_platform);
        assert_eq!(state.player.rect.bottom(), top);
        assert!(state.events.iter().all(|e| !matches!(e, RunnerEvent::Landed { .. })));
    }

    #[test]
    fn test_v1_wing_pickup_grants_wings_once() {
        let mut state = quiet_run(RunnerVariant::V1);
        settle(&mut state);
        state.wing_pickups.push(crate::sim::runner::state::WingPickup {
            rect: Rect::new(PLAYER_X, ARENA_HEIGHT - 30.0, 30.0, 30.0),
            collected: false,
        });
        state.advance();
        assert!(state.player.has_wings);
        assert_eq!(state.player.wings_power, WINGS_MAX_POWER);
        assert!(state.wing_pickups[0].collected);
    }

    #[test]
    fn test_wings_deplete_and_force_recharge() {
        let mut state = quiet_run(RunnerVariant::V1);
        state.wings_granted = true;
        state.player.grant_wings();
        state.activate_flight();
        assert!(state.player.wings_active);

        let mut frames = 0;
        while state.player.wings_active {
            state.advance();
            // Keep obstacles away during the long flight
            state.obstacles.clear();
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(state.player.wings_power, 0.0);
        assert!(state.player.wings_recharging);

        // Cannot re-activate while recharging
        state.activate_flight();
        assert!(!state.player.wings_active);

        while state.player.wings_recharging {
            state.advance();
            state.obstacles.clear();
        }
        assert_eq!(state.player.wings_power, WINGS_MAX_POWER);
    }

    proptest! {
        #[test]
        fn wings_power_stays_bounded(
            seed in 0u64..500,
            commands in proptest::collection::vec(0u8..4, 50..300),
        ) {
            let mut state = RunnerState::new(RunnerVariant::V2, seed, 0);
            state.player.grant_wings();
            for cmd in commands {
                match cmd {
                    0 => state.jump(),
                    1 => state.activate_flight(),
                    2 => state.deactivate_flight(),
                    _ => state.restart(),
                }
                let was_active = state.player.wings_active;
                state.advance();
                let p = &state.player;
                prop_assert!(p.wings_power >= 0.0 && p.wings_power <= WINGS_MAX_POWER);
                if was_active && p.wings_power == 0.0 {
                    prop_assert!(p.wings_recharging);
                    prop_assert!(!p.wings_active);
                }
            }
        }

        #[test]
        fn score_matches_passed_obstacles(seed in 0u64..200, frames in 100usize..1500) {
            let mut state = RunnerState::new(RunnerVariant::V2, seed, 0);
            let mut passed_total = 0u64;
            for _ in 0..frames {
                if state.is_game_over() {
                    break;
                }
                let before = state.score;
                state.advance();
                passed_total += state
                    .events
                    .iter()
                    .filter(|e| matches!(e, RunnerEvent::ObstaclePassed { .. }))
                    .count() as u64;
                state.events.clear();
                prop_assert!(state.score >= before);
            }
            prop_assert_eq!(state.score, passed_total);
        }
    }
}
