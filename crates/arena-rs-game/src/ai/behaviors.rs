//! Behavior implementations for enemy AI.

use super::behavior::{Behavior, BehaviorContext, BehaviorOutput, BehaviorType};
use super::steering;
use crate::TICK_SECONDS;

/// Extra reach added on top of the two half-widths for contact checks.
const CONTACT_PAD: f32 = 0.1;

// ---------------------------------------------------------------------------
// ChasePlayer (Movement) — walk straight at the player, stop short
// ---------------------------------------------------------------------------

/// Steers toward the player's position on the XZ plane at the enemy's base
/// speed, halting inside `stopping_distance`. While moving, the yaw turns
/// toward the travel direction by `turn_rate * dt` per step.
#[derive(Debug)]
pub struct ChasePlayer {
    stopping_distance: f32,
    turn_rate: f32,
}

impl ChasePlayer {
    pub fn new(stopping_distance: f32, turn_rate: f32) -> Self {
        Self {
            stopping_distance,
            turn_rate,
        }
    }
}

impl Behavior for ChasePlayer {
    fn behavior_type(&self) -> BehaviorType {
        BehaviorType::Movement
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.player.is_some()
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let player = match ctx.player {
            Some(p) => p,
            None => return BehaviorOutput::default(),
        };
        let (px, _, pz) = player.position;

        let step = steering::step_toward(
            ctx.self_position.0,
            ctx.self_position.2,
            px,
            pz,
            ctx.self_speed,
            self.stopping_distance,
            TICK_SECONDS,
        );

        match step {
            None => BehaviorOutput::default(),
            Some((dx, dz)) => {
                let target = steering::yaw_toward(ctx.self_position.0, ctx.self_position.2, px, pz);
                let yaw = steering::slerp_yaw(ctx.self_yaw, target, self.turn_rate * TICK_SECONDS);
                BehaviorOutput {
                    move_delta: Some((dx, dz)),
                    face_yaw: Some(yaw),
                    attack: false,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ContactDamage (Passive) — cooldown-gated hits while touching the player
// ---------------------------------------------------------------------------

/// While the enemy's hitbox touches the player's, lands one hit per cooldown
/// window. A fresh instance is ready immediately; each hit stamps the tick.
#[derive(Debug)]
pub struct ContactDamage {
    cooldown_ticks: u64,
    last_hit_tick: Option<u64>,
}

impl ContactDamage {
    pub fn new(cooldown_ticks: u64) -> Self {
        Self {
            cooldown_ticks,
            last_hit_tick: None,
        }
    }
}

impl Behavior for ContactDamage {
    fn behavior_type(&self) -> BehaviorType {
        BehaviorType::Passive
    }

    fn can_start(&self, ctx: &BehaviorContext) -> bool {
        ctx.player.is_some()
    }

    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput {
        let player = match ctx.player {
            Some(p) => p,
            None => return BehaviorOutput::default(),
        };

        let dist = steering::distance_xz(
            ctx.self_position.0,
            ctx.self_position.2,
            player.position.0,
            player.position.2,
        );
        let contact_range = ctx.self_half_width + player.half_width + CONTACT_PAD;
        if dist > contact_range {
            return BehaviorOutput::default();
        }

        let ready = self
            .last_hit_tick
            .map(|t| ctx.current_tick.saturating_sub(t) >= self.cooldown_ticks)
            .unwrap_or(true);
        if !ready {
            return BehaviorOutput::default();
        }

        self.last_hit_tick = Some(ctx.current_tick);
        BehaviorOutput {
            attack: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behavior::PlayerSnapshot;

    fn ctx_at(tick: u64, self_x: f32, player_x: f32) -> BehaviorContext {
        BehaviorContext {
            self_position: (self_x, 0.0, 0.0),
            self_yaw: 0.0,
            self_half_width: 0.4,
            self_speed: 3.0,
            current_tick: tick,
            player: Some(PlayerSnapshot {
                position: (player_x, 0.0, 0.0),
                half_width: 0.4,
            }),
        }
    }

    #[test]
    fn chase_steps_toward_player() {
        let mut chase = ChasePlayer::new(1.2, 10.0);
        let out = chase.tick(&ctx_at(0, 0.0, 10.0));
        let (dx, dz) = out.move_delta.unwrap();
        assert!(dx > 0.0);
        assert!(dz.abs() < 0.001);
        assert!(out.face_yaw.is_some());
    }

    #[test]
    fn chase_halts_inside_stopping_distance() {
        let mut chase = ChasePlayer::new(1.2, 10.0);
        let out = chase.tick(&ctx_at(0, 0.0, 1.0));
        assert!(out.move_delta.is_none());
        // No facing update while halted either.
        assert!(out.face_yaw.is_none());
    }

    #[test]
    fn chase_noop_without_player() {
        let mut chase = ChasePlayer::new(1.2, 10.0);
        let mut ctx = ctx_at(0, 0.0, 10.0);
        ctx.player = None;
        assert!(!chase.can_start(&ctx));
        let out = chase.tick(&ctx);
        assert!(out.move_delta.is_none());
    }

    #[test]
    fn contact_hits_immediately_then_cools_down() {
        let mut contact = ContactDamage::new(20);
        // In contact: half widths 0.4 + 0.4 + pad 0.1 = 0.9 reach.
        assert!(contact.tick(&ctx_at(0, 0.0, 0.5)).attack);
        assert!(!contact.tick(&ctx_at(10, 0.0, 0.5)).attack);
        assert!(contact.tick(&ctx_at(20, 0.0, 0.5)).attack);
    }

    #[test]
    fn contact_out_of_range_never_hits() {
        let mut contact = ContactDamage::new(20);
        assert!(!contact.tick(&ctx_at(0, 0.0, 2.0)).attack);
        // Out-of-range contact must not consume the ready state.
        assert!(contact.tick(&ctx_at(1, 0.0, 0.5)).attack);
    }
}
