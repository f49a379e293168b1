//! Player locomotion: look, crouch, jump, sprint/stamina, movement forces,
//! and the extra airborne gravity.
//!
//! Each concern is one system over the single player entity; `GameWorld`
//! runs them in a fixed order with input sampled before integration.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::*;
use crate::game_world::TickCounter;
use crate::physics;
use crate::player::input::InputSnapshot;
use crate::{seconds_to_ticks, TICK_SECONDS};

/// Clearance margin above the standing head for the stand-up probe.
const STAND_CLEARANCE_MARGIN: f32 = 0.1;

/// Player tuning. Rates are per second; speeds in m/s.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height while standing.
    pub stand_height: f32,
    /// Bounding box height while crouching.
    pub crouch_height: f32,
    /// Horizontal acceleration walking and crouching.
    pub move_accel: f32,
    /// Horizontal acceleration while sprinting.
    pub sprint_accel: f32,
    /// Velocity magnitude cap while walking.
    pub max_speed: f32,
    /// Velocity magnitude cap while sprinting.
    pub sprint_max_speed: f32,
    /// Velocity magnitude cap while crouching.
    pub crouch_max_speed: f32,
    /// Upward velocity gain of a jump (the secondary along-velocity impulse
    /// uses the same value unscaled).
    pub jump_impulse: f32,
    /// Seconds before another jump is allowed.
    pub jump_cooldown: f32,
    /// Extra downward acceleration while airborne, on top of base gravity.
    pub gravity_force: f32,
    pub max_stamina: f32,
    /// Stamina drained per second of sprinting.
    pub stamina_drain_rate: f32,
    /// Stamina regenerated per second once the delay has been served.
    pub stamina_regen_rate: f32,
    /// Seconds of continuous non-sprinting before regeneration starts.
    pub stamina_regen_delay: f32,
    /// Degrees per second per unit of look input.
    pub look_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            width: 0.8,
            stand_height: 1.8,
            crouch_height: 0.9,
            move_accel: 45.0,
            sprint_accel: 60.0,
            max_speed: 20.0,
            sprint_max_speed: 25.0,
            crouch_max_speed: 10.0,
            jump_impulse: 6.0,
            jump_cooldown: 0.25,
            gravity_force: 20.0,
            max_stamina: 100.0,
            stamina_drain_rate: 20.0,
            stamina_regen_rate: 15.0,
            stamina_regen_delay: 2.0,
            look_sensitivity: 50.0,
        }
    }
}

/// Movement basis: forward unit vector on XZ for a yaw in degrees
/// (yaw 0 = +Z, 90 = -X, matching `steering::yaw_toward`).
fn forward_xz(yaw_deg: f32) -> (f32, f32) {
    let rad = yaw_deg.to_radians();
    (-rad.sin(), rad.cos())
}

/// Movement basis: right unit vector on XZ for a yaw in degrees.
fn right_xz(yaw_deg: f32) -> (f32, f32) {
    let rad = yaw_deg.to_radians();
    (-rad.cos(), -rad.sin())
}

/// Mouse look: pitch accumulates inverted and clamps to ±90°; yaw is
/// unclamped and written to both the view and the movement orientation.
pub fn system_look(world: &mut World, input: &InputSnapshot, config: &PlayerConfig) {
    let mut q = world.query_filtered::<&mut Rotation, With<Player>>();
    if let Some(mut rot) = q.iter_mut(world).next() {
        let scale = config.look_sensitivity * TICK_SECONDS;
        rot.pitch = (rot.pitch - input.look_dy * scale).clamp(-90.0, 90.0);
        rot.head_yaw += input.look_dx * scale;
        rot.yaw = rot.head_yaw;
    }
}

/// Crouch toggle. Going down always succeeds; standing back up is gated on
/// the overhead clearance probe and silently stays crouched when blocked.
pub fn system_crouch(world: &mut World, input: &InputSnapshot, config: &PlayerConfig) {
    if !input.crouch_pressed {
        return;
    }

    let snapshot = {
        let mut q = world.query_filtered::<(Entity, &Position, &Crouching), With<Player>>();
        q.iter(world)
            .next()
            .map(|(entity, pos, crouching)| (entity, pos.x, pos.y, pos.z, crouching.0))
    };
    let Some((entity, px, py, pz, crouching)) = snapshot else {
        return;
    };

    if !crouching {
        set_posture(world, entity, true, config.crouch_height);
        return;
    }

    let from_y = py + config.crouch_height;
    let to_y = py + config.stand_height + STAND_CLEARANCE_MARGIN;
    if physics::overhead_clear(world, px, pz, from_y, to_y) {
        set_posture(world, entity, false, config.stand_height);
    }
}

fn set_posture(world: &mut World, entity: Entity, crouching: bool, height: f32) {
    if let Some(mut c) = world.get_mut::<Crouching>(entity) {
        c.0 = crouching;
    }
    if let Some(mut bb) = world.get_mut::<BoundingBox>(entity) {
        bb.height = height;
    }
}

/// Jump, gated by grounded + ready. Applies the upward impulse, then a
/// secondary impulse along the (already updated) velocity direction, and
/// schedules the cooldown re-enable on the tick counter.
pub fn system_jump(world: &mut World, input: &InputSnapshot, config: &PlayerConfig) {
    let tick = world.resource::<TickCounter>().0;

    let mut q = world.query_filtered::<(&OnGround, &mut JumpControl, &mut Velocity), With<Player>>();
    let Some((on_ground, mut jump, mut vel)) = q.iter_mut(world).next() else {
        return;
    };

    if let Some(at) = jump.ready_at {
        if tick >= at {
            jump.ready = true;
            jump.ready_at = None;
        }
    }

    if !(input.jump_held && on_ground.0 && jump.ready) {
        return;
    }

    vel.y += config.jump_impulse * 1.5;
    let mag = (vel.x * vel.x + vel.y * vel.y + vel.z * vel.z).sqrt();
    if mag > 1e-4 {
        let scale = config.jump_impulse / mag;
        vel.x += vel.x * scale;
        vel.y += vel.y * scale;
        vel.z += vel.z * scale;
    }

    jump.ready = false;
    jump.ready_at = Some(tick + seconds_to_ticks(config.jump_cooldown));
    debug!(tick, "player jumped");
}

/// Sprint gating and stamina drain/regen with the 20% hysteresis. The idle
/// timer resets only on actual sprinting, so blocked attempts do not delay
/// regeneration.
pub fn system_stamina(world: &mut World, input: &InputSnapshot, config: &PlayerConfig) {
    let mut q = world.query_filtered::<(&mut Stamina, &Crouching), With<Player>>();
    let Some((mut stamina, crouching)) = q.iter_mut(world).next() else {
        return;
    };

    let sprinting = input.sprint_held
        && stamina.can_sprint
        && !crouching.0
        && input.move_forward > 0.0
        && stamina.current > 0.0;
    stamina.sprinting = sprinting;

    if sprinting {
        stamina.current -= config.stamina_drain_rate * TICK_SECONDS;
        stamina.idle_time = 0.0;
        if stamina.current <= 0.0 {
            stamina.current = 0.0;
            stamina.can_sprint = false;
        }
    } else {
        stamina.idle_time += TICK_SECONDS;
        if stamina.idle_time >= config.stamina_regen_delay {
            stamina.current =
                (stamina.current + config.stamina_regen_rate * TICK_SECONDS).min(config.max_stamina);
            if stamina.current >= config.max_stamina * 0.2 {
                stamina.can_sprint = true;
            }
        }
    }
}

/// Horizontal acceleration along the orientation axes, then a hard clamp of
/// the full velocity magnitude to the current mode's cap.
pub fn system_move(world: &mut World, input: &InputSnapshot, config: &PlayerConfig) {
    let mut q =
        world.query_filtered::<(&mut Velocity, &Rotation, &Stamina, &Crouching), With<Player>>();
    let Some((mut vel, rot, stamina, crouching)) = q.iter_mut(world).next() else {
        return;
    };

    let (accel, max_speed) = if crouching.0 {
        (config.move_accel, config.crouch_max_speed)
    } else if stamina.sprinting {
        (config.sprint_accel, config.sprint_max_speed)
    } else {
        (config.move_accel, config.max_speed)
    };

    let (fx, fz) = forward_xz(rot.yaw);
    let (rx, rz) = right_xz(rot.yaw);
    let dir_x = fx * input.move_forward + rx * input.move_x;
    let dir_z = fz * input.move_forward + rz * input.move_x;
    let len = (dir_x * dir_x + dir_z * dir_z).sqrt();
    if len > 1e-4 {
        vel.x += dir_x / len * accel * TICK_SECONDS;
        vel.z += dir_z / len * accel * TICK_SECONDS;
    }

    let mag = (vel.x * vel.x + vel.y * vel.y + vel.z * vel.z).sqrt();
    if mag > max_speed {
        let scale = max_speed / mag;
        vel.x *= scale;
        vel.y *= scale;
        vel.z *= scale;
    }
}

/// Extra downward velocity each step while airborne.
pub fn system_airborne_gravity(world: &mut World, config: &PlayerConfig) {
    let mut q = world.query_filtered::<(&mut Velocity, &OnGround), With<Player>>();
    if let Some((mut vel, on_ground)) = q.iter_mut(world).next() {
        if !on_ground.0 {
            vel.y -= config.gravity_force * TICK_SECONDS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::spawning::SpawnConfig;
    use crate::arena::Arena;
    use crate::game_world::GameWorld;
    use crate::player::input::InputSnapshot;

    fn quiet_world() -> GameWorld {
        // Long interval so the spawner stays out of the way.
        let mut gw = GameWorld::new(
            Arena::default(),
            SpawnConfig {
                spawn_interval: 1.0e9,
                ..Default::default()
            },
            PlayerConfig::default(),
        );
        gw.spawn_player(0.0, 0.0);
        gw
    }

    fn player_velocity(gw: &mut GameWorld) -> (f32, f32, f32) {
        let mut q = gw.world.query_filtered::<&Velocity, With<Player>>();
        let v = q.iter(&gw.world).next().unwrap();
        (v.x, v.y, v.z)
    }

    fn player_stamina(gw: &mut GameWorld) -> Stamina {
        let mut q = gw.world.query_filtered::<&Stamina, With<Player>>();
        *q.iter(&gw.world).next().unwrap()
    }

    fn player_bb_height(gw: &mut GameWorld) -> f32 {
        let mut q = gw.world.query_filtered::<&BoundingBox, With<Player>>();
        q.iter(&gw.world).next().unwrap().height
    }

    #[test]
    fn forward_input_moves_along_positive_z() {
        let mut gw = quiet_world();
        let input = InputSnapshot {
            move_forward: 1.0,
            ..Default::default()
        };
        for _ in 0..10 {
            gw.tick(&input);
        }
        let (vx, _, vz) = player_velocity(&mut gw);
        assert!(vz > 0.0, "expected +Z movement, got vz={vz}");
        assert!(vx.abs() < 0.001);
        let (x, _, z) = gw.player_position().unwrap();
        assert!(z > 0.0);
        assert!(x.abs() < 0.001);
    }

    #[test]
    fn walking_speed_clamps_to_mode_cap() {
        let mut gw = quiet_world();
        let input = InputSnapshot {
            move_forward: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            gw.tick(&input);
        }
        let (vx, vy, vz) = player_velocity(&mut gw);
        let speed = (vx * vx + vy * vy + vz * vz).sqrt();
        assert!((speed - 20.0).abs() < 0.01, "speed={speed}");
    }

    #[test]
    fn crouch_lowers_cap_and_hitbox() {
        let mut gw = quiet_world();
        gw.tick(&InputSnapshot {
            crouch_pressed: true,
            ..Default::default()
        });
        assert!((player_bb_height(&mut gw) - 0.9).abs() < 0.001);

        let input = InputSnapshot {
            move_forward: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            gw.tick(&input);
        }
        let (vx, vy, vz) = player_velocity(&mut gw);
        let speed = (vx * vx + vy * vy + vz * vz).sqrt();
        assert!((speed - 10.0).abs() < 0.01, "speed={speed}");
    }

    #[test]
    fn stand_blocked_by_low_ceiling() {
        let mut gw = quiet_world();
        gw.spawn_obstruction(0.0, 1.2, 0.0, 2.0, 0.3);

        gw.tick(&InputSnapshot {
            crouch_pressed: true,
            ..Default::default()
        });
        assert!((player_bb_height(&mut gw) - 0.9).abs() < 0.001);

        // Blocked: the toggle leaves the player crouched.
        gw.tick(&InputSnapshot {
            crouch_pressed: true,
            ..Default::default()
        });
        assert!((player_bb_height(&mut gw) - 0.9).abs() < 0.001);
    }

    #[test]
    fn stand_succeeds_in_the_open() {
        let mut gw = quiet_world();
        gw.tick(&InputSnapshot {
            crouch_pressed: true,
            ..Default::default()
        });
        gw.tick(&InputSnapshot {
            crouch_pressed: true,
            ..Default::default()
        });
        assert!((player_bb_height(&mut gw) - 1.8).abs() < 0.001);
    }

    #[test]
    fn jump_needs_ground_and_cooldown() {
        let mut gw = quiet_world();
        // Settle onto the floor so the ground probe reports grounded.
        gw.tick(&Default::default());

        let jump = InputSnapshot {
            jump_held: true,
            ..Default::default()
        };
        gw.tick(&jump);
        let (_, vy, _) = player_velocity(&mut gw);
        assert!(vy > 0.0, "expected upward velocity, got vy={vy}");

        // Airborne: holding jump must not add another impulse.
        let peak = vy;
        gw.tick(&jump);
        let (_, vy2, _) = player_velocity(&mut gw);
        assert!(vy2 < peak);
    }

    #[test]
    fn stamina_drains_then_regens_with_hysteresis() {
        let mut gw = quiet_world();
        let sprint = InputSnapshot {
            move_forward: 1.0,
            sprint_held: true,
            ..Default::default()
        };

        // Drain to zero: 100 stamina at 20/s is 5 seconds (100 ticks).
        for _ in 0..100 {
            gw.tick(&sprint);
        }
        let s = player_stamina(&mut gw);
        assert_eq!(s.current, 0.0);
        assert!(!s.can_sprint);

        // Keep holding sprint: blocked attempts count as idle time (they do
        // not reset the timer), but nothing regenerates inside the delay.
        for _ in 0..39 {
            gw.tick(&sprint);
        }
        let s = player_stamina(&mut gw);
        assert_eq!(s.current, 0.0);
        assert!(!s.can_sprint);

        // Release sprint; regen runs once the delay is served and sprint
        // re-enables at 20% of max.
        for _ in 0..40 {
            gw.tick(&Default::default());
        }
        let s = player_stamina(&mut gw);
        assert!(s.current >= 20.0, "stamina={}", s.current);
        assert!(s.can_sprint);
    }

    #[test]
    fn pitch_clamps_at_ninety_degrees() {
        let mut gw = quiet_world();
        let look_up = InputSnapshot {
            look_dy: -10.0,
            ..Default::default()
        };
        for _ in 0..100 {
            gw.tick(&look_up);
        }
        let mut q = gw.world.query_filtered::<&Rotation, With<Player>>();
        let rot = q.iter(&gw.world).next().unwrap();
        assert_eq!(rot.pitch, 90.0);
    }

    #[test]
    fn yaw_steers_movement_direction() {
        let mut gw = quiet_world();
        // Turn 90° (to -X per the yaw convention), then walk forward.
        gw.tick(&InputSnapshot {
            look_dx: 36.0,
            ..Default::default()
        });
        let input = InputSnapshot {
            move_forward: 1.0,
            ..Default::default()
        };
        for _ in 0..10 {
            gw.tick(&input);
        }
        let (vx, _, vz) = player_velocity(&mut gw);
        assert!(vx < 0.0, "expected -X movement, got vx={vx}");
        assert!(vz.abs() < 0.01);
    }
}
