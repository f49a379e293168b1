//! AI tick system — evaluates behaviors and applies outputs to ECS state.

use bevy_ecs::prelude::*;

use crate::components::*;
use crate::player;

use super::behavior::{BehaviorContext, BehaviorList, BehaviorOutput, BehaviorType, PlayerSnapshot};

/// Enemy snapshot for AI evaluation.
struct EnemySnapshot {
    entity: Entity,
    position: (f32, f32, f32),
    yaw: f32,
    half_width: f32,
    speed: f32,
}

/// Runs behavior evaluation for all alive enemies with a `BehaviorList`.
pub fn system_ai_tick(world: &mut World) {
    // Step 1: snapshot the player.
    let player: Option<PlayerSnapshot> = {
        let mut q = world.query_filtered::<(&Position, &BoundingBox), With<Player>>();
        q.iter(world).next().map(|(pos, bb)| PlayerSnapshot {
            position: (pos.x, pos.y, pos.z),
            half_width: bb.width * 0.5,
        })
    };

    let current_tick = world.resource::<crate::game_world::TickCounter>().0;

    // Step 2: snapshot all enemies.
    let enemies: Vec<EnemySnapshot> = {
        let mut q = world.query_filtered::<(
            Entity,
            &Position,
            &Rotation,
            &BoundingBox,
            &MovementSpeed,
        ), (With<Enemy>, With<BehaviorList>, Without<Dead>)>();
        q.iter(world)
            .map(|(entity, pos, rot, bb, speed)| EnemySnapshot {
                entity,
                position: (pos.x, pos.y, pos.z),
                yaw: rot.yaw,
                half_width: bb.width * 0.5,
                speed: speed.0,
            })
            .collect()
    };

    // Step 3: evaluate behaviors for each enemy.
    let mut actions: Vec<(Entity, BehaviorOutput)> = Vec::new();
    for enemy in &enemies {
        let ctx = BehaviorContext {
            self_position: enemy.position,
            self_yaw: enemy.yaw,
            self_half_width: enemy.half_width,
            self_speed: enemy.speed,
            current_tick,
            player,
        };

        let mut blist = match world.get_mut::<BehaviorList>(enemy.entity) {
            Some(b) => b,
            None => continue,
        };
        actions.push((enemy.entity, evaluate_behaviors(&mut blist, &ctx)));
    }

    // Step 4: apply outputs to ECS state.
    for (entity, output) in actions {
        if let Some((dx, dz)) = output.move_delta {
            if let Some(mut pos) = world.get_mut::<Position>(entity) {
                pos.x += dx;
                pos.z += dz;
            }
        }

        if let Some(yaw) = output.face_yaw {
            if let Some(mut rot) = world.get_mut::<Rotation>(entity) {
                rot.yaw = yaw;
                rot.head_yaw = yaw;
            }
        }

        if output.attack {
            let damage = world.get::<AttackDamage>(entity).map(|d| d.0).unwrap_or(0.0);
            let _ = player::state::take_damage(world, damage);
        }
    }
}

/// Evaluate an enemy's behaviors: the first runnable movement behavior and
/// every runnable passive behavior, merged into one output.
fn evaluate_behaviors(blist: &mut BehaviorList, ctx: &BehaviorContext) -> BehaviorOutput {
    let mut combined = BehaviorOutput::default();

    let mut movement_done = false;
    for b in blist.behaviors.iter_mut() {
        match b.behavior_type() {
            BehaviorType::Movement => {
                if movement_done || !b.can_start(ctx) {
                    continue;
                }
                movement_done = true;
                merge_output(&mut combined, b.tick(ctx));
            }
            BehaviorType::Passive => {
                if b.can_start(ctx) {
                    merge_output(&mut combined, b.tick(ctx));
                }
            }
        }
    }

    combined
}

fn merge_output(combined: &mut BehaviorOutput, output: BehaviorOutput) {
    if output.move_delta.is_some() {
        combined.move_delta = output.move_delta;
    }
    if output.face_yaw.is_some() {
        combined.face_yaw = output.face_yaw;
    }
    if output.attack {
        combined.attack = true;
    }
}
