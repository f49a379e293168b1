//! Minimal physics: gravity, velocity integration, floor collision, and the
//! probes the player controller relies on.

use bevy_ecs::prelude::*;

use crate::arena::Arena;
use crate::components::*;
use crate::TICK_SECONDS;

/// Base gravity in m/s². The player controller adds its own extra downward
/// acceleration while airborne on top of this.
pub const BASE_GRAVITY: f32 = 9.81;

/// Maximum floor distance at which the downward probe reports grounded.
pub const GROUND_CHECK_DISTANCE: f32 = 0.1;

/// Update every entity's `OnGround` via a downward probe to the arena floor.
pub fn system_ground_probe(world: &mut World) {
    let floor_y = world.resource::<Arena>().floor_y;
    let mut q = world.query::<(&Position, &mut OnGround)>();
    for (pos, mut on_ground) in q.iter_mut(world) {
        on_ground.0 = pos.y - floor_y <= GROUND_CHECK_DISTANCE;
    }
}

/// Apply gravity, integrate velocities into positions, and collide with the
/// flat arena floor.
pub fn system_integrate(world: &mut World) {
    let floor_y = world.resource::<Arena>().floor_y;
    let mut q = world.query::<(&mut Position, &mut Velocity)>();
    for (mut pos, mut vel) in q.iter_mut(world) {
        vel.y -= BASE_GRAVITY * TICK_SECONDS;

        pos.x += vel.x * TICK_SECONDS;
        pos.y += vel.y * TICK_SECONDS;
        pos.z += vel.z * TICK_SECONDS;

        if pos.y <= floor_y {
            pos.y = floor_y;
            vel.y = 0.0;
        }
    }
}

/// Upward clearance probe: `true` when no `Obstruction` box crosses the
/// vertical span `[from_y, to_y]` above the XZ point `(x, z)`.
pub fn overhead_clear(world: &mut World, x: f32, z: f32, from_y: f32, to_y: f32) -> bool {
    let mut q = world.query_filtered::<(&Position, &BoundingBox), With<Obstruction>>();
    for (pos, bb) in q.iter(world) {
        let half_w = bb.width * 0.5;
        if (x - pos.x).abs() > half_w || (z - pos.z).abs() > half_w {
            continue;
        }
        let bottom = pos.y;
        let top = pos.y + bb.height;
        if bottom <= to_y && top >= from_y {
            return false;
        }
    }
    true
}
