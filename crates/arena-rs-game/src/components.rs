//! ECS components for all entities (player and enemies).

use bevy_ecs::prelude::*;

/// Stable identity for an entity, independent of its ECS slot.
#[derive(Component, Debug, Clone)]
pub struct EntityId {
    pub unique_id: i64,
    pub runtime_id: u64,
}

/// Position in the world (feet level).
#[derive(Component, Debug, Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Rotation angles in degrees. `head_yaw` is the view yaw, `yaw` the
/// orientation used for movement; the player controller keeps them in sync.
#[derive(Component, Debug, Clone, Copy)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}

/// Velocity vector in meters per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Health points.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Whether the entity's downward probe currently detects the floor.
#[derive(Component, Debug, Clone, Copy)]
pub struct OnGround(pub bool);

/// Axis-aligned bounding box dimensions. For the player, `height` switches
/// between the standing and crouched values.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
}

/// The enemy archetype identifier, e.g. `"arena:walker"`.
#[derive(Component, Debug, Clone)]
pub struct EnemyType(pub String);

/// Base contact damage dealt by this enemy.
#[derive(Component, Debug, Clone, Copy)]
pub struct AttackDamage(pub f32);

/// Tick when this entity last took damage (invulnerability frames).
#[derive(Component, Debug, Clone, Copy)]
pub struct LastDamageTick(pub Option<u64>);

/// Base movement speed in meters per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct MovementSpeed(pub f32);

/// Marker: this entity is an enemy.
#[derive(Component, Debug)]
pub struct Enemy;

/// Marker: this entity is the player.
#[derive(Component, Debug)]
pub struct Player;

/// Marker: this entity is dead. Enemies with it are despawned by cleanup;
/// on the player it is the sticky death flag and never removed.
#[derive(Component, Debug)]
pub struct Dead;

/// Marker: this enemy was created by the population spawner. The removal
/// path decrements the spawner's live count exactly when it sees this.
#[derive(Component, Debug)]
pub struct Spawned;

/// Marker: static overhead geometry tested by the crouch clearance probe.
#[derive(Component, Debug)]
pub struct Obstruction;

/// Whether the player is currently crouching.
#[derive(Component, Debug, Clone, Copy)]
pub struct Crouching(pub bool);

/// Sprint stamina state.
#[derive(Component, Debug, Clone, Copy)]
pub struct Stamina {
    pub current: f32,
    /// Hysteresis gate: off when stamina hits zero, back on at 20% of max.
    pub can_sprint: bool,
    /// Whether the player actually sprinted this tick.
    pub sprinting: bool,
    /// Seconds of continuous non-sprinting, drives the regen delay.
    pub idle_time: f32,
}

/// Jump gating: `ready` is cleared on jump and re-enabled once the tick
/// counter reaches `ready_at`.
#[derive(Component, Debug, Clone, Copy)]
pub struct JumpControl {
    pub ready: bool,
    pub ready_at: Option<u64>,
}
