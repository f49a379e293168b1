//! Behavior trait for enemy AI.

use bevy_ecs::prelude::*;

/// What kind of output a behavior produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorType {
    /// Controls movement (only one runs per tick).
    Movement,
    /// Non-movement (e.g., contact damage). All runnable ones run.
    Passive,
}

/// Player state relevant to one enemy, captured before evaluation.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub position: (f32, f32, f32),
    /// Half of the player's bounding box width, for contact range.
    pub half_width: f32,
}

/// Read-only snapshot of the world state relevant to one enemy.
pub struct BehaviorContext {
    /// Enemy's current position.
    pub self_position: (f32, f32, f32),
    /// Enemy's current yaw in degrees.
    pub self_yaw: f32,
    /// Half of the enemy's bounding box width.
    pub self_half_width: f32,
    /// Enemy's base movement speed (m/s).
    pub self_speed: f32,
    /// Current game tick.
    pub current_tick: u64,
    /// The player, if one exists. `None` makes every behavior a no-op.
    pub player: Option<PlayerSnapshot>,
}

/// Output actions from a behavior tick.
#[derive(Debug, Default)]
pub struct BehaviorOutput {
    /// Planar position delta to apply this tick.
    pub move_delta: Option<(f32, f32)>,
    /// New yaw (degrees) to face, already interpolated.
    pub face_yaw: Option<f32>,
    /// Land a contact hit on the player this tick.
    pub attack: bool,
}

/// A single behavior in an enemy's list.
pub trait Behavior: Send + Sync + std::fmt::Debug {
    /// What kind of behavior this is.
    fn behavior_type(&self) -> BehaviorType;

    /// Can this behavior run right now?
    fn can_start(&self, ctx: &BehaviorContext) -> bool;

    /// Called every tick while runnable.
    fn tick(&mut self, ctx: &BehaviorContext) -> BehaviorOutput;
}

/// Holds an enemy's behaviors.
#[derive(Component)]
pub struct BehaviorList {
    pub behaviors: Vec<Box<dyn Behavior>>,
}

impl BehaviorList {
    pub fn new(behaviors: Vec<Box<dyn Behavior>>) -> Self {
        Self { behaviors }
    }
}

impl std::fmt::Debug for BehaviorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorList")
            .field("behavior_count", &self.behaviors.len())
            .finish()
    }
}
