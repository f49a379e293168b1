//! The simulation world: bevy_ecs World, fixed-order tick pipeline, entity
//! management, and the outgoing event bus.

use std::sync::atomic::{AtomicI64, Ordering};

use bevy_ecs::prelude::*;

use crate::ai;
use crate::ai::spawning::{self, SpawnConfig, SpawnerState};
use crate::arena::Arena;
use crate::components::*;
use crate::enemy_registry::EnemyRegistry;
use crate::physics;
use crate::player;
use crate::player::controller::PlayerConfig;
use crate::player::input::InputSnapshot;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Outgoing events queued by simulation systems for the driver to consume.
#[derive(Resource, Default)]
pub struct OutgoingEvents {
    pub events: Vec<GameEvent>,
}

/// Global tick counter (incremented every 50 ms step).
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Thread-safe entity ID allocator (shared by player and enemies).
#[derive(Resource)]
pub struct EntityIdAllocator {
    next: AtomicI64,
}

impl EntityIdAllocator {
    pub fn new(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }

    /// Allocate the next unique entity ID.
    pub fn allocate(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Current value (next ID that will be allocated).
    pub fn current(&self) -> i64 {
        self.next.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Game events (simulation → driver)
// ---------------------------------------------------------------------------

/// Snapshot of an enemy for inspection and status output.
#[derive(Debug, Clone)]
pub struct EnemySnapshot {
    pub unique_id: i64,
    pub runtime_id: u64,
    pub enemy_type: String,
    pub position: (f32, f32, f32),
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
}

/// Events produced by the simulation, consumed by the driver.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A new enemy entered the world.
    EnemySpawned {
        runtime_id: u64,
        unique_id: i64,
        enemy_type: String,
        position: (f32, f32, f32),
    },
    /// An enemy was damaged but survived.
    EnemyHurt {
        runtime_id: u64,
        new_health: f32,
        tick: u64,
    },
    /// An enemy's health reached zero.
    EnemyDied { runtime_id: u64, unique_id: i64 },
    /// An enemy entity was removed from the world.
    EnemyRemoved { unique_id: i64 },
    /// The player took a non-fatal hit.
    PlayerDamaged { new_health: f32, tick: u64 },
    /// The player's health reached zero. Terminal.
    PlayerDied { tick: u64 },
}

// ---------------------------------------------------------------------------
// GameWorld
// ---------------------------------------------------------------------------

/// The simulation world.
pub struct GameWorld {
    pub world: World,
    pub enemy_registry: EnemyRegistry,
    pub spawn_config: SpawnConfig,
    pub player_config: PlayerConfig,
}

impl GameWorld {
    /// Create a new world with the given arena and tuning.
    pub fn new(arena: Arena, spawn_config: SpawnConfig, player_config: PlayerConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(arena);
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(TickCounter::default());
        world.insert_resource(EntityIdAllocator::new(1));
        world.insert_resource(SpawnerState::default());

        Self {
            world,
            enemy_registry: EnemyRegistry::new(),
            spawn_config,
            player_config,
        }
    }

    /// Run one fixed 50 ms step. Input and state sampling run first, then
    /// AI, then physics integration, then cleanup and spawning.
    pub fn tick(&mut self, input: &InputSnapshot) {
        self.world.resource_mut::<TickCounter>().0 += 1;

        physics::system_ground_probe(&mut self.world);
        player::controller::system_look(&mut self.world, input, &self.player_config);
        player::controller::system_crouch(&mut self.world, input, &self.player_config);
        player::controller::system_jump(&mut self.world, input, &self.player_config);
        player::controller::system_stamina(&mut self.world, input, &self.player_config);
        player::controller::system_move(&mut self.world, input, &self.player_config);
        player::controller::system_airborne_gravity(&mut self.world, &self.player_config);
        ai::system::system_ai_tick(&mut self.world);
        physics::system_integrate(&mut self.world);
        system_cleanup_dead(&mut self.world);
        spawning::system_population_spawn(&mut self.world, &self.enemy_registry, &self.spawn_config);
    }

    /// Drain all pending outgoing events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.resource_mut::<OutgoingEvents>().events)
    }

    /// Return the current tick count.
    pub fn current_tick(&self) -> u64 {
        self.world.resource::<TickCounter>().0
    }

    /// Spawn the player on the arena floor. Returns `(unique_id, runtime_id)`.
    pub fn spawn_player(&mut self, x: f32, z: f32) -> (i64, u64) {
        let floor_y = self.world.resource::<Arena>().floor_y;
        player::state::spawn_player(&mut self.world, &self.player_config, x, floor_y, z)
    }

    /// Spawn an enemy. Returns `(unique_id, runtime_id)`, or `None` for an
    /// unknown type id. Not counted against the spawner's population cap.
    pub fn spawn_enemy(&mut self, type_id: &str, x: f32, y: f32, z: f32) -> Option<(i64, u64)> {
        spawning::spawn_enemy_at(&mut self.world, &self.enemy_registry, type_id, x, y, z, false)
    }

    /// Spawn a static obstruction box (bottom anchored at `y`).
    pub fn spawn_obstruction(&mut self, x: f32, y: f32, z: f32, width: f32, height: f32) {
        self.world.spawn((
            Obstruction,
            Position { x, y, z },
            BoundingBox { width, height },
        ));
    }

    /// Deal damage to the player. See [`player::state::take_damage`].
    pub fn damage_player(&mut self, amount: f32) -> Option<f32> {
        player::state::take_damage(&mut self.world, amount)
    }

    /// Heal the player. See [`player::state::heal`].
    pub fn heal_player(&mut self, amount: f32) -> Option<f32> {
        player::state::heal(&mut self.world, amount)
    }

    /// Deal damage to an enemy. Returns remaining health, or `None` if the
    /// enemy is missing or inside its invulnerability window (10 ticks).
    pub fn damage_enemy(&mut self, runtime_id: u64, amount: f32) -> Option<f32> {
        let tick = self.current_tick();
        let target = self.find_enemy_entity(runtime_id)?;

        if let Some(ldt) = self.world.get::<LastDamageTick>(target) {
            if let Some(last) = ldt.0 {
                if tick.saturating_sub(last) < 10 {
                    return None;
                }
            }
        }

        let new_health = {
            let mut health = self.world.get_mut::<Health>(target)?;
            health.current = (health.current - amount).max(0.0);
            health.current
        };
        if let Some(mut ldt) = self.world.get_mut::<LastDamageTick>(target) {
            ldt.0 = Some(tick);
        }

        let unique_id = self.world.get::<EntityId>(target)?.unique_id;
        if new_health <= 0.0 {
            self.world
                .resource_mut::<OutgoingEvents>()
                .events
                .push(GameEvent::EnemyDied {
                    runtime_id,
                    unique_id,
                });
            self.world.entity_mut(target).insert(Dead);
        } else {
            self.world
                .resource_mut::<OutgoingEvents>()
                .events
                .push(GameEvent::EnemyHurt {
                    runtime_id,
                    new_health,
                    tick,
                });
        }

        Some(new_health)
    }

    /// Remove an enemy by runtime_id. Returns `true` if found and removed.
    /// Spawner-created enemies release their population slot here.
    pub fn despawn_enemy(&mut self, runtime_id: u64) -> bool {
        let Some(entity) = self.find_enemy_entity(runtime_id) else {
            return false;
        };
        let unique_id = self
            .world
            .get::<EntityId>(entity)
            .map(|e| e.unique_id)
            .unwrap_or(0);
        let spawned = self.world.get::<Spawned>(entity).is_some();

        if spawned {
            let mut state = self.world.resource_mut::<SpawnerState>();
            state.live = state.live.saturating_sub(1);
        }
        self.world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::EnemyRemoved { unique_id });
        self.world.despawn(entity);
        true
    }

    /// Number of currently existing spawner-created enemies.
    pub fn live_spawned(&self) -> u32 {
        self.world.resource::<SpawnerState>().live
    }

    /// Get an enemy's position by runtime_id.
    pub fn enemy_position(&mut self, runtime_id: u64) -> Option<(f32, f32, f32)> {
        let entity = self.find_enemy_entity(runtime_id)?;
        self.world
            .get::<Position>(entity)
            .map(|p| (p.x, p.y, p.z))
    }

    /// Get snapshots of all alive enemies.
    pub fn all_enemies(&mut self) -> Vec<EnemySnapshot> {
        let mut result = Vec::new();
        let mut query = self.world.query_filtered::<(
            &EntityId,
            &Position,
            &Rotation,
            &Health,
            &EnemyType,
        ), (With<Enemy>, Without<Dead>)>();
        for (eid, pos, rot, health, enemy_type) in query.iter(&self.world) {
            result.push(EnemySnapshot {
                unique_id: eid.unique_id,
                runtime_id: eid.runtime_id,
                enemy_type: enemy_type.0.clone(),
                position: (pos.x, pos.y, pos.z),
                yaw: rot.yaw,
                health: health.current,
                max_health: health.max,
            });
        }
        result
    }

    /// The player's position, if a player exists.
    pub fn player_position(&mut self) -> Option<(f32, f32, f32)> {
        let mut q = self
            .world
            .query_filtered::<&Position, With<Player>>();
        q.iter(&self.world).next().map(|p| (p.x, p.y, p.z))
    }

    /// The player's `(current, max)` health.
    pub fn player_health(&mut self) -> Option<(f32, f32)> {
        let mut q = self.world.query_filtered::<&Health, With<Player>>();
        q.iter(&self.world).next().map(|h| (h.current, h.max))
    }

    /// The player's current stamina.
    pub fn player_stamina(&mut self) -> Option<f32> {
        let mut q = self.world.query_filtered::<&Stamina, With<Player>>();
        q.iter(&self.world).next().map(|s| s.current)
    }

    /// Whether the player has died.
    pub fn is_player_dead(&mut self) -> bool {
        let mut q = self
            .world
            .query_filtered::<Entity, (With<Player>, With<Dead>)>();
        q.iter(&self.world).next().is_some()
    }

    /// Find an enemy entity by runtime_id.
    fn find_enemy_entity(&mut self, runtime_id: u64) -> Option<Entity> {
        let mut query = self
            .world
            .query_filtered::<(Entity, &EntityId), With<Enemy>>();
        for (entity, eid) in query.iter(&self.world) {
            if eid.runtime_id == runtime_id {
                return Some(entity);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Systems (manual, called by GameWorld::tick)
// ---------------------------------------------------------------------------

/// Despawn dead enemies after their death events have been emitted,
/// releasing spawner population slots. The player's `Dead` marker is the
/// sticky death flag and is left alone.
fn system_cleanup_dead(world: &mut World) {
    let dead: Vec<(Entity, i64, bool)> = {
        let mut q = world
            .query_filtered::<(Entity, &EntityId, Option<&Spawned>), (With<Dead>, With<Enemy>)>();
        q.iter(world)
            .map(|(entity, eid, spawned)| (entity, eid.unique_id, spawned.is_some()))
            .collect()
    };

    for (entity, unique_id, spawned) in dead {
        if spawned {
            let mut state = world.resource_mut::<SpawnerState>();
            state.live = state.live.saturating_sub(1);
        }
        world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::EnemyRemoved { unique_id });
        world.despawn(entity);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
