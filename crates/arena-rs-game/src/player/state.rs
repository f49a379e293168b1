//! Player health and death.
//!
//! Damage and heal amounts are clamped into `[0, max]` but deliberately not
//! validated for sign; death is a sticky, one-way transition surfaced as a
//! `PlayerDied` event.

use bevy_ecs::prelude::*;
use tracing::info;

use crate::components::*;
use crate::game_world::{EntityIdAllocator, GameEvent, OutgoingEvents, TickCounter};
use crate::player::controller::PlayerConfig;

/// Spawn the player entity. Returns `(unique_id, runtime_id)`.
pub fn spawn_player(
    world: &mut World,
    config: &PlayerConfig,
    x: f32,
    y: f32,
    z: f32,
) -> (i64, u64) {
    let unique_id = world.resource::<EntityIdAllocator>().allocate();
    let runtime_id = unique_id as u64;

    world.spawn((
        EntityId {
            unique_id,
            runtime_id,
        },
        Position { x, y, z },
        Rotation {
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
        },
        Velocity {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        },
        Health {
            current: config.max_health,
            max: config.max_health,
        },
        OnGround(false),
        BoundingBox {
            width: config.width,
            height: config.stand_height,
        },
        Player,
        Crouching(false),
        Stamina {
            current: config.max_stamina,
            can_sprint: true,
            sprinting: false,
            idle_time: 0.0,
        },
        JumpControl {
            ready: true,
            ready_at: None,
        },
    ));

    (unique_id, runtime_id)
}

/// Find the player entity, if one exists.
pub fn find_player(world: &mut World) -> Option<Entity> {
    let mut q = world.query_filtered::<Entity, With<Player>>();
    q.iter(world).next()
}

/// Deal damage to the player. Returns the new health, or `None` if there is
/// no player or the player is already dead. Reaching zero inserts the sticky
/// `Dead` marker and emits `PlayerDied`.
pub fn take_damage(world: &mut World, amount: f32) -> Option<f32> {
    let entity = find_player(world)?;
    if world.get::<Dead>(entity).is_some() {
        return None;
    }

    let new_health = {
        let mut health = world.get_mut::<Health>(entity)?;
        health.current = (health.current - amount).clamp(0.0, health.max);
        health.current
    };

    let tick = world.resource::<TickCounter>().0;
    if new_health <= 0.0 {
        world.entity_mut(entity).insert(Dead);
        info!("player died");
        world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::PlayerDied { tick });
    } else {
        world
            .resource_mut::<OutgoingEvents>()
            .events
            .push(GameEvent::PlayerDamaged { new_health, tick });
    }

    Some(new_health)
}

/// Heal the player, clamped at max health. No-op when dead or absent.
pub fn heal(world: &mut World, amount: f32) -> Option<f32> {
    let entity = find_player(world)?;
    if world.get::<Dead>(entity).is_some() {
        return None;
    }

    let mut health = world.get_mut::<Health>(entity)?;
    health.current = (health.current + amount).clamp(0.0, health.max);
    Some(health.current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> World {
        let mut world = World::new();
        world.insert_resource(TickCounter::default());
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(EntityIdAllocator::new(1));
        spawn_player(&mut world, &PlayerConfig::default(), 0.0, 0.0, 0.0);
        world
    }

    #[test]
    fn damage_clamps_and_death_is_sticky() {
        let mut world = world_with_player();

        assert_eq!(take_damage(&mut world, 30.0), Some(70.0));
        assert_eq!(take_damage(&mut world, 30.0), Some(40.0));
        assert_eq!(take_damage(&mut world, 30.0), Some(10.0));

        // Fourth hit bottoms out and kills.
        assert_eq!(take_damage(&mut world, 30.0), Some(0.0));
        let entity = find_player(&mut world).unwrap();
        assert!(world.get::<Dead>(entity).is_some());
        let events = std::mem::take(&mut world.resource_mut::<OutgoingEvents>().events);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerDied { .. })));

        // Further damage is a no-op; health stays at zero.
        assert_eq!(take_damage(&mut world, 30.0), None);
        assert_eq!(world.get::<Health>(entity).unwrap().current, 0.0);
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut world = world_with_player();
        assert_eq!(take_damage(&mut world, 10.0), Some(90.0));
        assert_eq!(heal(&mut world, 50.0), Some(100.0));
    }

    #[test]
    fn heal_is_noop_when_dead() {
        let mut world = world_with_player();
        assert_eq!(take_damage(&mut world, 1000.0), Some(0.0));
        assert_eq!(heal(&mut world, 50.0), None);
        let entity = find_player(&mut world).unwrap();
        assert_eq!(world.get::<Health>(entity).unwrap().current, 0.0);
    }

    #[test]
    fn negative_amounts_pass_through_unvalidated() {
        // Preserved permissive behavior: a negative damage amount raises
        // health, absorbed by the clamp.
        let mut world = world_with_player();
        assert_eq!(take_damage(&mut world, 40.0), Some(60.0));
        assert_eq!(take_damage(&mut world, -20.0), Some(80.0));
        assert_eq!(take_damage(&mut world, -500.0), Some(100.0));
    }

    #[test]
    fn damage_without_player_is_none() {
        let mut world = World::new();
        world.insert_resource(TickCounter::default());
        world.insert_resource(OutgoingEvents::default());
        world.insert_resource(EntityIdAllocator::new(1));
        assert_eq!(take_damage(&mut world, 10.0), None);
    }
}
