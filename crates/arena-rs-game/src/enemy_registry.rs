//! Enemy archetype definitions.
//!
//! Provides a registry of known enemy types with their stats and hitbox
//! dimensions. Spawning an unknown type id is a silent no-op at the caller.

/// Definition of an enemy archetype.
#[derive(Debug, Clone)]
pub struct EnemyDefinition {
    /// Identifier, e.g. `"arena:walker"`.
    pub type_id: String,
    /// Display name, e.g. `"Walker"`.
    pub display_name: String,
    pub max_health: f32,
    /// Damage dealt per qualifying contact hit.
    pub contact_damage: f32,
    /// Minimum seconds between contact hits.
    pub damage_cooldown: f32,
    /// Chase speed in meters per second.
    pub movement_speed: f32,
    /// Planar distance at which the chase halts.
    pub stopping_distance: f32,
    /// Yaw interpolation factor per second while turning toward the
    /// travel direction.
    pub turn_rate: f32,
    /// Bounding box width.
    pub bb_width: f32,
    /// Bounding box height.
    pub bb_height: f32,
}

/// Registry of supported enemy types.
pub struct EnemyRegistry {
    enemies: Vec<EnemyDefinition>,
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyRegistry {
    /// Build the registry with all known enemy types.
    pub fn new() -> Self {
        Self {
            enemies: vec![
                EnemyDefinition {
                    type_id: "arena:walker".into(),
                    display_name: "Walker".into(),
                    max_health: 20.0,
                    contact_damage: 10.0,
                    damage_cooldown: 1.0,
                    movement_speed: 3.0,
                    stopping_distance: 1.2,
                    turn_rate: 10.0,
                    bb_width: 0.8,
                    bb_height: 1.8,
                },
                EnemyDefinition {
                    type_id: "arena:brute".into(),
                    display_name: "Brute".into(),
                    max_health: 60.0,
                    contact_damage: 25.0,
                    damage_cooldown: 1.5,
                    movement_speed: 1.8,
                    stopping_distance: 1.5,
                    turn_rate: 6.0,
                    bb_width: 1.2,
                    bb_height: 2.2,
                },
                EnemyDefinition {
                    type_id: "arena:skitter".into(),
                    display_name: "Skitter".into(),
                    max_health: 8.0,
                    contact_damage: 4.0,
                    damage_cooldown: 0.6,
                    movement_speed: 5.5,
                    stopping_distance: 0.9,
                    turn_rate: 14.0,
                    bb_width: 0.5,
                    bb_height: 0.7,
                },
            ],
        }
    }

    /// Look up an enemy definition by type id.
    pub fn get(&self, type_id: &str) -> Option<&EnemyDefinition> {
        self.enemies.iter().find(|e| e.type_id == type_id)
    }

    /// All known definitions.
    pub fn all(&self) -> &[EnemyDefinition] {
        &self.enemies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_walker() {
        let registry = EnemyRegistry::new();
        let walker = registry.get("arena:walker").unwrap();
        assert_eq!(walker.display_name, "Walker");
        assert!(walker.contact_damage > 0.0);
    }

    #[test]
    fn unknown_type_is_none() {
        let registry = EnemyRegistry::new();
        assert!(registry.get("arena:ghost").is_none());
    }

    #[test]
    fn all_lists_every_type() {
        let registry = EnemyRegistry::new();
        assert_eq!(registry.all().len(), 3);
    }
}
