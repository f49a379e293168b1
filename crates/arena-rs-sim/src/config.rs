//! Simulation configuration loaded from `arena.toml`. Every section and
//! field is optional; an empty file yields the defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use arena_rs_game::ai::spawning::SpawnConfig;
use arena_rs_game::arena::Arena;
use arena_rs_game::player::controller::PlayerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub arena: ArenaSection,
    #[serde(default)]
    pub spawner: SpawnerSection,
    #[serde(default)]
    pub player: PlayerSection,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArenaSection {
    #[serde(default)]
    pub center_x: f32,
    #[serde(default)]
    pub center_z: f32,
    #[serde(default = "default_arena_radius")]
    pub radius: f32,
    #[serde(default)]
    pub floor_y: f32,
}

fn default_arena_radius() -> f32 {
    20.0
}

impl Default for ArenaSection {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_z: 0.0,
            radius: default_arena_radius(),
            floor_y: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SpawnerSection {
    #[serde(default = "default_enemy_type")]
    pub enemy_type: String,
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
    #[serde(default = "default_min_spawn_distance")]
    pub min_spawn_distance: f32,
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval: f32,
    #[serde(default = "default_max_enemies")]
    pub max_enemies: u32,
    #[serde(default = "default_edge_padding")]
    pub edge_padding: f32,
}

fn default_enemy_type() -> String {
    "arena:walker".into()
}

fn default_spawn_radius() -> f32 {
    10.0
}

fn default_min_spawn_distance() -> f32 {
    4.0
}

fn default_spawn_interval() -> f32 {
    1.5
}

fn default_max_enemies() -> u32 {
    50
}

fn default_edge_padding() -> f32 {
    1.0
}

impl Default for SpawnerSection {
    fn default() -> Self {
        Self {
            enemy_type: default_enemy_type(),
            spawn_radius: default_spawn_radius(),
            min_spawn_distance: default_min_spawn_distance(),
            spawn_interval: default_spawn_interval(),
            max_enemies: default_max_enemies(),
            edge_padding: default_edge_padding(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayerSection {
    #[serde(default = "default_max_health")]
    pub max_health: f32,
    #[serde(default = "default_max_stamina")]
    pub max_stamina: f32,
    #[serde(default)]
    pub spawn_x: f32,
    #[serde(default)]
    pub spawn_z: f32,
}

fn default_max_health() -> f32 {
    100.0
}

fn default_max_stamina() -> f32 {
    100.0
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            max_health: default_max_health(),
            max_stamina: default_max_stamina(),
            spawn_x: 0.0,
            spawn_z: 0.0,
        }
    }
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn arena(&self) -> Arena {
        Arena {
            center_x: self.arena.center_x,
            center_z: self.arena.center_z,
            radius: self.arena.radius,
            floor_y: self.arena.floor_y,
        }
    }

    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            enemy_type: self.spawner.enemy_type.clone(),
            spawn_radius: self.spawner.spawn_radius,
            min_spawn_distance: self.spawner.min_spawn_distance,
            spawn_interval: self.spawner.spawn_interval,
            max_enemies: self.spawner.max_enemies,
            edge_padding: self.spawner.edge_padding,
        }
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            max_health: self.player.max_health,
            max_stamina: self.player.max_stamina,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [logging]
            level = "debug"

            [arena]
            radius = 30.0

            [spawner]
            enemy_type = "arena:brute"
            spawn_interval = 2.0
            max_enemies = 10

            [player]
            max_health = 150.0
        "#;
        let config: SimConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.arena.radius, 30.0);
        assert_eq!(config.arena.floor_y, 0.0); // default
        assert_eq!(config.spawner.enemy_type, "arena:brute");
        assert_eq!(config.spawner.spawn_interval, 2.0);
        assert_eq!(config.spawner.max_enemies, 10);
        assert_eq!(config.spawner.min_spawn_distance, 4.0); // default
        assert_eq!(config.player.max_health, 150.0);
        assert_eq!(config.player.max_stamina, 100.0); // default
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: SimConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.arena.radius, 20.0);
        assert_eq!(config.spawner.enemy_type, "arena:walker");
        assert_eq!(config.spawner.max_enemies, 50);
        assert_eq!(config.player.max_health, 100.0);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let result: Result<SimConfig, _> = toml::from_str("[arena\nradius = x");
        assert!(result.is_err());
    }
}
