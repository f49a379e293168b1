//! Holds the running world and the current input snapshot, applies console
//! commands, and logs drained events each tick.

use arena_rs_game::game_world::{GameEvent, GameWorld};
use arena_rs_game::player::input::InputSnapshot;
use tracing::{debug, info, warn};

use crate::config::SimConfig;

pub struct SimDriver {
    world: GameWorld,
    input: InputSnapshot,
}

impl SimDriver {
    pub fn new(config: &SimConfig) -> Self {
        let mut world = GameWorld::new(
            config.arena(),
            config.spawn_config(),
            config.player_config(),
        );
        world.spawn_player(config.player.spawn_x, config.player.spawn_z);
        Self {
            world,
            input: InputSnapshot::default(),
        }
    }

    /// Run one simulation tick and log the resulting events. One-shot inputs
    /// (presses and look deltas) are consumed by the tick; axes and the
    /// sprint toggle persist until changed.
    pub fn game_tick(&mut self) {
        let input = self.input;
        self.world.tick(&input);

        self.input.crouch_pressed = false;
        self.input.jump_held = false;
        self.input.look_dx = 0.0;
        self.input.look_dy = 0.0;

        for event in self.world.drain_events() {
            match event {
                GameEvent::EnemySpawned {
                    runtime_id,
                    enemy_type,
                    position,
                    ..
                } => info!(runtime_id, %enemy_type, ?position, "enemy spawned"),
                GameEvent::EnemyHurt {
                    runtime_id,
                    new_health,
                    ..
                } => debug!(runtime_id, new_health, "enemy hurt"),
                GameEvent::EnemyDied { runtime_id, .. } => info!(runtime_id, "enemy died"),
                GameEvent::EnemyRemoved { unique_id } => debug!(unique_id, "enemy removed"),
                GameEvent::PlayerDamaged { new_health, .. } => {
                    info!(new_health, "player hit")
                }
                GameEvent::PlayerDied { tick } => warn!(tick, "player died"),
            }
        }
    }

    /// Apply a console command and return the response text.
    pub fn handle_console_command(&mut self, line: &str) -> String {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["help"] => "commands: status, move <fwd> <strafe>, stop, look <dx> <dy>, \
                         sprint <on|off>, jump, crouch, hurt <n>, heal <n>, \
                         spawn <type> <x> <z>, kill <rid>, remove <rid>, quit"
                .into(),
            ["status"] => self.status(),
            ["move", fwd, strafe] => match (fwd.parse::<f32>(), strafe.parse::<f32>()) {
                (Ok(f), Ok(s)) => {
                    self.input.move_forward = f.clamp(-1.0, 1.0);
                    self.input.move_x = s.clamp(-1.0, 1.0);
                    format!("moving fwd={f} strafe={s}")
                }
                _ => "usage: move <fwd> <strafe>".into(),
            },
            ["stop"] => {
                self.input.move_forward = 0.0;
                self.input.move_x = 0.0;
                self.input.sprint_held = false;
                "stopped".into()
            }
            ["look", dx, dy] => match (dx.parse::<f32>(), dy.parse::<f32>()) {
                (Ok(x), Ok(y)) => {
                    self.input.look_dx = x;
                    self.input.look_dy = y;
                    "ok".into()
                }
                _ => "usage: look <dx> <dy>".into(),
            },
            ["sprint", "on"] => {
                self.input.sprint_held = true;
                "sprinting".into()
            }
            ["sprint", "off"] => {
                self.input.sprint_held = false;
                "walking".into()
            }
            ["jump"] => {
                self.input.jump_held = true;
                "ok".into()
            }
            ["crouch"] => {
                self.input.crouch_pressed = true;
                "ok".into()
            }
            ["hurt", n] => match n.parse::<f32>() {
                Ok(amount) => match self.world.damage_player(amount) {
                    Some(hp) => format!("player at {hp} hp"),
                    None => "no effect".into(),
                },
                Err(_) => "usage: hurt <amount>".into(),
            },
            ["heal", n] => match n.parse::<f32>() {
                Ok(amount) => match self.world.heal_player(amount) {
                    Some(hp) => format!("player at {hp} hp"),
                    None => "no effect".into(),
                },
                Err(_) => "usage: heal <amount>".into(),
            },
            ["spawn", type_id, x, z] => match (x.parse::<f32>(), z.parse::<f32>()) {
                (Ok(x), Ok(z)) => {
                    let y = self.world.player_position().map(|p| p.1).unwrap_or(0.0);
                    match self.world.spawn_enemy(type_id, x, y, z) {
                        Some((_, rid)) => format!("spawned {type_id} as #{rid}"),
                        None => format!("unknown enemy type: {type_id}"),
                    }
                }
                _ => "usage: spawn <type> <x> <z>".into(),
            },
            ["kill", rid] => match rid.parse::<u64>() {
                Ok(rid) => match self.world.damage_enemy(rid, 1.0e9) {
                    Some(_) => format!("killed #{rid}"),
                    None => format!("no enemy #{rid}"),
                },
                Err(_) => "usage: kill <rid>".into(),
            },
            ["remove", rid] => match rid.parse::<u64>() {
                Ok(rid) => {
                    if self.world.despawn_enemy(rid) {
                        format!("removed #{rid}")
                    } else {
                        format!("no enemy #{rid}")
                    }
                }
                Err(_) => "usage: remove <rid>".into(),
            },
            _ => format!("unknown command: {line} (try `help`)"),
        }
    }

    fn status(&mut self) -> String {
        let tick = self.world.current_tick();
        let health = self.world.player_health();
        let stamina = self.world.player_stamina();
        let position = self.world.player_position();
        let dead = self.world.is_player_dead();
        let enemies = self.world.all_enemies();

        let mut out = format!("tick {tick}\n");
        match (health, position) {
            (Some((hp, max)), Some((x, y, z))) => {
                out.push_str(&format!(
                    "player: {hp:.0}/{max:.0} hp, {:.0} stamina, at ({x:.1}, {y:.1}, {z:.1}){}\n",
                    stamina.unwrap_or(0.0),
                    if dead { " [dead]" } else { "" },
                ));
            }
            _ => out.push_str("player: none\n"),
        }
        out.push_str(&format!(
            "enemies: {} ({} from spawner)",
            enemies.len(),
            self.world.live_spawned()
        ));
        for e in enemies.iter().take(10) {
            out.push_str(&format!(
                "\n  #{} {} {:.0}/{:.0} hp at ({:.1}, {:.1}, {:.1})",
                e.runtime_id,
                e.enemy_type,
                e.health,
                e.max_health,
                e.position.0,
                e.position.1,
                e.position.2,
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> SimDriver {
        SimDriver::new(&SimConfig::default())
    }

    #[test]
    fn status_reports_player() {
        let mut d = driver();
        let out = d.handle_console_command("status");
        assert!(out.contains("player:"));
        assert!(out.contains("100/100 hp"));
    }

    #[test]
    fn hurt_and_heal_roundtrip() {
        let mut d = driver();
        assert_eq!(d.handle_console_command("hurt 30"), "player at 70 hp");
        assert_eq!(d.handle_console_command("heal 10"), "player at 80 hp");
    }

    #[test]
    fn move_command_moves_the_player() {
        let mut d = driver();
        d.handle_console_command("move 1 0");
        for _ in 0..10 {
            d.game_tick();
        }
        let (_, _, z) = d.world.player_position().unwrap();
        assert!(z > 0.0);
    }

    #[test]
    fn spawn_and_remove_enemy() {
        let mut d = driver();
        let out = d.handle_console_command("spawn arena:brute 5 5");
        assert!(out.starts_with("spawned"), "{out}");
        assert_eq!(d.world.all_enemies().len(), 1);

        let rid = d.world.all_enemies()[0].runtime_id;
        let out = d.handle_console_command(&format!("remove {rid}"));
        assert!(out.starts_with("removed"), "{out}");
        assert!(d.world.all_enemies().is_empty());
    }

    #[test]
    fn unknown_command_points_at_help() {
        let mut d = driver();
        assert!(d.handle_console_command("dance").contains("help"));
    }
}
