//! Per-archetype behavior lists.

use super::behavior::Behavior;
use super::behaviors::{ChasePlayer, ContactDamage};
use crate::enemy_registry::EnemyDefinition;
use crate::seconds_to_ticks;

/// Create the behavior list for an enemy definition.
pub fn create_behaviors(def: &EnemyDefinition) -> Vec<Box<dyn Behavior>> {
    vec![
        Box::new(ChasePlayer::new(def.stopping_distance, def.turn_rate)),
        Box::new(ContactDamage::new(seconds_to_ticks(def.damage_cooldown))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behavior::BehaviorType;
    use crate::enemy_registry::EnemyRegistry;

    #[test]
    fn every_archetype_chases_and_hits() {
        let registry = EnemyRegistry::new();
        for def in registry.all() {
            let behaviors = create_behaviors(def);
            assert!(behaviors
                .iter()
                .any(|b| b.behavior_type() == BehaviorType::Movement));
            assert!(behaviors
                .iter()
                .any(|b| b.behavior_type() == BehaviorType::Passive));
        }
    }
}
