//! The playable arena: a circular region with a flat floor.

use bevy_ecs::prelude::*;

/// Circular playable region. Entities collide with the floor at `floor_y`;
/// the spawner clamps spawn points inside `radius` (minus its edge padding).
#[derive(Resource, Debug, Clone, Copy)]
pub struct Arena {
    pub center_x: f32,
    pub center_z: f32,
    pub radius: f32,
    pub floor_y: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_z: 0.0,
            radius: 20.0,
            floor_y: 0.0,
        }
    }
}

impl Arena {
    /// Planar distance from the arena center to `(x, z)`.
    pub fn distance_from_center(&self, x: f32, z: f32) -> f32 {
        let dx = x - self.center_x;
        let dz = z - self.center_z;
        (dx * dx + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_from_center() {
        let arena = Arena {
            center_x: 1.0,
            center_z: 2.0,
            ..Default::default()
        };
        assert!((arena.distance_from_center(4.0, 6.0) - 5.0).abs() < 0.001);
    }
}
