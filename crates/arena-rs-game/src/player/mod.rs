//! Player: input snapshots, health/death state, and the locomotion
//! controller.

pub mod controller;
pub mod input;
pub mod state;
