//! Simulation: grid, caster, agents, player and the per-tick world update.
//!
//! Nothing in here touches the window; rendering reads the results through
//! projections and frame handles.

pub mod agent;
pub mod animation;
pub mod caster;
pub mod clock;
pub mod grid;
pub mod input;
pub mod pathfinding;
pub mod player;
pub mod spawner;
pub mod sprite;
pub mod weapon;
pub mod world;
