//! doomcaster: a grid-based 2.5-D raycasting shooter.
//!
//! `game` holds the simulation (grid, DDA caster, agents, world update) and
//! `render` the software renderer that turns it into a framebuffer. The
//! binary in `main.rs` owns the window and drives both once per frame.

pub mod audio_manager;
pub mod config;
pub mod error;
pub mod game;
pub mod render;
