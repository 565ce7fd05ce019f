//! Software renderer.
//!
//! - `framebuffer`: CPU framebuffer, fills and the damage tint
//! - `textures`: pixmap store addressed by `TexId`
//! - `assets`: loads every game image into the store
//! - `projector`: billboard projection
//! - `walls`: one wall column per ray
//! - `background`: sky parallax and floor
//! - `compositor`: back-to-front painter's pass
//! - `hud`: text overlay drawn straight to the window

pub mod assets;
pub mod background;
pub mod compositor;
pub mod framebuffer;
pub mod hud;
pub mod projector;
pub mod textures;
pub mod walls;
