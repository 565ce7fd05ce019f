//! The camera/player: position, heading, pitch and health.
use crate::audio_manager::{AudioSink, SoundEvent};
use crate::config::PlayerConfig;
use crate::game::clock::FrameTick;
use crate::game::grid::{Cell, GridMap, cell_of};
use crate::game::input::InputState;
use raylib::prelude::*;
use std::f32::consts::TAU;

const DAMAGE_FLASH_MS: u64 = 120;

/// Read-only view used by projection and rendering.
#[derive(Copy, Clone, Debug)]
pub struct CameraView {
    pub pos: Vector2,
    pub angle: f32,
    /// Pixels the horizon is pushed down (negative: up).
    pub horizon_shift: f32,
}

pub struct Player {
    pub pos: Vector2,
    pub angle: f32,
    pub pitch: f32,
    pub health: i32,
    pub max_health: i32,
    /// Clamped horizontal mouse delta of this tick (drives sky parallax).
    pub rel: f32,
    /// Set for exactly one update when a shot is fired.
    pub shot: bool,
    pub damage_flash_ms: u64,
    cfg: PlayerConfig,
    recovery_prev_ms: u64,
}

impl Player {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            pos: Vector2::new(cfg.start.0, cfg.start.1),
            angle: cfg.angle,
            pitch: 0.0,
            health: cfg.max_health,
            max_health: cfg.max_health,
            rel: 0.0,
            shot: false,
            damage_flash_ms: 0,
            cfg: cfg.clone(),
            recovery_prev_ms: 0,
        }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        cell_of(self.pos.x, self.pos.y)
    }

    pub fn is_alive(&self) -> bool {
        self.health >= 1
    }

    pub fn view(&self, pitch_factor: f32) -> CameraView {
        CameraView { pos: self.pos, angle: self.angle, horizon_shift: (self.pitch * pitch_factor).round() }
    }

    pub fn update(&mut self, input: &InputState, tick: FrameTick, grid: &GridMap) {
        self.movement(input, tick, grid);
        self.mouse_control(input, tick);
        self.recover_health(tick);
        self.damage_flash_ms = self.damage_flash_ms.saturating_sub(tick.dt_ms);
    }

    fn movement(&mut self, input: &InputState, tick: FrameTick, grid: &GridMap) {
        let (sin_a, cos_a) = self.angle.sin_cos();
        let speed = self.cfg.speed * tick.dt_ms as f32;
        let (speed_sin, speed_cos) = (speed * sin_a, speed * cos_a);
        let (mut dx, mut dy) = (0.0, 0.0);
        if input.forward {
            dx += speed_cos;
            dy += speed_sin;
        }
        if input.back {
            dx -= speed_cos;
            dy -= speed_sin;
        }
        if input.strafe_left {
            dx += speed_sin;
            dy -= speed_cos;
        }
        if input.strafe_right {
            dx -= speed_sin;
            dy += speed_cos;
        }
        if dx != 0.0 || dy != 0.0 {
            grid.slide_move(&mut self.pos.x, &mut self.pos.y, dx, dy, self.cfg.radius);
        }
    }

    fn mouse_control(&mut self, input: &InputState, tick: FrameTick) {
        let max_rel = self.cfg.mouse_max_rel;
        self.rel = input.mouse_dx.clamp(-max_rel, max_rel);
        self.angle = (self.angle + self.rel * self.cfg.mouse_sensitivity * tick.dt_ms as f32).rem_euclid(TAU);
        let max_pitch = self.cfg.max_pitch;
        self.pitch = (self.pitch - input.mouse_dy * self.cfg.pitch_sensitivity).clamp(-max_pitch, max_pitch);
    }

    fn recover_health(&mut self, tick: FrameTick) {
        if tick.now_ms.saturating_sub(self.recovery_prev_ms) > self.cfg.health_recovery_ms {
            self.recovery_prev_ms = tick.now_ms;
            if self.is_alive() && self.health < self.max_health {
                self.health += 1;
            }
        }
    }

    /// Applies `damage` reduced by the resistance factor; returns what was taken.
    pub fn take_damage(&mut self, damage: i32, audio: &dyn AudioSink) -> i32 {
        let taken = (damage as f32 * (1.0 - self.cfg.damage_resistance)).round() as i32;
        self.health = (self.health - taken).max(0);
        self.damage_flash_ms = DAMAGE_FLASH_MS;
        audio.play(SoundEvent::PlayerPain);
        taken
    }
}
