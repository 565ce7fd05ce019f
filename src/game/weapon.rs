//! Shotgun view-model: fire gating, the one-tick shot flag and the reload cycle.
use crate::audio_manager::{AudioSink, SoundEvent};
use crate::game::animation::{AnimationTimer, FrameCycle};
use crate::game::player::Player;
use crate::render::compositor::{ImageSlice, blit};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{TexId, TextureManager};

pub const WEAPON_DAMAGE: i32 = 50;
const WEAPON_SCALE: f32 = 0.4;
const WEAPON_ANIM_MS: u64 = 90;

pub struct Weapon {
    pub damage: i32,
    pub reloading: bool,
    frames: FrameCycle<TexId>,
    timer: AnimationTimer,
    frame_counter: usize,
}

impl Weapon {
    pub fn new(frames: Vec<TexId>, now_ms: u64) -> Self {
        Self {
            damage: WEAPON_DAMAGE,
            reloading: false,
            frames: FrameCycle::new(frames),
            timer: AnimationTimer::new(WEAPON_ANIM_MS, now_ms),
            frame_counter: 0,
        }
    }

    /// Starts a shot when the trigger is pulled and the weapon is ready.
    pub fn try_fire(&mut self, fire: bool, player: &mut Player, audio: &dyn AudioSink) -> bool {
        if !fire || self.reloading || !player.is_alive() {
            return false;
        }
        audio.play(SoundEvent::Shot);
        player.shot = true;
        self.reloading = true;
        true
    }

    /// Runs after agents have seen the shot; clears it and plays one full cycle.
    pub fn update(&mut self, now_ms: u64, player: &mut Player) {
        let trigger = self.timer.check(now_ms);
        if !self.reloading {
            return;
        }
        player.shot = false;
        if trigger {
            self.frames.advance();
            self.frame_counter += 1;
            if self.frame_counter >= self.frames.len() {
                self.reloading = false;
                self.frame_counter = 0;
            }
        }
    }

    pub fn current_frame(&self) -> Option<TexId> {
        self.frames.current()
    }

    /// Bottom-centre of the screen. Looking down sinks it with the view; looking
    /// up leaves it on the bottom edge so no gap opens under it.
    pub fn draw(&self, fb: &mut Framebuffer, texman: &TextureManager, horizon_shift: f32) {
        let Some(tex) = self.current_frame() else { return };
        let Some(size) = texman.image_size(tex) else { return };
        let w = size.0 as f32 * WEAPON_SCALE;
        let h = size.1 as f32 * WEAPON_SCALE;
        let x = fb.width as f32 / 2.0 - w / 2.0;
        let y = fb.height as f32 - h - horizon_shift.min(0.0);
        blit(fb, texman, &ImageSlice::full(tex, size), (x, y), (w, h));
    }
}
