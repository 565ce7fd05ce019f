//! Sky with horizontal parallax plus a flat floor, both moved by pitch.
use crate::config::EngineConfig;
use crate::render::compositor::{ImageSlice, blit};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::{TexId, TextureManager};
use raylib::prelude::Color;

pub struct Background {
    sky: TexId,
    sky_offset: f32,
    parallax: f32,
    width: f32,
    height: f32,
    floor_color: Color,
    sky_color: Color,
}

impl Background {
    pub fn new(cfg: &EngineConfig, sky: TexId) -> Self {
        let (fr, fg, fb) = cfg.render.floor_color;
        let (sr, sg, sb) = cfg.render.sky_color;
        Self {
            sky,
            sky_offset: 0.0,
            parallax: cfg.render.sky_parallax,
            width: cfg.window.width as f32,
            height: cfg.window.height as f32,
            floor_color: Color::new(fr, fg, fb, 255),
            sky_color: Color::new(sr, sg, sb, 255),
        }
    }

    pub fn sky_offset(&self) -> f32 {
        self.sky_offset
    }

    /// Scrolls the sky by the camera's rotation this tick.
    pub fn update(&mut self, rel: f32) {
        self.sky_offset = (self.sky_offset + self.parallax * rel).rem_euclid(self.width);
    }

    /// Horizon row for the given pitch shift, kept within [-height, 2 * height].
    pub fn horizon(&self, horizon_shift: f32) -> f32 {
        (self.height / 2.0 + horizon_shift).clamp(-self.height, 2.0 * self.height)
    }

    pub fn draw(&self, fb: &mut Framebuffer, texman: &TextureManager, horizon_shift: f32) {
        let horizon = self.horizon(horizon_shift);
        let half_h = self.height / 2.0;
        let sky_top = horizon - half_h;

        fb.set_background_color(self.sky_color);
        fb.clear();
        if let Some(size) = texman.image_size(self.sky) {
            let slice = ImageSlice::full(self.sky, size);
            blit(fb, texman, &slice, (-self.sky_offset, sky_top), (self.width, half_h));
            blit(fb, texman, &slice, (-self.sky_offset + self.width, sky_top), (self.width, half_h));
        }
        let floor_top = horizon.round() as i32;
        fb.fill_rect(0, floor_top, self.width as i32, self.height as i32 - floor_top, self.floor_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::textures::Pixmap;

    fn setup() -> (TextureManager, Background) {
        let mut tm = TextureManager::new();
        let sky = tm.insert(Pixmap::solid(8, 8, Color::SKYBLUE));
        (tm, Background::new(&EngineConfig::default(), sky))
    }

    #[test]
    fn offset_wraps_both_ways() {
        let (_, mut bg) = setup();
        bg.update(-10.0);
        assert!((bg.sky_offset() - (1600.0 - 45.0)).abs() < 1e-3);
        for _ in 0..100 {
            bg.update(40.0);
        }
        assert!((0.0..1600.0).contains(&bg.sky_offset()));
    }

    #[test]
    fn horizon_is_clamped() {
        let (_, bg) = setup();
        assert_eq!(bg.horizon(0.0), 450.0);
        assert_eq!(bg.horizon(1e6), 1800.0);
        assert_eq!(bg.horizon(-1e6), -900.0);
    }

    #[test]
    fn sky_above_floor_below() {
        let (tm, bg) = setup();
        let mut fb = Framebuffer::new(1600, 900);
        bg.draw(&mut fb, &tm, 0.0);
        assert_eq!(fb.get_pixel(10, 10), Color::SKYBLUE);
        assert_eq!(fb.get_pixel(10, 600), Color::new(30, 30, 30, 255));
    }

    #[test]
    fn pitch_moves_the_horizon() {
        let (tm, bg) = setup();
        let mut fb = Framebuffer::new(1600, 900);
        bg.draw(&mut fb, &tm, 100.0);
        // sky band now spans rows 100..550, the top strip shows the fill colour
        assert_eq!(fb.get_pixel(10, 50), Color::new(0, 0, 0, 255));
        assert_eq!(fb.get_pixel(10, 500), Color::SKYBLUE);
        assert_eq!(fb.get_pixel(10, 560), Color::new(30, 30, 30, 255));
    }
}
