use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

/// CPU-side RGBA target uploaded to a persistent GPU texture once per frame.
pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self { color_buffer: vec![bg; size], width, height, background_color: bg }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Color) {
        self.background_color = c;
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    /// Fills the intersection of the rect with the screen; rect may be partly off screen.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x.saturating_add(w)).min(self.width as i32);
        let y1 = (y.saturating_add(h)).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for yy in y0..y1 {
            let row = (yy as u32 * self.width) as usize;
            self.color_buffer[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Red tint fading toward the screen edges; `intensity` in 0..1.
    pub fn apply_damage_tint(&mut self, intensity: f32) {
        let k = intensity.clamp(0.0, 1.0);
        if k <= 0.0 {
            return;
        }
        let cx = self.width as f32 * 0.5;
        let cy = self.height as f32 * 0.5;
        let max_r = cx.hypot(cy);
        for y in 0..self.height {
            for x in 0..self.width {
                let t = ((x as f32 - cx).hypot(y as f32 - cy) / max_r).clamp(0.0, 1.0);
                let a = k * (0.35 + 0.65 * t * t);
                let idx = (y * self.width + x) as usize;
                let c = self.color_buffer[idx];
                let mix = |v: u8, target: f32| -> u8 { (v as f32 * (1.0 - a) + target * a).clamp(0.0, 255.0) as u8 };
                self.color_buffer[idx] = Color::new(mix(c.r, 255.0), mix(c.g, 0.0), mix(c.b, 0.0), c.a);
            }
        }
    }

    /// Uploads the pixels into `tex`, which must match the framebuffer size.
    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        // Color is four packed u8 fields, so the buffer is already RGBA8
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        let bytes: &[u8] = unsafe { std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len) };
        let _ = tex.update_texture(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel_color(4, 0, Color::RED);
        fb.set_pixel_color(0, 3, Color::RED);
        assert!(fb.color_buffer.iter().all(|&c| c == Color::BLACK));
        assert_eq!(fb.get_pixel(9, 9), Color::BLACK);
    }

    #[test]
    fn fill_rect_clips_to_screen() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(-2, 2, 4, 10, Color::BLUE);
        assert_eq!(fb.get_pixel(0, 2), Color::BLUE);
        assert_eq!(fb.get_pixel(1, 3), Color::BLUE);
        assert_eq!(fb.get_pixel(2, 2), Color::BLACK);
        assert_eq!(fb.get_pixel(0, 1), Color::BLACK);
        fb.fill_rect(10, 10, 5, 5, Color::RED);
    }

    #[test]
    fn clear_restores_background() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_background_color(Color::GRAY);
        fb.fill_rect(0, 0, 2, 2, Color::RED);
        fb.clear();
        assert!(fb.color_buffer.iter().all(|&c| c == Color::GRAY));
    }

    #[test]
    fn damage_tint_reddens() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set_background_color(Color::new(100, 100, 100, 255));
        fb.clear();
        fb.apply_damage_tint(1.0);
        let c = fb.get_pixel(4, 4);
        assert!(c.r > 100 && c.g < 100 && c.b < 100);
        let edge = fb.get_pixel(0, 0);
        assert!(edge.g < c.g);
    }
}
