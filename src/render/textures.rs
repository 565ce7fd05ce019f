use crate::error::AssetError;
use raylib::prelude::*;
use std::path::{Path, PathBuf};

/// Handle to a pixmap owned by the [`TextureManager`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TexId(usize);

/// Immutable CPU pixmap sampled per texel.
#[derive(Clone)]
pub struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Pixmap {
    pub fn new(w: u32, h: u32, px: Vec<Color>) -> Self {
        Self { w, h, px }
    }

    pub fn solid(w: u32, h: u32, c: Color) -> Self {
        Self::new(w, h, vec![c; (w * h) as usize])
    }

    #[inline]
    fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[(yi * self.w as usize) + xi]
    }
}

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Default)]
pub struct TextureManager {
    maps: Vec<Pixmap>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pm: Pixmap) -> TexId {
        self.maps.push(pm);
        TexId(self.maps.len() - 1)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<TexId, AssetError> {
        if !path.is_file() {
            return Err(AssetError::Missing { path: path.to_path_buf() });
        }
        let name = path
            .to_str()
            .ok_or_else(|| AssetError::Decode { path: path.to_path_buf(), reason: "non-utf8 path".into() })?;
        let img = Image::load_image(name)
            .map_err(|e| AssetError::Decode { path: path.to_path_buf(), reason: e.to_string() })?;
        let w = img.width().max(1) as u32;
        let h = img.height().max(1) as u32;
        let data = img.get_image_data().to_vec();
        if data.len() != (w * h) as usize {
            return Err(AssetError::Decode { path: path.to_path_buf(), reason: "unexpected pixel count".into() });
        }
        Ok(self.insert(Pixmap::new(w, h, data)))
    }

    /// Loads every image in `dir` in lexicographic file-name order.
    pub fn load_folder(&mut self, dir: &Path) -> Result<Vec<TexId>, AssetError> {
        let files = image_files(dir)?;
        if files.is_empty() {
            return Err(AssetError::EmptyFolder { path: dir.to_path_buf() });
        }
        files.iter().map(|f| self.load_file(f)).collect()
    }

    /// Sample by texel; an unknown id yields white.
    pub fn get_pixel_color(&self, id: TexId, tx: u32, ty: u32) -> Color {
        match self.maps.get(id.0) {
            Some(pm) => pm.sample(tx, ty),
            None => Color::WHITE,
        }
    }

    pub fn image_size(&self, id: TexId) -> Option<(u32, u32)> {
        self.maps.get(id.0).map(|p| (p.w, p.h))
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Placeholder agent silhouette.
    pub fn make_enemy_flat(w: u32, h: u32, body: Color) -> Pixmap {
        let mut px = vec![Color::new(0, 0, 0, 0); (w * h) as usize];
        let cx = (w as f32) * 0.5;
        let cy = (h as f32) * 0.6;
        let rx = (w as f32) * 0.23;
        let ry = (h as f32) * 0.35;
        for y in 0..h {
            for x in 0..w {
                let nx = (x as f32 - cx) / rx;
                let ny = (y as f32 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    px[(y * w + x) as usize] = Color::new(body.r, body.g, body.b, 255);
                }
            }
        }
        Pixmap::new(w, h, px)
    }

    /// Placeholder light: bright core with a fading halo.
    pub fn make_glowing_orb(w: u32, h: u32, color: Color) -> Pixmap {
        let mut px = vec![Color::new(0, 0, 0, 0); (w * h) as usize];
        let cx = (w as f32) * 0.5;
        let cy = (h as f32) * 0.5;
        let r = (w.min(h) as f32) * 0.3;
        for y in 0..h {
            for x in 0..w {
                let d = (x as f32 - cx).hypot(y as f32 - cy);
                let i = (y * w + x) as usize;
                if d <= r {
                    let t = (1.0 - (d / r)).clamp(0.0, 1.0);
                    let mut core = Self::mix(color, Color::WHITE, (t * 220.0) as u8);
                    core.a = 255;
                    px[i] = core;
                } else {
                    let t = (1.0 - ((d - r) / (r * 0.9))).clamp(0.0, 1.0);
                    if t > 0.0 {
                        let mut halo = color;
                        halo.a = (t * 180.0) as u8;
                        px[i] = halo;
                    }
                }
            }
        }
        Pixmap::new(w, h, px)
    }

    #[inline]
    fn mix(a: Color, b: Color, t: u8) -> Color {
        let ta = t as u16;
        let na = 255u16 - ta;
        let mixc = |x: u8, y: u8| -> u8 { (((x as u16) * na + (y as u16) * ta) / 255) as u8 };
        Color::new(mixc(a.r, b.r), mixc(a.g, b.g), mixc(a.b, b.b), mixc(a.a, b.a))
    }
}

fn image_files(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let entries = std::fs::read_dir(dir).map_err(|_| AssetError::Missing { path: dir.to_path_buf() })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}
