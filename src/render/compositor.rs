//! Painter's-algorithm compositor: wall columns and billboards are queued
//! per frame, then drawn farthest first so nearer items overwrite.
use crate::render::framebuffer::Framebuffer;
use crate::render::projector::Projection;
use crate::render::textures::{TexId, TextureManager};

/// Source rectangle of a texture, in texels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageSlice {
    pub tex: TexId,
    pub src_x: f32,
    pub src_y: f32,
    pub src_w: f32,
    pub src_h: f32,
}

impl ImageSlice {
    pub fn full(tex: TexId, (w, h): (u32, u32)) -> Self {
        Self { tex, src_x: 0.0, src_y: 0.0, src_w: w as f32, src_h: h as f32 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectedItem {
    pub depth: f32,
    pub image: ImageSlice,
    /// Top-left on screen.
    pub pos: (f32, f32),
    pub size: (f32, f32),
}

impl ProjectedItem {
    pub fn billboard(p: &Projection, tex: TexId, image_size: (u32, u32)) -> Self {
        Self { depth: p.norm_dist, image: ImageSlice::full(tex, image_size), pos: p.pos, size: (p.width, p.height) }
    }
}

#[derive(Default)]
pub struct Compositor {
    items: Vec<ProjectedItem>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, item: ProjectedItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorts farthest first. The sort is stable, so equal depths keep
    /// insertion order from frame to frame.
    pub fn sorted(&mut self) -> &[ProjectedItem] {
        self.items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        &self.items
    }

    /// Draws every queued item back to front and empties the queue.
    pub fn composite(&mut self, fb: &mut Framebuffer, texman: &TextureManager) {
        self.sorted();
        for item in self.items.drain(..) {
            blit(fb, texman, &item.image, item.pos, item.size);
        }
    }
}

/// Scales `image` into the destination rect, clipped to the screen.
/// Texels with alpha below 8 are treated as transparent.
pub fn blit(fb: &mut Framebuffer, texman: &TextureManager, image: &ImageSlice, pos: (f32, f32), size: (f32, f32)) {
    let (w, h) = size;
    if w <= 0.0 || h <= 0.0 || !w.is_finite() || !h.is_finite() {
        return;
    }
    let x0 = pos.0.floor().max(0.0);
    let y0 = pos.1.floor().max(0.0);
    let x1 = (pos.0 + w).ceil().min(fb.width as f32);
    let y1 = (pos.1 + h).ceil().min(fb.height as f32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let (x0, x1, y0, y1) = (x0 as u32, x1 as u32, y0 as u32, y1 as u32);
    let sx = image.src_w / w;
    let sy = image.src_h / h;
    for y in y0..y1 {
        let v = (y as f32 + 0.5 - pos.1) * sy;
        if v < 0.0 || v >= image.src_h {
            continue;
        }
        let ty = (image.src_y + v) as u32;
        for x in x0..x1 {
            let u = (x as f32 + 0.5 - pos.0) * sx;
            if u < 0.0 || u >= image.src_w {
                continue;
            }
            let c = texman.get_pixel_color(image.tex, (image.src_x + u) as u32, ty);
            if c.a < 8 {
                continue;
            }
            fb.set_pixel_color(x, y, c);
        }
    }
}
