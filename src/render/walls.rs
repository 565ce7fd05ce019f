//! Wall columns: one cast per screen column, queued into the compositor.
use crate::config::EngineConfig;
use crate::game::caster;
use crate::game::grid::GridMap;
use crate::game::player::CameraView;
use crate::render::compositor::{Compositor, ImageSlice, ProjectedItem};
use crate::render::textures::{TexId, TextureManager};

/// Keeps the first column off an exact grid-line bearing.
const RAY_ANGLE_BIAS: f32 = 0.0001;

pub struct WallRenderer {
    num_rays: u32,
    half_fov: f32,
    delta_angle: f32,
    screen_dist: f32,
    column_scale: f32,
    height: f32,
    half_height: f32,
    max_depth: usize,
    /// Texel width the column scale was tuned for; other sizes scale to match.
    texture_size: f32,
    /// Texture per wall id, index `id - 1`.
    textures: Vec<TexId>,
}

impl WallRenderer {
    pub fn new(cfg: &EngineConfig, textures: Vec<TexId>) -> Self {
        Self {
            num_rays: cfg.num_rays(),
            half_fov: cfg.half_fov(),
            delta_angle: cfg.delta_angle(),
            screen_dist: cfg.screen_dist(),
            column_scale: cfg.column_scale(),
            height: cfg.window.height as f32,
            half_height: cfg.window.height as f32 / 2.0,
            max_depth: cfg.render.max_depth,
            texture_size: cfg.render.texture_size.max(1) as f32,
            textures,
        }
    }

    fn texture_for(&self, wall_id: u8) -> Option<TexId> {
        let idx = (wall_id as usize).saturating_sub(1);
        self.textures.get(idx).or_else(|| self.textures.first()).copied()
    }

    /// Casts every column and queues the visible wall slices.
    pub fn cast_columns(&self, grid: &GridMap, view: &CameraView, texman: &TextureManager, out: &mut Compositor) {
        let mut ray_angle = view.angle - self.half_fov + RAY_ANGLE_BIAS;
        for ray in 0..self.num_rays {
            let result = caster::cast(grid, view.pos, ray_angle, None, self.max_depth);
            if let Some(hit) = result.wall {
                if let Some(item) = self.column(ray, ray_angle, view, hit.depth, hit.wall_id, hit.offset, texman) {
                    out.push(item);
                }
            }
            ray_angle += self.delta_angle;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn column(
        &self,
        ray: u32,
        ray_angle: f32,
        view: &CameraView,
        depth: f32,
        wall_id: u8,
        offset: f32,
        texman: &TextureManager,
    ) -> Option<ProjectedItem> {
        let tex = self.texture_for(wall_id)?;
        let (tw, th) = texman.image_size(tex)?;
        let depth = depth * (view.angle - ray_angle).cos();
        let proj_height = self.screen_dist / (depth + 0.0001);

        let src_w = (self.column_scale * tw as f32 / self.texture_size).clamp(1.0, tw as f32);
        let src_x = offset.clamp(0.0, 1.0) * (tw as f32 - src_w);
        let x = ray as f32 * self.column_scale;
        let top = self.half_height - proj_height / 2.0 + view.horizon_shift;

        let (src_y, src_h, y, h) = if proj_height < self.height {
            (0.0, th as f32, top, proj_height)
        } else {
            // only the texel band that actually reaches the screen
            let texel_per_px = th as f32 / proj_height;
            let y0 = top.max(0.0);
            let y1 = (top + proj_height).min(self.height);
            if y1 <= y0 {
                return None;
            }
            ((y0 - top) * texel_per_px, (y1 - y0) * texel_per_px, y0, y1 - y0)
        };

        Some(ProjectedItem {
            depth,
            image: ImageSlice { tex, src_x, src_y, src_w, src_h },
            pos: (x, y),
            size: (self.column_scale, h),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::textures::Pixmap;
    use raylib::prelude::{Color, Vector2};

    fn setup() -> (EngineConfig, TextureManager, WallRenderer) {
        let cfg = EngineConfig::default();
        let mut tm = TextureManager::new();
        let ids = (0..5).map(|_| tm.insert(Pixmap::solid(256, 256, Color::BROWN))).collect();
        let wr = WallRenderer::new(&cfg, ids);
        (cfg, tm, wr)
    }

    fn view(x: f32, y: f32) -> CameraView {
        CameraView { pos: Vector2::new(x, y), angle: 0.0, horizon_shift: 0.0 }
    }

    #[test]
    fn enclosed_room_fills_every_column() {
        let (cfg, tm, wr) = setup();
        let mut walls = Vec::new();
        for i in 0..8 {
            walls.extend([(i, 0), (i, 7), (0, i), (7, i)]);
        }
        let grid = GridMap::with_walls(8, 8, &walls);
        let mut comp = Compositor::new();
        wr.cast_columns(&grid, &view(3.5, 3.5), &tm, &mut comp);
        assert_eq!(comp.len(), cfg.num_rays() as usize);
    }

    #[test]
    fn open_field_queues_nothing() {
        let (_, tm, wr) = setup();
        let mut comp = Compositor::new();
        wr.cast_columns(&GridMap::empty(64, 64), &view(32.5, 32.5), &tm, &mut comp);
        assert!(comp.is_empty());
    }

    #[test]
    fn center_column_height_follows_depth() {
        let (cfg, tm, wr) = setup();
        let v = view(1.5, 1.5);
        let item = wr.column(cfg.num_rays() / 2, 0.0, &v, 4.0, 1, 0.5, &tm).unwrap();
        let expected = cfg.screen_dist() / 4.0001;
        assert!((item.size.1 - expected).abs() < 1e-2);
        assert!((item.pos.1 - (450.0 - expected / 2.0)).abs() < 1e-2);
        assert_eq!(item.image.src_h, 256.0);
    }

    #[test]
    fn close_walls_sample_a_centered_band() {
        let (cfg, tm, wr) = setup();
        let v = view(1.5, 1.5);
        let item = wr.column(0, 0.0, &v, 0.2, 1, 0.0, &tm).unwrap();
        let proj = cfg.screen_dist() / 0.2001;
        assert_eq!(item.pos.1, 0.0);
        assert_eq!(item.size.1, 900.0);
        assert!((item.image.src_h - 256.0 * 900.0 / proj).abs() < 1e-2);
        assert!((item.image.src_y + item.image.src_h / 2.0 - 128.0).abs() < 1e-2);
    }

    #[test]
    fn unknown_wall_id_uses_first_texture() {
        let (_, _, wr) = setup();
        assert_eq!(wr.texture_for(9), wr.texture_for(1));
    }
}
