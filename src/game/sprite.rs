//! Animated world decorations (lights). They are pure billboards and never
//! block movement.
use crate::game::animation::Animator;
use crate::game::player::CameraView;
use crate::render::projector::{Projection, Projector, SpriteGeometry};
use crate::render::textures::TexId;
use raylib::prelude::{Color, Vector2};

const DECORATION_SCALE: f32 = 0.8;
const DECORATION_SHIFT: f32 = 0.16;
const DECORATION_ANIM_MS: u64 = 120;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    GreenLight,
    RedLight,
}

impl DecorationKind {
    pub const ALL: [DecorationKind; 2] = [DecorationKind::GreenLight, DecorationKind::RedLight];

    pub fn folder(self) -> &'static str {
        match self {
            DecorationKind::GreenLight => "sprites/animated_sprites/green_light",
            DecorationKind::RedLight => "sprites/animated_sprites/red_light",
        }
    }

    /// Tint of the procedural stand-in frame.
    pub fn placeholder_color(self) -> Color {
        match self {
            DecorationKind::GreenLight => Color::new(80, 255, 120, 255),
            DecorationKind::RedLight => Color::new(255, 70, 60, 255),
        }
    }
}

/// Fixed placement of the lights in the built-in level.
pub const DEFAULT_PLACEMENT: &[(DecorationKind, f32, f32)] = &[
    (DecorationKind::GreenLight, 11.5, 3.5),
    (DecorationKind::GreenLight, 1.5, 1.5),
    (DecorationKind::GreenLight, 1.5, 7.5),
    (DecorationKind::GreenLight, 5.5, 3.25),
    (DecorationKind::GreenLight, 5.5, 4.75),
    (DecorationKind::GreenLight, 7.5, 2.5),
    (DecorationKind::GreenLight, 7.5, 5.5),
    (DecorationKind::GreenLight, 14.5, 1.5),
    (DecorationKind::GreenLight, 14.5, 4.5),
    (DecorationKind::GreenLight, 14.5, 12.5),
    (DecorationKind::GreenLight, 14.5, 24.5),
    (DecorationKind::GreenLight, 14.5, 30.5),
    (DecorationKind::GreenLight, 1.5, 30.5),
    (DecorationKind::GreenLight, 1.5, 24.5),
    (DecorationKind::RedLight, 14.5, 5.5),
    (DecorationKind::RedLight, 14.5, 7.5),
    (DecorationKind::RedLight, 12.5, 7.5),
    (DecorationKind::RedLight, 9.5, 7.5),
];

pub struct Decoration {
    pub kind: DecorationKind,
    pub pos: Vector2,
    animator: Animator<TexId>,
    image_size: (u32, u32),
    projection: Option<Projection>,
}

impl Decoration {
    pub fn new(kind: DecorationKind, pos: Vector2, frames: Vec<TexId>, image_size: (u32, u32), now_ms: u64) -> Self {
        Self { kind, pos, animator: Animator::new(frames, DECORATION_ANIM_MS, now_ms), image_size, projection: None }
    }

    pub fn geometry(&self) -> SpriteGeometry {
        SpriteGeometry {
            pos: self.pos,
            image_size: self.image_size,
            scale: DECORATION_SCALE,
            height_shift: DECORATION_SHIFT,
        }
    }

    pub fn update(&mut self, now_ms: u64, projector: &Projector, view: &CameraView) {
        self.animator.tick(now_ms);
        self.projection = projector.project(view, &self.geometry());
    }

    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    pub fn current_frame(&self) -> Option<TexId> {
        self.animator.current()
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game::grid::{GridMap, cell_of};
    use crate::render::textures::{Pixmap, TextureManager};

    #[test]
    fn default_lights_stand_in_free_cells() {
        let grid = GridMap::builtin();
        for &(_, x, y) in DEFAULT_PLACEMENT {
            assert!(grid.is_free(cell_of(x, y)), "light at ({x}, {y})");
        }
    }

    #[test]
    fn cycles_frames_and_projects() {
        let mut tm = TextureManager::new();
        let frames: Vec<TexId> = (0..3).map(|_| tm.insert(Pixmap::solid(8, 8, Color::GREEN))).collect();
        let mut d = Decoration::new(DecorationKind::GreenLight, Vector2::new(5.5, 1.5), frames.clone(), (8, 8), 0);
        let projector = Projector::new(&EngineConfig::default());
        let view = CameraView { pos: Vector2::new(1.5, 1.5), angle: 0.0, horizon_shift: 0.0 };
        assert_eq!(d.current_frame(), Some(frames[0]));
        d.update(121, &projector, &view);
        assert_eq!(d.current_frame(), Some(frames[1]));
        let p = d.projection().unwrap();
        assert!((p.norm_dist - 4.0).abs() < 1e-4);
    }
}
