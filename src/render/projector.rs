//! Perspective projection of world-space billboards onto screen columns.
use crate::config::EngineConfig;
use crate::game::player::CameraView;
use raylib::prelude::Vector2;
use std::f32::consts::{PI, TAU};

/// Wraps an angle into (-pi, pi].
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    let mut r = (a + PI).rem_euclid(TAU) - PI;
    if r <= -PI {
        r += TAU;
    }
    r
}

/// What a billboard needs to be projected.
#[derive(Copy, Clone, Debug)]
pub struct SpriteGeometry {
    pub pos: Vector2,
    /// Source image size in texels; only the aspect ratio matters.
    pub image_size: (u32, u32),
    pub scale: f32,
    /// Fraction of the projected height the sprite is pushed below the horizon.
    pub height_shift: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    /// Angle from the camera to the sprite (world frame).
    pub theta: f32,
    pub screen_x: f32,
    pub dist: f32,
    /// Fisheye-corrected distance; used for scale and as the depth key.
    pub norm_dist: f32,
    pub width: f32,
    pub height: f32,
    /// Top-left corner on screen.
    pub pos: (f32, f32),
}

impl Projection {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }
}

#[derive(Clone, Debug)]
pub struct Projector {
    pub width: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub half_num_rays: f32,
    pub delta_angle: f32,
    pub column_scale: f32,
    pub screen_dist: f32,
    pub min_clip: f32,
}

impl Projector {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            width: cfg.window.width as f32,
            half_width: cfg.window.width as f32 / 2.0,
            half_height: cfg.window.height as f32 / 2.0,
            half_num_rays: (cfg.num_rays() / 2) as f32,
            delta_angle: cfg.delta_angle(),
            column_scale: cfg.column_scale(),
            screen_dist: cfg.screen_dist(),
            min_clip: cfg.render.min_clip_distance,
        }
    }

    /// `None` when the sprite is too close or entirely off screen.
    pub fn project(&self, cam: &CameraView, sprite: &SpriteGeometry) -> Option<Projection> {
        let dx = sprite.pos.x - cam.pos.x;
        let dy = sprite.pos.y - cam.pos.y;
        let theta = dy.atan2(dx);
        let delta = normalize_angle(theta - cam.angle);

        let delta_rays = delta / self.delta_angle;
        let screen_x = (self.half_num_rays + delta_rays) * self.column_scale;

        let dist = dx.hypot(dy);
        let norm_dist = dist * delta.cos();
        if norm_dist <= self.min_clip {
            return None;
        }

        let (iw, ih) = sprite.image_size;
        let ratio = iw.max(1) as f32 / ih.max(1) as f32;
        let proj = self.screen_dist / norm_dist * sprite.scale;
        let (width, height) = (proj * ratio, proj);
        let half_w = width / 2.0;
        if screen_x <= -half_w || screen_x >= self.width + half_w {
            return None;
        }

        let height_shift = height * sprite.height_shift;
        let pos = (screen_x - half_w, self.half_height - height / 2.0 + height_shift + cam.horizon_shift);
        Some(Projection { theta, screen_x, dist, norm_dist, width, height, pos })
    }

    /// True when the projected sprite spans the screen's center column (the
    /// crosshair).
    pub fn covers_center(&self, p: &Projection) -> bool {
        self.half_width - p.half_width() < p.screen_x && p.screen_x < self.half_width + p.half_width()
    }
}
