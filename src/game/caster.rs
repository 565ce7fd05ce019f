//! Grid-marching (DDA) caster shared by wall-column rendering and
//! line-of-sight queries.
//!
//! A cast runs two independent sweeps from the origin: one stepping across
//! horizontal grid lines, one across vertical grid lines. Each sweep stops on
//! the first cell that is either the designated target or a wall, or after
//! `max_steps` cells. The two sweeps are then merged into one [`CastResult`].
use crate::game::grid::{Cell, GridMap, cell_of};
use raylib::prelude::Vector2;

/// Substituted for a direction component that is (nearly) zero.
const DIR_EPSILON: f32 = 1e-6;
/// Nudge so a ray heading in -x / -y samples the cell on the far side of the line.
const LINE_NUDGE: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Crossed a horizontal grid line (y = const).
    Horizontal,
    /// Crossed a vertical grid line (x = const).
    Vertical,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallHit {
    pub depth: f32,
    pub cell: Cell,
    pub wall_id: u8,
    pub axis: Axis,
    /// Horizontal texture coordinate in [0, 1) along the struck face.
    pub offset: f32,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct CastResult {
    pub wall: Option<WallHit>,
    pub target_distance: Option<f32>,
}

impl CastResult {
    pub fn wall_distance(&self) -> Option<f32> {
        self.wall.map(|w| w.depth)
    }

    /// Target seen before any wall, or no wall at all on the ray.
    pub fn target_visible(&self) -> bool {
        match (self.target_distance, self.wall_distance()) {
            (_, None) => true,
            (Some(t), Some(w)) => t < w,
            (None, Some(_)) => false,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Signal {
    Wall(WallHit),
    Target(f32),
}

#[inline]
fn nonzero(v: f32) -> f32 {
    if v.abs() < DIR_EPSILON { DIR_EPSILON.copysign(v) } else { v }
}

/// Marches a ray from `origin` at `angle` (radians).
///
/// `target` is optional; when it is the origin's own cell the result is a
/// trivial zero-distance sighting with no wall.
pub fn cast(grid: &GridMap, origin: Vector2, angle: f32, target: Option<Cell>, max_steps: usize) -> CastResult {
    let origin_cell = cell_of(origin.x, origin.y);
    if target == Some(origin_cell) {
        return CastResult { wall: None, target_distance: Some(0.0) };
    }

    let sin_a = nonzero(angle.sin());
    let cos_a = nonzero(angle.cos());

    let hor = sweep_horizontal(grid, origin, origin_cell, sin_a, cos_a, target, max_steps);
    let ver = sweep_vertical(grid, origin, origin_cell, sin_a, cos_a, target, max_steps);

    // Each sweep yields at most one signal. Nearest wall wins for rendering;
    // for visibility only one wall and one target can coexist, so the
    // comparison is unaffected by which combine is used.
    let mut wall: Option<WallHit> = None;
    let mut target_distance: Option<f32> = None;
    for signal in [hor, ver].into_iter().flatten() {
        match signal {
            Signal::Wall(hit) => {
                if wall.is_none_or(|w| hit.depth < w.depth) {
                    wall = Some(hit);
                }
            }
            Signal::Target(d) => {
                if target_distance.is_none_or(|t| d < t) {
                    target_distance = Some(d);
                }
            }
        }
    }
    CastResult { wall, target_distance }
}

fn sweep_horizontal(
    grid: &GridMap,
    origin: Vector2,
    (_, y_map): Cell,
    sin_a: f32,
    cos_a: f32,
    target: Option<Cell>,
    max_steps: usize,
) -> Option<Signal> {
    let (mut y_hor, dy) = if sin_a > 0.0 {
        (y_map as f32 + 1.0, 1.0)
    } else {
        (y_map as f32 - LINE_NUDGE, -1.0)
    };
    let mut depth = (y_hor - origin.y) / sin_a;
    let mut x_hor = origin.x + depth * cos_a;
    let delta_depth = dy / sin_a;
    let dx = delta_depth * cos_a;

    for _ in 0..max_steps {
        let tile = cell_of(x_hor, y_hor);
        if Some(tile) == target {
            return Some(Signal::Target(depth));
        }
        if let Some(wall_id) = grid.wall_id(tile) {
            let frac = x_hor.rem_euclid(1.0);
            let offset = if sin_a > 0.0 { 1.0 - frac } else { frac };
            return Some(Signal::Wall(WallHit { depth, cell: tile, wall_id, axis: Axis::Horizontal, offset }));
        }
        x_hor += dx;
        y_hor += dy;
        depth += delta_depth;
    }
    None
}

fn sweep_vertical(
    grid: &GridMap,
    origin: Vector2,
    (x_map, _): Cell,
    sin_a: f32,
    cos_a: f32,
    target: Option<Cell>,
    max_steps: usize,
) -> Option<Signal> {
    let (mut x_vert, dx) = if cos_a > 0.0 {
        (x_map as f32 + 1.0, 1.0)
    } else {
        (x_map as f32 - LINE_NUDGE, -1.0)
    };
    let mut depth = (x_vert - origin.x) / cos_a;
    let mut y_vert = origin.y + depth * sin_a;
    let delta_depth = dx / cos_a;
    let dy = delta_depth * sin_a;

    for _ in 0..max_steps {
        let tile = cell_of(x_vert, y_vert);
        if Some(tile) == target {
            return Some(Signal::Target(depth));
        }
        if let Some(wall_id) = grid.wall_id(tile) {
            let frac = y_vert.rem_euclid(1.0);
            let offset = if cos_a > 0.0 { frac } else { 1.0 - frac };
            return Some(Signal::Wall(WallHit { depth, cell: tile, wall_id, axis: Axis::Vertical, offset }));
        }
        x_vert += dx;
        y_vert += dy;
        depth += delta_depth;
    }
    None
}

/// Line of sight from `from` toward the `target` cell, cast at the bearing of
/// `target_pos`.
pub fn line_of_sight(grid: &GridMap, from: Vector2, target_pos: Vector2, max_steps: usize) -> CastResult {
    let angle = (target_pos.y - from.y).atan2(target_pos.x - from.x);
    cast(grid, from, angle, Some(cell_of(target_pos.x, target_pos.y)), max_steps)
}
