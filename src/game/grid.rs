//! Occupancy grid: wall cells keyed by coordinate, read-only after load.
use crate::error::MapError;
use std::collections::HashMap;
use std::path::Path;

/// Integer cell coordinate `(column, row)`.
pub type Cell = (i32, i32);

/// Cell containing a world position (floor, so negatives land correctly).
#[inline]
pub fn cell_of(x: f32, y: f32) -> Cell {
    (x.floor() as i32, y.floor() as i32)
}

// 16 x 32. Digits are wall texture ids, '.' is free floor.
/// Sub-step length used for bodies with no footprint.
const MIN_SUBSTEP: f32 = 0.05;

const BUILTIN_LEVEL: &str = "\
1111111111111111
1..............1
1..3333...222..1
1.....4.....2..1
1.....4.....2..1
1..3333........1
1..............1
1...4...4......1
1113131113..3111
1..............1
1...5.....5....1
1..............1
1..22....22....1
1..............1
1.......5......1
11111..11111..11
1..............1
1..4......4....1
1..............1
1....333.......1
1......3.......1
1..............1
1111..11111..111
1..............1
1.....2...2....1
1..............1
1...44....44...1
1..............1
1..5........5..1
1..............1
1..............1
1111111111111111";

#[derive(Debug, Clone)]
pub struct GridMap {
    pub cols: i32,
    pub rows: i32,
    walls: HashMap<Cell, u8>,
}

impl GridMap {
    /// Rows of symbols: digits are walls with that id; `.`, `_` and space are
    /// free; anything else is a solid wall of id 1.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut walls = HashMap::new();
        let mut rows = 0;
        let mut cols = 0;
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let mut width = 0;
            for (i, ch) in line.chars().enumerate() {
                width = i as i32 + 1;
                match ch {
                    '.' | '_' | ' ' | '\t' => {}
                    '1'..='9' => {
                        walls.insert((i as i32, rows), ch as u8 - b'0');
                    }
                    _ => {
                        walls.insert((i as i32, rows), 1);
                    }
                }
            }
            cols = cols.max(width);
            rows += 1;
        }
        if rows == 0 {
            return Err(MapError::Empty);
        }
        Ok(Self { cols, rows, walls })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn builtin() -> Self {
        // The embedded level is known-good; parse cannot fail on it.
        Self::parse(BUILTIN_LEVEL).unwrap_or_else(|_| Self::empty(1, 1))
    }

    pub fn empty(cols: i32, rows: i32) -> Self {
        Self { cols, rows, walls: HashMap::new() }
    }

    /// Builds a grid from explicit wall cells (all id 1).
    pub fn with_walls(cols: i32, rows: i32, cells: &[Cell]) -> Self {
        let walls = cells.iter().map(|&c| (c, 1u8)).collect();
        Self { cols, rows, walls }
    }

    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains_key(&cell)
    }

    #[inline]
    pub fn wall_id(&self, cell: Cell) -> Option<u8> {
        self.walls.get(&cell).copied()
    }

    #[inline]
    pub fn in_bounds(&self, (x, y): Cell) -> bool {
        x >= 0 && y >= 0 && x < self.cols && y < self.rows
    }

    /// In bounds and not a wall.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_wall(cell)
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Checks the center plus 8 points on a circle of `radius`, so a body can
    /// hug a wall without its footprint entering it.
    pub fn is_free_around(&self, wx: f32, wy: f32, radius: f32) -> bool {
        if !self.is_free(cell_of(wx, wy)) {
            return false;
        }
        let samples = 8;
        for k in 0..samples {
            let ang = (k as f32) * (std::f32::consts::TAU / samples as f32);
            let sx = wx + radius * ang.cos();
            let sy = wy + radius * ang.sin();
            if !self.is_free(cell_of(sx, sy)) {
                return false;
            }
        }
        true
    }

    /// Axis-decomposed move: X and Y are tried independently so a body slides
    /// along walls instead of stopping dead. Long moves are split into steps
    /// no longer than the footprint radius, so no wall cell is ever skipped.
    /// Returns whether anything moved.
    pub fn slide_move(&self, x: &mut f32, y: &mut f32, dx: f32, dy: f32, radius: f32) -> bool {
        let max_step = radius.max(MIN_SUBSTEP);
        let steps = (dx.abs().max(dy.abs()) / max_step).ceil().max(1.0) as u32;
        let (sx, sy) = (dx / steps as f32, dy / steps as f32);
        let mut moved = false;
        for _ in 0..steps {
            let nx = *x + sx;
            if self.is_free_around(nx, *y, radius) {
                *x = nx;
                moved = true;
            }
            let ny = *y + sy;
            if self.is_free_around(*x, ny, radius) {
                *y = ny;
                moved = true;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wall_ids_and_unknown_symbols() {
        let g = GridMap::parse("12.\n.#.\n").unwrap();
        assert_eq!(g.cols, 3);
        assert_eq!(g.rows, 2);
        assert_eq!(g.wall_id((0, 0)), Some(1));
        assert_eq!(g.wall_id((1, 0)), Some(2));
        assert_eq!(g.wall_id((1, 1)), Some(1));
        assert!(!g.is_wall((2, 0)));
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(GridMap::parse("\n\n"), Err(MapError::Empty)));
    }

    #[test]
    fn builtin_level_is_enclosed() {
        let g = GridMap::builtin();
        assert_eq!((g.cols, g.rows), (16, 32));
        for x in 0..g.cols {
            assert!(g.is_wall((x, 0)));
            assert!(g.is_wall((x, g.rows - 1)));
        }
        for y in 0..g.rows {
            assert!(g.is_wall((0, y)));
            assert!(g.is_wall((g.cols - 1, y)));
        }
        assert!(g.is_free((1, 5)));
    }

    #[test]
    fn cell_of_floors_negative_coordinates() {
        assert_eq!(cell_of(-0.2, 1.9), (-1, 1));
    }

    #[test]
    fn slide_move_keeps_the_free_axis() {
        // wall column at x = 3
        let g = GridMap::with_walls(6, 6, &[(3, 1), (3, 2), (3, 3)]);
        let (mut x, mut y) = (2.7, 2.5);
        let moved = g.slide_move(&mut x, &mut y, 0.2, 0.1, 0.2);
        assert!(moved);
        assert!((x - 2.7).abs() < 1e-6, "x blocked by wall");
        assert!((y - 2.6).abs() < 1e-6, "y slides");
    }

    #[test]
    fn long_moves_cannot_skip_a_wall() {
        let walls: Vec<Cell> = (0..8).map(|y| (3, y)).collect();
        let g = GridMap::with_walls(8, 8, &walls);
        let (mut x, mut y) = (2.5, 2.5);
        g.slide_move(&mut x, &mut y, 2.1, 0.0, 0.2);
        assert!(x + 0.2 < 3.0, "stopped before the wall, got {x}");
        assert!(x > 2.5);
        assert_eq!(y, 2.5);
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let g = GridMap::empty(4, 4);
        assert!(!g.is_free_around(0.1, 2.0, 0.2));
        assert!(g.is_free_around(2.0, 2.0, 0.2));
    }
}
