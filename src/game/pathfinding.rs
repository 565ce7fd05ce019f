//! Path-finding collaborator used by agents.
use crate::game::grid::{Cell, GridMap};
use std::collections::{HashMap, VecDeque};

pub trait PathFinder {
    /// Next cell to step into on the way from `from` to `to`. Must always
    /// answer; with no route it returns `from`.
    fn get_path(&self, from: Cell, to: Cell) -> Cell;
}

const DIRS: [(i32, i32); 8] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Breadth-first search over free cells, 8-connected. Diagonals are only
/// taken when both orthogonal neighbours are free so bodies never cut a
/// wall corner.
pub struct BfsPathFinder<'a> {
    grid: &'a GridMap,
}

impl<'a> BfsPathFinder<'a> {
    pub fn new(grid: &'a GridMap) -> Self {
        Self { grid }
    }

    fn neighbours(&self, (cx, cy): Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRS.iter().filter_map(move |&(dx, dy)| {
            let next = (cx + dx, cy + dy);
            if !self.grid.is_free(next) {
                return None;
            }
            if dx != 0 && dy != 0 && !(self.grid.is_free((cx + dx, cy)) && self.grid.is_free((cx, cy + dy))) {
                return None;
            }
            Some(next)
        })
    }
}

impl PathFinder for BfsPathFinder<'_> {
    fn get_path(&self, from: Cell, to: Cell) -> Cell {
        if from == to || !self.grid.in_bounds(from) || !self.grid.is_free(to) {
            return from;
        }
        let mut prev: HashMap<Cell, Cell> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(from);
        prev.insert(from, from);
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                break;
            }
            for next in self.neighbours(cur) {
                if prev.contains_key(&next) {
                    continue;
                }
                prev.insert(next, cur);
                queue.push_back(next);
            }
        }
        if !prev.contains_key(&to) {
            return from;
        }
        // walk back from the goal to find the first step
        let mut cur = to;
        while let Some(&p) = prev.get(&cur) {
            if p == from {
                return cur;
            }
            cur = p;
        }
        from
    }
}
