//! Arena bounds and blocking cells
//!
//! The grid itself carries no terrain, only its dimensions. Obstacles are a
//! separate snapshot owned by the scenario collaborator and handed to every
//! query by shared reference, so no query can observe a mid-turn change.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

/// Rectangular arena of `width` x `height` cells anchored at (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridModel {
    pub width: u32,
    pub height: u32,
}

impl GridModel {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if coordinate is within arena bounds
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    /// In bounds and not an obstacle
    pub fn is_open(&self, pos: GridPos, obstacles: &ObstacleSet) -> bool {
        self.in_bounds(pos) && !obstacles.contains(pos)
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// In-bounds orthogonal neighbours in N, E, S, W order
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        pos.orthogonal()
            .into_iter()
            .filter(move |cell| self.in_bounds(*cell))
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| GridPos::new(x, y)))
    }
}

/// Set of blocked grid cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSet {
    cells: AHashSet<GridPos>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: impl IntoIterator<Item = GridPos>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Block a cell
    pub fn block(&mut self, pos: GridPos) {
        self.cells.insert(pos);
    }

    /// Unblock a cell
    pub fn unblock(&mut self, pos: GridPos) {
        self.cells.remove(&pos);
    }

    /// Check if a cell is blocked
    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }

    /// Number of blocked orthogonal neighbours of `pos`
    pub fn adjacent_count(&self, pos: GridPos) -> usize {
        pos.orthogonal()
            .iter()
            .filter(|cell| self.contains(**cell))
            .count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPos> {
        self.cells.iter()
    }
}
