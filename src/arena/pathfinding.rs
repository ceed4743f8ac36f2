//! A* pathfinding for the arena grid
//!
//! Four-directional moves with unit cost and a Manhattan heuristic. The
//! opposing unit's cell is treated as blocked unless it is the destination.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::arena::grid::{GridModel, ObstacleSet};
use crate::core::types::GridPos;

/// Ordered cells from start (exclusive) to destination (inclusive)
///
/// An empty path means "no path".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<GridPos>,
}

impl Path {
    pub fn new(cells: Vec<GridPos>) -> Self {
        Self { cells }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of steps (cells to traverse)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn destination(&self) -> Option<GridPos> {
        self.cells.last().copied()
    }

    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    /// True if every step from `start` is one orthogonal move
    pub fn is_contiguous_from(&self, start: GridPos) -> bool {
        let mut previous = start;
        for cell in &self.cells {
            if !previous.is_adjacent(cell) {
                return false;
            }
            previous = *cell;
        }
        true
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: GridPos,
    g_cost: u32,
    f_cost: u32,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: lowest f, then lowest g, then smallest coordinate
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.g_cost.cmp(&self.g_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Budget-free shortest path search over one arena
#[derive(Debug, Clone)]
pub struct PathFinder {
    grid: GridModel,
}

impl PathFinder {
    pub fn new(grid: GridModel) -> Self {
        Self { grid }
    }

    /// Find path using A* algorithm
    ///
    /// Returns an empty path if either end is out of bounds, the destination
    /// is unreachable or blocked, or it equals `start`.
    ///
    /// Expansions are capped at one per grid cell. The closed set already
    /// guarantees that for an in-bounds start, so the cap only guards
    /// against a broken neighbour or heuristic.
    pub fn find_path(
        &self,
        start: GridPos,
        end: GridPos,
        obstacles: &ObstacleSet,
        other_unit: GridPos,
    ) -> Path {
        if start == end || !self.grid.in_bounds(start) || !self.grid.is_open(end, obstacles) {
            return Path::empty();
        }

        let blocked = |cell: GridPos| {
            obstacles.contains(cell) || (cell == other_unit && cell != end)
        };

        let max_expansions = self.grid.cell_count();
        let mut expansions = 0usize;

        let mut open_set = BinaryHeap::new();
        let mut closed: HashSet<GridPos> = HashSet::new();
        let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
        let mut g_scores: HashMap<GridPos, u32> = HashMap::new();

        g_scores.insert(start, 0);
        open_set.push(PathNode {
            coord: start,
            g_cost: 0,
            f_cost: start.manhattan(&end),
        });

        while let Some(current) = open_set.pop() {
            if current.coord == end {
                return reconstruct_path(&came_from, start, end);
            }

            if !closed.insert(current.coord) {
                continue;
            }

            expansions += 1;
            if expansions > max_expansions {
                tracing::debug!("Path search {} -> {} exhausted", start, end);
                return Path::empty();
            }

            for neighbor in self.grid.neighbors(current.coord) {
                if blocked(neighbor) || closed.contains(&neighbor) {
                    continue;
                }

                let tentative_g = current.g_cost + 1;
                let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);

                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(PathNode {
                        coord: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + neighbor.manhattan(&end),
                    });
                }
            }
        }

        Path::empty() // No path found
    }
}

/// Reconstruct path from came_from map, dropping the start cell
fn reconstruct_path(
    came_from: &HashMap<GridPos, GridPos>,
    start: GridPos,
    mut current: GridPos,
) -> Path {
    let mut cells = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    Path::new(cells)
}
