//! Orthogonal line-of-fire checks
//!
//! Shots travel only along rows and columns. A line is clear when no
//! obstacle lies strictly between shooter and target.

use crate::arena::grid::ObstacleSet;
use crate::core::types::GridPos;

/// True if `shooter` can fire on `target` along a clear row or column
pub fn has_line_of_fire(shooter: GridPos, target: GridPos, obstacles: &ObstacleSet) -> bool {
    if !shooter.shares_axis(&target) {
        return false;
    }

    cells_between(shooter, target)
        .into_iter()
        .all(|cell| !obstacles.contains(cell))
}

/// Cells strictly between two axis-aligned positions, nearest to `from` first
///
/// Empty when the positions do not share an axis or are adjacent.
pub fn cells_between(from: GridPos, to: GridPos) -> Vec<GridPos> {
    if !from.shares_axis(&to) || from == to {
        return Vec::new();
    }

    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let mut cells = Vec::new();
    let mut current = from.offset(dx, dy);
    while current != to {
        cells.push(current);
        current = current.offset(dx, dy);
    }
    cells
}
