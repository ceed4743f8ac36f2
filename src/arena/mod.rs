//! Arena geometry: bounds, obstacles, firing lines, and path search
//!
//! Everything here is pure. Queries take the obstacle snapshot by shared
//! reference and never mutate it.

pub mod grid;
pub mod line_of_fire;
pub mod pathfinding;

pub use grid::{GridModel, ObstacleSet};
pub use line_of_fire::{cells_between, has_line_of_fire};
pub use pathfinding::{Path, PathFinder};
