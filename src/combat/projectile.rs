//! Projectiles and firing-direction resolution
//!
//! Projectiles fly along one cardinal axis. The manager only spawns them;
//! flight and collision belong to the match.

use serde::{Deserialize, Serialize};

use crate::combat::unit::Unit;
use crate::core::types::{GridPos, TeamColor, UnitId, WorldPoint};

/// Cardinal firing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Unit direction vector; exactly one component is nonzero
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    /// Heading from `from` toward `to`
    ///
    /// Same row fires along the row, same column along the column; otherwise
    /// the dominant axis of the offset wins (ties go to the horizontal axis).
    /// `None` only when both cells coincide.
    pub fn toward(from: GridPos, to: GridPos) -> Option<Self> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        if dx == 0 && dy == 0 {
            return None;
        }

        let horizontal = if dy == 0 {
            true
        } else if dx == 0 {
            false
        } else {
            dx.abs() >= dy.abs()
        };

        Some(if horizontal {
            if dx > 0 {
                Heading::East
            } else {
                Heading::West
            }
        } else if dy > 0 {
            Heading::South
        } else {
            Heading::North
        })
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: WorldPoint,
    pub heading: Heading,
    /// Shooter, excluded from hit tests
    pub owner: UnitId,
    pub color: TeamColor,
}

impl Projectile {
    pub fn direction(&self) -> (i32, i32) {
        self.heading.vector()
    }

    /// Move `distance` cells along the heading
    pub fn advance(&mut self, distance: f32) {
        let (dx, dy) = self.direction();
        self.position = self.position + WorldPoint::new(dx as f32, dy as f32) * distance;
    }

    /// Cell currently occupied
    pub fn cell(&self) -> GridPos {
        self.position.to_cell()
    }
}

/// Spawns projectiles on behalf of a shooter
#[derive(Debug, Clone)]
pub struct ProjectileManager {
    /// Distance from shooter centre to spawn point, in cells
    spawn_offset: f32,
}

impl Default for ProjectileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectileManager {
    pub fn new() -> Self {
        Self { spawn_offset: 0.5 }
    }

    /// Fire from `shooter` toward `target`, consuming one shot
    ///
    /// Returns `None` if no heading can be resolved (shooter on target cell);
    /// in that case no shot is consumed.
    pub fn create_projectile(&self, shooter: &mut Unit, target: GridPos) -> Option<Projectile> {
        let heading = Heading::toward(shooter.position, target)?;
        let (dx, dy) = heading.vector();
        let offset = WorldPoint::new(dx as f32, dy as f32) * self.spawn_offset;

        shooter.shots_left = shooter.shots_left.saturating_sub(1);

        Some(Projectile {
            position: shooter.position.to_point() + offset,
            heading,
            owner: shooter.id,
            color: shooter.color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::unit::UnitType;

    #[test]
    fn test_same_column_fires_north() {
        let manager = ProjectileManager::new();
        let mut shooter = Unit::new(UnitType::Rifleman, GridPos::new(5, 5));
        shooter.shots_left = 1;

        let projectile = manager
            .create_projectile(&mut shooter, GridPos::new(5, 2))
            .expect("heading resolves");

        assert_eq!(projectile.direction(), (0, -1));
        assert_eq!(projectile.position, WorldPoint::new(5.0, 4.5));
        assert_eq!(projectile.owner, shooter.id);
        assert_eq!(shooter.shots_left, 0);
    }

    #[test]
    fn test_same_row_fires_along_row() {
        assert_eq!(
            Heading::toward(GridPos::new(2, 3), GridPos::new(8, 3)),
            Some(Heading::East)
        );
        assert_eq!(
            Heading::toward(GridPos::new(2, 3), GridPos::new(0, 3)),
            Some(Heading::West)
        );
    }

    #[test]
    fn test_dominant_axis_fallback() {
        assert_eq!(
            Heading::toward(GridPos::new(0, 0), GridPos::new(1, 5)),
            Some(Heading::South)
        );
        assert_eq!(
            Heading::toward(GridPos::new(0, 0), GridPos::new(-4, 2)),
            Some(Heading::West)
        );
        assert_eq!(
            Heading::toward(GridPos::new(0, 0), GridPos::new(3, -3)),
            Some(Heading::East)
        );
    }

    #[test]
    fn test_same_cell_has_no_heading() {
        let manager = ProjectileManager::new();
        let mut shooter = Unit::new(UnitType::Rifleman, GridPos::new(1, 1));
        shooter.shots_left = 1;

        assert!(manager
            .create_projectile(&mut shooter, GridPos::new(1, 1))
            .is_none());
        assert_eq!(shooter.shots_left, 1);
    }

    #[test]
    fn test_every_heading_has_one_nonzero_component() {
        for heading in [Heading::North, Heading::East, Heading::South, Heading::West] {
            let (dx, dy) = heading.vector();
            assert_eq!((dx != 0) as u8 + (dy != 0) as u8, 1);
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }

    #[test]
    fn test_advance_moves_along_heading() {
        let mut projectile = Projectile {
            position: WorldPoint::new(2.0, 2.5),
            heading: Heading::South,
            owner: UnitId::new(),
            color: TeamColor::Red,
        };
        projectile.advance(1.0);
        assert_eq!(projectile.position, WorldPoint::new(2.0, 3.5));
    }
}
