//! Obstacle layouts refreshed between rounds

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::arena::grid::{GridModel, ObstacleSet};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::GridPos;

/// Owns the obstacle snapshot and regenerates it each round
#[derive(Debug, Clone)]
pub struct ScenarioManager {
    grid: GridModel,
    density: f64,
    rng: ChaCha8Rng,
}

impl ScenarioManager {
    /// `density` is the chance each free cell is blocked, in [0, 1)
    pub fn new(grid: GridModel, density: f64, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&density) {
            return Err(SkirmishError::InvalidConfig(format!(
                "obstacle density ({}) should be in [0, 1)",
                density
            )));
        }
        Ok(Self {
            grid,
            density,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Fresh obstacle layout that leaves every `occupied` cell open
    pub fn refresh(&mut self, occupied: &[GridPos]) -> ObstacleSet {
        let mut obstacles = ObstacleSet::new();
        for cell in self.grid.cells() {
            // One draw per cell, occupied or not
            let blocked = self.rng.gen_bool(self.density);
            if blocked && !occupied.contains(&cell) {
                obstacles.block(cell);
            }
        }
        tracing::debug!("Scenario refreshed with {} obstacles", obstacles.len());
        obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_never_blocks_units() {
        let grid = GridModel::new(8, 8);
        let mut scenario = ScenarioManager::new(grid, 0.9, 5).expect("valid density");
        let units = [GridPos::new(1, 1), GridPos::new(6, 6)];

        for _ in 0..20 {
            let obstacles = scenario.refresh(&units);
            assert!(units.iter().all(|u| !obstacles.contains(*u)));
            assert!(obstacles.iter().all(|cell| grid.in_bounds(*cell)));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let grid = GridModel::new(10, 10);
        let mut a = ScenarioManager::new(grid, 0.2, 77).expect("valid");
        let mut b = ScenarioManager::new(grid, 0.2, 77).expect("valid");
        assert_eq!(a.refresh(&[]), b.refresh(&[]));
        assert_eq!(a.refresh(&[]), b.refresh(&[]));
    }

    #[test]
    fn test_zero_density_is_open() {
        let mut scenario = ScenarioManager::new(GridModel::new(6, 6), 0.0, 1).expect("valid");
        assert!(scenario.refresh(&[]).is_empty());
    }

    #[test]
    fn test_density_validated() {
        let grid = GridModel::new(6, 6);
        assert!(ScenarioManager::new(grid, 1.0, 1).is_err());
        assert!(ScenarioManager::new(grid, -0.1, 1).is_err());
        assert!(ScenarioManager::new(grid, f64::NAN, 1).is_err());
    }
}
