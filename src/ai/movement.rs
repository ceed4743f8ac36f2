//! Walking a unit along a path one cell at a time
//!
//! Every step costs health and one point of movement budget. A walk is a
//! resumable cursor so the turn runner can interleave steps with the
//! caller's frames; `execute_movement` drives one to completion.

use crate::ai::observer::TurnObserver;
use crate::arena::grid::{GridModel, ObstacleSet};
use crate::arena::pathfinding::Path;
use crate::combat::unit::Unit;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::GridPos;

/// Result of one step attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { from: GridPos, to: GridPos },
    /// Moved, and the step's cost took the unit's health to zero
    Downed { from: GridPos, to: GridPos },
    /// Path exhausted, budget spent, or unit already down
    Finished,
}

/// Progress through one path
#[derive(Debug, Clone)]
pub struct MovementRun {
    path: Path,
    next: usize,
    steps_taken: u32,
}

impl MovementRun {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            next: 0,
            steps_taken: 0,
        }
    }

    pub fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    pub fn remaining(&self) -> usize {
        self.path.len().saturating_sub(self.next)
    }

    fn peek(&self) -> Option<GridPos> {
        self.path.cells().get(self.next).copied()
    }
}

/// Summary of a completed walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementReport {
    pub steps_taken: u32,
    pub downed: bool,
}

/// Applies paths to units
#[derive(Debug, Clone)]
pub struct MovementExecutor {
    grid: GridModel,
    damage_per_cell: u32,
}

impl MovementExecutor {
    pub fn new(grid: GridModel, damage_per_cell: u32) -> Self {
        Self {
            grid,
            damage_per_cell,
        }
    }

    /// Take the next step of `run`, if budget and health allow
    ///
    /// Fails if the step is not one orthogonal move from the unit's current
    /// cell, or lands out of bounds, on an obstacle, or on the opponent.
    pub fn step(
        &self,
        run: &mut MovementRun,
        unit: &mut Unit,
        obstacles: &ObstacleSet,
        opponent: GridPos,
    ) -> Result<StepOutcome> {
        if unit.moves_left == 0 || !unit.is_alive() {
            return Ok(StepOutcome::Finished);
        }
        let Some(to) = run.peek() else {
            return Ok(StepOutcome::Finished);
        };

        let from = unit.position;
        if !from.is_adjacent(&to) {
            return Err(SkirmishError::BrokenPath { from, to });
        }
        if !self.grid.is_open(to, obstacles) || to == opponent {
            return Err(SkirmishError::BlockedStep(to));
        }

        unit.position = to;
        unit.moves_left -= 1;
        run.next += 1;
        run.steps_taken += 1;

        if unit.apply_damage(self.damage_per_cell) {
            Ok(StepOutcome::Downed { from, to })
        } else {
            Ok(StepOutcome::Moved { from, to })
        }
    }

    /// Walk `path` to completion, notifying after every step
    pub fn execute_movement(
        &self,
        unit: &mut Unit,
        path: &Path,
        obstacles: &ObstacleSet,
        opponent: GridPos,
        observer: &mut dyn TurnObserver,
    ) -> Result<MovementReport> {
        let mut run = MovementRun::new(path.clone());

        loop {
            match self.step(&mut run, unit, obstacles, opponent)? {
                StepOutcome::Moved { .. } => observer.notify(),
                StepOutcome::Downed { .. } => {
                    observer.notify();
                    observer.on_health_depleted(unit);
                    return Ok(MovementReport {
                        steps_taken: run.steps_taken(),
                        downed: true,
                    });
                }
                StepOutcome::Finished => break,
            }
        }

        Ok(MovementReport {
            steps_taken: run.steps_taken(),
            downed: false,
        })
    }
}
