//! Candidate generation and tactical position search
//!
//! Every search walks the same candidate set: open cells inside the mover's
//! budget diamond, each reachable within budget. The searches differ only in
//! which candidates they keep. Candidates are visited row by row and the
//! first of equally scored cells wins.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rand::RngCore;

use crate::ai::personality::AiPersonality;
use crate::ai::scoring::{ScoringContext, TacticalScorer, WeightedScorer};
use crate::arena::grid::{GridModel, ObstacleSet};
use crate::arena::line_of_fire::has_line_of_fire;
use crate::arena::pathfinding::{Path, PathFinder};
use crate::combat::unit::Unit;
use crate::core::types::GridPos;

/// A scored destination and the path that reaches it
#[derive(Debug, Clone, PartialEq)]
pub struct TacticalMove {
    pub destination: GridPos,
    pub path: Path,
    pub score: f64,
}

/// Searches an arena for the best place to move
#[derive(Debug)]
pub struct TacticalPositionFinder {
    grid: GridModel,
    pathfinder: PathFinder,
    scorer: Box<dyn TacticalScorer>,
    proximity_radius: u32,
}

impl TacticalPositionFinder {
    pub fn new(grid: GridModel, scorer: Box<dyn TacticalScorer>, proximity_radius: u32) -> Self {
        Self {
            grid,
            pathfinder: PathFinder::new(grid),
            scorer,
            proximity_radius,
        }
    }

    /// Finder using the weighted scorer configured by `personality`
    pub fn from_personality(grid: GridModel, personality: &AiPersonality) -> Self {
        Self::new(
            grid,
            Box::new(WeightedScorer::from_personality(personality)),
            personality.economy.proximity_radius,
        )
    }

    /// Swap the scoring strategy
    pub fn set_scorer(&mut self, scorer: Box<dyn TacticalScorer>) {
        self.scorer = scorer;
    }

    pub fn scorer(&self) -> &dyn TacticalScorer {
        self.scorer.as_ref()
    }

    /// Open cells within Manhattan distance `moves_left` of the unit
    ///
    /// Excludes the unit's own cell and the opponent's cell. Row-major order.
    pub fn candidate_cells(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
    ) -> Vec<GridPos> {
        let budget = unit.moves_left;
        if budget == 0 {
            return Vec::new();
        }

        let origin = unit.position;
        let reach = budget as i32;
        let mut cells = Vec::new();

        for y in (origin.y - reach)..=(origin.y + reach) {
            for x in (origin.x - reach)..=(origin.x + reach) {
                let cell = GridPos::new(x, y);
                if cell == origin
                    || cell == opponent.position
                    || origin.manhattan(&cell) > budget
                    || !self.grid.is_open(cell, obstacles)
                {
                    continue;
                }
                cells.push(cell);
            }
        }

        cells
    }

    /// Highest-scoring reachable candidate
    pub fn find_best_tactical_position(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
    ) -> Option<TacticalMove> {
        self.best_where(unit, opponent, obstacles, rng, |_| true)
    }

    /// Best candidate with a clear shot at the opponent
    pub fn find_position_with_line_of_sight(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
    ) -> Option<TacticalMove> {
        let target = opponent.position;
        self.best_where(unit, opponent, obstacles, rng, |cell| {
            has_line_of_fire(cell, target, obstacles)
        })
    }

    /// Best candidate within the proximity radius of the opponent
    pub fn find_position_within_proximity(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
    ) -> Option<TacticalMove> {
        let target = opponent.position;
        let radius = self.proximity_radius;
        self.best_where(unit, opponent, obstacles, rng, |cell| {
            cell.manhattan(&target) <= radius
        })
    }

    /// Best candidate, but only if it strictly beats staying put
    pub fn find_retreat_position(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
    ) -> Option<TacticalMove> {
        let best = self.best_where(unit, opponent, obstacles, rng, |_| true)?;
        let hold = self.hold_score(unit, opponent, obstacles, rng);

        if best.score > hold {
            Some(best)
        } else {
            tracing::debug!(
                "Holding {} ({:.1}) over {} ({:.1})",
                unit.position,
                hold,
                best.destination,
                best.score
            );
            None
        }
    }

    /// Score of the unit's current cell with no movement cost
    pub fn hold_score(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
    ) -> f64 {
        let context = ScoringContext {
            unit,
            opponent,
            candidate: unit.position,
            obstacles,
            path_length: 0,
        };
        self.scorer.evaluate(&context, rng)
    }

    /// One step to the best open neighbour, without pathfinding
    pub fn make_simple_tactical_move(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
    ) -> Option<TacticalMove> {
        if unit.moves_left == 0 {
            return None;
        }

        let mut scored: Vec<(GridPos, f64)> = self
            .grid
            .neighbors(unit.position)
            .filter(|cell| *cell != opponent.position && !obstacles.contains(*cell))
            .map(|cell| {
                let context = ScoringContext {
                    unit,
                    opponent,
                    candidate: cell,
                    obstacles,
                    path_length: 1,
                };
                (cell, self.scorer.evaluate_step(&context))
            })
            .collect();

        // Stable sort keeps N, E, S, W order among equal scores
        scored.sort_by_key(|(_, score)| Reverse(OrderedFloat(*score)));

        scored.into_iter().next().map(|(cell, score)| TacticalMove {
            destination: cell,
            path: Path::new(vec![cell]),
            score,
        })
    }

    fn best_where<F>(
        &self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        rng: &mut dyn RngCore,
        keep: F,
    ) -> Option<TacticalMove>
    where
        F: Fn(GridPos) -> bool,
    {
        let budget = unit.moves_left as usize;
        let mut best: Option<TacticalMove> = None;

        for candidate in self.candidate_cells(unit, opponent, obstacles) {
            if !keep(candidate) {
                continue;
            }

            let path = self
                .pathfinder
                .find_path(unit.position, candidate, obstacles, opponent.position);
            if path.is_empty() || path.len() > budget {
                continue;
            }

            let context = ScoringContext {
                unit,
                opponent,
                candidate,
                obstacles,
                path_length: path.len() as u32,
            };
            let score = self.scorer.evaluate(&context, rng);

            if best.as_ref().map_or(true, |current| score > current.score) {
                best = Some(TacticalMove {
                    destination: candidate,
                    path,
                    score,
                });
            }
        }

        best
    }
}
