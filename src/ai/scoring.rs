//! Tactical position scoring
//!
//! A scorer ranks one candidate cell for the moving unit. Higher is better.
//! Scorers hold only their weights; randomness comes in through the caller's
//! RNG so a seeded controller reproduces its decisions exactly.

use rand::{Rng, RngCore};

use crate::ai::personality::{AiPersonality, RangeConfig, ScoringWeights};
use crate::arena::grid::ObstacleSet;
use crate::arena::line_of_fire::has_line_of_fire;
use crate::combat::unit::Unit;
use crate::core::types::GridPos;

/// Everything a scorer may look at for one candidate
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub unit: &'a Unit,
    pub opponent: &'a Unit,
    pub candidate: GridPos,
    pub obstacles: &'a ObstacleSet,
    /// Steps needed to reach `candidate` (0 for the current cell)
    pub path_length: u32,
}

/// Strategy for ranking candidate cells
pub trait TacticalScorer: Send + Sync + std::fmt::Debug {
    /// Full evaluation, including movement cost and tie-breaking noise
    fn evaluate(&self, context: &ScoringContext<'_>, rng: &mut dyn RngCore) -> f64;

    /// Cheap evaluation for single-step fallbacks: no movement cost, no noise
    fn evaluate_step(&self, context: &ScoringContext<'_>) -> f64;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Reference scorer: shot, cover, movement cost, range preference, jitter
#[derive(Debug, Clone)]
pub struct WeightedScorer {
    scoring: ScoringWeights,
    range: RangeConfig,
    move_damage_per_cell: u32,
}

impl WeightedScorer {
    pub fn new(scoring: ScoringWeights, range: RangeConfig, move_damage_per_cell: u32) -> Self {
        Self {
            scoring,
            range,
            move_damage_per_cell,
        }
    }

    pub fn from_personality(personality: &AiPersonality) -> Self {
        Self::new(
            personality.scoring.clone(),
            personality.range.clone(),
            personality.economy.move_damage_per_cell,
        )
    }

    /// Bonus if the opponent is in a clear firing line from the candidate
    pub fn shot_term(&self, context: &ScoringContext<'_>) -> f64 {
        if has_line_of_fire(
            context.candidate,
            context.opponent.position,
            context.obstacles,
        ) {
            self.scoring.shot_bonus
        } else {
            0.0
        }
    }

    /// Bonus per obstacle among the candidate's four neighbours
    pub fn cover_term(&self, context: &ScoringContext<'_>) -> f64 {
        context.obstacles.adjacent_count(context.candidate) as f64
            * self.scoring.cover_bonus_per_cell
    }

    /// Penalty for the health the walk will cost (always <= 0)
    pub fn movement_term(&self, context: &ScoringContext<'_>) -> f64 {
        let damage = context.path_length as f64 * self.move_damage_per_cell as f64;
        let tolerated = context.unit.health as f64 * self.scoring.max_health_risk_ratio;

        if damage > tolerated {
            -self.scoring.health_danger_penalty
        } else {
            -damage * self.scoring.health_penalty_factor
        }
    }

    /// Preference for the optimal distance band
    pub fn range_term(&self, context: &ScoringContext<'_>) -> f64 {
        let distance = context.candidate.manhattan(&context.opponent.position);
        let band = &self.range;

        if (band.optimal_min..=band.optimal_max).contains(&distance) {
            return band.optimal_bonus;
        }
        if distance <= 1 {
            return -band.too_close_penalty;
        }

        let outside = if distance > band.optimal_max {
            distance - band.optimal_max
        } else {
            band.optimal_min - distance
        };
        (band.distant_base_bonus - outside as f64 * band.distant_decay).max(0.0)
    }

    fn jitter(&self, rng: &mut dyn RngCore) -> f64 {
        let magnitude = self.scoring.random_jitter;
        if !(magnitude.is_finite() && magnitude > 0.0) {
            return 0.0;
        }
        rng.gen_range(-magnitude..=magnitude)
    }
}

impl TacticalScorer for WeightedScorer {
    fn evaluate(&self, context: &ScoringContext<'_>, rng: &mut dyn RngCore) -> f64 {
        self.shot_term(context)
            + self.cover_term(context)
            + self.movement_term(context)
            + self.range_term(context)
            + self.jitter(rng)
    }

    fn evaluate_step(&self, context: &ScoringContext<'_>) -> f64 {
        self.shot_term(context) + self.cover_term(context) + self.range_term(context)
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}
