//! AI controller - owns every decision component for one side
//!
//! A turn is started with `begin_turn`, which hands back a `TurnRunner` the
//! caller ticks step by step, or run in one call with `take_turn`.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::movement::MovementExecutor;
use crate::ai::observer::TurnObserver;
use crate::ai::personality::AiPersonality;
use crate::ai::positioning::{TacticalMove, TacticalPositionFinder};
use crate::ai::scoring::TacticalScorer;
use crate::ai::turn::{TurnRunner, TurnStep};
use crate::ai::turn_state::TurnState;
use crate::arena::grid::{GridModel, ObstacleSet};
use crate::combat::projectile::{Projectile, ProjectileManager};
use crate::combat::unit::Unit;

/// Autonomous opponent for one unit
#[derive(Debug)]
pub struct AiController {
    personality: AiPersonality,
    grid: GridModel,
    pub(crate) finder: TacticalPositionFinder,
    pub(crate) movement: MovementExecutor,
    pub(crate) projectiles: ProjectileManager,
    pub(crate) rng: StdRng,
}

impl AiController {
    /// Create a controller with the default seed
    pub fn new(grid: GridModel, personality: AiPersonality) -> Self {
        Self::with_seed(grid, personality, 42) // Deterministic for testing
    }

    /// Create with specific RNG seed for deterministic behavior
    pub fn with_seed(grid: GridModel, personality: AiPersonality, seed: u64) -> Self {
        Self {
            finder: TacticalPositionFinder::from_personality(grid, &personality),
            movement: MovementExecutor::new(grid, personality.economy.move_damage_per_cell),
            projectiles: ProjectileManager::new(),
            rng: StdRng::seed_from_u64(seed),
            personality,
            grid,
        }
    }

    /// Replace the scoring strategy
    pub fn with_scorer(mut self, scorer: Box<dyn TacticalScorer>) -> Self {
        self.finder.set_scorer(scorer);
        self
    }

    pub fn personality(&self) -> &AiPersonality {
        &self.personality
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn finder(&self) -> &TacticalPositionFinder {
        &self.finder
    }

    /// Start a turn for `unit` against `opponent`
    ///
    /// Nothing happens until the runner is ticked. Projectiles fired during
    /// the turn are appended to `projectiles`.
    pub fn begin_turn<'a>(
        &'a mut self,
        unit: &'a mut Unit,
        opponent: &'a Unit,
        obstacles: &'a ObstacleSet,
        projectiles: &'a mut Vec<Projectile>,
        observer: &'a mut dyn TurnObserver,
    ) -> TurnRunner<'a> {
        TurnRunner::new(self, unit, opponent, obstacles, projectiles, observer)
    }

    /// Run a whole turn and return its terminal state
    ///
    /// Never fails: internal errors are logged and end the turn early. The
    /// unit's movement and shot budgets are zero on return.
    pub fn take_turn(
        &mut self,
        unit: &mut Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
        projectiles: &mut Vec<Projectile>,
        observer: &mut dyn TurnObserver,
    ) -> TurnState {
        let mut last = TurnState::End;
        for step in self.begin_turn(unit, opponent, obstacles, projectiles, observer) {
            if let TurnStep::State(state) = step {
                last = state;
            }
        }
        last
    }

    /// Advance fallback ladder: firing line, proximity, best overall, one step
    pub(crate) fn plan_advance(
        &mut self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
    ) -> Option<TacticalMove> {
        let finder = &self.finder;
        let rng = &mut self.rng;

        if let Some(found) = finder.find_position_with_line_of_sight(unit, opponent, obstacles, rng)
        {
            tracing::debug!("Advancing to firing position {}", found.destination);
            return Some(found);
        }
        if let Some(found) = finder.find_position_within_proximity(unit, opponent, obstacles, rng) {
            tracing::debug!("Closing in at {}", found.destination);
            return Some(found);
        }
        if let Some(found) = finder.find_best_tactical_position(unit, opponent, obstacles, rng) {
            tracing::debug!("Repositioning to {}", found.destination);
            return Some(found);
        }
        if let Some(found) = finder.make_simple_tactical_move(unit, opponent, obstacles) {
            tracing::debug!("Single step to {}", found.destination);
            return Some(found);
        }

        tracing::debug!("No move available from {}", unit.position);
        None
    }

    pub(crate) fn plan_retreat(
        &mut self,
        unit: &Unit,
        opponent: &Unit,
        obstacles: &ObstacleSet,
    ) -> Option<TacticalMove> {
        let found = self
            .finder
            .find_retreat_position(unit, opponent, obstacles, &mut self.rng)?;
        tracing::debug!("Retreating to {}", found.destination);
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::observer::NoopObserver;
    use crate::ai::scoring::ScoringContext;
    use crate::combat::unit::UnitType;
    use crate::core::types::GridPos;
    use rand::RngCore;

    /// Prefers whichever cell is furthest west
    #[derive(Debug)]
    struct WestwardScorer;

    impl TacticalScorer for WestwardScorer {
        fn evaluate(&self, context: &ScoringContext<'_>, _rng: &mut dyn RngCore) -> f64 {
            self.evaluate_step(context)
        }

        fn evaluate_step(&self, context: &ScoringContext<'_>) -> f64 {
            -(context.candidate.x as f64)
        }

        fn name(&self) -> &'static str {
            "westward"
        }
    }

    fn controller() -> AiController {
        AiController::new(GridModel::new(10, 10), AiPersonality::deterministic())
    }

    #[test]
    fn test_turn_ends_with_zero_budget() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(0, 0));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(7, 8));
        let mut projectiles = Vec::new();

        let state = ai.take_turn(
            &mut unit,
            &opponent,
            &ObstacleSet::new(),
            &mut projectiles,
            &mut NoopObserver,
        );

        assert_eq!(state, TurnState::End);
        assert_eq!(unit.moves_left, 0);
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_custom_scorer_drives_ladder() {
        let mut ai = controller().with_scorer(Box::new(WestwardScorer));
        let unit = {
            let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(5, 5));
            unit.moves_left = 2;
            unit
        };
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(9, 0));

        assert_eq!(ai.finder().scorer().name(), "westward");
        // No firing cell within reach, proximity radius too small, so the
        // best-overall search decides
        let found = ai
            .plan_advance(&unit, &opponent, &ObstacleSet::new())
            .expect("open board");
        assert_eq!(found.destination, GridPos::new(3, 5));
    }

    #[test]
    fn test_proximity_beats_best_overall_without_firing_cell() {
        let mut ai = controller().with_scorer(Box::new(WestwardScorer));
        let unit = {
            let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(5, 5));
            unit.moves_left = 3;
            unit
        };
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(8, 8));
        // Block the only two reachable cells that would share an axis with the opponent
        let obstacles = ObstacleSet::from_cells([GridPos::new(8, 6), GridPos::new(6, 8)]);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(ai
            .finder()
            .find_position_with_line_of_sight(&unit, &opponent, &obstacles, &mut rng)
            .is_none());
        let overall = ai
            .finder()
            .find_best_tactical_position(&unit, &opponent, &obstacles, &mut rng)
            .expect("open cells");
        assert_eq!(overall.destination, GridPos::new(2, 5));

        let found = ai
            .plan_advance(&unit, &opponent, &obstacles)
            .expect("proximity cell reachable");
        assert_eq!(found.destination, GridPos::new(5, 8));
        assert!(found.destination.manhattan(&opponent.position) <= 3);
        assert_eq!(found.path.len(), 3);
    }

    #[test]
    fn test_seeded_controllers_agree() {
        let grid = GridModel::new(12, 12);
        let personality = AiPersonality::default();
        let obstacles = ObstacleSet::from_cells([GridPos::new(3, 3), GridPos::new(4, 6)]);
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(10, 9));

        let run = |seed: u64| {
            let mut ai = AiController::with_seed(grid, personality.clone(), seed);
            let mut unit = Unit::new(UnitType::Scout, GridPos::new(1, 1));
            let mut projectiles = Vec::new();
            ai.take_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut NoopObserver);
            unit.position
        };

        assert_eq!(run(9), run(9));
    }
}
