//! Resumable AI turn
//!
//! `TurnRunner` performs one atomic step per `next()`: a state announcement,
//! a single-cell move, a courage spend, or a shot. The caller paces the steps
//! however it likes and may cancel between any two of them.
//!
//! Turn outline:
//! 1. Reset the budget, announce Thinking.
//! 2. Announce Aiming. Without a clear shot, walk the advance ladder.
//! 3. Announce Shooting. Spend courage on bonus shots, then fire while the
//!    line stays clear and shots remain.
//! 4. With movement left, re-announce Aiming and walk to a retreat cell.
//! 5. Zero the budget, announce End.
//!
//! Any error ends the turn at step 5.

use std::iter::FusedIterator;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::controller::AiController;
use crate::ai::movement::{MovementRun, StepOutcome};
use crate::ai::observer::TurnObserver;
use crate::ai::turn_state::{TurnState, TurnStateMachine};
use crate::arena::grid::ObstacleSet;
use crate::arena::line_of_fire::has_line_of_fire;
use crate::combat::projectile::Projectile;
use crate::combat::unit::Unit;
use crate::core::config::PacingConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::GridPos;

/// One visible step of an AI turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnStep {
    State(TurnState),
    Moved { from: GridPos, to: GridPos },
    BonusShot { courage_left: u32 },
    Fired(Projectile),
    UnitDown,
}

impl TurnStep {
    /// Pause a presenter should insert after this step
    pub fn suggested_delay(&self, pacing: &PacingConfig) -> Duration {
        match self {
            TurnStep::State(state) => state.suggested_delay(pacing),
            TurnStep::Moved { .. } => pacing.step(),
            TurnStep::BonusShot { .. } => Duration::ZERO,
            TurnStep::Fired(_) => pacing.shot(),
            TurnStep::UnitDown => Duration::from_millis(pacing.end_ms),
        }
    }
}

enum Stage {
    Begin,
    Announce,
    Search,
    Walk { run: MovementRun, retreating: bool },
    Downed,
    BeginShooting,
    Arm,
    Fire,
    Retreat,
    Finish,
    Done,
}

enum Progress {
    Emit(TurnStep),
    Continue,
    Exhausted,
}

/// An AI turn in progress
///
/// Dropping an unfinished runner zeroes the unit's budgets.
pub struct TurnRunner<'a> {
    controller: &'a mut AiController,
    unit: &'a mut Unit,
    opponent: &'a Unit,
    obstacles: &'a ObstacleSet,
    projectiles: &'a mut Vec<Projectile>,
    observer: &'a mut dyn TurnObserver,
    machine: TurnStateMachine,
    stage: Stage,
}

impl<'a> TurnRunner<'a> {
    pub(crate) fn new(
        controller: &'a mut AiController,
        unit: &'a mut Unit,
        opponent: &'a Unit,
        obstacles: &'a ObstacleSet,
        projectiles: &'a mut Vec<Projectile>,
        observer: &'a mut dyn TurnObserver,
    ) -> Self {
        Self {
            controller,
            unit,
            opponent,
            obstacles,
            projectiles,
            observer,
            machine: TurnStateMachine::new(),
            stage: Stage::Begin,
        }
    }

    /// Last announced state
    pub fn state(&self) -> Option<TurnState> {
        self.machine.current()
    }

    pub fn unit(&self) -> &Unit {
        &*self.unit
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Done)
    }

    /// End the turn now; the next step announces End
    pub fn cancel(&mut self) {
        if matches!(self.stage, Stage::Finish | Stage::Done) {
            return;
        }
        tracing::info!("Turn cancelled at {}", self.unit.position);
        self.unit.end_turn();
        self.stage = Stage::Finish;
    }

    fn validate(&self) -> Result<()> {
        let position = self.unit.position;
        if !self.controller.grid().in_bounds(position) {
            return Err(SkirmishError::UnitOutOfBounds(position));
        }
        if self.obstacles.contains(position) {
            return Err(SkirmishError::UnitOnObstacle(position));
        }
        Ok(())
    }

    fn has_shot(&self) -> bool {
        has_line_of_fire(self.unit.position, self.opponent.position, self.obstacles)
    }

    fn step(&mut self) -> Result<Progress> {
        let stage = std::mem::replace(&mut self.stage, Stage::Done);

        match stage {
            Stage::Begin => {
                self.unit.reset_turn_budget();
                if !self.unit.is_alive() {
                    tracing::debug!("Unit at {} is down, skipping turn", self.unit.position);
                    self.stage = Stage::Finish;
                    return Ok(Progress::Continue);
                }
                self.validate()?;

                tracing::info!(
                    "AI turn: {} at {} ({} hp, {} courage)",
                    self.unit.unit_type.name(),
                    self.unit.position,
                    self.unit.health,
                    self.unit.courage
                );
                self.stage = Stage::Announce;
                let state = self.machine.advance(&mut *self.observer);
                Ok(Progress::Emit(TurnStep::State(state)))
            }

            Stage::Announce => {
                self.stage = Stage::Search;
                let state = self.machine.advance(&mut *self.observer);
                Ok(Progress::Emit(TurnStep::State(state)))
            }

            Stage::Search => {
                self.stage = if self.unit.moves_left == 0 || self.has_shot() {
                    Stage::BeginShooting
                } else {
                    match self
                        .controller
                        .plan_advance(&*self.unit, self.opponent, self.obstacles)
                    {
                        Some(found) => Stage::Walk {
                            run: MovementRun::new(found.path),
                            retreating: false,
                        },
                        None => Stage::BeginShooting,
                    }
                };
                Ok(Progress::Continue)
            }

            Stage::Walk {
                mut run,
                retreating,
            } => {
                let outcome = self.controller.movement.step(
                    &mut run,
                    self.unit,
                    self.obstacles,
                    self.opponent.position,
                )?;

                match outcome {
                    StepOutcome::Moved { from, to } => {
                        self.observer.notify();
                        self.stage = Stage::Walk { run, retreating };
                        Ok(Progress::Emit(TurnStep::Moved { from, to }))
                    }
                    StepOutcome::Downed { from, to } => {
                        self.observer.notify();
                        self.stage = Stage::Downed;
                        Ok(Progress::Emit(TurnStep::Moved { from, to }))
                    }
                    StepOutcome::Finished => {
                        self.stage = if retreating {
                            Stage::Finish
                        } else {
                            Stage::BeginShooting
                        };
                        Ok(Progress::Continue)
                    }
                }
            }

            Stage::Downed => {
                tracing::info!("AI unit down at {}", self.unit.position);
                self.observer.on_health_depleted(&*self.unit);
                self.stage = Stage::Finish;
                Ok(Progress::Emit(TurnStep::UnitDown))
            }

            Stage::BeginShooting => {
                self.stage = Stage::Arm;
                let state = self.machine.advance(&mut *self.observer);
                Ok(Progress::Emit(TurnStep::State(state)))
            }

            Stage::Arm => {
                let cost = self.controller.personality().economy.extra_shot_cost;
                if cost > 0 && self.unit.courage >= cost {
                    self.unit.courage -= cost;
                    self.unit.shots_left += 1;
                    self.observer.notify();
                    self.stage = Stage::Arm;
                    Ok(Progress::Emit(TurnStep::BonusShot {
                        courage_left: self.unit.courage,
                    }))
                } else {
                    self.stage = Stage::Fire;
                    Ok(Progress::Continue)
                }
            }

            Stage::Fire => {
                if self.unit.shots_left == 0 || !self.has_shot() {
                    self.stage = Stage::Retreat;
                    return Ok(Progress::Continue);
                }

                let target = self.opponent.position;
                match self
                    .controller
                    .projectiles
                    .create_projectile(self.unit, target)
                {
                    Some(projectile) => {
                        tracing::debug!(
                            "Fired {:?} from {} at {}",
                            projectile.heading,
                            self.unit.position,
                            target
                        );
                        self.projectiles.push(projectile.clone());
                        self.observer.notify();
                        self.stage = Stage::Fire;
                        Ok(Progress::Emit(TurnStep::Fired(projectile)))
                    }
                    None => {
                        self.stage = Stage::Retreat;
                        Ok(Progress::Continue)
                    }
                }
            }

            Stage::Retreat => {
                if self.unit.moves_left == 0 {
                    self.stage = Stage::Finish;
                    return Ok(Progress::Continue);
                }

                let state = self.machine.announce_retreat(&mut *self.observer);
                self.stage = match self
                    .controller
                    .plan_retreat(&*self.unit, self.opponent, self.obstacles)
                {
                    Some(found) => Stage::Walk {
                        run: MovementRun::new(found.path),
                        retreating: true,
                    },
                    None => Stage::Finish,
                };
                Ok(Progress::Emit(TurnStep::State(state)))
            }

            Stage::Finish => {
                self.unit.end_turn();
                let state = self.machine.finish(&mut *self.observer);
                tracing::info!("AI turn over at {}", self.unit.position);
                self.stage = Stage::Done;
                Ok(Progress::Emit(TurnStep::State(state)))
            }

            Stage::Done => Ok(Progress::Exhausted),
        }
    }
}

impl Iterator for TurnRunner<'_> {
    type Item = TurnStep;

    fn next(&mut self) -> Option<TurnStep> {
        loop {
            match self.step() {
                Ok(Progress::Emit(step)) => return Some(step),
                Ok(Progress::Continue) => {}
                Ok(Progress::Exhausted) => return None,
                Err(err) => {
                    tracing::warn!("AI turn aborted: {}", err);
                    self.stage = Stage::Finish;
                }
            }
        }
    }
}

impl FusedIterator for TurnRunner<'_> {}

impl Drop for TurnRunner<'_> {
    fn drop(&mut self) {
        if !matches!(self.stage, Stage::Done) {
            self.unit.end_turn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::observer::NoopObserver;
    use crate::ai::personality::AiPersonality;
    use crate::arena::grid::GridModel;
    use crate::combat::unit::UnitType;

    fn controller() -> AiController {
        AiController::new(GridModel::new(10, 10), AiPersonality::deterministic())
    }

    fn states(steps: &[TurnStep]) -> Vec<TurnState> {
        steps
            .iter()
            .filter_map(|step| match step {
                TurnStep::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_clear_shot_sequence() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(5, 5));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(5, 2));
        let obstacles = ObstacleSet::new();
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        let steps: Vec<TurnStep> = ai
            .begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer)
            .collect();

        assert_eq!(
            states(&steps),
            vec![
                TurnState::Thinking,
                TurnState::Aiming,
                TurnState::Shooting,
                TurnState::Aiming,
                TurnState::End
            ]
        );
        assert_eq!(
            steps.iter().filter(|s| matches!(s, TurnStep::Fired(_))).count(),
            1
        );
        assert!(!steps.iter().any(|s| matches!(s, TurnStep::Moved { .. })));
        assert_eq!(projectiles.len(), 1);
    }

    #[test]
    fn test_courage_buys_bonus_shots() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(5, 5));
        unit.courage = 7;
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(5, 2));
        let obstacles = ObstacleSet::new();
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        let steps: Vec<TurnStep> = ai
            .begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer)
            .collect();

        let bonus: Vec<u32> = steps
            .iter()
            .filter_map(|s| match s {
                TurnStep::BonusShot { courage_left } => Some(*courage_left),
                _ => None,
            })
            .collect();
        assert_eq!(bonus, vec![4, 1]);
        assert_eq!(projectiles.len(), 3);
        assert_eq!(unit.courage, 1);
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_cancel_mid_walk() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(0, 0));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(0, 5));
        let obstacles = ObstacleSet::from_cells([GridPos::new(0, 2)]);
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        {
            let mut runner =
                ai.begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer);
            loop {
                match runner.next() {
                    Some(TurnStep::Moved { .. }) => break,
                    Some(_) => {}
                    None => panic!("turn ended before moving"),
                }
            }
            runner.cancel();
            assert_eq!(runner.unit().moves_left, 0);
            assert_eq!(runner.next(), Some(TurnStep::State(TurnState::End)));
            assert_eq!(runner.next(), None);
            assert!(runner.is_finished());
        }

        assert_eq!(unit.position.manhattan(&GridPos::new(0, 0)), 1);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_dropping_runner_zeroes_budget() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Gunner, GridPos::new(0, 0));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(6, 6));
        let obstacles = ObstacleSet::new();
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        {
            let mut runner =
                ai.begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer);
            assert_eq!(runner.next(), Some(TurnStep::State(TurnState::Thinking)));
            assert_eq!(runner.unit().moves_left, 2);
            assert_eq!(runner.state(), Some(TurnState::Thinking));
        }

        assert_eq!(unit.moves_left, 0);
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_unit_on_obstacle_ends_turn() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(3, 3));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(3, 0));
        let obstacles = ObstacleSet::from_cells([GridPos::new(3, 3)]);
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        let steps: Vec<TurnStep> = ai
            .begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer)
            .collect();

        assert_eq!(steps, vec![TurnStep::State(TurnState::End)]);
        assert_eq!(unit.moves_left, 0);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_unit_out_of_bounds_ends_turn() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(12, 3));
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(3, 3));
        let mut projectiles = Vec::new();

        let state = ai.take_turn(
            &mut unit,
            &opponent,
            &ObstacleSet::new(),
            &mut projectiles,
            &mut NoopObserver,
        );

        assert_eq!(state, TurnState::End);
        assert_eq!(unit.position, GridPos::new(12, 3));
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_downed_unit_stops_turn() {
        let mut ai = controller();
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(0, 0));
        unit.health = 1;
        let opponent = Unit::new(UnitType::Rifleman, GridPos::new(0, 5));
        let obstacles = ObstacleSet::from_cells([GridPos::new(0, 2)]);
        let mut projectiles = Vec::new();
        let mut observer = NoopObserver;

        let steps: Vec<TurnStep> = ai
            .begin_turn(&mut unit, &opponent, &obstacles, &mut projectiles, &mut observer)
            .collect();

        let tail = &steps[steps.len() - 3..];
        assert!(matches!(tail[0], TurnStep::Moved { .. }));
        assert_eq!(tail[1], TurnStep::UnitDown);
        assert_eq!(tail[2], TurnStep::State(TurnState::End));
        assert!(!states(&steps).contains(&TurnState::Shooting));
        assert_eq!(unit.health, 0);
    }

    #[test]
    fn test_step_delays_follow_pacing() {
        let pacing = PacingConfig::default();
        let moved = TurnStep::Moved {
            from: GridPos::new(0, 0),
            to: GridPos::new(1, 0),
        };
        assert_eq!(moved.suggested_delay(&pacing), pacing.step());
        assert_eq!(
            TurnStep::State(TurnState::Aiming).suggested_delay(&pacing),
            Duration::from_millis(pacing.aiming_ms)
        );
        assert_eq!(
            TurnStep::BonusShot { courage_left: 0 }.suggested_delay(&pacing),
            Duration::ZERO
        );
    }
}
