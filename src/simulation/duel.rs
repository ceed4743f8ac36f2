//! Headless two-unit match
//!
//! Each round the scenario refreshes obstacles, then each side takes an AI
//! turn followed by projectile resolution. Projectiles fly cell by cell until
//! they hit the opposing unit, an obstacle, or the arena edge.

use serde::{Deserialize, Serialize};

use crate::ai::controller::AiController;
use crate::ai::observer::FnObserver;
use crate::ai::personality::AiPersonality;
use crate::arena::grid::{GridModel, ObstacleSet};
use crate::combat::projectile::Projectile;
use crate::combat::unit::{Unit, UnitType};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{GridPos, Round, TeamColor};
use crate::simulation::scenario::ScenarioManager;

/// Which of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Slowest projectile a match accepts, in cells per tick
pub const MIN_PROJECTILE_SPEED: f32 = 0.1;

/// Match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub width: u32,
    pub height: u32,
    /// Chance each free cell is blocked when obstacles refresh
    pub obstacle_density: f64,
    pub projectile_damage: u32,
    /// Cells per flight tick
    pub projectile_speed: f32,
    /// Courage granted to the shooter per hit
    pub courage_per_hit: u32,
    pub max_rounds: Round,
    pub first_unit: UnitType,
    pub second_unit: UnitType,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 10,
            obstacle_density: 0.12,
            projectile_damage: 4,
            projectile_speed: 1.0,
            courage_per_hit: 3,
            max_rounds: 40,
            first_unit: UnitType::Rifleman,
            second_unit: UnitType::Rifleman,
        }
    }
}

impl DuelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width < 4 || self.height < 4 {
            return Err(SkirmishError::InvalidConfig(format!(
                "arena {}x{} is smaller than 4x4",
                self.width, self.height
            )));
        }
        if !(self.projectile_speed.is_finite() && self.projectile_speed >= MIN_PROJECTILE_SPEED) {
            return Err(SkirmishError::InvalidConfig(format!(
                "projectile_speed ({}) must be at least {}",
                self.projectile_speed, MIN_PROJECTILE_SPEED
            )));
        }
        if self.max_rounds == 0 {
            return Err(SkirmishError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Final result of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelOutcome {
    /// `None` for a draw
    pub winner: Option<Side>,
    pub rounds: Round,
    pub first_health: u32,
    pub second_health: u32,
    pub shots_fired: u32,
    pub hits: u32,
}

#[derive(Debug)]
struct Combatant {
    unit: Unit,
    controller: AiController,
}

/// Two AI-controlled units fighting on one arena
#[derive(Debug)]
pub struct Duel {
    config: DuelConfig,
    grid: GridModel,
    scenario: ScenarioManager,
    obstacles: ObstacleSet,
    first: Combatant,
    second: Combatant,
    projectiles: Vec<Projectile>,
    round: Round,
    shots_fired: u32,
    hits: u32,
}

impl Duel {
    /// Set up a match; units start facing each other across the middle row
    pub fn new(
        config: DuelConfig,
        first: AiPersonality,
        second: AiPersonality,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        first.validate()?;
        second.validate()?;

        let grid = GridModel::new(config.width, config.height);
        let row = (config.height / 2) as i32;
        let scenario = ScenarioManager::new(grid, config.obstacle_density, seed.wrapping_add(2))?;

        let first = Combatant {
            unit: Unit::new(config.first_unit, GridPos::new(1, row)).with_color(TeamColor::Blue),
            controller: AiController::with_seed(grid, first, seed),
        };
        let second = Combatant {
            unit: Unit::new(config.second_unit, GridPos::new(config.width as i32 - 2, row))
                .with_color(TeamColor::Red),
            controller: AiController::with_seed(grid, second, seed.wrapping_add(1)),
        };

        Ok(Self {
            config,
            grid,
            scenario,
            obstacles: ObstacleSet::new(),
            first,
            second,
            projectiles: Vec::new(),
            round: 0,
            shots_fired: 0,
            hits: 0,
        })
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn unit(&self, side: Side) -> &Unit {
        &self.combatant(side).unit
    }

    /// Mutable access for setting up positions or health
    pub fn unit_mut(&mut self, side: Side) -> &mut Unit {
        match side {
            Side::First => &mut self.first.unit,
            Side::Second => &mut self.second.unit,
        }
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Play rounds until one unit is down or the round cap is reached
    pub fn run(&mut self) -> DuelOutcome {
        loop {
            if let Some(outcome) = self.play_round() {
                tracing::info!(
                    "Duel over after {} rounds: {:?}",
                    outcome.rounds,
                    outcome.winner
                );
                return outcome;
            }
        }
    }

    /// Play one round; `Some` once the match is decided
    pub fn play_round(&mut self) -> Option<DuelOutcome> {
        if let Some(outcome) = self.finished() {
            return Some(outcome);
        }

        self.round += 1;
        let occupied = [self.first.unit.position, self.second.unit.position];
        self.obstacles = self.scenario.refresh(&occupied);
        tracing::debug!("Round {} begins", self.round);

        for side in [Side::First, Side::Second] {
            self.take_turn(side);
            self.resolve_projectiles();
            if let Some(outcome) = self.decided() {
                return Some(outcome);
            }
        }

        self.finished()
    }

    fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::First => &self.first,
            Side::Second => &self.second,
        }
    }

    fn take_turn(&mut self, side: Side) {
        let (actor, target) = match side {
            Side::First => (&mut self.first, &self.second),
            Side::Second => (&mut self.second, &self.first),
        };
        let mut observer = FnObserver::new(
            || {},
            |unit: &Unit| {
                tracing::info!("{} dropped at {}", unit.unit_type.name(), unit.position);
            },
        );

        actor.controller.take_turn(
            &mut actor.unit,
            &target.unit,
            &self.obstacles,
            &mut self.projectiles,
            &mut observer,
        );
    }

    fn resolve_projectiles(&mut self) {
        for mut projectile in std::mem::take(&mut self.projectiles) {
            self.shots_fired += 1;
            // Spawn point sits on a cell edge; start from the next cell centre
            projectile.advance(0.5);

            let Some(hit) = self.fly(&mut projectile) else {
                continue;
            };
            self.hits += 1;

            let (target, shooter) = match hit {
                Side::First => (&mut self.first.unit, &mut self.second.unit),
                Side::Second => (&mut self.second.unit, &mut self.first.unit),
            };
            target.apply_damage(self.config.projectile_damage);
            shooter.courage += self.config.courage_per_hit;

            tracing::info!(
                "Hit {:?} at {} ({} hp left, {:.0}%)",
                hit,
                target.position,
                target.health,
                target.health_fraction() * 100.0
            );
        }
    }

    /// Fly until something stops the projectile; returns the side hit
    ///
    /// A tick covers `projectile_speed` cells in sub-steps of at most one
    /// cell, so every cell crossed is tested.
    fn fly(&self, projectile: &mut Projectile) -> Option<Side> {
        let speed = self.config.projectile_speed;
        let span = (self.grid.width + self.grid.height) as f32;
        let max_ticks = ((span / speed).ceil() as u32).saturating_add(1);

        if let Some(stop) = self.collide(projectile) {
            return stop;
        }
        for _ in 0..max_ticks {
            let mut remaining = speed;
            while remaining > 0.0 {
                let step = remaining.min(1.0);
                projectile.advance(step);
                remaining -= step;
                if let Some(stop) = self.collide(projectile) {
                    return stop;
                }
            }
        }
        None
    }

    /// `Some` when the projectile stops in its current cell, carrying the side hit
    fn collide(&self, projectile: &Projectile) -> Option<Option<Side>> {
        let cell = projectile.cell();
        if !self.grid.is_open(cell, &self.obstacles) {
            return Some(None);
        }
        [Side::First, Side::Second].into_iter().find_map(|side| {
            let unit = &self.combatant(side).unit;
            (unit.id != projectile.owner && unit.is_alive() && unit.position == cell)
                .then_some(Some(side))
        })
    }

    /// Decided by a downed unit or by the round cap
    fn finished(&self) -> Option<DuelOutcome> {
        self.decided().or_else(|| {
            (self.round >= self.config.max_rounds).then(|| self.outcome(None))
        })
    }

    fn decided(&self) -> Option<DuelOutcome> {
        match (self.first.unit.is_alive(), self.second.unit.is_alive()) {
            (true, true) => None,
            (true, false) => Some(self.outcome(Some(Side::First))),
            (false, true) => Some(self.outcome(Some(Side::Second))),
            (false, false) => Some(self.outcome(None)),
        }
    }

    fn outcome(&self, winner: Option<Side>) -> DuelOutcome {
        DuelOutcome {
            winner,
            rounds: self.round,
            first_health: self.first.unit.health,
            second_health: self.second.unit.health,
            shots_fired: self.shots_fired,
            hits: self.hits,
        }
    }
}
