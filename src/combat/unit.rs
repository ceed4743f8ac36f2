//! Duel units and their per-turn budgets

use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, TeamColor, UnitId};

/// Type of combat unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    Rifleman, // Balanced
    Scout,    // Fast, fragile, single shot
    Gunner,   // Slow, tough, heavy fire
}

/// Default properties for a unit type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProperties {
    pub max_health: u32,
    pub move_limit: u32,       // Cells per turn
    pub attacks_per_turn: u32, // Shots per turn
}

impl UnitType {
    /// Get default properties for this unit type
    pub fn default_properties(&self) -> UnitProperties {
        match self {
            UnitType::Rifleman => UnitProperties {
                max_health: 10,
                move_limit: 4,
                attacks_per_turn: 1,
            },
            UnitType::Scout => UnitProperties {
                max_health: 7,
                move_limit: 6,
                attacks_per_turn: 1,
            },
            UnitType::Gunner => UnitProperties {
                max_health: 14,
                move_limit: 2,
                attacks_per_turn: 2,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitType::Rifleman => "rifleman",
            UnitType::Scout => "scout",
            UnitType::Gunner => "gunner",
        }
    }
}

/// A unit on the arena grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitType,
    pub color: TeamColor,
    pub position: GridPos,
    pub health: u32,
    pub max_health: u32,
    /// Cells left to move this turn
    pub moves_left: u32,
    /// Shots left this turn
    pub shots_left: u32,
    /// Accumulated resource spendable on bonus shots
    pub courage: u32,
}

impl Unit {
    /// Create a unit at full health with an empty turn budget
    pub fn new(unit_type: UnitType, position: GridPos) -> Self {
        let props = unit_type.default_properties();
        Self {
            id: UnitId::new(),
            unit_type,
            color: TeamColor::default(),
            position,
            health: props.max_health,
            max_health: props.max_health,
            moves_left: 0,
            shots_left: 0,
            courage: 0,
        }
    }

    pub fn with_color(mut self, color: TeamColor) -> Self {
        self.color = color;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Restore the turn budget to the unit type's defaults
    pub fn reset_turn_budget(&mut self) {
        let props = self.unit_type.default_properties();
        self.moves_left = props.move_limit;
        self.shots_left = props.attacks_per_turn;
    }

    /// Zero both turn budgets
    pub fn end_turn(&mut self) {
        self.moves_left = 0;
        self.shots_left = 0;
    }

    /// Apply damage, clamping at zero. Returns true if this took the unit down.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Health as a fraction of maximum
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_has_full_health_and_no_budget() {
        let unit = Unit::new(UnitType::Rifleman, GridPos::new(1, 1));
        assert_eq!(unit.health, unit.max_health);
        assert_eq!(unit.moves_left, 0);
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_reset_and_end_turn() {
        let mut unit = Unit::new(UnitType::Gunner, GridPos::new(0, 0));
        unit.reset_turn_budget();
        assert_eq!(unit.moves_left, 2);
        assert_eq!(unit.shots_left, 2);

        unit.end_turn();
        assert_eq!(unit.moves_left, 0);
        assert_eq!(unit.shots_left, 0);
    }

    #[test]
    fn test_apply_damage_clamps() {
        let mut unit = Unit::new(UnitType::Scout, GridPos::new(0, 0));
        assert!(!unit.apply_damage(3));
        assert_eq!(unit.health, 4);
        assert!(unit.apply_damage(100));
        assert_eq!(unit.health, 0);
        // Already down: no second knockout
        assert!(!unit.apply_damage(1));
    }

    #[test]
    fn test_scout_outpaces_gunner() {
        let scout = UnitType::Scout.default_properties();
        let gunner = UnitType::Gunner.default_properties();
        assert!(scout.move_limit > gunner.move_limit);
        assert!(gunner.attacks_per_turn > scout.attacks_per_turn);
    }

    #[test]
    fn test_health_fraction() {
        let mut unit = Unit::new(UnitType::Rifleman, GridPos::new(0, 0));
        unit.health = 5;
        assert!((unit.health_fraction() - 0.5).abs() < f32::EPSILON);
    }
}
