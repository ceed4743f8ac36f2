//! AI personality configuration loaded from TOML
//!
//! Personalities hold every tunable the tactical engine reads: scoring
//! weights, preferred engagement range, resource economy, and pacing.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::config::PacingConfig;
use crate::core::error::{Result, SkirmishError};

/// Position-scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Bonus for a cell with a clear shot at the opponent
    pub shot_bonus: f64,
    /// Bonus per orthogonally adjacent obstacle
    pub cover_bonus_per_cell: f64,
    /// Flat penalty when the walk would cost too much health
    pub health_danger_penalty: f64,
    /// Penalty per point of health the walk costs (when below the danger ratio)
    pub health_penalty_factor: f64,
    /// Fraction of current health a walk may cost before it counts as dangerous
    pub max_health_risk_ratio: f64,
    /// Half-width of the uniform tie-breaking noise
    pub random_jitter: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            shot_bonus: 100.0,
            cover_bonus_per_cell: 15.0,
            health_danger_penalty: 200.0,
            health_penalty_factor: 2.0,
            max_health_risk_ratio: 0.5,
            random_jitter: 1.0,
        }
    }
}

/// Preferred engagement distance (Manhattan cells)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub optimal_min: u32,
    pub optimal_max: u32,
    /// Bonus inside the optimal band
    pub optimal_bonus: f64,
    /// Penalty at distance one or less
    pub too_close_penalty: f64,
    /// Bonus just past the band, before decay
    pub distant_base_bonus: f64,
    /// Bonus lost per cell beyond the band
    pub distant_decay: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            optimal_min: 2,
            optimal_max: 3,
            optimal_bonus: 30.0,
            too_close_penalty: 40.0,
            distant_base_bonus: 20.0,
            distant_decay: 3.0,
        }
    }
}

/// Courage and movement costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Courage spent per bonus shot (0 disables bonus shots)
    pub extra_shot_cost: u32,
    /// Radius around the opponent used by the proximity search
    pub proximity_radius: u32,
    /// Health lost per cell walked
    pub move_damage_per_cell: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            extra_shot_cost: 3,
            proximity_radius: 3,
            move_damage_per_cell: 1,
        }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            scoring: ScoringWeights::default(),
            range: RangeConfig::default(),
            economy: EconomyConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl AiPersonality {
    /// Parse and validate a personality from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let personality: AiPersonality = toml::from_str(contents)?;
        personality.validate()?;
        Ok(personality)
    }

    /// Default weights with jitter removed, for reproducible decisions
    pub fn deterministic() -> Self {
        let mut personality = Self::default();
        personality.scoring.random_jitter = 0.0;
        personality
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.range.optimal_min > self.range.optimal_max {
            return Err(SkirmishError::InvalidConfig(format!(
                "optimal_min ({}) should be <= optimal_max ({})",
                self.range.optimal_min, self.range.optimal_max
            )));
        }

        let ratio = self.scoring.max_health_risk_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SkirmishError::InvalidConfig(format!(
                "max_health_risk_ratio ({}) should be in (0, 1]",
                ratio
            )));
        }

        let weights = [
            ("shot_bonus", self.scoring.shot_bonus),
            ("cover_bonus_per_cell", self.scoring.cover_bonus_per_cell),
            ("health_danger_penalty", self.scoring.health_danger_penalty),
            ("health_penalty_factor", self.scoring.health_penalty_factor),
            ("random_jitter", self.scoring.random_jitter),
            ("optimal_bonus", self.range.optimal_bonus),
            ("too_close_penalty", self.range.too_close_penalty),
            ("distant_base_bonus", self.range.distant_base_bonus),
            ("distant_decay", self.range.distant_decay),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(SkirmishError::InvalidConfig(format!(
                    "{} ({}) must be finite and non-negative",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiPersonality> {
    let path = personality_path(name);
    let contents = fs::read_to_string(&path)?;

    let mut personality = AiPersonality::from_toml_str(&contents)?;
    personality.name = name.to_string();
    Ok(personality)
}

/// Get path to personality file
fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_personalities").join(format!("{}.toml", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_personality() {
        let personality = load_personality("default").expect("Should load default personality");
        assert_eq!(personality.name, "default");
        assert_eq!(personality.range.optimal_min, 2);
        assert!(personality.validate().is_ok());
    }

    #[test]
    fn test_load_aggressive_personality() {
        let aggressive = load_personality("aggressive").expect("Should load aggressive personality");
        let baseline = AiPersonality::default();
        assert!(aggressive.scoring.shot_bonus > baseline.scoring.shot_bonus);
        assert!(aggressive.range.optimal_max <= baseline.range.optimal_max);
    }

    #[test]
    fn test_load_cautious_personality() {
        let cautious = load_personality("cautious").expect("Should load cautious personality");
        let baseline = AiPersonality::default();
        assert!(cautious.scoring.cover_bonus_per_cell > baseline.scoring.cover_bonus_per_cell);
    }

    #[test]
    fn test_missing_personality_is_io_error() {
        let result = load_personality("does_not_exist");
        assert!(matches!(result, Err(SkirmishError::Io(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let personality = AiPersonality::from_toml_str(
            r#"
            [scoring]
            shot_bonus = 250.0
            "#,
        )
        .expect("parse");
        assert_eq!(personality.scoring.shot_bonus, 250.0);
        assert_eq!(
            personality.scoring.cover_bonus_per_cell,
            ScoringWeights::default().cover_bonus_per_cell
        );
        assert_eq!(personality.economy, EconomyConfig::default());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let result = AiPersonality::from_toml_str(
            r#"
            [range]
            optimal_min = 5
            optimal_max = 2
            "#,
        );
        assert!(matches!(result, Err(SkirmishError::InvalidConfig(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut personality = AiPersonality::default();
        personality.scoring.cover_bonus_per_cell = -1.0;
        assert!(personality.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let result = AiPersonality::from_toml_str("[scoring\nshot_bonus = ");
        assert!(matches!(result, Err(SkirmishError::Toml(_))));
    }

    #[test]
    fn test_deterministic_has_no_jitter() {
        assert_eq!(AiPersonality::deterministic().scoring.random_jitter, 0.0);
    }
}
