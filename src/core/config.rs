//! Presentation pacing with documented defaults
//!
//! The turn engine never sleeps. Each step it produces carries a suggested
//! delay taken from this table, and the caller decides whether to wait, skip
//! ahead, or run headless with everything at zero.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Suggested pause after each kind of turn step (milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after announcing the Thinking state
    ///
    /// Long enough for the player to notice the opponent's turn started.
    pub thinking_ms: u64,

    /// Pause after announcing the Aiming state (advance or retreat)
    pub aiming_ms: u64,

    /// Pause after announcing the Shooting state
    pub shooting_ms: u64,

    /// Pause after the turn ends, before control returns to the player
    pub end_ms: u64,

    /// Pause after each single-cell move
    ///
    /// At 150ms a full five-cell advance takes under a second.
    pub step_ms: u64,

    /// Pause between consecutive shots
    ///
    /// Should exceed `step_ms` so bursts read as separate shots.
    pub shot_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            thinking_ms: 500,
            aiming_ms: 300,
            shooting_ms: 300,
            end_ms: 200,
            step_ms: 150,
            shot_ms: 400,
        }
    }
}

impl PacingConfig {
    /// Zero delays everywhere, for headless runs and tests
    pub fn instant() -> Self {
        Self {
            thinking_ms: 0,
            aiming_ms: 0,
            shooting_ms: 0,
            end_ms: 0,
            step_ms: 0,
            shot_ms: 0,
        }
    }

    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    pub fn shot(&self) -> Duration {
        Duration::from_millis(self.shot_ms)
    }
}
