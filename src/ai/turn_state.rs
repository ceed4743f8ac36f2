//! Four-phase turn sequencing
//!
//! Thinking, Aiming, Shooting, End. The machine only moves forward; it exists
//! to interleave presentation with the fixed phase order.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::observer::TurnObserver;
use crate::core::config::PacingConfig;

/// Displayed phase of an AI turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    Thinking,
    Aiming,
    Shooting,
    End,
}

impl TurnState {
    /// Following state, or `None` after `End`
    pub fn next(self) -> Option<Self> {
        match self {
            TurnState::Thinking => Some(TurnState::Aiming),
            TurnState::Aiming => Some(TurnState::Shooting),
            TurnState::Shooting => Some(TurnState::End),
            TurnState::End => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TurnState::Thinking => "thinking",
            TurnState::Aiming => "aiming",
            TurnState::Shooting => "shooting",
            TurnState::End => "end",
        }
    }

    /// How long a presenter should linger on this state
    pub fn suggested_delay(&self, pacing: &PacingConfig) -> Duration {
        let millis = match self {
            TurnState::Thinking => pacing.thinking_ms,
            TurnState::Aiming => pacing.aiming_ms,
            TurnState::Shooting => pacing.shooting_ms,
            TurnState::End => pacing.end_ms,
        };
        Duration::from_millis(millis)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Forward-only sequencer over `TurnState`
#[derive(Debug, Clone, Default)]
pub struct TurnStateMachine {
    current: Option<TurnState>,
}

impl TurnStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first transition
    pub fn current(&self) -> Option<TurnState> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current == Some(TurnState::End)
    }

    /// Step to the next state, notify, and report it
    ///
    /// Stays at `End` once reached.
    pub fn advance(&mut self, observer: &mut dyn TurnObserver) -> TurnState {
        let state = match self.current {
            None => TurnState::Thinking,
            Some(state) => state.next().unwrap_or(TurnState::End),
        };
        self.current = Some(state);
        observer.notify();
        state
    }

    /// Jump straight to `End` from wherever the turn is
    pub fn finish(&mut self, observer: &mut dyn TurnObserver) -> TurnState {
        self.current = Some(TurnState::End);
        observer.notify();
        TurnState::End
    }

    /// Announce `Aiming` for the retreat phase
    ///
    /// Display only: the machine does not move backwards, and the next
    /// `advance` still goes to `End`.
    pub fn announce_retreat(&self, observer: &mut dyn TurnObserver) -> TurnState {
        observer.notify();
        TurnState::Aiming
    }
}
