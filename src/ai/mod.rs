//! Autonomous unit decision engine
//!
//! Architecture: Trait + Data hybrid
//! - TacticalScorer trait ranks candidate cells; WeightedScorer is the default
//! - AiPersonality holds the TOML-loaded weights every component reads
//! - AiController composes search, movement, and firing into one turn,
//!   exposed step by step through TurnRunner

pub mod controller;
pub mod movement;
pub mod observer;
pub mod personality;
pub mod positioning;
pub mod scoring;
pub mod turn;
pub mod turn_state;

pub use controller::AiController;
pub use movement::{MovementExecutor, MovementReport, MovementRun, StepOutcome};
pub use observer::{FnObserver, NoopObserver, TurnObserver};
pub use personality::{load_personality, AiPersonality, EconomyConfig, RangeConfig, ScoringWeights};
pub use positioning::{TacticalMove, TacticalPositionFinder};
pub use scoring::{ScoringContext, TacticalScorer, WeightedScorer};
pub use turn::{TurnRunner, TurnStep};
pub use turn_state::{TurnState, TurnStateMachine};
