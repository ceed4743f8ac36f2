//! Headless match collaborators: obstacle refresh and the duel loop

pub mod duel;
pub mod scenario;

pub use duel::{Duel, DuelConfig, DuelOutcome, Side, MIN_PROJECTILE_SPEED};
pub use scenario::ScenarioManager;
