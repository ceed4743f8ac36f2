//! Grid Skirmish - turn-based tactical duels with an autonomous opponent

pub mod ai;
pub mod arena;
pub mod combat;
pub mod core;
pub mod simulation;
