use thiserror::Error;

use crate::core::types::GridPos;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Unit out of bounds at {0}")]
    UnitOutOfBounds(GridPos),

    #[error("Unit standing on obstacle at {0}")]
    UnitOnObstacle(GridPos),

    #[error("Path step from {from} to {to} is not a single orthogonal move")]
    BrokenPath { from: GridPos, to: GridPos },

    #[error("Path step blocked at {0}")]
    BlockedStep(GridPos),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
