pub mod config;
pub mod error;
pub mod types;

pub use config::PacingConfig;
pub use error::{Result, SkirmishError};
pub use types::{GridPos, Round, TeamColor, UnitId, WorldPoint};
