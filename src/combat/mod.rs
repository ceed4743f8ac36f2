//! Units, projectiles, and shot creation

pub mod projectile;
pub mod unit;

pub use projectile::{Heading, Projectile, ProjectileManager};
pub use unit::{Unit, UnitProperties, UnitType};
