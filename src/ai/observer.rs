//! Hooks into the surrounding application
//!
//! The turn engine calls out through these at every visible change. It never
//! waits on them; pacing is the caller's business.

use crate::combat::unit::Unit;

/// Collaborator notified as a turn unfolds
pub trait TurnObserver {
    /// Something visible changed (state announced, cell moved, shot fired)
    fn notify(&mut self);

    /// A unit's health reached zero mid-movement
    fn on_health_depleted(&mut self, unit: &Unit);
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TurnObserver for NoopObserver {
    fn notify(&mut self) {}

    fn on_health_depleted(&mut self, _unit: &Unit) {}
}

/// Observer built from two closures
pub struct FnObserver<N, D>
where
    N: FnMut(),
    D: FnMut(&Unit),
{
    notify: N,
    depleted: D,
}

impl<N, D> FnObserver<N, D>
where
    N: FnMut(),
    D: FnMut(&Unit),
{
    pub fn new(notify: N, depleted: D) -> Self {
        Self { notify, depleted }
    }
}

impl<N, D> TurnObserver for FnObserver<N, D>
where
    N: FnMut(),
    D: FnMut(&Unit),
{
    fn notify(&mut self) {
        (self.notify)();
    }

    fn on_health_depleted(&mut self, unit: &Unit) {
        (self.depleted)(unit);
    }
}
