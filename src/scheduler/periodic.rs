//! Periodic scheduler interface

use std::{fmt, time::Duration};

/// Generation id of one tick subscription.
///
/// Ticks carrying an id other than the engine's active one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

impl Subscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Repeating tick source driving a running countdown
pub trait PeriodicScheduler {
    type Handle;

    /// Start delivering `subscription` every `interval` until cancelled
    fn subscribe(&mut self, interval: Duration, subscription: Subscription) -> Self::Handle;

    /// Stop the subscription behind `handle`
    fn cancel(&mut self, handle: Self::Handle);
}
