//! Scheduler that only records calls, for driving ticks by hand

use std::{collections::BTreeSet, time::Duration};

use super::{PeriodicScheduler, Subscription};

/// Records subscribe/cancel calls. Tests deliver ticks themselves.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    live: BTreeSet<Subscription>,
    subscribed: usize,
    cancelled: usize,
    last_interval: Option<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions that have not been cancelled yet
    pub fn live(&self) -> Vec<Subscription> {
        self.live.iter().copied().collect()
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribed
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled
    }

    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval
    }
}

impl PeriodicScheduler for ManualScheduler {
    type Handle = Subscription;

    fn subscribe(&mut self, interval: Duration, subscription: Subscription) -> Subscription {
        self.subscribed += 1;
        self.last_interval = Some(interval);
        self.live.insert(subscription);
        subscription
    }

    fn cancel(&mut self, handle: Subscription) {
        self.cancelled += 1;
        self.live.remove(&handle);
    }
}
