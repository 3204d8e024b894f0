//! Tokio interval backed scheduler

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use super::{PeriodicScheduler, Subscription};

/// Scheduler that spawns one interval task per subscription.
///
/// Each tick sends the subscription id down `tick_tx`; the receiving side
/// hands it back to the engine. Must be used inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tick_tx: mpsc::UnboundedSender<Subscription>,
}

impl TokioScheduler {
    pub fn new(tick_tx: mpsc::UnboundedSender<Subscription>) -> Self {
        Self { tick_tx }
    }
}

impl PeriodicScheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn subscribe(&mut self, period: Duration, subscription: Subscription) -> JoinHandle<()> {
        debug!("Subscribing {} every {:?}", subscription, period);
        let tick_tx = self.tick_tx.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tick_tx.send(subscription).is_err() {
                    // Receiver gone, nobody left to drive
                    break;
                }
            }
        })
    }

    fn cancel(&mut self, handle: JoinHandle<()>) {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let handle = scheduler.subscribe(Duration::from_millis(10), Subscription::new(3));
        tokio::time::sleep(Duration::from_millis(35)).await;

        let mut received = Vec::new();
        while let Ok(sub) = rx.try_recv() {
            received.push(sub);
        }
        assert_eq!(received, vec![Subscription::new(3); 3]);

        scheduler.cancel(handle);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
