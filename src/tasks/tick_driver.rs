//! Tick driver background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    engine::RunState,
    scheduler::Subscription,
    state::AppState,
};

/// Background task that feeds scheduler ticks into the countdown engine
pub async fn tick_driver_task(
    state: Arc<AppState>,
    mut tick_rx: mpsc::UnboundedReceiver<Subscription>,
) {
    info!("Starting tick driver task");

    while let Some(subscription) = tick_rx.recv().await {
        match state.tick(subscription) {
            Ok((before, snapshot)) => {
                if before == RunState::Started && snapshot.state == RunState::Finished {
                    info!("Countdown finished");
                }
            }
            Err(e) => error!("Failed to deliver tick {}: {}", subscription, e),
        }
    }

    info!("Tick channel closed, stopping tick driver");
}
