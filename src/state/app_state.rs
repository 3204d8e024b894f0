//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::{
    engine::{CountdownEngine, RunState, Snapshot},
    scheduler::{Subscription, SystemClock, TokioScheduler},
};
use super::StateError;

/// Engine wired to the wall clock and tokio intervals
pub type LiveEngine = CountdownEngine<SystemClock, TokioScheduler>;

/// Main application state owning the countdown engine
#[derive(Debug)]
pub struct AppState {
    /// The single countdown engine, mutated by gestures and ticks
    pub engine: Mutex<LiveEngine>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState whose ticks are delivered on `tick_tx`
    pub fn new(
        port: u16,
        host: String,
        tick_interval: Duration,
        tick_tx: mpsc::UnboundedSender<Subscription>,
    ) -> Self {
        let engine = CountdownEngine::new(
            SystemClock::new(),
            TokioScheduler::new(tick_tx),
            tick_interval,
        );

        Self {
            engine: Mutex::new(engine),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn lock_engine(&self) -> Result<MutexGuard<'_, LiveEngine>, StateError> {
        self.engine.lock()
            .map_err(|e| StateError::Lock(format!("Failed to lock countdown engine: {}", e)))
    }

    /// Apply a user gesture to the engine and record it as the last action
    pub fn apply<F>(&self, action: &str, gesture: F) -> Result<Snapshot, StateError>
    where
        F: FnOnce(&mut LiveEngine) -> Result<Snapshot, StateError>,
    {
        let mut engine = self.lock_engine()?;
        let snapshot = gesture(&mut *engine)?;
        drop(engine); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        debug!("Action {} -> {} ({})", action, snapshot, snapshot.state);
        Ok(snapshot)
    }

    /// Press a keypad digit
    pub fn input(&self, digit: i32) -> Result<Snapshot, StateError> {
        self.apply("input", |engine| Ok(engine.input(digit)?))
    }

    /// Press backspace
    pub fn backspace(&self) -> Result<Snapshot, StateError> {
        self.apply("backspace", |engine| Ok(engine.backspace()))
    }

    /// Press reset
    pub fn reset(&self) -> Result<Snapshot, StateError> {
        self.apply("reset", |engine| Ok(engine.reset()))
    }

    /// Press the start/pause button
    pub fn toggle(&self) -> Result<Snapshot, StateError> {
        let snapshot = self.apply("toggle", |engine| Ok(engine.toggle()))?;
        info!("Countdown {} at {}", snapshot.state, snapshot);
        Ok(snapshot)
    }

    /// Deliver a scheduler tick to the engine.
    ///
    /// Returns the run-state seen just before the tick alongside the new
    /// snapshot, both read under the same lock.
    pub fn tick(&self, subscription: Subscription) -> Result<(RunState, Snapshot), StateError> {
        let mut engine = self.lock_engine()?;
        let before = engine.run_state();
        Ok((before, engine.tick(subscription)))
    }

    /// Get the latest published values
    pub fn snapshot(&self) -> Result<Snapshot, StateError> {
        Ok(self.lock_engine()?.snapshot())
    }

    /// Observe every snapshot the engine publishes
    pub fn subscribe(&self) -> Result<watch::Receiver<Snapshot>, StateError> {
        Ok(self.lock_engine()?.subscribe())
    }

    pub fn run_state(&self) -> Result<RunState, StateError> {
        Ok(self.lock_engine()?.run_state())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;
        
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
