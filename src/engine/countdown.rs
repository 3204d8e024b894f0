//! Countdown state machine

use std::{fmt, time::Duration};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{EngineError, InputBuffer, RunState, Snapshot};
use crate::scheduler::{Clock, PeriodicScheduler, Subscription};

/// Default period between engine ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Keypad-driven countdown timer.
///
/// Owns the input buffer, the run-state and the timing reference. A running
/// countdown holds exactly one scheduler subscription; every exit from
/// `Started` cancels it before returning, and ticks from any other
/// subscription are ignored.
pub struct CountdownEngine<C, S>
where
    S: PeriodicScheduler,
{
    buffer: InputBuffer,
    state: RunState,
    start_time_ms: u64,
    total_duration_ms: u64,
    elapsed_ms: u64,
    angle: f64,
    snapshot: Snapshot,
    clock: C,
    scheduler: S,
    tick_interval: Duration,
    active: Option<(Subscription, S::Handle)>,
    last_subscription: Subscription,
    /// Channel for pushing snapshots to observers
    snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<Snapshot>,
}

impl<C, S> CountdownEngine<C, S>
where
    C: Clock,
    S: PeriodicScheduler,
{
    /// Create a stopped engine with an all-zero buffer
    pub fn new(clock: C, scheduler: S, tick_interval: Duration) -> Self {
        let snapshot = Snapshot::default();
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot);

        Self {
            buffer: InputBuffer::new(),
            state: RunState::Stopped,
            start_time_ms: 0,
            total_duration_ms: 0,
            elapsed_ms: 0,
            angle: 0.0,
            snapshot,
            clock,
            scheduler,
            tick_interval,
            active: None,
            last_subscription: Subscription::new(0),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Append a keypad digit, stopping any run in progress
    pub fn input(&mut self, digit: i32) -> Result<Snapshot, EngineError> {
        let cell = u8::try_from(digit)
            .ok()
            .filter(|d| *d <= 9)
            .ok_or(EngineError::InvalidArgument { digit })?;

        self.buffer.push(cell);
        debug!("Keypad input {} -> {}", cell, self.buffer);
        Ok(self.edited())
    }

    /// Drop the last digit, stopping any run in progress
    pub fn backspace(&mut self) -> Snapshot {
        self.buffer.pop();
        debug!("Backspace -> {}", self.buffer);
        self.edited()
    }

    /// Clear the buffer and stop
    pub fn reset(&mut self) -> Snapshot {
        info!("Resetting countdown");
        self.buffer.clear();
        self.angle = 0.0;
        self.stop();
        self.publish_buffer()
    }

    /// Start, pause, resume or acknowledge a finished countdown
    pub fn toggle(&mut self) -> Snapshot {
        match self.state {
            RunState::Stopped => {
                if self.buffer.is_zero() {
                    debug!("Ignoring start with an empty buffer");
                    return self.snapshot;
                }
                self.start()
            }
            RunState::Started => self.pause(),
            RunState::Paused => {
                if self.remaining_ms() == 0 {
                    debug!("Ignoring resume with no time remaining");
                    return self.snapshot;
                }
                self.resume()
            }
            RunState::Finished => {
                self.stop();
                self.publish_buffer()
            }
        }
    }

    /// Handle one scheduler tick. Stale subscriptions are ignored.
    pub fn tick(&mut self, subscription: Subscription) -> Snapshot {
        if self.state != RunState::Started || !self.is_active(subscription) {
            debug!("Ignoring stale tick {}", subscription);
            return self.snapshot;
        }

        self.elapsed_ms = self.clock.now_ms().saturating_sub(self.start_time_ms);
        let remaining_ms = self.remaining_ms();

        if remaining_ms > 0 {
            self.publish_remaining(remaining_ms)
        } else {
            self.cancel_subscription();
            self.state = RunState::Finished;
            info!("Countdown finished after {}ms", self.elapsed_ms);
            self.publish_remaining(0)
        }
    }

    /// Latest published values
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    /// Receiver that observes every republished snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Whether keypad edits are enabled
    pub fn is_editable(&self) -> bool {
        self.state.is_editable()
    }

    pub fn is_started(&self) -> bool {
        self.state == RunState::Started
    }

    pub fn buffer(&self) -> InputBuffer {
        self.buffer
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Subscription currently delivering ticks, if running
    pub fn active_subscription(&self) -> Option<Subscription> {
        self.active.as_ref().map(|(sub, _)| *sub)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn start(&mut self) -> Snapshot {
        self.total_duration_ms = self.buffer.total_ms();
        self.start_time_ms = self.clock.now_ms();
        self.elapsed_ms = 0;
        self.state = RunState::Started;
        info!("Starting countdown for {}ms", self.total_duration_ms);

        self.subscribe_ticks();
        self.publish_remaining(self.total_duration_ms)
    }

    fn pause(&mut self) -> Snapshot {
        self.cancel_subscription();
        self.elapsed_ms = self.clock.now_ms().saturating_sub(self.start_time_ms);
        self.state = RunState::Paused;

        let remaining_ms = self.remaining_ms();
        info!("Pausing countdown with {}ms remaining", remaining_ms);
        self.publish_remaining(remaining_ms)
    }

    fn resume(&mut self) -> Snapshot {
        self.start_time_ms = self.clock.now_ms().saturating_sub(self.elapsed_ms);
        self.state = RunState::Started;
        let remaining_ms = self.remaining_ms();
        info!("Resuming countdown with {}ms remaining", remaining_ms);

        self.subscribe_ticks();
        self.publish_remaining(remaining_ms)
    }

    /// Leave any run behind and snapshot the buffer as the next total
    fn stop(&mut self) {
        self.cancel_subscription();
        self.total_duration_ms = self.buffer.total_ms();
        self.elapsed_ms = 0;
        self.state = RunState::Stopped;
    }

    fn edited(&mut self) -> Snapshot {
        if self.state == RunState::Started {
            info!("Keypad edit stopped the running countdown");
        }
        self.angle = 0.0;
        self.stop();
        self.publish_buffer()
    }

    fn subscribe_ticks(&mut self) {
        if let Some((stale, handle)) = self.active.take() {
            warn!("Replacing tick subscription {} that was never cancelled", stale);
            self.scheduler.cancel(handle);
        }

        let subscription = self.last_subscription.next();
        self.last_subscription = subscription;
        let handle = self.scheduler.subscribe(self.tick_interval, subscription);
        self.active = Some((subscription, handle));
    }

    fn cancel_subscription(&mut self) {
        if let Some((subscription, handle)) = self.active.take() {
            debug!("Cancelling tick subscription {}", subscription);
            self.scheduler.cancel(handle);
        }
    }

    fn remaining_ms(&self) -> u64 {
        self.total_duration_ms.saturating_sub(self.elapsed_ms)
    }

    fn is_active(&self, subscription: Subscription) -> bool {
        self.active_subscription() == Some(subscription)
    }

    fn publish_remaining(&mut self, remaining_ms: u64) -> Snapshot {
        self.buffer = InputBuffer::from_remaining(remaining_ms);
        let snapshot = Snapshot::for_remaining(remaining_ms, self.total_duration_ms, self.state);
        self.angle = snapshot.angle;
        self.publish(snapshot)
    }

    fn publish_buffer(&mut self) -> Snapshot {
        let snapshot = Snapshot::new(&self.buffer, self.angle, self.state);
        self.publish(snapshot)
    }

    fn publish(&mut self, snapshot: Snapshot) -> Snapshot {
        self.snapshot = snapshot;
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to publish countdown snapshot: {}", e);
        }
        snapshot
    }
}

impl<C, S> fmt::Debug for CountdownEngine<C, S>
where
    S: PeriodicScheduler,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("buffer", &self.buffer)
            .field("state", &self.state)
            .field("start_time_ms", &self.start_time_ms)
            .field("total_duration_ms", &self.total_duration_ms)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("active", &self.active.as_ref().map(|(sub, _)| *sub))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{ManualClock, ManualScheduler};

    type TestEngine = CountdownEngine<ManualClock, ManualScheduler>;

    fn engine() -> (TestEngine, ManualClock) {
        let clock = ManualClock::new(1_000);
        let engine = CountdownEngine::new(clock.clone(), ManualScheduler::new(), DEFAULT_TICK_INTERVAL);
        (engine, clock)
    }

    fn type_digits(engine: &mut TestEngine, digits: &str) {
        for c in digits.chars() {
            let digit = c.to_digit(10).unwrap() as i32;
            engine.input(digit).unwrap();
        }
    }

    /// Advance the clock by `ms` in tick-sized steps, ticking the active subscription
    fn run_for(engine: &mut TestEngine, clock: &ManualClock, ms: u64) -> Vec<Snapshot> {
        let mut published = Vec::new();
        let mut left = ms;
        while left > 0 {
            let step = left.min(10);
            clock.advance(step);
            left -= step;
            if let Some(sub) = engine.active_subscription() {
                published.push(engine.tick(sub));
            }
        }
        published
    }

    #[test]
    fn test_input_rejects_out_of_range_digits() {
        let (mut engine, _) = engine();
        assert_eq!(engine.input(10), Err(EngineError::InvalidArgument { digit: 10 }));
        assert_eq!(engine.input(-1), Err(EngineError::InvalidArgument { digit: -1 }));
        assert!(engine.buffer().is_zero());
    }

    #[test]
    fn test_input_and_backspace_shift() {
        let (mut engine, _) = engine();
        type_digits(&mut engine, "123456");
        assert_eq!(engine.buffer().digits(), [1, 2, 3, 4, 5, 6]);

        let snapshot = engine.input(7).unwrap();
        assert_eq!(engine.buffer().digits(), [2, 3, 4, 5, 6, 7]);
        assert_eq!((snapshot.hours, snapshot.minutes, snapshot.seconds), (23, 45, 67));

        let snapshot = engine.backspace();
        assert_eq!(engine.buffer().digits(), [0, 2, 3, 4, 5, 6]);
        assert_eq!(snapshot.to_string(), "02:34:56");
    }

    #[test]
    fn test_backspace_on_empty_buffer_is_noop() {
        let (mut engine, _) = engine();
        let snapshot = engine.backspace();
        assert!(engine.buffer().is_zero());
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "30");
        engine.toggle();
        run_for(&mut engine, &clock, 1_000);

        engine.reset();
        let snapshot = engine.reset();
        assert!(engine.buffer().is_zero());
        assert_eq!(engine.run_state(), RunState::Stopped);
        assert_eq!(snapshot.angle, 0.0);
        assert_eq!(snapshot.to_string(), "00:00:00");
        assert_eq!(engine.active_subscription(), None);
        assert!(engine.scheduler().live().is_empty());
    }

    #[test]
    fn test_no_start_from_zero() {
        let (mut engine, _) = engine();
        let snapshot = engine.toggle();
        assert_eq!(snapshot.state, RunState::Stopped);
        assert_eq!(engine.scheduler().subscribe_count(), 0);
    }

    #[test]
    fn test_full_cycle() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "000005");

        assert!(!engine.is_started());
        let snapshot = engine.toggle();
        assert_eq!(snapshot.state, RunState::Started);
        assert!(engine.is_started());
        assert_eq!(snapshot.angle, 360.0);
        assert!(!snapshot.editable);
        assert_eq!(engine.total_duration_ms(), 5_000);
        assert_eq!(engine.scheduler().last_interval(), Some(DEFAULT_TICK_INTERVAL));

        let published = run_for(&mut engine, &clock, 5_000);
        let last = published.last().unwrap();
        assert_eq!(last.state, RunState::Finished);
        assert_eq!(last.to_string(), "00:00:00");
        assert_eq!(last.angle, 0.0);
        assert_eq!(engine.run_state(), RunState::Finished);
        assert!(!engine.is_started());
        assert!(engine.is_editable());
        assert_eq!(engine.scheduler().subscribe_count(), 1);
        assert_eq!(engine.scheduler().cancel_count(), 1);
    }

    #[test]
    fn test_partial_second_displays_rounded_up() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "2");
        engine.toggle();

        clock.advance(1_500);
        let sub = engine.active_subscription().unwrap();
        let snapshot = engine.tick(sub);
        assert_eq!(snapshot.seconds, 1);
        assert_eq!(snapshot.angle, 90.0);
    }

    #[test]
    fn test_pause_resume_preserves_remaining() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "10");
        engine.toggle();

        run_for(&mut engine, &clock, 4_000);
        let paused = engine.toggle();
        assert_eq!(paused.state, RunState::Paused);
        assert_eq!(paused.seconds, 6);
        assert!(!engine.is_started());
        assert_eq!(engine.buffer().digits(), [0, 0, 0, 0, 0, 6]);
        assert_eq!(engine.active_subscription(), None);

        // Time spent paused does not count
        clock.advance(60_000);
        let resumed = engine.toggle();
        assert_eq!(resumed.state, RunState::Started);
        assert!(engine.is_started());
        assert_eq!(resumed.seconds, 6);
        assert_eq!(resumed.angle, paused.angle);

        let published = run_for(&mut engine, &clock, 5_990);
        assert!(published.iter().all(|s| s.state == RunState::Started));

        let published = run_for(&mut engine, &clock, 10);
        assert_eq!(published.last().unwrap().state, RunState::Finished);
        assert_eq!(engine.scheduler().subscribe_count(), 2);
        assert_eq!(engine.scheduler().cancel_count(), 2);
    }

    #[test]
    fn test_resume_keeps_hours_past_99() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "999999");

        let started = engine.toggle();
        assert_eq!(started.to_string(), "100:40:39");
        let paused = engine.toggle();
        assert_eq!(paused.hours, 100);

        clock.advance(5_000);
        let resumed = engine.toggle();
        assert_eq!(resumed.state, RunState::Started);
        assert_eq!(resumed.hours, paused.hours);
        assert_eq!(resumed.to_string(), paused.to_string());
    }

    #[test]
    fn test_resume_with_exactly_100_hours_left() {
        let (mut engine, _) = engine();
        type_digits(&mut engine, "996000");

        assert_eq!(engine.toggle().to_string(), "100:00:00");
        assert_eq!(engine.toggle().state, RunState::Paused);
        // Hours tens digit wraps, so the buffer itself reads zero
        assert!(engine.buffer().is_zero());

        let resumed = engine.toggle();
        assert_eq!(resumed.state, RunState::Started);
        assert_eq!(resumed.hours, 100);
        assert!(engine.active_subscription().is_some());
    }

    #[test]
    fn test_angle_is_non_increasing() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "3");
        engine.toggle();

        let published = run_for(&mut engine, &clock, 3_000);
        assert!(published.windows(2).all(|w| w[1].angle <= w[0].angle));
        assert_eq!(published.last().unwrap().angle, 0.0);
    }

    #[test]
    fn test_editing_cancels_run() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "5");
        engine.toggle();
        let stale = engine.active_subscription().unwrap();
        run_for(&mut engine, &clock, 1_000);

        let snapshot = engine.input(0).unwrap();
        assert_eq!(snapshot.state, RunState::Stopped);
        assert!(engine.scheduler().live().is_empty());
        assert_eq!(engine.scheduler().cancel_count(), 1);

        // A tick already in flight changes nothing
        clock.advance(10_000);
        assert_eq!(engine.tick(stale), snapshot);
        assert_eq!(engine.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_backspace_cancels_run() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "20");
        engine.toggle();
        let stale = engine.active_subscription().unwrap();
        run_for(&mut engine, &clock, 2_000);

        let snapshot = engine.backspace();
        assert_eq!(snapshot.state, RunState::Stopped);
        assert_eq!(snapshot.seconds, 1);
        assert_eq!(engine.total_duration_ms(), 1_000);

        clock.advance(30_000);
        assert_eq!(engine.tick(stale), snapshot);
        assert!(engine.scheduler().live().is_empty());
    }

    #[test]
    fn test_stale_tick_after_pause_is_ignored() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "5");
        engine.toggle();
        let first = engine.active_subscription().unwrap();

        clock.advance(1_000);
        let paused = engine.toggle();
        engine.toggle();
        assert_ne!(engine.active_subscription(), Some(first));

        clock.advance(10_000);
        let snapshot = engine.tick(first);
        assert_eq!(snapshot.state, RunState::Started);
        assert_eq!(snapshot.seconds, paused.seconds);
    }

    #[test]
    fn test_finished_toggle_stops() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "1");
        engine.toggle();
        run_for(&mut engine, &clock, 1_000);
        assert_eq!(engine.run_state(), RunState::Finished);

        let snapshot = engine.toggle();
        assert_eq!(snapshot.state, RunState::Stopped);
        assert_eq!(engine.total_duration_ms(), 0);
        assert_eq!(engine.scheduler().subscribe_count(), 1);

        // Still zero, so another toggle does not start
        assert_eq!(engine.toggle().state, RunState::Stopped);
    }

    #[test]
    fn test_at_most_one_subscription() {
        let (mut engine, clock) = engine();
        type_digits(&mut engine, "9");
        for _ in 0..5 {
            engine.toggle();
            assert!(engine.scheduler().live().len() <= 1);
            clock.advance(100);
        }
        assert_eq!(engine.scheduler().live().len(), 1);
        assert_eq!(
            engine.scheduler().subscribe_count() - engine.scheduler().cancel_count(),
            1
        );
    }

    #[test]
    fn test_observers_receive_updates() {
        let (mut engine, _) = engine();
        let mut rx = engine.subscribe();
        type_digits(&mut engine, "42");

        assert!(rx.has_changed().unwrap());
        let seen = *rx.borrow_and_update();
        assert_eq!(seen.seconds, 42);
        assert_eq!(seen, engine.snapshot());
    }

    #[test]
    fn test_buffer_invariant_under_edits() {
        let (mut engine, _) = engine();
        for i in 0..40 {
            if i % 3 == 0 {
                engine.backspace();
            } else {
                engine.input(i % 10).unwrap();
            }
            assert!(engine.buffer().digits().iter().all(|d| *d <= 9));
        }
        engine.reset();
        assert!(engine.buffer().is_zero());
    }
}
