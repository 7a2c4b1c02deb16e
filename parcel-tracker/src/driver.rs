//! Polling driver
//!
//! Keeps the view of the active tracking number fresh by re-evaluating it on
//! a fixed interval. The driver is a two-state machine:
//!
//! - **Idle**: nothing tracked, no timer.
//! - **Tracking**: one tracking number and exactly one timer.
//!
//! Starting a new session replaces the previous one, timer included, so at
//! most one periodic evaluation is ever pending. Updates are published on a
//! `watch` channel (renderers only care about the latest) and status changes
//! on an unbounded `mpsc` channel, which never blocks the driver.
//!
//! All timer operations need a Tokio runtime with the `time` driver enabled.

use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::notifier::StatusNotification;
use crate::store::KeyValueStore;
use crate::tracker::{Tracker, TrackingUpdate};
use crate::types::Result;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Commands accepted by [`PollingDriver::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    /// Switch tracking to this number
    Track(String),
    /// Return to idle
    Stop,
    /// Leave the run loop
    Shutdown,
}

/// Current driver session
#[derive(Debug)]
pub enum DriverState {
    Idle,
    Tracking {
        tracking_number: String,
        timer: Interval,
    },
}

/// Receiving ends of the driver's output channels
#[derive(Debug)]
pub struct DriverOutputs {
    /// Latest update, `None` until the first evaluation
    pub updates: watch::Receiver<Option<TrackingUpdate>>,
    /// Status-change notifications, in order
    pub notifications: mpsc::UnboundedReceiver<StatusNotification>,
}

/// Periodically re-evaluates the active tracking number
pub struct PollingDriver<S: KeyValueStore> {
    tracker: Tracker<S>,
    clock: Box<dyn Clock>,
    period: Duration,
    state: DriverState,
    updates: watch::Sender<Option<TrackingUpdate>>,
    notifications: mpsc::UnboundedSender<StatusNotification>,
}

impl<S: KeyValueStore> PollingDriver<S> {
    /// Create an idle driver and the channels it publishes on
    pub fn new(
        tracker: Tracker<S>,
        clock: impl Clock + 'static,
        config: &TrackerConfig,
    ) -> (Self, DriverOutputs) {
        let (updates_tx, updates_rx) = watch::channel(None);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let driver = Self {
            tracker,
            clock: Box::new(clock),
            period: config.poll_interval(),
            state: DriverState::Idle,
            updates: updates_tx,
            notifications: notify_tx,
        };
        let outputs = DriverOutputs {
            updates: updates_rx,
            notifications: notify_rx,
        };
        (driver, outputs)
    }

    /// Start tracking `tracking_number`.
    ///
    /// Evaluates and publishes immediately, then arms a new timer whose first
    /// tick is one full period away. Any previous timer is dropped. An unknown
    /// tracking number fails with `TrackingNotFound` and leaves the current
    /// session untouched.
    pub fn start_tracking(&mut self, tracking_number: &str) -> Result<TrackingUpdate> {
        let now = self.clock.now_millis();
        let update = self.tracker.evaluate(tracking_number, now)?;

        let mut timer = time::interval_at(Instant::now() + self.period, self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if let DriverState::Tracking {
            tracking_number: previous,
            ..
        } = &self.state
        {
            log::debug!("Cancelling timer for {}", previous);
        }
        self.state = DriverState::Tracking {
            tracking_number: tracking_number.to_string(),
            timer,
        };
        log::info!(
            "Tracking {} (polling every {}s)",
            tracking_number,
            self.period.as_secs()
        );

        self.publish(&update);
        Ok(update)
    }

    /// Drop the active session, if any, and go idle
    pub fn stop_tracking(&mut self) {
        if let DriverState::Tracking {
            tracking_number, ..
        } = std::mem::replace(&mut self.state, DriverState::Idle)
        {
            log::info!("Stopped tracking {}", tracking_number);
        }
    }

    /// Wait for the next timer tick, then re-evaluate and publish.
    ///
    /// Never completes while idle, so it can sit in a `select!` next to a
    /// command channel. Cancel-safe.
    pub async fn tick(&mut self) -> Result<TrackingUpdate> {
        let tracking_number = match &mut self.state {
            DriverState::Idle => std::future::pending::<String>().await,
            DriverState::Tracking {
                tracking_number,
                timer,
            } => {
                timer.tick().await;
                tracking_number.clone()
            }
        };

        let now = self.clock.now_millis();
        let update = self.tracker.evaluate(&tracking_number, now)?;
        self.publish(&update);
        Ok(update)
    }

    /// Process commands and timer ticks until shutdown or until the command
    /// channel closes. Returns the driver so its state can be inspected.
    pub async fn run(mut self, mut commands: mpsc::Receiver<DriverCommand>) -> Self {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(DriverCommand::Track(tracking_number)) => {
                        if let Err(e) = self.start_tracking(&tracking_number) {
                            log::warn!("Cannot track {}: {}", tracking_number, e);
                        }
                    }
                    Some(DriverCommand::Stop) => self.stop_tracking(),
                    Some(DriverCommand::Shutdown) | None => {
                        log::info!("Polling driver shutting down");
                        break;
                    }
                },

                result = self.tick() => {
                    if let Err(e) = result {
                        log::warn!("Evaluation failed: {}", e);
                    }
                }
            }
        }
        self.stop_tracking();
        self
    }

    fn publish(&self, update: &TrackingUpdate) {
        self.updates.send_replace(Some(update.clone()));

        if let Some(notification) = update
            .transition
            .as_ref()
            .and_then(|t| t.notification.clone())
        {
            // Nobody listening is fine; delivery is best effort.
            if self.notifications.send(notification).is_err() {
                log::trace!("No notification receiver");
            }
        }
    }

    /// Tracking number of the active session
    pub fn active_tracking_number(&self) -> Option<&str> {
        match &self.state {
            DriverState::Idle => None,
            DriverState::Tracking {
                tracking_number, ..
            } => Some(tracking_number),
        }
    }

    /// Number of armed timers: 0 when idle, 1 when tracking
    pub fn active_timers(&self) -> usize {
        match self.state {
            DriverState::Idle => 0,
            DriverState::Tracking { .. } => 1,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DriverState::Idle)
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tracker(&self) -> &Tracker<S> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker<S> {
        &mut self.tracker
    }
}
