//! Periodic task scheduling
//!
//! A [`Schedule`] re-invokes a [`PeriodicTask`] until its cancellation token
//! fires. The next invocation is measured from the end of the previous one,
//! so a slow tick never causes a burst of catch-up ticks.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// When the first invocation of a schedule happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstTick {
    /// Run at once, then wait one interval between invocations
    #[default]
    Immediate,
    /// Wait one full interval before the first invocation
    AfterInterval,
}

/// A unit of work run on every tick of a [`Schedule`]
pub trait PeriodicTask: Send {
    type Error: Display;

    /// Performs one invocation
    ///
    /// The returned future is dropped mid-flight when the schedule is
    /// cancelled.
    fn run_once(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Named fixed-interval schedule
#[derive(Debug, Clone)]
pub struct Schedule {
    name: String,
    interval: Duration,
    first_tick: FirstTick,
}

impl Schedule {
    /// Creates a schedule with an immediate first tick
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            first_tick: FirstTick::default(),
        }
    }

    pub fn with_first_tick(mut self, first_tick: FirstTick) -> Self {
        self.first_tick = first_tick;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick source for callers that drive their own loop
    pub fn ticks(&self) -> Ticks {
        Ticks {
            interval: self.interval,
            pending_first: self.first_tick == FirstTick::Immediate,
        }
    }

    /// Runs `task` on every tick until `token` is cancelled
    ///
    /// Task errors are logged and do not stop the schedule. Cancellation is
    /// observed both between ticks and while the task is in flight.
    pub async fn run<T: PeriodicTask>(&self, token: &CancellationToken, task: &mut T) {
        info!(
            "Starting {} schedule (interval: {:?})",
            self.name, self.interval
        );

        let mut ticks = self.ticks();
        while ticks.next(token).await {
            debug!("{} tick", self.name);

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                result = task.run_once() => {
                    if let Err(e) = result {
                        error!(schedule = %self.name, "Error during {} tick: {}", self.name, e);
                    }
                }
            }
        }

        info!("{} schedule stopped", self.name);
    }
}

/// Sequence of ticks of a [`Schedule`]
#[derive(Debug)]
pub struct Ticks {
    interval: Duration,
    pending_first: bool,
}

impl Ticks {
    /// Waits for the next tick
    ///
    /// Returns `false` once `token` is cancelled, whether it already was or
    /// fires during the wait.
    pub async fn next(&mut self, token: &CancellationToken) -> bool {
        if token.is_cancelled() {
            return false;
        }

        if self.pending_first {
            self.pending_first = false;
            return true;
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => false,
            _ = tokio::time::sleep(self.interval) => true,
        }
    }
}
