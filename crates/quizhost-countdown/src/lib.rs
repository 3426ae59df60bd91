//! Per-question countdown for quizhost.
//!
//! One value (seconds remaining) or nothing, decremented once per tick.
//! The countdown never ends anything by itself: reaching 0 parks it at 0
//! until the controller stops it because the service said so.
//!
//! # Integration
//!
//! The countdown has no task of its own. It holds the instant of its one
//! pending tick and the controller sleeps on it inside its `select!` loop:
//!
//! ```ignore
//! let deadline = countdown.deadline();
//! tokio::select! {
//!     Some(cmd) = cmd_rx.recv() => { /* operator actions */ }
//!     frame = conn.recv() => { /* inbound messages */ }
//!     () = sleep_until_deadline(deadline) => {
//!         countdown.fire();
//!     }
//! }
//! ```
//!
//! Because there is only ever one stored deadline, two ticks can never be
//! outstanding. Replacing or clearing it is what cancels the old one.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Countdown settings.
#[derive(Debug, Clone)]
pub struct CountdownConfig {
    /// Time between ticks. One second in production.
    pub tick_interval: Duration,
    /// Starting value when the first question has no time limit.
    pub default_secs: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            default_secs: 15,
        }
    }
}

impl CountdownConfig {
    /// Replaces out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Countdown::new`]. A zero interval would
    /// spin, and a zero default would start parked at 0.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_interval.is_zero() {
            warn!("tick_interval is zero, using 1s");
            self.tick_interval = defaults.tick_interval;
        }
        if self.default_secs == 0 {
            warn!("default_secs is 0, using 15");
            self.default_secs = defaults.default_secs;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A single decrementing clock.
///
/// ```text
///            start(n)               fire()  (n > 0)
/// Idle ───────────────→ Running(n) ─────────────→ Running(n-1)
///   ↑                      │   ↑                       │
///   │       stop()         │   └───────────────────────┘
///   └──────────────────────┘
/// ```
///
/// At `Running(0)` no tick is scheduled: the value stays visible as 0 and
/// nothing else changes until [`stop`](Self::stop) or another
/// [`start`](Self::start).
#[derive(Debug)]
pub struct Countdown {
    config: CountdownConfig,
    remaining: Option<u32>,
    /// When the one pending tick fires. `None` when idle or parked at 0.
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config: config.validated(),
            remaining: None,
            next_tick: None,
        }
    }

    /// Starts (or restarts) from `secs`, or from the configured default
    /// when `secs` is `None` or 0.
    ///
    /// Any pending tick is replaced by a fresh one a full interval away.
    pub fn start(&mut self, secs: Option<u32>) {
        let secs = match secs {
            Some(s) if s > 0 => s,
            _ => self.config.default_secs,
        };
        self.remaining = Some(secs);
        self.next_tick = Some(Instant::now() + self.config.tick_interval);
        debug!(secs, "countdown started");
    }

    /// Goes idle and cancels the pending tick.
    pub fn stop(&mut self) {
        if self.remaining.take().is_some() {
            debug!("countdown stopped");
        }
        self.next_tick = None;
    }

    /// Handles one elapsed tick. Returns the new value.
    ///
    /// Reschedules itself only while the value is still above 0. A call
    /// while idle or parked at 0 changes nothing.
    pub fn fire(&mut self) -> Option<u32> {
        let Some(current) = self.remaining else {
            self.next_tick = None;
            return None;
        };
        let next = current.saturating_sub(1);
        self.remaining = Some(next);
        self.next_tick = if next > 0 {
            Some(Instant::now() + self.config.tick_interval)
        } else {
            None
        };
        trace!(remaining = next, "countdown tick");
        Some(next)
    }

    /// The instant of the pending tick, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// Sleeps until the pending tick is due. See [`sleep_until_deadline`].
    pub async fn wait_for_tick(&self) {
        sleep_until_deadline(self.next_tick).await;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(CountdownConfig::default())
    }
}

/// Sleeps until `deadline`, or forever when there is none.
///
/// Takes the deadline by value so a `select!` arm doesn't hold a borrow of
/// the countdown while other arms mutate it.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
