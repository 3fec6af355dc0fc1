//! Answer countdown and tick clock for Quizforge.
//!
//! Two pieces, split so that game rules stay synchronous and testable:
//!
//! - [`Countdown`]: a plain, cancelable countdown measured in whole time
//!   units. The game session owns one and advances it with
//!   [`Countdown::tick`]. No clocks, no async.
//! - [`TickClock`]: an async beat source that fires once per time unit
//!   while armed. The host re-arms it whenever a new question starts so
//!   the first beat lands exactly one unit after the question appears.
//!
//! # Integration
//!
//! The clock sits inside the host actor's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* apply intent, arm/disarm clock */ }
//!         _ = clock.wait_for_tick() => {
//!             let notes = session.tick();
//!             /* re-arm if a new question was emitted */
//!         }
//!     }
//! }
//! ```
//!
//! A disarmed clock pends forever, so the tick branch simply never
//! fires between questions.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// Result of advancing a [`Countdown`] by one time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// The countdown was not running; nothing happened.
    Idle,
    /// One unit elapsed and time remains.
    Running {
        /// Units left after this tick (always ≥ 1).
        remaining: u32,
    },
    /// The last unit elapsed. The countdown stopped itself.
    Expired,
}

/// A cancelable countdown of whole time units.
///
/// ```text
/// start() ──→ [running, remaining = budget] ──tick()──→ … ──tick()──→ Expired
///    ▲                     │
///    └──── start() ────────┤ (restart discards the old countdown)
///                          └── cancel() ──→ [stopped]
/// ```
///
/// Starting always discards whatever countdown was in progress, so two
/// countdowns can never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// Creates a stopped countdown with the given budget.
    /// A zero budget is raised to 1.
    pub fn new(budget: u32) -> Self {
        Self {
            budget: budget.max(1),
            remaining: 0,
            running: false,
        }
    }

    /// (Re)starts the countdown from the full budget.
    pub fn start(&mut self) {
        self.remaining = self.budget;
        self.running = true;
    }

    /// Stops the countdown without expiring it. Idempotent.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Advances the countdown by one unit.
    pub fn tick(&mut self) -> CountdownStep {
        if !self.running {
            return CountdownStep::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            CountdownStep::Expired
        } else {
            CountdownStep::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Units left. Zero when stopped by expiry; stale after `cancel`.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The full budget each `start` counts down from.
    pub fn budget(&self) -> u32 {
        self.budget
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the tick clock.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Wall-clock length of one time unit. Default: 1 second.
    pub unit: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            unit: Duration::from_secs(1),
        }
    }
}

impl ClockConfig {
    /// Shortest allowed unit. Anything below is raised to this.
    pub const MIN_UNIT: Duration = Duration::from_millis(1);

    /// Create a config for a specific unit length.
    pub fn with_unit(unit: Duration) -> Self {
        Self { unit }
    }

    /// Fix out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickClock::new`].
    pub fn validated(mut self) -> Self {
        if self.unit < Self::MIN_UNIT {
            warn!(
                unit_ms = self.unit.as_secs_f64() * 1000.0,
                "clock unit below minimum, raising to 1ms"
            );
            self.unit = Self::MIN_UNIT;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about one beat, returned by [`TickClock::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Beat number since the clock was last armed (starts at 1).
    pub tick: u64,
    /// `true` if this beat fired late.
    pub overrun: bool,
    /// Whole units that passed unobserved because of the delay.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Fixed-unit beat source for the answer countdown.
///
/// Starts disarmed. One `TickClock` per hosted session.
pub struct TickClock {
    unit: Duration,
    /// When the next beat should fire. `None` while disarmed.
    next_tick: Option<Instant>,
    tick_count: u64,
    total_overruns: u64,
}

impl TickClock {
    /// Create a disarmed clock from config.
    pub fn new(config: ClockConfig) -> Self {
        let config = config.validated();
        debug!(
            unit_ms = config.unit.as_secs_f64() * 1000.0,
            "tick clock created"
        );
        Self {
            unit: config.unit,
            next_tick: None,
            tick_count: 0,
            total_overruns: 0,
        }
    }

    /// Create a disarmed clock with the given unit.
    pub fn with_unit(unit: Duration) -> Self {
        Self::new(ClockConfig::with_unit(unit))
    }

    /// Start beating one unit from now. Re-arming an armed clock
    /// restarts the phase, discarding the pending beat.
    pub fn arm(&mut self) {
        self.next_tick = Some(Instant::now() + self.unit);
        self.tick_count = 0;
        debug!("tick clock armed");
    }

    /// Stop beating. `wait_for_tick` will pend until the next `arm`.
    pub fn disarm(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(ticks = self.tick_count, "tick clock disarmed");
        }
    }

    /// Whether the clock is currently beating.
    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Wait until the next beat is due.
    ///
    /// While disarmed this future pends forever; `tokio::select!` keeps
    /// servicing its other branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > self.unit / 10;
        let mut ticks_skipped = 0u64;
        if overrun {
            self.total_overruns += 1;
            ticks_skipped = (late_by.as_nanos() / self.unit.as_nanos()) as u64;
            if ticks_skipped > 0 {
                warn!(
                    tick = self.tick_count,
                    skipped = ticks_skipped,
                    late_ms = late_by.as_secs_f64() * 1000.0,
                    "tick clock overrun, skipping ahead"
                );
            }
        }

        // Schedule from now, not from the missed deadline.
        self.next_tick = Some(now + self.unit);

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Beats since the clock was last armed.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Late beats observed over the clock's lifetime.
    pub fn total_overruns(&self) -> u64 {
        self.total_overruns
    }

    /// The length of one time unit.
    pub fn unit(&self) -> Duration {
        self.unit
    }
}
