//! Debounce scheduling for format cycles
//!
//! ## Architecture
//!
//! ```text
//! Edit → Debouncer::arm (new ticket, old one is dead) → Cmd::StartDebounce
//!      → ResettableTimer::reset (replaces any pending fire)
//!      → quiet period elapses → ResettableTimer::poll → Msg::Format(TimerFired)
//!      → Debouncer::take_if_current → Cmd::RunFormat
//! ```
//!
//! Cancellation happens twice: the runtime timer holds a single slot, and the
//! model rejects any ticket that is not the most recently armed one. Time comes
//! from a [`Clock`] so tests can drive the timer with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Quiet period before a burst of edits is formatted
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Identifies one armed debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerTicket(pub u64);

/// Tracks which debounce ticket is live
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    last_issued: u64,
    armed: Option<TimerTicket>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_issued: 0,
            armed: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Arm a fresh ticket, implicitly cancelling the previous one
    pub fn arm(&mut self) -> TimerTicket {
        self.last_issued += 1;
        let ticket = TimerTicket(self.last_issued);
        if let Some(previous) = self.armed.replace(ticket) {
            tracing::trace!("debounce ticket {} superseded by {}", previous.0, ticket.0);
        }
        ticket
    }

    /// Drop the pending ticket, if any
    pub fn cancel(&mut self) -> Option<TimerTicket> {
        self.armed.take()
    }

    /// Consume `ticket` if it is the live one; stale tickets return false
    pub fn take_if_current(&mut self, ticket: TimerTicket) -> bool {
        if self.armed == Some(ticket) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<TimerTicket> {
        self.armed
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Logical clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle while the
/// runtime owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

/// A single-slot timer whose pending fire is replaced on every reset
#[derive(Debug, Default)]
pub struct ResettableTimer {
    pending: Option<(TimerTicket, Instant)>,
}

impl ResettableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `ticket` for `deadline`, returning the cancelled ticket if any
    pub fn reset(&mut self, ticket: TimerTicket, deadline: Instant) -> Option<TimerTicket> {
        self.pending
            .replace((ticket, deadline))
            .map(|(cancelled, _)| cancelled)
    }

    pub fn cancel(&mut self) -> Option<TimerTicket> {
        self.pending.take().map(|(ticket, _)| ticket)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Fire the pending ticket if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<TimerTicket> {
        match self.pending {
            Some((ticket, deadline)) if now >= deadline => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }
}
