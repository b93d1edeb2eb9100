//! Fixed-period task timer
//!
//! Same no-catch-up rule as `embassy_time::Ticker`, but driven by the
//! crate's `Clock` so it runs in host tests.

/// Deadline tracker for a fixed-period task
///
/// A new timer is due immediately. After a run the next deadline is one
/// period later; a task that fell behind by more than a period is
/// rescheduled from the current time instead of bursting to catch up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Periodic {
    period_ms: u64,
    next_due_ms: u64,
}

impl Periodic {
    /// Create a timer first due at `start_ms`
    pub const fn new(period_ms: u64, start_ms: u64) -> Self {
        Self {
            period_ms: if period_ms == 0 { 1 } else { period_ms },
            next_due_ms: start_ms,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_due_ms
    }

    /// Consume the deadline if due
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.next_due_ms += self.period_ms;
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.period_ms;
        }
        true
    }
}
