// Tick scheduler - Cancellable periodic tick source
//
// Poll-driven so it stays on the caller's thread: the UI polls it once per
// frame, the terminal runner sleeps until `next_deadline`. Deadlines advance
// by whole periods from the arming instant, so late polls do not accumulate
// drift.

use std::time::{Duration, Instant};

/// Nominal countdown granularity
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct TickScheduler {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking one period from `now`; no-op when already armed
    pub fn arm(&mut self, now: Instant) {
        if self.next_deadline.is_none() {
            self.next_deadline = Some(now + self.period);
        }
    }

    /// Stop ticking; pending ticks are dropped
    pub fn cancel(&mut self) {
        self.next_deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// Time left before the next tick is due (zero when overdue)
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Number of ticks due at `now`, advancing the deadline past them
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(deadline) = self.next_deadline else {
            return 0;
        };
        if now < deadline {
            return 0;
        }

        let late = now.duration_since(deadline);
        let period_nanos = self.period.as_nanos().max(1);
        let extra = (late.as_nanos() / period_nanos) as u32;
        let due = extra + 1;

        self.next_deadline = Some(deadline + self.period * due);
        due
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}
