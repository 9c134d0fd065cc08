//! Countdown for a timed session.

/// Remaining play time, advanced by the caller's tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    duration_ms: u32,
    elapsed_ms: u32,
    expired: bool,
}

impl SessionClock {
    /// A `duration_ms` of 0 means an untimed session that never expires.
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            elapsed_ms: 0,
            expired: false,
        }
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn is_timed(&self) -> bool {
        self.duration_ms > 0
    }

    pub fn remaining_ms(&self) -> u32 {
        self.duration_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance by `elapsed_ms`; returns true exactly once, on the tick that
    /// runs the clock out.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.expired || !self.is_timed() {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.expired = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
        self.expired = false;
    }
}
