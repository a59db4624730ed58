//! Periodic refresh obligation.
//!
//! A down-counter armed when initialization completes. It reloads whenever a
//! Refresh issues and decrements every other cycle; the obligation is due once it
//! reaches zero and stays due until the next Refresh.

/// Registered refresh counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RefreshObligation {
    armed: bool,
    counter: u32,
}

impl RefreshObligation {
    /// Counter that has not started; never due.
    pub const fn disarmed() -> Self {
        Self {
            armed: false,
            counter: 0,
        }
    }

    /// Counter started with `reload` cycles to go.
    pub const fn armed(reload: u32) -> Self {
        Self {
            armed: true,
            counter: reload,
        }
    }

    /// A Refresh must be scheduled at the next decision point.
    #[inline]
    pub const fn due(&self) -> bool {
        self.armed && self.counter == 0
    }

    /// Cycles until due.
    pub const fn remaining(&self) -> u32 {
        self.counter
    }

    /// Next state given whether a Refresh issued this cycle.
    pub const fn step(&self, refreshed: bool, reload: u32) -> Self {
        if !self.armed {
            return *self;
        }
        Self {
            armed: true,
            counter: if refreshed {
                reload
            } else {
                self.counter.saturating_sub(1)
            },
        }
    }
}
