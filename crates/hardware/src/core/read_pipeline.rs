//! Read-response realignment pipeline.
//!
//! A shift register with one bit per cycle recording whether a Read command issued
//! that cycle. Depth is CAS latency plus two: one cycle for the executor to register
//! the command onto the pins and one to capture the returned data. The second-to-last
//! tap is `early_valid`, the last tap is `valid`.

/// Cycles added to the CAS latency: command register plus data capture.
pub const READ_OVERHEAD_CYCLES: u8 = 2;

/// Registered shift register of Read issue events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadPipeline {
    bits: u16,
    depth: u8,
}

impl ReadPipeline {
    /// Empty pipeline for the given CAS latency.
    pub const fn new(cas_latency: u8) -> Self {
        Self {
            bits: 0,
            depth: cas_latency + READ_OVERHEAD_CYCLES,
        }
    }

    /// Read data arrives on the device data bus this cycle.
    #[inline]
    pub const fn early_valid(&self) -> bool {
        self.bits & (1 << (self.depth - 2)) != 0
    }

    /// Captured read data is presented on the response channel this cycle.
    #[inline]
    pub const fn valid(&self) -> bool {
        self.bits & (1 << (self.depth - 1)) != 0
    }

    /// Shifts in this cycle's issue event.
    pub const fn shift(&self, read_issued: bool) -> Self {
        let window = (1u16 << self.depth) - 1;
        Self {
            bits: ((self.bits << 1) | read_issued as u16) & window,
            depth: self.depth,
        }
    }
}
