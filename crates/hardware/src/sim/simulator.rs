//! Simulator: owns the controller and the device side-by-side.
//!
//! Each tick runs one clock edge in a fixed order:
//! 1. **Outputs:** The controller's registered `ready`, response and pins are sampled.
//! 2. **Drive:** The device reports what it drives on DQ this cycle.
//! 3. **Clock:** The device samples the pins.
//! 4. **Step:** The controller computes and swaps in its next state.

use crate::common::error::SimError;
use crate::config::Config;
use crate::core::controller::SdramController;
use crate::core::request::Request;
use crate::device::{BehavioralSdram, SdramDevice};
use crate::stats::ControllerStats;

/// Cycle budget for the blocking drivers before they give up.
pub const DEFAULT_TIMEOUT_CYCLES: u64 = 1 << 20;

/// What the bus side saw during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusCycle {
    /// The presented request was accepted.
    pub accepted: bool,
    /// Read data arrives next cycle.
    pub early_valid: bool,
    /// Read data is valid this cycle.
    pub valid: bool,
    /// Read data; meaningful only while `valid`.
    pub read_data: u64,
}

/// Top-level simulator: controller plus an attached device.
#[derive(Debug)]
pub struct Simulator<D: SdramDevice = BehavioralSdram> {
    /// The controller under test.
    pub controller: SdramController,
    /// The device on its pins.
    pub device: D,
    timeout: u64,
}

impl Simulator<BehavioralSdram> {
    /// Creates a simulator with a behavioral device matching the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is rejected.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        Self::with_device(config, BehavioralSdram::new(config))
    }
}

impl<D: SdramDevice> Simulator<D> {
    /// Creates a simulator around a caller-supplied device.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is rejected.
    pub fn with_device(config: &Config, device: D) -> Result<Self, SimError> {
        Ok(Self {
            controller: SdramController::new(config)?,
            device,
            timeout: DEFAULT_TIMEOUT_CYCLES,
        })
    }

    /// Replaces the cycle budget of the blocking drivers.
    pub fn with_timeout(mut self, cycles: u64) -> Self {
        self.timeout = cycles;
        self
    }

    /// Advances one clock with `request` presented on the request interface.
    ///
    /// # Arguments
    ///
    /// * `request` - Request driven onto the bus this cycle, if any.
    ///
    /// # Returns
    ///
    /// The handshake and response signals as they stood during this cycle.
    pub fn tick(&mut self, request: Option<Request>) -> BusCycle {
        let out = self.controller.outputs();
        let dq = self.device.drive();
        self.device.clock(&out.pins);
        let _ = self.controller.step(request, dq);
        BusCycle {
            accepted: request.is_some() && out.ready,
            early_valid: out.response.early_valid,
            valid: out.response.valid,
            read_data: out.response.data,
        }
    }

    /// Advances `cycles` clocks with no request presented.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            let _ = self.tick(None);
        }
    }

    /// Idles until the controller asserts `ready`. Returns the cycles waited.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timeout`] if `ready` stays low for the whole budget.
    pub fn run_until_ready(&mut self) -> Result<u64, SimError> {
        let mut waited = 0;
        while !self.controller.outputs().ready {
            if waited >= self.timeout {
                return Err(SimError::Timeout {
                    cycles: waited,
                    waiting_for: "ready",
                });
            }
            let _ = self.tick(None);
            waited += 1;
        }
        Ok(waited)
    }

    /// Submits a request, waiting for `ready` first.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timeout`] if the controller never becomes ready.
    pub fn submit(&mut self, request: Request) -> Result<(), SimError> {
        let _ = self.run_until_ready()?;
        let cycle = self.tick(Some(request));
        debug_assert!(cycle.accepted, "request refused while ready");
        Ok(())
    }

    /// Writes one word under `byte_enable`. Returns once the write is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timeout`] if the controller never becomes ready.
    pub fn write(&mut self, address: u64, data: u64, byte_enable: u8) -> Result<(), SimError> {
        self.submit(Request::write(address, data, byte_enable))
    }

    /// Reads one word, blocking until the response is valid.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timeout`] if the controller never becomes ready or
    /// the response never arrives.
    pub fn read(&mut self, address: u64) -> Result<u64, SimError> {
        self.submit(Request::read(address))?;
        for _ in 0..self.timeout {
            let cycle = self.tick(None);
            if cycle.valid {
                return Ok(cycle.read_data);
            }
        }
        Err(SimError::Timeout {
            cycles: self.timeout,
            waiting_for: "read response",
        })
    }

    /// Cycles stepped since reset.
    pub const fn cycle(&self) -> u64 {
        self.controller.cycle()
    }

    /// Controller statistics.
    pub const fn stats(&self) -> &ControllerStats {
        self.controller.stats()
    }
}
