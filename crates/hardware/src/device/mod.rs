//! SDRAM device side of the pin interface.
//!
//! This module defines the `SdramDevice` trait the simulator clocks every cycle. It provides:
//! 1. **Seam:** `drive` for the data the device puts on DQ, `clock` for the rising-edge sample.
//! 2. **Model:** [`BehavioralSdram`], a sparse-storage part that checks datasheet timing.
//! 3. **Diagnostics:** [`TimingViolation`] records and the sampled command log.

/// Behavioral SDRAM model.
pub mod model;

/// Violation and command-log records.
pub mod violation;

pub use model::BehavioralSdram;
pub use violation::{IssuedCommand, TimingViolation, ViolationKind};

use crate::core::pins::PinState;

/// A device attached to the controller's pins.
///
/// Each cycle the simulator first asks the device what it drives onto DQ, then
/// clocks it with the pins the controller registered for that cycle.
pub trait SdramDevice {
    /// Data the device drives on DQ this cycle, if any.
    fn drive(&self) -> Option<u64>;
    /// Samples the pins at the rising edge and advances one cycle.
    fn clock(&mut self, pins: &PinState);
}
