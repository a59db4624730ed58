//! SDR SDRAM controller core.
//!
//! This crate implements a cycle-stepped model of a single-beat SDR SDRAM controller with the following:
//! 1. **Core:** Timing table, command timing executor, initialization sequencer and main scheduler.
//! 2. **Pins:** The standard command truth table and the registered device-facing pin state.
//! 3. **Device:** A behavioral SDRAM model that stores data and checks datasheet timing.
//! 4. **Simulation:** A simulator that clocks controller and device together, plus statistics.
//!
//! ```
//! use sdram_core::{Config, Simulator};
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! sim.write(0x10, 0xABCD, 0b11).unwrap();
//! assert_eq!(sim.read(0x10).unwrap(), 0xABCD);
//! assert!(sim.device.violations().is_empty());
//! ```

/// Common types (address decomposition, errors).
pub mod common;
/// Controller configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Controller core (timing, executor, init, scheduler, top level).
pub mod core;
/// Device seam and behavioral SDRAM model.
pub mod device;
/// Simulator coupling controller and device.
pub mod sim;
/// Controller statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The controller; construct with `SdramController::new`.
pub use crate::core::SdramController;
/// Bus-side request type.
pub use crate::core::{Request, Response};
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
