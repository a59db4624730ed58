//! Simulation harness.
//!
//! Couples a controller with a device on its pins and provides blocking
//! bus drivers for tests and traffic generators.

/// Cycle loop and bus drivers.
pub mod simulator;

pub use simulator::{BusCycle, DEFAULT_TIMEOUT_CYCLES, Simulator};
