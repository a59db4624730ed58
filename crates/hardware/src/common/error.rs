//! Configuration and simulation error definitions.
//!
//! The device protocol is open-loop, so there is no runtime error path inside the
//! cycle model. This module defines:
//! 1. **Configuration errors:** Checked once at setup; any of them is fatal.
//! 2. **Simulation errors:** Returned by the blocking bus drivers in [`crate::sim`].

use thiserror::Error;

use crate::config::BurstLength;
use crate::core::command::CommandKind;

/// A configuration the controller refuses to start with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The clock frequency is zero.
    #[error("clock frequency must be non-zero")]
    ZeroClock,

    /// A timing constant converts to zero hold cycles.
    #[error("{command:?} hold time of {value_ns} ns rounds to zero cycles")]
    DegenerateTiming {
        /// Command whose hold time is degenerate.
        command: CommandKind,
        /// The offending constant in nanoseconds (or clocks for tMRD).
        value_ns: u32,
    },

    /// A timing constant converts to more cycles than the counters can hold.
    #[error("{name} of {value_ns} does not fit in a 32-bit cycle count")]
    TimingOverflow {
        /// Configuration field that overflowed.
        name: &'static str,
        /// The offending value as configured.
        value_ns: u32,
    },

    /// The refresh interval is too short to ever be honoured.
    #[error("refresh interval of {interval} cycles is below the {required} cycles one refresh can take")]
    RefreshStarvation {
        /// Computed refresh interval in cycles.
        interval: u32,
        /// Minimum interval the scheduler can guarantee.
        required: u32,
    },

    /// Bank, row and column widths do not add up to the request address width.
    #[error(
        "address width {addr_width} != bank {bank_bits} + row {row_bits} + column {col_bits} bits"
    )]
    AddressWidthMismatch {
        /// Configured request address width.
        addr_width: u32,
        /// Configured bank bits.
        bank_bits: u32,
        /// Configured row bits.
        row_bits: u32,
        /// Configured column bits.
        col_bits: u32,
    },

    /// Column address would collide with the A10 auto-precharge flag.
    #[error("{0} column bits do not fit below A10")]
    ColumnTooWide(u32),

    /// Row width outside the supported address-bus range.
    #[error("unsupported row width of {0} bits")]
    RowWidth(u32),

    /// Data width is zero, above 64, or not a whole number of bytes.
    #[error("unsupported data width of {0} bits")]
    DataWidth(u32),

    /// CAS latency other than 2 or 3.
    #[error("CAS latency must be 2 or 3, got {0}")]
    InvalidCasLatency(u8),

    /// Burst length other than single-beat.
    #[error("burst length {0:?} is not supported; only single-beat access")]
    UnsupportedBurstLength(BurstLength),

    /// Power-up delay shorter than the datasheet minimum.
    #[error("power-up delay of {0} us is below the 100 us minimum")]
    InitDelayTooShort(u32),

    /// Configuration file could not be read.
    #[error("config I/O error: {0}")]
    Io(String),

    /// Configuration document did not parse.
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Failure of a blocking bus operation in the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The controller could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A handshake did not complete within the cycle budget.
    #[error("timed out after {cycles} cycles waiting for {waiting_for}")]
    Timeout {
        /// Cycles spent waiting.
        cycles: u64,
        /// What the driver was waiting for.
        waiting_for: &'static str,
    },
}
