//! Configuration system for the SDRAM controller model.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the controller. It provides:
//! 1. **Defaults:** Baseline device constants for an 8M x 16 SDR SDRAM part.
//! 2. **Structures:** Hierarchical config for clocking, geometry, timing, mode register and policy.
//! 3. **Enums:** Mode-register fields and the write-acknowledge policy.
//! 4. **Validation:** The configuration-validity checks run once before the core starts.
//!
//! Configuration is supplied as JSON (`Config::from_json` / `Config::from_file`) or
//! built with `Config::default()`. Every field has a default, so partial documents work.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::core::timing::TimingTable;

/// Default configuration constants for the controller.
///
/// These values describe a 4-bank, 4096-row, 512-column, 16-bit part
/// clocked at 100 MHz.
mod defaults {
    /// Controller and device clock frequency in MHz.
    pub const CLOCK_MHZ: u32 = 100;

    /// Request address width in bits (bank + row + column).
    pub const ADDR_WIDTH: u32 = 23;

    /// Data bus width in bits.
    pub const DATA_WIDTH: u32 = 16;

    /// Bank address bits (4 banks).
    pub const BANK_BITS: u32 = 2;

    /// Row address bits (4096 rows per bank).
    pub const ROW_BITS: u32 = 12;

    /// Column address bits (512 columns per row).
    pub const COL_BITS: u32 = 9;

    /// Active to Precharge minimum, ns.
    pub const T_RAS: u32 = 42;

    /// Active to Active (same bank) minimum, ns.
    pub const T_RC: u32 = 60;

    /// Active to Read/Write delay, ns.
    pub const T_RCD: u32 = 18;

    /// Auto-refresh period, ns.
    pub const T_RFC: u32 = 66;

    /// Precharge period, ns.
    pub const T_RP: u32 = 18;

    /// Active bank A to Active bank B, ns.
    pub const T_RRD: u32 = 12;

    /// Write recovery time, ns.
    pub const T_WR: u32 = 15;

    /// Refresh period for the whole array, ms.
    pub const T_REF_MS: u32 = 64;

    /// Load-mode to next command, in clocks.
    pub const T_MRD: u32 = 2;

    /// Minimum power-up delay before the first command, us.
    pub const INIT_DELAY_US: u32 = 100;

    /// Default CAS latency.
    pub const CAS_LATENCY: u8 = 2;
}

/// Burst length field of the mode register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BurstLength {
    /// Single-beat access.
    #[default]
    One,
    /// Two beats.
    Two,
    /// Four beats.
    Four,
    /// Eight beats.
    Eight,
    /// Full page.
    FullPage,
}

impl BurstLength {
    /// Returns the 3-bit mode-register encoding (A2..A0).
    pub const fn code(self) -> u32 {
        match self {
            Self::One => 0b000,
            Self::Two => 0b001,
            Self::Four => 0b010,
            Self::Eight => 0b011,
            Self::FullPage => 0b111,
        }
    }

    /// Decodes the 3-bit mode-register field; reserved encodings yield `None`.
    pub const fn from_code(code: u32) -> Option<Self> {
        match code & 0b111 {
            0b000 => Some(Self::One),
            0b001 => Some(Self::Two),
            0b010 => Some(Self::Four),
            0b011 => Some(Self::Eight),
            0b111 => Some(Self::FullPage),
            _ => None,
        }
    }
}

/// Burst ordering field of the mode register (A3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BurstType {
    /// Sequential burst ordering.
    #[default]
    Sequential,
    /// Interleaved burst ordering.
    Interleaved,
}

/// Write burst mode field of the mode register (A9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WriteBurstMode {
    /// Writes use the programmed burst length.
    #[default]
    Programmed,
    /// Writes always access a single location.
    SingleLocation,
}

/// When a write request is acknowledged back to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WriteAck {
    /// Release the request slot on the cycle the Write command issues, unless
    /// a refresh is due; lets back-to-back writes overlap write recovery.
    #[default]
    Pipelined,
    /// Release the request slot only after the full write-recovery hold.
    AfterRecovery,
}

/// Root configuration structure containing all controller settings.
///
/// # Examples
///
/// ```
/// use sdram_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.clock_mhz, 100);
/// assert_eq!(config.mode.cas_latency, 2);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing a partial document:
///
/// ```
/// use sdram_core::config::{Config, WriteAck};
///
/// let json = r#"{
///     "general": { "clock_mhz": 133 },
///     "mode": { "cas_latency": 3 },
///     "controller": { "write_ack": "AfterRecovery" }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.clock_mhz, 133);
/// assert_eq!(config.timing.t_rcd, 18);
/// assert_eq!(config.controller.write_ack, WriteAck::AfterRecovery);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Clocking and diagnostics.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Address decomposition and data width.
    #[serde(default)]
    pub geometry: GeometryConfig,
    /// Datasheet timing constants.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Mode-register fields loaded during initialization.
    #[serde(default)]
    pub mode: ModeConfig,
    /// Scheduling policy knobs.
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl Config {
    /// Parses a JSON document; missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON for this schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its contents do not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_json(&text)
    }

    /// Checks the configuration-validity rules. Must pass before a controller is built.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: address-width mismatch, unsupported
    /// mode-register values, a too-short power-up delay, a degenerate timing
    /// constant, or a refresh interval too short to ever be met.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        if g.addr_width != g.bank_bits + g.row_bits + g.col_bits {
            return Err(ConfigError::AddressWidthMismatch {
                addr_width: g.addr_width,
                bank_bits: g.bank_bits,
                row_bits: g.row_bits,
                col_bits: g.col_bits,
            });
        }
        // A10 doubles as the auto-precharge flag during column commands.
        if g.col_bits > 10 {
            return Err(ConfigError::ColumnTooWide(g.col_bits));
        }
        if g.row_bits == 0 || g.row_bits > 16 {
            return Err(ConfigError::RowWidth(g.row_bits));
        }
        if g.data_width == 0 || g.data_width > 64 || g.data_width % 8 != 0 {
            return Err(ConfigError::DataWidth(g.data_width));
        }
        if !matches!(self.mode.cas_latency, 2 | 3) {
            return Err(ConfigError::InvalidCasLatency(self.mode.cas_latency));
        }
        if self.mode.burst_length != BurstLength::One {
            return Err(ConfigError::UnsupportedBurstLength(self.mode.burst_length));
        }
        if self.timing.init_delay_us < defaults::INIT_DELAY_US {
            return Err(ConfigError::InitDelayTooShort(self.timing.init_delay_us));
        }
        TimingTable::new(self).map(|_| ())
    }

    /// Returns the CAS latency a part needs at the given clock: 2 when the
    /// period is longer than 10 ns, otherwise 3.
    pub const fn recommended_cas_latency(clock_mhz: u32) -> u8 {
        if clock_mhz < 100 { 2 } else { 3 }
    }

    /// Convenience constructor for a default part at another clock rate, with
    /// the CAS latency that clock needs.
    pub fn at_clock(clock_mhz: u32) -> Self {
        let mut config = Self::default();
        config.general.clock_mhz = clock_mhz;
        config.mode.cas_latency = Self::recommended_cas_latency(clock_mhz);
        config
    }
}

/// General controller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Clock frequency shared by the controller and the device, in MHz.
    #[serde(default = "GeneralConfig::default_clock_mhz")]
    pub clock_mhz: u32,

    /// Emit a `debug` event for every issued device command.
    #[serde(default)]
    pub trace_commands: bool,
}

impl GeneralConfig {
    fn default_clock_mhz() -> u32 {
        defaults::CLOCK_MHZ
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            clock_mhz: defaults::CLOCK_MHZ,
            trace_commands: false,
        }
    }
}

/// Address decomposition and data-bus width.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryConfig {
    /// Width of the request address in bits; must equal bank + row + column bits.
    #[serde(default = "GeometryConfig::default_addr_width")]
    pub addr_width: u32,

    /// Width of the data bus in bits (a multiple of 8, at most 64).
    #[serde(default = "GeometryConfig::default_data_width")]
    pub data_width: u32,

    /// Bank select bits (most significant part of the address).
    #[serde(default = "GeometryConfig::default_bank_bits")]
    pub bank_bits: u32,

    /// Row address bits.
    #[serde(default = "GeometryConfig::default_row_bits")]
    pub row_bits: u32,

    /// Column address bits (least significant part of the address).
    #[serde(default = "GeometryConfig::default_col_bits")]
    pub col_bits: u32,
}

impl GeometryConfig {
    fn default_addr_width() -> u32 {
        defaults::ADDR_WIDTH
    }

    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    fn default_bank_bits() -> u32 {
        defaults::BANK_BITS
    }

    fn default_row_bits() -> u32 {
        defaults::ROW_BITS
    }

    fn default_col_bits() -> u32 {
        defaults::COL_BITS
    }

    /// Number of byte lanes on the data bus.
    pub const fn byte_lanes(&self) -> u32 {
        self.data_width / 8
    }

    /// Mask covering the valid bits of a data word.
    pub const fn data_mask(&self) -> u64 {
        if self.data_width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.data_width) - 1
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            addr_width: defaults::ADDR_WIDTH,
            data_width: defaults::DATA_WIDTH,
            bank_bits: defaults::BANK_BITS,
            row_bits: defaults::ROW_BITS,
            col_bits: defaults::COL_BITS,
        }
    }
}

/// Datasheet timing constants.
///
/// Nanosecond values are converted to whole cycles by ceiling division
/// against the clock rate; see [`TimingTable`].
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Active to Precharge minimum, ns.
    #[serde(default = "TimingConfig::default_t_ras")]
    pub t_ras: u32,

    /// Active to Active minimum, ns.
    #[serde(default = "TimingConfig::default_t_rc")]
    pub t_rc: u32,

    /// Active to Read/Write delay, ns.
    #[serde(default = "TimingConfig::default_t_rcd")]
    pub t_rcd: u32,

    /// Auto-refresh period, ns.
    #[serde(default = "TimingConfig::default_t_rfc")]
    pub t_rfc: u32,

    /// Precharge period, ns.
    #[serde(default = "TimingConfig::default_t_rp")]
    pub t_rp: u32,

    /// Active bank A to Active bank B, ns.
    #[serde(default = "TimingConfig::default_t_rrd")]
    pub t_rrd: u32,

    /// Write recovery time, ns.
    #[serde(default = "TimingConfig::default_t_wr")]
    pub t_wr: u32,

    /// Time within which every row must be refreshed, ms.
    #[serde(default = "TimingConfig::default_t_ref_ms")]
    pub t_ref_ms: u32,

    /// Load-mode to next command, clocks.
    #[serde(default = "TimingConfig::default_t_mrd")]
    pub t_mrd: u32,

    /// Power-up delay before the first command, us.
    #[serde(default = "TimingConfig::default_init_delay_us")]
    pub init_delay_us: u32,
}

impl TimingConfig {
    fn default_t_ras() -> u32 {
        defaults::T_RAS
    }

    fn default_t_rc() -> u32 {
        defaults::T_RC
    }

    fn default_t_rcd() -> u32 {
        defaults::T_RCD
    }

    fn default_t_rfc() -> u32 {
        defaults::T_RFC
    }

    fn default_t_rp() -> u32 {
        defaults::T_RP
    }

    fn default_t_rrd() -> u32 {
        defaults::T_RRD
    }

    fn default_t_wr() -> u32 {
        defaults::T_WR
    }

    fn default_t_ref_ms() -> u32 {
        defaults::T_REF_MS
    }

    fn default_t_mrd() -> u32 {
        defaults::T_MRD
    }

    fn default_init_delay_us() -> u32 {
        defaults::INIT_DELAY_US
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            t_ras: defaults::T_RAS,
            t_rc: defaults::T_RC,
            t_rcd: defaults::T_RCD,
            t_rfc: defaults::T_RFC,
            t_rp: defaults::T_RP,
            t_rrd: defaults::T_RRD,
            t_wr: defaults::T_WR,
            t_ref_ms: defaults::T_REF_MS,
            t_mrd: defaults::T_MRD,
            init_delay_us: defaults::INIT_DELAY_US,
        }
    }
}

/// Mode-register fields written by the Load-Mode command.
#[derive(Debug, Clone, Deserialize)]
pub struct ModeConfig {
    /// Burst length; only single-beat access is supported.
    #[serde(default)]
    pub burst_length: BurstLength,

    /// Burst ordering.
    #[serde(default)]
    pub burst_type: BurstType,

    /// CAS latency in cycles (2 or 3).
    #[serde(default = "ModeConfig::default_cas_latency")]
    pub cas_latency: u8,

    /// Write burst mode.
    #[serde(default)]
    pub write_burst_mode: WriteBurstMode,
}

impl ModeConfig {
    fn default_cas_latency() -> u8 {
        defaults::CAS_LATENCY
    }
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            burst_length: BurstLength::default(),
            burst_type: BurstType::default(),
            cas_latency: defaults::CAS_LATENCY,
            write_burst_mode: WriteBurstMode::default(),
        }
    }
}

/// Scheduling policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerConfig {
    /// Write acknowledge timing.
    #[serde(default)]
    pub write_ack: WriteAck,
}
