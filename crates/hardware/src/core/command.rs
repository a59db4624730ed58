//! Device command set.
//!
//! This module defines the closed set of commands the controller can place on the
//! device's command bus:
//! 1. **`Command`:** A tagged variant carrying each command's address/data fields.
//! 2. **`CommandKind`:** The field-less discriminant used for timing lookups.
//! 3. **`ModeRegister`:** The fields packed into the Load-Mode word.

use std::fmt;

use crate::config::{BurstLength, BurstType, ModeConfig, WriteBurstMode};

/// One device command.
///
/// Exactly one command is in flight at a time; the executor holds it for
/// [`crate::core::timing::TimingTable::hold_cycles`] cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Chip deselected; the device ignores the command bus.
    Deselect,
    /// No operation with the chip selected.
    Nop,
    /// Open `row` in `bank`.
    Active {
        /// Bank select.
        bank: u32,
        /// Row to open.
        row: u32,
    },
    /// Single-beat read from the open row of `bank`.
    Read {
        /// Bank select.
        bank: u32,
        /// Column to read.
        col: u32,
    },
    /// Single-beat write to the open row of `bank`.
    Write {
        /// Bank select.
        bank: u32,
        /// Column to write.
        col: u32,
        /// Write data.
        data: u64,
        /// Data mask; a set bit suppresses the corresponding byte lane.
        mask: u8,
    },
    /// Close the open row in every bank.
    PrechargeAll,
    /// Auto-refresh.
    Refresh,
    /// Program the mode register.
    LoadMode(ModeRegister),
}

impl Command {
    /// Returns the field-less kind of this command.
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Deselect => CommandKind::Deselect,
            Self::Nop => CommandKind::Nop,
            Self::Active { .. } => CommandKind::Active,
            Self::Read { .. } => CommandKind::Read,
            Self::Write { .. } => CommandKind::Write,
            Self::PrechargeAll => CommandKind::PrechargeAll,
            Self::Refresh => CommandKind::Refresh,
            Self::LoadMode(_) => CommandKind::LoadMode,
        }
    }

    /// Returns `true` for Deselect and Nop, which leave the device untouched.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Deselect | Self::Nop)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deselect => write!(f, "DESL"),
            Self::Nop => write!(f, "NOP"),
            Self::Active { bank, row } => write!(f, "ACT b{bank} r{row:#x}"),
            Self::Read { bank, col } => write!(f, "RD b{bank} c{col:#x}"),
            Self::Write {
                bank,
                col,
                data,
                mask,
            } => write!(f, "WR b{bank} c{col:#x} d{data:#x} m{mask:#b}"),
            Self::PrechargeAll => write!(f, "PREA"),
            Self::Refresh => write!(f, "REF"),
            Self::LoadMode(mode) => write!(f, "LMR {:#05x}", mode.word()),
        }
    }
}

/// Discriminant of [`Command`], used to look up hold times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// See [`Command::Deselect`].
    Deselect,
    /// See [`Command::Nop`].
    Nop,
    /// See [`Command::Active`].
    Active,
    /// See [`Command::Read`].
    Read,
    /// See [`Command::Write`].
    Write,
    /// See [`Command::PrechargeAll`].
    PrechargeAll,
    /// See [`Command::Refresh`].
    Refresh,
    /// See [`Command::LoadMode`].
    LoadMode,
}

/// Mode-register contents.
///
/// Packed as A2..A0 burst length, A3 burst type, A6..A4 CAS latency,
/// A8..A7 operating mode (always standard), A9 write burst mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeRegister {
    /// Burst length.
    pub burst_length: BurstLength,
    /// Burst ordering.
    pub burst_type: BurstType,
    /// CAS latency in cycles.
    pub cas_latency: u8,
    /// Write burst mode.
    pub write_burst_mode: WriteBurstMode,
}

impl ModeRegister {
    /// Builds the mode register from the configuration.
    pub const fn from_config(mode: &ModeConfig) -> Self {
        Self {
            burst_length: mode.burst_length,
            burst_type: mode.burst_type,
            cas_latency: mode.cas_latency,
            write_burst_mode: mode.write_burst_mode,
        }
    }

    /// Packs the fields into the word driven on the address bus.
    pub const fn word(&self) -> u32 {
        let burst_type = match self.burst_type {
            BurstType::Sequential => 0,
            BurstType::Interleaved => 1,
        };
        let write_burst = match self.write_burst_mode {
            WriteBurstMode::Programmed => 0,
            WriteBurstMode::SingleLocation => 1,
        };
        self.burst_length.code()
            | (burst_type << 3)
            | ((self.cas_latency as u32 & 0b111) << 4)
            | (write_burst << 9)
    }

    /// Unpacks a mode word. Returns `None` for reserved burst-length codes or a
    /// non-standard operating mode.
    pub const fn from_word(word: u32) -> Option<Self> {
        let burst_length = match BurstLength::from_code(word) {
            Some(bl) => bl,
            None => return None,
        };
        if (word >> 7) & 0b11 != 0 {
            return None;
        }
        Some(Self {
            burst_length,
            burst_type: if (word >> 3) & 1 == 0 {
                BurstType::Sequential
            } else {
                BurstType::Interleaved
            },
            cas_latency: ((word >> 4) & 0b111) as u8,
            write_burst_mode: if (word >> 9) & 1 == 0 {
                WriteBurstMode::Programmed
            } else {
                WriteBurstMode::SingleLocation
            },
        })
    }
}
