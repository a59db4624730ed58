//! Protocol violations observed by the device model.

use std::fmt;

use crate::core::command::Command;

/// Datasheet rule a command broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Read or Write too soon after Active.
    Trcd,
    /// Command too soon after Precharge.
    Trp,
    /// Command too soon after Auto-refresh.
    Trfc,
    /// Precharge too soon after Active.
    Tras,
    /// Active too soon after Active to the same bank.
    Trc,
    /// Active too soon after Active to another bank.
    Trrd,
    /// Command too soon after Load-mode.
    Tmrd,
    /// Precharge too soon after Write.
    Twr,
    /// Read or Write to a bank with no open row.
    BankClosed,
    /// Active to a bank that already has an open row.
    BankAlreadyOpen,
    /// Auto-refresh while a row is open.
    RefreshWithOpenRow,
    /// Load-mode while a row is open.
    LoadModeWithOpenRow,
    /// Command before the power-up delay elapsed.
    PowerUp,
    /// Read or Write before the mode register was loaded.
    ModeNotSet,
    /// Controller drove DQ while the device was driving read data.
    BusContention,
    /// Strobe pattern outside the supported command set.
    UnsupportedCommand,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Trcd => "tRCD not met",
            Self::Trp => "tRP not met",
            Self::Trfc => "tRFC not met",
            Self::Tras => "tRAS not met",
            Self::Trc => "tRC not met",
            Self::Trrd => "tRRD not met",
            Self::Tmrd => "tMRD not met",
            Self::Twr => "tWR not met",
            Self::BankClosed => "access to closed bank",
            Self::BankAlreadyOpen => "activate of open bank",
            Self::RefreshWithOpenRow => "refresh with open row",
            Self::LoadModeWithOpenRow => "load-mode with open row",
            Self::PowerUp => "command during power-up delay",
            Self::ModeNotSet => "access before load-mode",
            Self::BusContention => "DQ bus contention",
            Self::UnsupportedCommand => "unsupported command encoding",
        };
        f.write_str(text)
    }
}

/// One recorded violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingViolation {
    /// Device cycle the offending command was sampled on.
    pub cycle: u64,
    /// Rule broken.
    pub kind: ViolationKind,
    /// Offending command, if it decoded.
    pub command: Option<Command>,
}

impl fmt::Display for TimingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Some(cmd) => write!(f, "cycle {}: {} ({cmd})", self.cycle, self.kind),
            None => write!(f, "cycle {}: {}", self.cycle, self.kind),
        }
    }
}

/// A non-idle command as the device sampled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssuedCommand {
    /// Device cycle.
    pub cycle: u64,
    /// Decoded command.
    pub command: Command,
}
