//! Device-facing pin state and the SDR SDRAM command truth table.
//!
//! The executor registers one [`PinState`] per cycle. Encoding follows the standard
//! strobe truth table (`CS#`, `RAS#`, `CAS#`, `WE#`, active low):
//!
//! | Command      | CS# | RAS# | CAS# | WE# | Address          |
//! |--------------|-----|------|------|-----|------------------|
//! | Deselect     | 1   | x    | x    | x   | x                |
//! | Nop          | 0   | 1    | 1    | 1   | x                |
//! | Active       | 0   | 0    | 1    | 1   | row              |
//! | Read         | 0   | 1    | 0    | 1   | column, A10 = 0  |
//! | Write        | 0   | 1    | 0    | 0   | column, A10 = 0  |
//! | Precharge    | 0   | 0    | 1    | 0   | A10 = 1 (all)    |
//! | Auto-refresh | 0   | 0    | 0    | 1   | x                |
//! | Load mode    | 0   | 0    | 0    | 0   | mode word        |

use crate::core::command::{Command, ModeRegister};

/// Address bit that selects all banks on Precharge and auto-precharge on Read/Write.
pub const A10: u32 = 1 << 10;

/// One cycle of the device-facing pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinState {
    /// Clock enable.
    pub cke: bool,
    /// Chip select, active low.
    pub cs_n: bool,
    /// Row address strobe, active low.
    pub ras_n: bool,
    /// Column address strobe, active low.
    pub cas_n: bool,
    /// Write enable, active low.
    pub we_n: bool,
    /// Multiplexed address bus.
    pub addr: u32,
    /// Bank select.
    pub bank: u32,
    /// Data mask, one bit per byte lane; set means masked.
    pub dqm: u8,
    /// Data driven by the controller; `Some` only on a Write cycle.
    pub dq: Option<u64>,
}

impl Default for PinState {
    fn default() -> Self {
        Self::deselect()
    }
}

impl PinState {
    /// Chip deselected.
    pub const fn deselect() -> Self {
        Self {
            cke: true,
            cs_n: true,
            ras_n: true,
            cas_n: true,
            we_n: true,
            addr: 0,
            bank: 0,
            dqm: 0,
            dq: None,
        }
    }

    const fn strobes(ras_n: bool, cas_n: bool, we_n: bool) -> Self {
        Self {
            cs_n: false,
            ras_n,
            cas_n,
            we_n,
            ..Self::deselect()
        }
    }

    /// Encodes a command onto the pins.
    pub const fn encode(command: &Command) -> Self {
        match *command {
            Command::Deselect => Self::deselect(),
            Command::Nop => Self::strobes(true, true, true),
            Command::Active { bank, row } => Self {
                addr: row,
                bank,
                ..Self::strobes(false, true, true)
            },
            Command::Read { bank, col } => Self {
                addr: col & !A10,
                bank,
                ..Self::strobes(true, false, true)
            },
            Command::Write {
                bank,
                col,
                data,
                mask,
            } => Self {
                addr: col & !A10,
                bank,
                dqm: mask,
                dq: Some(data),
                ..Self::strobes(true, false, false)
            },
            Command::PrechargeAll => Self {
                addr: A10,
                ..Self::strobes(false, true, false)
            },
            Command::Refresh => Self::strobes(false, false, true),
            Command::LoadMode(mode) => Self {
                addr: mode.word(),
                ..Self::strobes(false, false, false)
            },
        }
    }

    /// Pins for the cycles after a command's first: Nop strobes with the address,
    /// bank and mask fields held stable and the data bus released.
    pub const fn held(&self) -> Self {
        if self.cs_n {
            return *self;
        }
        Self {
            ras_n: true,
            cas_n: true,
            we_n: true,
            dq: None,
            ..*self
        }
    }

    /// Decodes the strobes back into a command, as the device samples them.
    ///
    /// Returns `None` for encodings outside the supported set (single-bank
    /// precharge, burst terminate, auto-precharge column commands, reserved
    /// mode words).
    pub const fn decode(&self) -> Option<Command> {
        if self.cs_n {
            return Some(Command::Deselect);
        }
        match (self.ras_n, self.cas_n, self.we_n) {
            (true, true, true) => Some(Command::Nop),
            (false, true, true) => Some(Command::Active {
                bank: self.bank,
                row: self.addr,
            }),
            (true, false, true) if self.addr & A10 == 0 => Some(Command::Read {
                bank: self.bank,
                col: self.addr,
            }),
            (true, false, false) if self.addr & A10 == 0 => Some(Command::Write {
                bank: self.bank,
                col: self.addr,
                data: match self.dq {
                    Some(d) => d,
                    None => 0,
                },
                mask: self.dqm,
            }),
            (false, true, false) if self.addr & A10 != 0 => Some(Command::PrechargeAll),
            (false, false, true) => Some(Command::Refresh),
            (false, false, false) => match ModeRegister::from_word(self.addr) {
                Some(mode) => Some(Command::LoadMode(mode)),
                None => None,
            },
            _ => None,
        }
    }
}
