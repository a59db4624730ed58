//! Behavioral SDR SDRAM model.
//!
//! Samples the command bus at each rising edge and keeps just enough state to
//! answer reads and to check the controller against the datasheet: per-bank
//! open rows with their activation and write times, the last precharge,
//! refresh and load-mode times, and the programmed mode register.
//!
//! Storage is sparse; never-written words read as zero. Every broken rule is
//! recorded as a [`TimingViolation`] and the model keeps going.

use std::collections::{HashMap, VecDeque};

use crate::common::addr::AddressMap;
use crate::config::{Config, TimingConfig};
use crate::core::command::{Command, ModeRegister};
use crate::core::pins::PinState;
use crate::device::SdramDevice;
use crate::device::violation::{IssuedCommand, TimingViolation, ViolationKind};

#[derive(Clone, Copy, Debug, Default)]
struct Bank {
    open_row: Option<u32>,
    activated_at: Option<u64>,
    written_at: Option<u64>,
}

/// Pin-level SDRAM model with datasheet checks.
#[derive(Debug)]
pub struct BehavioralSdram {
    clock_mhz: u32,
    timing: TimingConfig,
    map: AddressMap,
    lanes: u32,
    data_mask: u64,
    power_up_cycles: u64,

    cycle: u64,
    banks: Vec<Bank>,
    mode: Option<ModeRegister>,
    precharged_at: Option<u64>,
    refreshed_at: Option<u64>,
    mode_loaded_at: Option<u64>,
    last_activate: Option<(u32, u64)>,

    storage: HashMap<u64, u64>,
    read_queue: VecDeque<(u64, u64)>,
    log: Vec<IssuedCommand>,
    violations: Vec<TimingViolation>,
}

impl BehavioralSdram {
    /// Builds a powered-up, uninitialized device matching the configuration.
    pub fn new(config: &Config) -> Self {
        let geometry = &config.geometry;
        let mhz = config.general.clock_mhz;
        Self {
            clock_mhz: mhz,
            timing: config.timing.clone(),
            map: AddressMap::from_geometry(geometry),
            lanes: geometry.byte_lanes(),
            data_mask: geometry.data_mask(),
            power_up_cycles: u64::from(config.timing.init_delay_us) * u64::from(mhz),
            cycle: 0,
            banks: vec![Bank::default(); 1 << geometry.bank_bits.min(8)],
            mode: None,
            precharged_at: None,
            refreshed_at: None,
            mode_loaded_at: None,
            last_activate: None,
            storage: HashMap::new(),
            read_queue: VecDeque::new(),
            log: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Cycles clocked so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Every non-idle command sampled, in order.
    pub fn log(&self) -> &[IssuedCommand] {
        &self.log
    }

    /// Every rule broken so far, in order.
    pub fn violations(&self) -> &[TimingViolation] {
        &self.violations
    }

    /// CAS latency from the last Load-mode, if one was sampled.
    pub fn cas_latency(&self) -> Option<u8> {
        self.mode.map(|m| m.cas_latency)
    }

    /// Open row of `bank`, if any.
    pub fn open_row(&self, bank: u32) -> Option<u32> {
        self.banks.get(bank as usize).and_then(|b| b.open_row)
    }

    /// Stored word at a request address, bypassing the command bus.
    pub fn peek(&self, address: u64) -> u64 {
        let d = self.map.decode(address);
        self.storage
            .get(&self.map.encode(d.bank, d.row, d.col))
            .copied()
            .unwrap_or(0)
    }

    fn violation(&mut self, kind: ViolationKind, command: Option<Command>) {
        let v = TimingViolation {
            cycle: self.cycle,
            kind,
            command,
        };
        tracing::warn!(violation = %v, "SDRAM protocol violation");
        self.violations.push(v);
    }

    /// At least `ns` nanoseconds have passed since `since`.
    fn elapsed_ns(&self, since: Option<u64>, ns: u32) -> bool {
        since.is_none_or(|s| (self.cycle - s) * 1000 >= u64::from(ns) * u64::from(self.clock_mhz))
    }

    fn check(&mut self, ok: bool, kind: ViolationKind, command: Command) {
        if !ok {
            self.violation(kind, Some(command));
        }
    }

    fn any_open(&self) -> bool {
        self.banks.iter().any(|b| b.open_row.is_some())
    }

    fn execute(&mut self, command: Command) {
        let t = self.timing.clone();

        if self.cycle < self.power_up_cycles {
            self.violation(ViolationKind::PowerUp, Some(command));
        }
        self.check(
            self.elapsed_ns(self.refreshed_at, t.t_rfc),
            ViolationKind::Trfc,
            command,
        );
        let mrd_met = self
            .mode_loaded_at
            .is_none_or(|s| self.cycle - s >= u64::from(t.t_mrd));
        self.check(mrd_met, ViolationKind::Tmrd, command);

        match command {
            Command::Active { bank, row } => {
                self.check(
                    self.elapsed_ns(self.precharged_at, t.t_rp),
                    ViolationKind::Trp,
                    command,
                );
                if let Some((other, at)) = self.last_activate {
                    if other != bank {
                        self.check(self.elapsed_ns(Some(at), t.t_rrd), ViolationKind::Trrd, command);
                    }
                }
                let Some(state) = self.banks.get(bank as usize).copied() else {
                    self.violation(ViolationKind::UnsupportedCommand, Some(command));
                    return;
                };
                if state.open_row.is_some() {
                    self.violation(ViolationKind::BankAlreadyOpen, Some(command));
                }
                self.check(
                    self.elapsed_ns(state.activated_at, t.t_rc),
                    ViolationKind::Trc,
                    command,
                );
                self.banks[bank as usize] = Bank {
                    open_row: Some(row),
                    activated_at: Some(self.cycle),
                    written_at: None,
                };
                self.last_activate = Some((bank, self.cycle));
            }
            Command::Read { bank, col } => {
                let Some((row, cl)) = self.access(command, bank) else {
                    return;
                };
                let data = self
                    .storage
                    .get(&self.map.encode(bank, row, col))
                    .copied()
                    .unwrap_or(0);
                self.read_queue.push_back((self.cycle + u64::from(cl), data));
            }
            Command::Write {
                bank,
                col,
                data,
                mask,
            } => {
                let Some((row, _)) = self.access(command, bank) else {
                    return;
                };
                let key = self.map.encode(bank, row, col);
                let lanes = self.lanes;
                let data_mask = self.data_mask;
                let word = self.storage.entry(key).or_insert(0);
                for lane in 0..lanes {
                    if mask & (1 << lane) == 0 {
                        let byte = 0xFFu64 << (lane * 8);
                        *word = (*word & !byte) | (data & byte);
                    }
                }
                *word &= data_mask;
                self.banks[bank as usize].written_at = Some(self.cycle);
            }
            Command::PrechargeAll => {
                for i in 0..self.banks.len() {
                    let bank = self.banks[i];
                    if bank.open_row.is_none() {
                        continue;
                    }
                    self.check(
                        self.elapsed_ns(bank.activated_at, t.t_ras),
                        ViolationKind::Tras,
                        command,
                    );
                    self.check(
                        self.elapsed_ns(bank.written_at, t.t_wr),
                        ViolationKind::Twr,
                        command,
                    );
                    self.banks[i].open_row = None;
                    self.banks[i].written_at = None;
                }
                self.precharged_at = Some(self.cycle);
            }
            Command::Refresh => {
                self.check(
                    self.elapsed_ns(self.precharged_at, t.t_rp),
                    ViolationKind::Trp,
                    command,
                );
                if self.any_open() {
                    self.violation(ViolationKind::RefreshWithOpenRow, Some(command));
                }
                self.refreshed_at = Some(self.cycle);
            }
            Command::LoadMode(mode) => {
                self.check(
                    self.elapsed_ns(self.precharged_at, t.t_rp),
                    ViolationKind::Trp,
                    command,
                );
                if self.any_open() {
                    self.violation(ViolationKind::LoadModeWithOpenRow, Some(command));
                }
                self.mode = Some(mode);
                self.mode_loaded_at = Some(self.cycle);
            }
            Command::Deselect | Command::Nop => {}
        }
    }

    /// Common checks for Read and Write. Returns the open row and CAS latency
    /// when the access can proceed.
    fn access(&mut self, command: Command, bank: u32) -> Option<(u32, u8)> {
        let Some(mode) = self.mode else {
            self.violation(ViolationKind::ModeNotSet, Some(command));
            return None;
        };
        let state = self.banks.get(bank as usize).copied().unwrap_or_default();
        let Some(row) = state.open_row else {
            self.violation(ViolationKind::BankClosed, Some(command));
            return None;
        };
        self.check(
            self.elapsed_ns(state.activated_at, self.timing.t_rcd),
            ViolationKind::Trcd,
            command,
        );
        Some((row, mode.cas_latency))
    }
}

impl SdramDevice for BehavioralSdram {
    fn drive(&self) -> Option<u64> {
        self.read_queue
            .iter()
            .find(|&&(due, _)| due == self.cycle)
            .map(|&(_, data)| data)
    }

    fn clock(&mut self, pins: &PinState) {
        if pins.dq.is_some() && self.drive().is_some() {
            self.violation(ViolationKind::BusContention, pins.decode());
        }
        match pins.decode() {
            None => self.violation(ViolationKind::UnsupportedCommand, None),
            Some(cmd) if cmd.is_idle() => {}
            Some(cmd) => {
                self.log.push(IssuedCommand {
                    cycle: self.cycle,
                    command: cmd,
                });
                self.execute(cmd);
            }
        }
        let now = self.cycle;
        self.read_queue.retain(|&(due, _)| due > now);
        self.cycle += 1;
    }
}
