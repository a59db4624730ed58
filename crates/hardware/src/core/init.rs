//! Power-up initialization sequencer.
//!
//! A fixed program run once after reset:
//! `Idle -> Wait -> Precharge -> Refresh0 -> Refresh1 -> LoadMode -> Done`.
//!
//! `Wait` counts down the power-up delay with Deselect on the bus. Each later state
//! issues its command on entry and advances once the executor reports the command
//! complete. Until `Done`, this sequencer is the only source of device commands.

use crate::core::command::{Command, CommandKind, ModeRegister};
use crate::core::executor::CommandExecutor;
use crate::core::timing::TimingTable;

/// Sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    /// Held in reset.
    Idle,
    /// Power-up delay.
    Wait,
    /// Precharge-all in flight.
    Precharge,
    /// First auto-refresh in flight.
    Refresh0,
    /// Second auto-refresh in flight.
    Refresh1,
    /// Load-mode in flight.
    LoadMode,
    /// Terminal; the device is ready for access.
    Done,
}

/// Registered sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitSequencer {
    state: InitState,
    wait: u32,
}

impl Default for InitSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl InitSequencer {
    /// Sequencer in reset.
    pub const fn new() -> Self {
        Self {
            state: InitState::Idle,
            wait: 0,
        }
    }

    /// Current state.
    pub const fn state(&self) -> InitState {
        self.state
    }

    /// Initialization has finished.
    #[inline]
    pub const fn is_done(&self) -> bool {
        matches!(self.state, InitState::Done)
    }

    /// Computes the next state and the command to issue this cycle, if any.
    pub fn step(
        &self,
        executor: &CommandExecutor,
        timing: &TimingTable,
        mode: ModeRegister,
    ) -> (Self, Option<Command>) {
        let mut next = *self;
        let mut command = None;

        match self.state {
            InitState::Idle => {
                next.state = InitState::Wait;
                next.wait = timing.init_wait_cycles();
            }
            InitState::Wait => {
                if self.wait > 0 {
                    next.wait = self.wait - 1;
                } else if executor.can_issue(CommandKind::PrechargeAll, timing) {
                    next.state = InitState::Precharge;
                    command = Some(Command::PrechargeAll);
                }
            }
            InitState::Precharge if executor.ready() => {
                next.state = InitState::Refresh0;
                command = Some(Command::Refresh);
            }
            InitState::Refresh0 if executor.ready() => {
                next.state = InitState::Refresh1;
                command = Some(Command::Refresh);
            }
            InitState::Refresh1 if executor.ready() => {
                next.state = InitState::LoadMode;
                command = Some(Command::LoadMode(mode));
            }
            InitState::LoadMode if executor.ready() => {
                next.state = InitState::Done;
                tracing::info!(cas_latency = mode.cas_latency, "SDRAM initialization complete");
            }
            _ => {}
        }

        if next.state != self.state {
            tracing::trace!(from = ?self.state, to = ?next.state, "init transition");
        }
        (next, command)
    }
}
