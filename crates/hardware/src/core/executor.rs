//! Command timing executor.
//!
//! The executor is the only component that drives the device pins. It:
//! 1. **Accepts** one command when idle, or on the cycle its previous command reports `done`.
//! 2. **Holds** it for the table's hold time, counting down from `hold - 1`.
//! 3. **Registers** the pins: the command strobes appear one cycle after issue, then Nop
//!    strobes with stable address fields for the rest of the hold.
//! 4. **Guards** the pairs hold time alone cannot cover: Active to Precharge (tRAS) and
//!    Active to Active (tRC).

use crate::core::command::{Command, CommandKind};
use crate::core::pins::PinState;
use crate::core::timing::TimingTable;

/// Registered executor state. Immutable per cycle; [`Self::step`] builds the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandExecutor {
    wip: bool,
    counter: u32,
    in_flight: Option<CommandKind>,
    since_active: u32,
    pins: PinState,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Idle executor with Deselect on the pins and no Active in recent history.
    pub const fn new() -> Self {
        Self {
            wip: false,
            counter: 0,
            in_flight: None,
            since_active: u32::MAX,
            pins: PinState::deselect(),
        }
    }

    /// A command is being held.
    #[inline]
    pub const fn wip(&self) -> bool {
        self.wip
    }

    /// The held command finishes this cycle. Pulses for exactly one cycle.
    #[inline]
    pub const fn done(&self) -> bool {
        self.wip && self.counter == 0
    }

    /// A new command may be issued this cycle (hold-wise).
    #[inline]
    pub const fn ready(&self) -> bool {
        !self.wip || self.counter == 0
    }

    /// Kind of the command currently held, if any.
    pub const fn in_flight(&self) -> Option<CommandKind> {
        if self.wip { self.in_flight } else { None }
    }

    /// Registered pin values for this cycle.
    #[inline]
    pub const fn pins(&self) -> PinState {
        self.pins
    }

    /// Returns `true` if a command of `kind` may issue this cycle: the hold has
    /// elapsed and the Active-relative guards are satisfied.
    pub const fn can_issue(&self, kind: CommandKind, timing: &TimingTable) -> bool {
        if !self.ready() {
            return false;
        }
        match kind {
            CommandKind::PrechargeAll => self.since_active >= timing.ras_cycles(),
            CommandKind::Active => self.since_active >= timing.rc_cycles(),
            _ => true,
        }
    }

    /// Computes the next registered state given this cycle's command request.
    ///
    /// The caller must only pass a command when [`Self::can_issue`] holds for it.
    pub fn step(&self, command: Option<&Command>, timing: &TimingTable) -> Self {
        let mut next = *self;
        next.since_active = self.since_active.saturating_add(1);

        match command {
            Some(cmd) => {
                debug_assert!(
                    self.can_issue(cmd.kind(), timing),
                    "{cmd} issued while executor busy with {:?}",
                    self.in_flight
                );
                next.wip = true;
                next.counter = timing.hold_cycles(cmd.kind()) - 1;
                next.in_flight = Some(cmd.kind());
                next.pins = PinState::encode(cmd);
                if cmd.kind() == CommandKind::Active {
                    next.since_active = 1;
                }
            }
            None if self.wip && self.counter > 0 => {
                next.counter = self.counter - 1;
                next.pins = self.pins.held();
            }
            None => {
                next.wip = false;
                next.counter = 0;
                next.in_flight = None;
                next.pins = PinState::deselect();
            }
        }
        next
    }
}
