//! Main scheduler.
//!
//! The central state machine of the controller. Each cycle it:
//! 1. **Accepts** at most one request into a depth-1 slot.
//! 2. **Decides** at decision points which command is legal next, from the open-row state,
//!    the held request and the refresh obligation.
//! 3. **Drives** the executor once initialization is done.
//! 4. **Realigns** read data through the read pipeline and presents the response.
//!
//! Decision points are the cycles on which the executor is ready. A command in flight
//! always runs to completion; a due refresh only wins at the next decision point.

use crate::common::addr::{AddressMap, DecodedAddress};
use crate::config::WriteAck;
use crate::core::command::{Command, CommandKind};
use crate::core::executor::CommandExecutor;
use crate::core::read_pipeline::ReadPipeline;
use crate::core::refresh::RefreshObligation;
use crate::core::request::{Request, RequestKind, Response};
use crate::core::timing::TimingTable;

/// Scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedState {
    /// Out of reset; moves to `Init` unconditionally.
    Reset,
    /// Waiting for the initialization sequencer.
    Init,
    /// Waiting for work.
    Idle,
    /// Active in flight for the held request.
    RowActive,
    /// Write in flight.
    Write,
    /// Read in flight.
    Read,
    /// Precharge-all in flight.
    Precharge,
    /// Auto-refresh in flight.
    AutoRefresh,
}

/// Which row, if any, is currently open.
///
/// Updated only when an Active or Precharge-all completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenRow {
    /// Bank of the open row.
    pub bank: u32,
    /// Open row.
    pub row: u32,
    /// No row is open; an Active is required before any access.
    pub precharged: bool,
}

impl Default for OpenRow {
    fn default() -> Self {
        Self {
            bank: 0,
            row: 0,
            precharged: true,
        }
    }
}

impl OpenRow {
    /// The target can be accessed without opening a new row.
    #[inline]
    pub const fn hits(&self, target: &DecodedAddress) -> bool {
        !self.precharged && self.bank == target.bank && self.row == target.row
    }

    /// Opening `target` requires a new Active (`isPrecharged OR target != open`).
    #[inline]
    pub const fn needs_new_row(&self, target: &DecodedAddress) -> bool {
        !self.hits(target)
    }
}

/// A request in the depth-1 slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldRequest {
    /// The accepted request.
    pub request: Request,
    /// Its Read/Write command has been issued; waiting on release.
    pub issued: bool,
}

/// Static parameters the scheduler consults every cycle.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerParams<'a> {
    /// Hold and refresh timing.
    pub timing: &'a TimingTable,
    /// Request address decomposition.
    pub map: AddressMap,
    /// Write acknowledge policy.
    pub write_ack: WriteAck,
    /// Mask covering the data bus width.
    pub data_mask: u64,
    /// Mask covering the byte lanes.
    pub lane_mask: u8,
}

/// Per-cycle inputs sampled by the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerInputs<'a> {
    /// Request presented by the bus adapter this cycle.
    pub request: Option<Request>,
    /// Value on the device data bus this cycle.
    pub dq_in: Option<u64>,
    /// Current executor state.
    pub executor: &'a CommandExecutor,
    /// The initialization sequencer has finished.
    pub init_done: bool,
}

/// Result of one scheduler step.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerStep {
    /// Next registered state.
    pub next: Scheduler,
    /// Command for the executor this cycle.
    pub command: Option<Command>,
    /// The presented request was accepted this cycle.
    pub accepted: bool,
}

/// Registered scheduler state. Immutable per cycle; [`Self::step`] builds the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler {
    state: SchedState,
    slot: Option<HeldRequest>,
    open_row: OpenRow,
    refresh: RefreshObligation,
    pipeline: ReadPipeline,
    read_data: u64,
}

impl Scheduler {
    /// Scheduler in reset.
    pub const fn new(cas_latency: u8) -> Self {
        Self {
            state: SchedState::Reset,
            slot: None,
            open_row: OpenRow {
                bank: 0,
                row: 0,
                precharged: true,
            },
            refresh: RefreshObligation::disarmed(),
            pipeline: ReadPipeline::new(cas_latency),
            read_data: 0,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SchedState {
        self.state
    }

    /// Open-row state.
    pub const fn open_row(&self) -> OpenRow {
        self.open_row
    }

    /// Refresh obligation.
    pub const fn refresh(&self) -> RefreshObligation {
        self.refresh
    }

    /// The request currently held, if any.
    pub const fn held(&self) -> Option<HeldRequest> {
        self.slot
    }

    /// The request interface can take a new request this cycle.
    #[inline]
    pub const fn ready(&self) -> bool {
        self.slot.is_none() && !matches!(self.state, SchedState::Reset | SchedState::Init)
    }

    /// Response channel for this cycle.
    pub const fn response(&self) -> Response {
        Response {
            early_valid: self.pipeline.early_valid(),
            valid: self.pipeline.valid(),
            data: self.read_data,
        }
    }

    /// Held request whose command has not been issued yet.
    const fn pending(&self) -> Option<HeldRequest> {
        match self.slot {
            Some(held) if !held.issued => Some(held),
            _ => None,
        }
    }

    /// Computes the next registered state and this cycle's command.
    ///
    /// # Arguments
    ///
    /// * `params` - Timing table, address map and write-acknowledge policy.
    /// * `inputs` - This cycle's request, device data, executor snapshot and init status.
    ///
    /// # Returns
    ///
    /// The next state, the command to issue (if any) and whether the request was accepted.
    pub fn step(&self, params: &SchedulerParams<'_>, inputs: &SchedulerInputs<'_>) -> SchedulerStep {
        let mut next = *self;
        let accepted = inputs.request.is_some() && self.ready();
        let due = self.refresh.due();
        let exec = inputs.executor;
        let mut arm_refresh = false;

        // Response delivery ends a read's residency in the slot.
        if self.pipeline.valid()
            && matches!(self.slot, Some(h) if h.issued && h.request.kind == RequestKind::Read)
        {
            next.slot = None;
        }
        if self.pipeline.early_valid() {
            next.read_data = inputs.dq_in.unwrap_or(0) & params.data_mask;
        }

        let command = match self.state {
            SchedState::Reset => {
                next.state = SchedState::Init;
                None
            }
            SchedState::Init => {
                if inputs.init_done {
                    next.state = SchedState::Idle;
                    arm_refresh = true;
                }
                None
            }
            SchedState::Idle if exec.ready() => self.decide(&mut next, params, exec, self.pending(), due),
            SchedState::RowActive if exec.ready() => match self.pending() {
                Some(held) => {
                    let target = params.map.decode(held.request.address);
                    next.open_row = OpenRow {
                        bank: target.bank,
                        row: target.row,
                        precharged: false,
                    };
                    Some(Self::issue_access(&mut next, params, held, target, due))
                }
                None => {
                    next.state = SchedState::Idle;
                    None
                }
            },
            SchedState::Write if exec.ready() => {
                // A write whose acknowledge was deferred is released on completion.
                let pending = match self.slot {
                    Some(h) if h.issued && h.request.is_write() => {
                        next.slot = None;
                        None
                    }
                    _ => self.pending(),
                };
                self.decide(&mut next, params, exec, pending, due)
            }
            SchedState::Read if exec.ready() => {
                next.state = SchedState::Idle;
                None
            }
            SchedState::Precharge if exec.ready() => {
                next.open_row.precharged = true;
                if due {
                    next.state = SchedState::AutoRefresh;
                    Some(Command::Refresh)
                } else {
                    Self::activate_pending(&mut next, params, exec, self.pending())
                }
            }
            SchedState::AutoRefresh if exec.ready() => {
                Self::activate_pending(&mut next, params, exec, self.pending())
            }
            _ => None,
        };

        if accepted {
            next.slot = inputs.request.map(|request| HeldRequest {
                request,
                issued: false,
            });
        }

        let read_issued = matches!(command, Some(Command::Read { .. }));
        next.pipeline = self.pipeline.shift(read_issued);
        next.refresh = if arm_refresh {
            RefreshObligation::armed(params.timing.refresh_reload_cycles())
        } else {
            self.refresh.step(
                matches!(command, Some(Command::Refresh)),
                params.timing.refresh_reload_cycles(),
            )
        };

        if next.state != self.state {
            tracing::trace!(from = ?self.state, to = ?next.state, "scheduler transition");
        }

        SchedulerStep {
            next,
            command,
            accepted,
        }
    }

    /// Decision point from `Idle` or after a completed Write.
    fn decide(
        &self,
        next: &mut Self,
        params: &SchedulerParams<'_>,
        exec: &CommandExecutor,
        pending: Option<HeldRequest>,
        due: bool,
    ) -> Option<Command> {
        if due {
            return Self::precharge(next, params, exec);
        }
        let Some(held) = pending else {
            next.state = SchedState::Idle;
            return None;
        };
        let target = params.map.decode(held.request.address);
        if self.open_row.hits(&target) {
            Some(Self::issue_access(next, params, held, target, due))
        } else if self.open_row.precharged {
            Self::activate_pending(next, params, exec, Some(held))
        } else {
            Self::precharge(next, params, exec)
        }
    }

    /// Issues Precharge-all once tRAS allows; otherwise waits in the current state.
    fn precharge(
        next: &mut Self,
        params: &SchedulerParams<'_>,
        exec: &CommandExecutor,
    ) -> Option<Command> {
        if exec.can_issue(CommandKind::PrechargeAll, params.timing) {
            next.state = SchedState::Precharge;
            Some(Command::PrechargeAll)
        } else {
            None
        }
    }

    /// Opens the row of the pending request, or returns to `Idle` if there is none.
    fn activate_pending(
        next: &mut Self,
        params: &SchedulerParams<'_>,
        exec: &CommandExecutor,
        pending: Option<HeldRequest>,
    ) -> Option<Command> {
        let Some(held) = pending else {
            next.state = SchedState::Idle;
            return None;
        };
        if !exec.can_issue(CommandKind::Active, params.timing) {
            return None;
        }
        let target = params.map.decode(held.request.address);
        next.state = SchedState::RowActive;
        Some(Command::Active {
            bank: target.bank,
            row: target.row,
        })
    }

    /// Issues the held request's Read or Write against the open row.
    fn issue_access(
        next: &mut Self,
        params: &SchedulerParams<'_>,
        held: HeldRequest,
        target: DecodedAddress,
        due: bool,
    ) -> Command {
        let request = held.request;
        match request.kind {
            RequestKind::Read => {
                next.state = SchedState::Read;
                next.slot = Some(HeldRequest {
                    issued: true,
                    ..held
                });
                Command::Read {
                    bank: target.bank,
                    col: target.col,
                }
            }
            RequestKind::Write => {
                next.state = SchedState::Write;
                let release_now = params.write_ack == WriteAck::Pipelined && !due;
                next.slot = if release_now {
                    None
                } else {
                    Some(HeldRequest {
                        issued: true,
                        ..held
                    })
                };
                Command::Write {
                    bank: target.bank,
                    col: target.col,
                    data: request.write_data & params.data_mask,
                    mask: !request.byte_enable & params.lane_mask,
                }
            }
        }
    }
}
