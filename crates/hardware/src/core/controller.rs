//! SDRAM controller top level.
//!
//! Wires the four components together and advances them one clock at a time:
//! 1. **Outputs** (`ready`, response, device pins) are pure functions of the registered state.
//! 2. **Step** computes every component's next state from the same pre-step snapshot, then
//!    replaces the snapshot in one assignment, so nothing computed in a cycle can observe
//!    another value computed in that cycle.
//! 3. **Command mux** gives the initialization sequencer the executor until it is done,
//!    then hands it to the main scheduler.

use crate::common::addr::AddressMap;
use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::command::{Command, CommandKind, ModeRegister};
use crate::core::executor::CommandExecutor;
use crate::core::init::InitSequencer;
use crate::core::pins::PinState;
use crate::core::request::{Request, Response};
use crate::core::scheduler::{OpenRow, SchedState, Scheduler, SchedulerInputs, SchedulerParams};
use crate::core::timing::TimingTable;
use crate::stats::ControllerStats;

/// Everything the controller presents to the outside world in one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerOutputs {
    /// A request presented this cycle will be accepted.
    pub ready: bool,
    /// Read response channel.
    pub response: Response,
    /// Registered device pins.
    pub pins: PinState,
}

/// Registered state of all components; replaced as a whole once per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CoreState {
    executor: CommandExecutor,
    init: InitSequencer,
    scheduler: Scheduler,
}

/// Cycle-stepped SDR SDRAM controller.
#[derive(Debug)]
pub struct SdramController {
    timing: TimingTable,
    map: AddressMap,
    mode: ModeRegister,
    data_mask: u64,
    lane_mask: u8,
    write_ack: crate::config::WriteAck,
    trace_commands: bool,
    cycle: u64,
    state: CoreState,
    last_issued: Option<CommandKind>,
    last_refresh: Option<u64>,
    stats: ControllerStats,
}

impl SdramController {
    /// Validates the configuration and builds a controller held in reset.
    ///
    /// # Arguments
    ///
    /// * `config` - Part geometry, timing constants, mode fields and controller options.
    ///
    /// # Returns
    ///
    /// A controller at cycle 0 with initialization not yet started.
    ///
    /// # Errors
    ///
    /// Returns the first configuration-validity rule the configuration breaks.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let timing = TimingTable::new(config)?;
        let lanes = config.geometry.byte_lanes();
        Ok(Self {
            timing,
            map: AddressMap::from_geometry(&config.geometry),
            mode: ModeRegister::from_config(&config.mode),
            data_mask: config.geometry.data_mask(),
            lane_mask: if lanes >= 8 { u8::MAX } else { (1u8 << lanes) - 1 },
            write_ack: config.controller.write_ack,
            trace_commands: config.general.trace_commands,
            cycle: 0,
            state: CoreState {
                executor: CommandExecutor::new(),
                init: InitSequencer::new(),
                scheduler: Scheduler::new(config.mode.cas_latency),
            },
            last_issued: None,
            last_refresh: None,
            stats: ControllerStats::default(),
        })
    }

    /// Outputs for the current cycle.
    pub const fn outputs(&self) -> ControllerOutputs {
        ControllerOutputs {
            ready: self.state.scheduler.ready(),
            response: self.state.scheduler.response(),
            pins: self.state.executor.pins(),
        }
    }

    /// Advances one clock.
    ///
    /// # Arguments
    ///
    /// * `request` - Bus request presented this cycle. Accepted only if
    ///   [`ControllerOutputs::ready`] was asserted.
    /// * `dq_in` - Whatever the device drives on the data bus this cycle.
    ///
    /// # Returns
    ///
    /// The command handed to the executor this cycle, if any.
    pub fn step(&mut self, request: Option<Request>, dq_in: Option<u64>) -> Option<Command> {
        let cur = self.state;
        let init_done = cur.init.is_done();

        let (init, init_command) = cur.init.step(&cur.executor, &self.timing, self.mode);
        let params = SchedulerParams {
            timing: &self.timing,
            map: self.map,
            write_ack: self.write_ack,
            data_mask: self.data_mask,
            lane_mask: self.lane_mask,
        };
        let sched = cur.scheduler.step(
            &params,
            &SchedulerInputs {
                request,
                dq_in,
                executor: &cur.executor,
                init_done,
            },
        );

        let command = if init_done {
            sched.command
        } else {
            init_command
        };
        let executor = cur.executor.step(command.as_ref(), &self.timing);

        self.state = CoreState {
            executor,
            init,
            scheduler: sched.next,
        };

        self.account(&cur, command.as_ref(), sched.accepted, init_done);
        self.cycle += 1;
        command
    }

    fn account(&mut self, cur: &CoreState, command: Option<&Command>, accepted: bool, init_done: bool) {
        let stats = &mut self.stats;
        stats.cycles += 1;
        if !init_done {
            stats.init_cycles += 1;
        }
        if accepted {
            stats.requests_accepted += 1;
        }
        if cur.scheduler.response().valid {
            stats.responses_delivered += 1;
        }

        let Some(cmd) = command else {
            return;
        };
        if self.trace_commands {
            tracing::debug!(cycle = self.cycle, command = %cmd, "issue");
        }
        match cmd.kind() {
            CommandKind::Active => stats.activates += 1,
            CommandKind::Read | CommandKind::Write => {
                if cmd.kind() == CommandKind::Read {
                    stats.reads += 1;
                } else {
                    stats.writes += 1;
                }
                if self.last_issued == Some(CommandKind::Active) {
                    stats.row_misses += 1;
                } else {
                    stats.row_hits += 1;
                }
            }
            CommandKind::PrechargeAll => stats.precharges += 1,
            CommandKind::Refresh => {
                stats.refreshes += 1;
                if init_done {
                    if let Some(prev) = self.last_refresh {
                        stats.max_refresh_gap = stats.max_refresh_gap.max(self.cycle - prev);
                    }
                    self.last_refresh = Some(self.cycle);
                }
            }
            CommandKind::LoadMode => stats.load_modes += 1,
            CommandKind::Deselect | CommandKind::Nop => {}
        }
        self.last_issued = Some(cmd.kind());
    }

    /// Cycles stepped since reset.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Initialization has completed and requests can be served.
    pub const fn init_done(&self) -> bool {
        self.state.init.is_done()
    }

    /// Main scheduler state.
    pub const fn state(&self) -> SchedState {
        self.state.scheduler.state()
    }

    /// Open-row state.
    pub const fn open_row(&self) -> OpenRow {
        self.state.scheduler.open_row()
    }

    /// Timing table in use.
    pub const fn timing(&self) -> &TimingTable {
        &self.timing
    }

    /// Address decomposition in use.
    pub const fn address_map(&self) -> AddressMap {
        self.map
    }

    /// Read-only view of the scheduler.
    pub const fn scheduler(&self) -> &Scheduler {
        &self.state.scheduler
    }

    /// Read-only view of the executor.
    pub const fn executor(&self) -> &CommandExecutor {
        &self.state.executor
    }

    /// Collected statistics.
    pub const fn stats(&self) -> &ControllerStats {
        &self.stats
    }
}
