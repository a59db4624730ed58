//! Controller core.
//!
//! This module contains the four components of the controller and the top level
//! that advances them in lock-step: the timing table, the command timing executor,
//! the initialization sequencer and the main scheduler.

/// Device command set and mode-register packing.
pub mod command;

/// Top level: command mux and double-buffered state.
pub mod controller;

/// Command timing executor.
pub mod executor;

/// Power-up initialization sequencer.
pub mod init;

/// Pin-level command encoding.
pub mod pins;

/// Read-response realignment.
pub mod read_pipeline;

/// Periodic refresh obligation.
pub mod refresh;

/// Request and response types.
pub mod request;

/// Main scheduler.
pub mod scheduler;

/// Datasheet constants in cycles.
pub mod timing;

pub use self::command::{Command, CommandKind, ModeRegister};
pub use self::controller::{ControllerOutputs, SdramController};
pub use self::request::{Request, RequestKind, Response};
