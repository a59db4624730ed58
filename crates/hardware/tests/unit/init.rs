//! # Initialization Sequencer Tests
//!
//! Power-up order and spacing at each bench clock, checked at the device pins.

use pretty_assertions::assert_eq;
use rstest::rstest;
use sdram_core::config::Config;
use sdram_core::core::command::{Command, CommandKind, ModeRegister};
use sdram_core::core::init::{InitSequencer, InitState};
use sdram_core::core::executor::CommandExecutor;
use sdram_core::core::scheduler::SchedState;
use sdram_core::core::timing::TimingTable;
use sdram_core::sim::Simulator;

use crate::common::harness::init_tracing;

#[rstest]
#[case(50)]
#[case(100)]
#[case(133)]
fn test_init_order_and_spacing(#[case] mhz: u32) {
    init_tracing();
    let config = Config::at_clock(mhz);
    let mut sim = Simulator::new(&config).unwrap();

    while !sim.controller.init_done() {
        assert!(!sim.controller.outputs().ready);
        let _ = sim.tick(None);
    }
    sim.run(8);

    let log = sim.device.log();
    let kinds: Vec<_> = log.iter().take(4).map(|c| c.command.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            CommandKind::PrechargeAll,
            CommandKind::Refresh,
            CommandKind::Refresh,
            CommandKind::LoadMode,
        ]
    );

    let table = sim.controller.timing();
    assert!(log[0].cycle >= u64::from(config.timing.init_delay_us) * u64::from(mhz));
    for pair in log[..4].windows(2) {
        let gap = pair[1].cycle - pair[0].cycle;
        assert!(gap >= u64::from(table.hold_cycles(pair[0].command.kind())));
    }

    assert_eq!(sim.device.cas_latency(), Some(config.mode.cas_latency));
    assert_eq!(sim.controller.state(), SchedState::Idle);
    assert!(sim.device.violations().is_empty());
}

#[test]
fn test_load_mode_carries_configured_word() {
    let mut config = Config::default();
    config.mode.cas_latency = 3;
    let mut sim = Simulator::new(&config).unwrap();
    let _ = sim.run_until_ready().unwrap();
    let load = sim
        .device
        .log()
        .iter()
        .find_map(|c| match c.command {
            Command::LoadMode(mode) => Some(mode),
            _ => None,
        })
        .unwrap();
    assert_eq!(load, ModeRegister::from_config(&config.mode));
    assert_eq!(load.word() & 0b111_0000, 3 << 4);
}

#[test]
fn test_sequencer_waits_full_power_up_delay() {
    let config = Config::default();
    let table = TimingTable::new(&config).unwrap();
    let mode = ModeRegister::from_config(&config.mode);
    let ex = CommandExecutor::new();

    let (mut seq, cmd) = InitSequencer::new().step(&ex, &table, mode);
    assert_eq!(seq.state(), InitState::Wait);
    assert_eq!(cmd, None);

    let mut waited = 0;
    loop {
        let (next, cmd) = seq.step(&ex, &table, mode);
        seq = next;
        if cmd.is_some() {
            assert_eq!(cmd, Some(Command::PrechargeAll));
            break;
        }
        waited += 1;
    }
    assert_eq!(waited, table.init_wait_cycles());
    assert_eq!(seq.state(), InitState::Precharge);
}

#[test]
fn test_sequencer_holds_state_while_executor_busy() {
    let config = Config::default();
    let table = TimingTable::new(&config).unwrap();
    let mode = ModeRegister::from_config(&config.mode);
    let busy = CommandExecutor::new().step(Some(&Command::Refresh), &table);
    assert!(!busy.ready());

    let mut seq = InitSequencer::new();
    let mut ex = CommandExecutor::new();
    loop {
        let (next, cmd) = seq.step(&ex, &table, mode);
        ex = ex.step(cmd.as_ref(), &table);
        seq = next;
        if seq.state() == InitState::Refresh0 {
            break;
        }
    }
    let (same, cmd) = seq.step(&busy, &table, mode);
    assert_eq!(same.state(), InitState::Refresh0);
    assert_eq!(cmd, None);
}
