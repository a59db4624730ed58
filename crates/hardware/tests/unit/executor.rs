//! # Command Timing Executor Tests
//!
//! Hold accounting, the `done` pulse, back-to-back issue and the Active guards.

use rstest::rstest;
use sdram_core::config::Config;
use sdram_core::core::command::{Command, CommandKind, ModeRegister};
use sdram_core::core::executor::CommandExecutor;
use sdram_core::core::timing::TimingTable;

fn table(mhz: u32) -> TimingTable {
    TimingTable::new(&Config::at_clock(mhz)).unwrap()
}

fn sample(kind: CommandKind) -> Command {
    match kind {
        CommandKind::Deselect => Command::Deselect,
        CommandKind::Nop => Command::Nop,
        CommandKind::Active => Command::Active { bank: 1, row: 9 },
        CommandKind::Read => Command::Read { bank: 1, col: 4 },
        CommandKind::Write => Command::Write {
            bank: 1,
            col: 4,
            data: 0x5A5A,
            mask: 0,
        },
        CommandKind::PrechargeAll => Command::PrechargeAll,
        CommandKind::Refresh => Command::Refresh,
        CommandKind::LoadMode => {
            Command::LoadMode(ModeRegister::from_config(&Config::default().mode))
        }
    }
}

#[rstest]
fn test_ready_again_after_exactly_hold(
    #[values(50, 100, 133)] mhz: u32,
    #[values(
        CommandKind::Active,
        CommandKind::Read,
        CommandKind::Write,
        CommandKind::PrechargeAll,
        CommandKind::Refresh,
        CommandKind::LoadMode
    )]
    kind: CommandKind,
) {
    let t = table(mhz);
    let mut ex = CommandExecutor::new().step(Some(&sample(kind)), &t);
    let mut cycles = 1;
    while !ex.ready() {
        ex = ex.step(None, &t);
        cycles += 1;
    }
    assert_eq!(cycles, t.hold_cycles(kind));
    assert!(ex.done());
    assert_eq!(ex.in_flight(), Some(kind));
}

#[test]
fn test_idle_executor_is_ready_not_done() {
    let ex = CommandExecutor::new();
    assert!(ex.ready());
    assert!(!ex.wip());
    assert!(!ex.done());
    assert_eq!(ex.in_flight(), None);
}

#[test]
fn test_accepts_next_command_on_done_cycle() {
    let t = table(100);
    let ex = CommandExecutor::new().step(Some(&Command::Refresh), &t);
    let mut ex = ex;
    while !ex.done() {
        ex = ex.step(None, &t);
    }
    let ex = ex.step(Some(&Command::Refresh), &t);
    assert!(ex.wip());
    assert_eq!(ex.pins().decode(), Some(Command::Refresh));
}

#[test]
fn test_returns_to_deselect_after_hold() {
    let t = table(100);
    let mut ex = CommandExecutor::new().step(Some(&Command::PrechargeAll), &t);
    for _ in 0..t.hold_cycles(CommandKind::PrechargeAll) {
        ex = ex.step(None, &t);
    }
    assert!(!ex.wip());
    assert_eq!(ex.pins().decode(), Some(Command::Deselect));
}

#[test]
fn test_active_to_active_waits_for_rc() {
    let t = table(100);
    let mut ex = CommandExecutor::new().step(Some(&sample(CommandKind::Active)), &t);
    let mut cycles = 1;
    while !ex.can_issue(CommandKind::Active, &t) {
        assert!(cycles < 100);
        ex = ex.step(None, &t);
        cycles += 1;
    }
    assert_eq!(cycles, t.rc_cycles());
}

#[test]
fn test_guards_do_not_block_other_commands() {
    let t = table(100);
    let mut ex = CommandExecutor::new().step(Some(&sample(CommandKind::Active)), &t);
    while !ex.ready() {
        ex = ex.step(None, &t);
    }
    assert!(ex.can_issue(CommandKind::Read, &t));
    assert!(ex.can_issue(CommandKind::Write, &t));
    assert!(!ex.can_issue(CommandKind::PrechargeAll, &t));
}
