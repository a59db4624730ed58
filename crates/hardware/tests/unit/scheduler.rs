//! # Main Scheduler Tests
//!
//! Command sequences for row hits, row misses and refresh, request slot
//! release, and the two write-acknowledge policies.

use pretty_assertions::assert_eq;
use sdram_core::config::{Config, WriteAck};
use sdram_core::core::command::{Command, CommandKind};
use sdram_core::core::scheduler::SchedState;
use sdram_core::Request;

use crate::common::harness::TestContext;

fn kinds(commands: &[Command]) -> Vec<CommandKind> {
    commands.iter().map(Command::kind).collect()
}

#[test]
fn test_write_then_read_same_address() {
    let mut ctx = TestContext::new();
    ctx.write(0x10, 0xABCD);
    assert_eq!(ctx.read(0x10), 0xABCD);
    assert_eq!(
        kinds(&ctx.access_commands()),
        vec![CommandKind::Active, CommandKind::Write, CommandKind::Read]
    );
    ctx.assert_no_violations();
}

#[test]
fn test_active_to_read_spacing_is_trcd() {
    let mut ctx = TestContext::new();
    let _ = ctx.read(ctx.addr(2, 40, 7));
    let traffic = ctx.traffic();
    assert_eq!(traffic[0].command, Command::Active { bank: 2, row: 40 });
    assert_eq!(traffic[1].command, Command::Read { bank: 2, col: 7 });
    assert_eq!(traffic[1].cycle - traffic[0].cycle, 2);
}

#[test]
fn test_row_miss_precharges_then_activates() {
    let mut ctx = TestContext::new();
    let first = ctx.addr(0, 1, 0);
    let second = ctx.addr(0, 2, 0);
    ctx.write(first, 0x1111);
    ctx.write(second, 0x2222);
    assert_eq!(ctx.read(first), 0x1111);
    assert_eq!(
        ctx.access_commands(),
        vec![
            Command::Active { bank: 0, row: 1 },
            Command::Write {
                bank: 0,
                col: 0,
                data: 0x1111,
                mask: 0
            },
            Command::PrechargeAll,
            Command::Active { bank: 0, row: 2 },
            Command::Write {
                bank: 0,
                col: 0,
                data: 0x2222,
                mask: 0
            },
            Command::PrechargeAll,
            Command::Active { bank: 0, row: 1 },
            Command::Read { bank: 0, col: 0 },
        ]
    );
    ctx.assert_no_violations();
}

#[test]
fn test_different_bank_is_a_row_miss() {
    let mut ctx = TestContext::new();
    ctx.write(ctx.addr(0, 3, 0), 1);
    ctx.write(ctx.addr(1, 3, 0), 2);
    ctx.settle();
    assert_eq!(
        kinds(&ctx.access_commands()),
        vec![
            CommandKind::Active,
            CommandKind::Write,
            CommandKind::PrechargeAll,
            CommandKind::Active,
            CommandKind::Write,
        ]
    );
    let open = ctx.sim.controller.open_row();
    assert!(!open.precharged);
    assert_eq!((open.bank, open.row), (1, 3));
}

#[test]
fn test_sequential_columns_stay_in_row() {
    let mut ctx = TestContext::new();
    for col in 0..8 {
        ctx.write(ctx.addr(3, 100, col), u64::from(col) * 3);
    }
    for col in 0..8 {
        assert_eq!(ctx.read(ctx.addr(3, 100, col)), u64::from(col) * 3);
    }
    let activates = ctx
        .access_commands()
        .iter()
        .filter(|c| c.kind() == CommandKind::Active)
        .count();
    assert_eq!(activates, 1);
    ctx.assert_no_violations();
}

#[test]
fn test_byte_enable_masks_lanes() {
    let mut ctx = TestContext::new();
    ctx.write(0x40, 0xFFFF);
    ctx.sim.write(0x40, 0x1234, 0b01).unwrap();
    assert_eq!(ctx.read(0x40), 0xFF34);
    ctx.sim.write(0x40, 0xAB00, 0b10).unwrap();
    assert_eq!(ctx.read(0x40), 0xAB34);
}

#[test]
fn test_refresh_due_with_pending_request() {
    let mut ctx = TestContext::new();
    let a = ctx.addr(1, 5, 3);
    ctx.write(a, 0x55AA);
    ctx.settle();
    let before = ctx.traffic().len();

    let mut guard = 0;
    while ctx.sim.controller.scheduler().refresh().remaining() > 1 {
        let _ = ctx.tick(None);
        guard += 1;
        assert!(guard < 10_000);
    }
    let cycle = ctx.tick(Some(Request::read(a)));
    assert!(cycle.accepted);

    let data = loop {
        let cycle = ctx.tick(None);
        if cycle.valid {
            break cycle.read_data;
        }
    };
    assert_eq!(data, 0x55AA);

    let after: Vec<_> = ctx.traffic()[before..].iter().map(|c| c.command).collect();
    assert_eq!(
        kinds(&after),
        vec![
            CommandKind::PrechargeAll,
            CommandKind::Refresh,
            CommandKind::Active,
            CommandKind::Read,
        ]
    );
    ctx.assert_no_violations();
}

#[test]
fn test_due_refresh_starts_from_idle() {
    let mut ctx = TestContext::new();
    ctx.write(0, 7);
    ctx.settle();
    while !ctx.sim.controller.scheduler().refresh().due() {
        let _ = ctx.tick(None);
    }
    // Executor is idle, so the due refresh starts at once.
    let _ = ctx.tick(None);
    assert_eq!(ctx.sim.controller.state(), SchedState::Precharge);
}

/// Presents `request` every cycle until it is accepted, recording the
/// scheduler state after each clock.
fn drive_until_accepted(ctx: &mut TestContext, request: Request, states: &mut Vec<SchedState>) {
    loop {
        let cycle = ctx.tick(Some(request));
        states.push(ctx.sim.controller.state());
        if cycle.accepted {
            return;
        }
    }
}

#[test]
fn test_back_to_back_writes_skip_idle() {
    let mut ctx = TestContext::new();
    let hold = u64::from(ctx.sim.controller.timing().hold_cycles(CommandKind::Write));
    let first = ctx.addr(1, 2, 0);
    let second = ctx.addr(1, 2, 1);

    let mut states = Vec::new();
    drive_until_accepted(&mut ctx, Request::write(first, 0x1111, 0b11), &mut states);
    drive_until_accepted(&mut ctx, Request::write(second, 0x2222, 0b11), &mut states);
    drive_until_accepted(&mut ctx, Request::read(first), &mut states);
    loop {
        let cycle = ctx.tick(None);
        states.push(ctx.sim.controller.state());
        if cycle.valid {
            assert_eq!(cycle.read_data, 0x1111);
            break;
        }
    }

    let traffic = ctx.traffic();
    assert_eq!(
        traffic.iter().map(|c| c.command).collect::<Vec<_>>(),
        vec![
            Command::Active { bank: 1, row: 2 },
            Command::Write {
                bank: 1,
                col: 0,
                data: 0x1111,
                mask: 0,
            },
            Command::Write {
                bank: 1,
                col: 1,
                data: 0x2222,
                mask: 0,
            },
            Command::Read { bank: 1, col: 0 },
        ]
    );
    assert_eq!(traffic[2].cycle - traffic[1].cycle, hold);
    assert_eq!(traffic[3].cycle - traffic[2].cycle, hold);

    let write_at = states.iter().position(|s| *s == SchedState::Write).unwrap();
    let read_at = states.iter().position(|s| *s == SchedState::Read).unwrap();
    assert!(
        !states[write_at..read_at].contains(&SchedState::Idle),
        "{states:?}"
    );
    ctx.assert_no_violations();
}

#[test]
fn test_read_slot_released_when_valid() {
    let mut ctx = TestContext::new();
    let cycle = ctx.tick(Some(Request::read(0x8)));
    assert!(cycle.accepted);
    loop {
        let cycle = ctx.tick(None);
        if cycle.valid {
            break;
        }
        assert!(!ctx.sim.controller.outputs().ready);
    }
    assert!(ctx.sim.controller.outputs().ready);
}

#[test]
fn test_request_ignored_while_not_ready() {
    let mut ctx = TestContext::new();
    assert!(ctx.tick(Some(Request::write(0x1, 0xAAAA, 0b11))).accepted);
    let refused = ctx.tick(Some(Request::write(0x2, 0xBBBB, 0b11)));
    assert!(!refused.accepted);
    ctx.settle();
    assert_eq!(ctx.read(0x2), 0);
    assert_eq!(ctx.read(0x1), 0xAAAA);
}

fn cycles_until_ready_after_write(write_ack: WriteAck) -> u64 {
    let mut config = Config::default();
    config.controller.write_ack = write_ack;
    let mut ctx = TestContext::with_config(config);
    ctx.write(0x100, 0x4242);
    ctx.sim.run_until_ready().unwrap()
}

#[test]
fn test_after_recovery_ack_waits_write_hold() {
    let pipelined = cycles_until_ready_after_write(WriteAck::Pipelined);
    let after = cycles_until_ready_after_write(WriteAck::AfterRecovery);
    let table = sdram_core::core::timing::TimingTable::new(&Config::default()).unwrap();
    assert_eq!(after - pipelined, u64::from(table.hold_cycles(CommandKind::Write)));
}

#[test]
fn test_after_recovery_data_lands() {
    let mut config = Config::default();
    config.controller.write_ack = WriteAck::AfterRecovery;
    let mut ctx = TestContext::with_config(config);
    ctx.write(0x77, 0x0F0F);
    assert_eq!(ctx.read(0x77), 0x0F0F);
    ctx.assert_no_violations();
}
