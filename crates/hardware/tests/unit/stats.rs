//! # Statistics Tests
//!
//! Counter updates driven by real traffic.

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn test_counters_after_init() {
    let ctx = TestContext::new();
    let stats = ctx.sim.stats();
    assert_eq!(stats.precharges, 1);
    assert_eq!(stats.refreshes, 2);
    assert_eq!(stats.load_modes, 1);
    assert_eq!(stats.activates, 0);
    assert_eq!(stats.requests_accepted, 0);
    assert!(stats.init_cycles >= 10_000);
    assert_eq!(stats.cycles, ctx.sim.cycle());
}

#[test]
fn test_row_hit_and_miss_counts() {
    let mut ctx = TestContext::new();
    ctx.write(0x10, 0xABCD);
    let _ = ctx.read(0x10);
    let _ = ctx.read(0x11);

    let stats = ctx.sim.stats();
    assert_eq!(stats.activates, 1);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.row_misses, 1);
    assert_eq!(stats.row_hits, 2);
    assert_eq!(stats.requests_accepted, 3);
    assert_eq!(stats.responses_delivered, 2);
    assert!((stats.row_hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_max_refresh_gap_tracks_interval() {
    let mut ctx = TestContext::new();
    let interval = u64::from(ctx.sim.controller.timing().refresh_interval_cycles());
    ctx.sim.run(interval * 4);
    let stats = ctx.sim.stats();
    assert!(stats.refreshes >= 2 + 3);
    assert!(stats.max_refresh_gap > 0);
    assert!(stats.max_refresh_gap <= interval);
}

#[test]
fn test_print_sections_accepts_every_section() {
    let ctx = TestContext::new();
    let stats = ctx.sim.stats();
    for section in sdram_core::stats::STATS_SECTIONS {
        stats.print_sections(&[section.to_string()]);
    }
    stats.print();
}
