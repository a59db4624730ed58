//! # Timing Table Tests
//!
//! Hold-time conversion at the three supported bench clocks and the ceiling
//! arithmetic behind it.

use proptest::prelude::*;
use rstest::rstest;
use sdram_core::config::Config;
use sdram_core::core::command::CommandKind;
use sdram_core::core::timing::{TimingTable, ns_to_cycles};

#[test]
fn test_trcd_at_100mhz_is_two_cycles() {
    let table = TimingTable::new(&Config::default()).unwrap();
    assert_eq!(table.hold_cycles(CommandKind::Active), 2);
}

#[test]
fn test_idle_commands_hold_one_cycle() {
    let table = TimingTable::new(&Config::default()).unwrap();
    for kind in [CommandKind::Nop, CommandKind::Deselect, CommandKind::Read] {
        assert_eq!(table.hold_cycles(kind), 1, "{kind:?}");
    }
}

#[test]
fn test_load_mode_hold_is_in_clocks() {
    let mut config = Config::at_clock(133);
    config.timing.t_mrd = 3;
    let table = TimingTable::new(&config).unwrap();
    assert_eq!(table.hold_cycles(CommandKind::LoadMode), 3);
}

#[rstest]
#[case(50, 1, 1, 4, 1, 3, 781, 5000)]
#[case(100, 2, 2, 7, 2, 5, 1562, 10_000)]
#[case(133, 3, 3, 9, 2, 6, 2078, 13_300)]
fn test_table_at_bench_clocks(
    #[case] mhz: u32,
    #[case] active: u32,
    #[case] precharge: u32,
    #[case] refresh: u32,
    #[case] write: u32,
    #[case] ras: u32,
    #[case] interval: u32,
    #[case] init_wait: u32,
) {
    let table = TimingTable::new(&Config::at_clock(mhz)).unwrap();
    assert_eq!(table.hold_cycles(CommandKind::Active), active);
    assert_eq!(table.hold_cycles(CommandKind::PrechargeAll), precharge);
    assert_eq!(table.hold_cycles(CommandKind::Refresh), refresh);
    assert_eq!(table.hold_cycles(CommandKind::Write), write);
    assert_eq!(table.ras_cycles(), ras);
    assert_eq!(table.refresh_interval_cycles(), interval);
    assert_eq!(table.init_wait_cycles(), init_wait);
    assert!(table.refresh_reload_cycles() > 0);
}

#[test]
fn test_refresh_lead_covers_worst_case_access() {
    let table = TimingTable::new(&Config::default()).unwrap();
    let worst = table.hold_cycles(CommandKind::Active)
        + table.hold_cycles(CommandKind::Write)
        + table.ras_cycles()
        + table.hold_cycles(CommandKind::PrechargeAll);
    assert!(table.refresh_lead_cycles() > worst);
}

proptest! {
    #[test]
    fn prop_ns_to_cycles_is_ceiling(ns in 1u32..10_000, mhz in 1u32..400) {
        let cycles = u64::from(ns_to_cycles(ns, mhz).unwrap());
        let product = u64::from(ns) * u64::from(mhz);
        prop_assert!(cycles * 1000 >= product);
        prop_assert!((cycles - 1) * 1000 < product);
    }

    #[test]
    fn prop_hold_never_shorter_than_constant(t_rcd in 1u32..200, mhz in prop::sample::select(vec![50u32, 100, 133])) {
        let mut config = Config::at_clock(mhz);
        config.timing.t_rcd = t_rcd;
        let table = TimingTable::new(&config).unwrap();
        let hold = u64::from(table.hold_cycles(CommandKind::Active));
        prop_assert!(hold >= 1);
        prop_assert!(hold * 1000 >= u64::from(t_rcd) * u64::from(mhz));
    }
}
