//! # Simulator Driver Tests
//!
//! Blocking drivers and the cycle budget they run under.

use pretty_assertions::assert_eq;
use sdram_core::common::error::SimError;
use sdram_core::config::Config;
use sdram_core::sim::Simulator;

#[test]
fn test_wait_for_ready_times_out_during_init() {
    let mut sim = Simulator::new(&Config::default())
        .unwrap()
        .with_timeout(100);
    assert_eq!(
        sim.run_until_ready(),
        Err(SimError::Timeout {
            cycles: 100,
            waiting_for: "ready",
        })
    );
    assert!(!sim.controller.init_done());
}

#[test]
fn test_budget_long_enough_for_init() {
    let mut sim = Simulator::new(&Config::default())
        .unwrap()
        .with_timeout(20_000);
    let waited = sim.run_until_ready().unwrap();
    assert!(waited > 10_000);
    assert!(sim.controller.init_done());
}
