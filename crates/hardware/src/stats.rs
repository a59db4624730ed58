//! Controller statistics collection and reporting.
//!
//! This module tracks what the controller did over a simulation run. It provides:
//! 1. **Cycles:** Total cycles and the share spent in power-up initialization.
//! 2. **Command mix:** Issue counts per device command.
//! 3. **Row locality:** Accesses served from the open row versus those that needed an Active.
//! 4. **Refresh:** Refresh count and the largest post-initialization spacing observed.

use std::time::Instant;

/// Controller statistics.
#[derive(Clone, Debug)]
pub struct ControllerStats {
    start_time: Instant,
    /// Total cycles stepped.
    pub cycles: u64,
    /// Cycles before initialization completed.
    pub init_cycles: u64,

    /// Requests accepted on the request interface.
    pub requests_accepted: u64,
    /// Read responses presented with `valid`.
    pub responses_delivered: u64,

    /// Active commands issued.
    pub activates: u64,
    /// Read commands issued.
    pub reads: u64,
    /// Write commands issued.
    pub writes: u64,
    /// Precharge-all commands issued.
    pub precharges: u64,
    /// Auto-refresh commands issued, including the two during initialization.
    pub refreshes: u64,
    /// Load-mode commands issued.
    pub load_modes: u64,

    /// Reads and writes issued against an already open row.
    pub row_hits: u64,
    /// Reads and writes that followed a fresh Active.
    pub row_misses: u64,

    /// Largest spacing between two Refresh commands after initialization, in cycles.
    pub max_refresh_gap: u64,
}

impl Default for ControllerStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            init_cycles: 0,
            requests_accepted: 0,
            responses_delivered: 0,
            activates: 0,
            reads: 0,
            writes: 0,
            precharges: 0,
            refreshes: 0,
            load_modes: 0,
            row_hits: 0,
            row_misses: 0,
            max_refresh_gap: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "commands", "rows", "refresh"];

impl ControllerStats {
    /// Fraction of accesses served from the open row, in `[0, 1]`.
    pub fn row_hit_rate(&self) -> f64 {
        let total = self.row_hits + self.row_misses;
        if total == 0 {
            0.0
        } else {
            self.row_hits as f64 / total as f64
        }
    }

    /// Device commands issued, of any kind.
    pub const fn commands_issued(&self) -> u64 {
        self.activates + self.reads + self.writes + self.precharges + self.refreshes + self.load_modes
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("SDRAM CONTROLLER STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", seconds);
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {:.2} kHz", khz);
            println!(
                "init_cycles              {} ({:.2}%)",
                self.init_cycles,
                (self.init_cycles as f64 / cyc) * 100.0
            );
            println!("requests.accepted        {}", self.requests_accepted);
            println!("responses.delivered      {}", self.responses_delivered);
            println!("----------------------------------------------------------");
        }
        if want("commands") {
            let total = self.commands_issued().max(1) as f64;
            let line = |name: &str, count: u64| {
                println!(
                    "  cmd.{:<18} {} ({:.2}%)",
                    name,
                    count,
                    (count as f64 / total) * 100.0
                );
            };
            println!("COMMAND MIX");
            line("active", self.activates);
            line("read", self.reads);
            line("write", self.writes);
            line("precharge_all", self.precharges);
            line("refresh", self.refreshes);
            line("load_mode", self.load_modes);
            println!("----------------------------------------------------------");
        }
        if want("rows") {
            println!("ROW LOCALITY");
            println!("  row.hits               {}", self.row_hits);
            println!("  row.misses             {}", self.row_misses);
            println!("  row.hit_rate           {:.2}%", self.row_hit_rate() * 100.0);
            println!("----------------------------------------------------------");
        }
        if want("refresh") {
            println!("REFRESH");
            println!("  refresh.count          {}", self.refreshes);
            println!("  refresh.max_gap        {} cycles", self.max_refresh_gap);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
