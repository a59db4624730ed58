//! Timing table: datasheet constants converted to clock cycles.
//!
//! Pure configuration-time arithmetic. Every nanosecond constant is converted with
//! ceiling division against the clock rate, so a hold of `n` cycles is always at least
//! as long as the constant it came from. The table is computed once and never changes.

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::command::CommandKind;

/// Cycles of slack between the refresh obligation falling due and the
/// Refresh command issuing, on top of the command holds themselves.
const REFRESH_DECISION_OVERHEAD: u32 = 2;

/// Converts nanoseconds to whole cycles at `clock_mhz`, rounding up.
///
/// Returns `None` when the cycle count does not fit in a `u32`.
///
/// ```
/// use sdram_core::core::timing::ns_to_cycles;
///
/// assert_eq!(ns_to_cycles(18, 100), Some(2));
/// assert_eq!(ns_to_cycles(18, 133), Some(3));
/// assert_eq!(ns_to_cycles(20, 100), Some(2));
/// assert_eq!(ns_to_cycles(u32::MAX, 2000), None);
/// ```
#[inline]
pub fn ns_to_cycles(ns: u32, clock_mhz: u32) -> Option<u32> {
    u32::try_from((u64::from(ns) * u64::from(clock_mhz)).div_ceil(1000)).ok()
}

/// Per-command hold times and refresh scheduling constants, in cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingTable {
    active: u32,
    write: u32,
    precharge: u32,
    refresh: u32,
    load_mode: u32,
    ras: u32,
    rc: u32,
    refresh_interval: u32,
    refresh_lead: u32,
    init_wait: u32,
    cas_latency: u8,
}

impl TimingTable {
    /// Builds the table from the configuration.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ZeroClock`] if the clock rate is zero.
    /// * [`ConfigError::DegenerateTiming`] if any hold time rounds to zero cycles.
    /// * [`ConfigError::TimingOverflow`] if a constant or the power-up wait does
    ///   not fit in a 32-bit cycle count.
    /// * [`ConfigError::RefreshStarvation`] if the refresh interval is not longer
    ///   than the worst-case time to get a Refresh onto the bus.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mhz = config.general.clock_mhz;
        if mhz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        let t = &config.timing;

        let cycles = |name: &'static str, value_ns: u32| {
            ns_to_cycles(value_ns, mhz).ok_or(ConfigError::TimingOverflow { name, value_ns })
        };
        let hold = |command: CommandKind, name: &'static str, value_ns: u32| -> Result<u32, ConfigError> {
            match cycles(name, value_ns)? {
                0 => Err(ConfigError::DegenerateTiming { command, value_ns }),
                n => Ok(n),
            }
        };
        let precharge = hold(CommandKind::PrechargeAll, "t_rp", t.t_rp)?;
        let refresh = hold(CommandKind::Refresh, "t_rfc", t.t_rfc)?;
        let active = hold(CommandKind::Active, "t_rcd", t.t_rcd)?;
        let write = hold(CommandKind::Write, "t_wr", t.t_wr)?;
        if t.t_mrd == 0 {
            return Err(ConfigError::DegenerateTiming {
                command: CommandKind::LoadMode,
                value_ns: t.t_mrd,
            });
        }
        let load_mode = t.t_mrd;

        let ras = cycles("t_ras", t.t_ras)?;
        let rc = cycles("t_rc", t.t_rc)?;

        let rows_log2 = config.geometry.row_bits.min(63);
        let interval = u64::from(t.t_ref_ms)
            .saturating_mul(1000)
            .saturating_mul(u64::from(mhz))
            >> rows_log2;
        let refresh_interval = u32::try_from(interval).unwrap_or(u32::MAX);

        // Worst case after the obligation falls due: an Active just issued, its
        // access, the Active-to-Precharge guard, then the precharge itself.
        let lead = u64::from(active)
            + u64::from(write.max(1))
            + u64::from(ras)
            + u64::from(precharge)
            + u64::from(REFRESH_DECISION_OVERHEAD);
        let refresh_lead = match u32::try_from(lead) {
            Ok(lead) if lead < refresh_interval => lead,
            Ok(lead) => {
                return Err(ConfigError::RefreshStarvation {
                    interval: refresh_interval,
                    required: lead.saturating_add(1),
                });
            }
            Err(_) => {
                return Err(ConfigError::RefreshStarvation {
                    interval: refresh_interval,
                    required: u32::MAX,
                });
            }
        };

        let init_wait = t
            .init_delay_us
            .checked_mul(mhz)
            .ok_or(ConfigError::TimingOverflow {
                name: "init_delay_us",
                value_ns: t.init_delay_us,
            })?;

        Ok(Self {
            active,
            write,
            precharge,
            refresh,
            load_mode,
            ras,
            rc,
            refresh_interval,
            refresh_lead,
            init_wait,
            cas_latency: config.mode.cas_latency,
        })
    }

    /// Number of cycles a command occupies the executor. Always at least 1.
    pub const fn hold_cycles(&self, kind: CommandKind) -> u32 {
        match kind {
            CommandKind::Deselect | CommandKind::Nop | CommandKind::Read => 1,
            CommandKind::Active => self.active,
            CommandKind::Write => self.write,
            CommandKind::PrechargeAll => self.precharge,
            CommandKind::Refresh => self.refresh,
            CommandKind::LoadMode => self.load_mode,
        }
    }

    /// Minimum cycles from Active to Precharge (tRAS).
    pub const fn ras_cycles(&self) -> u32 {
        self.ras
    }

    /// Minimum cycles from Active to the next Active (tRC).
    pub const fn rc_cycles(&self) -> u32 {
        self.rc
    }

    /// Maximum spacing between two Refresh commands:
    /// `floor(tREF_ms * 1000 * clock_mhz / 2^row_bits)`.
    pub const fn refresh_interval_cycles(&self) -> u32 {
        self.refresh_interval
    }

    /// Worst-case cycles between the refresh obligation falling due and the
    /// Refresh command issuing.
    pub const fn refresh_lead_cycles(&self) -> u32 {
        self.refresh_lead
    }

    /// Value the refresh obligation counter reloads with after each Refresh,
    /// chosen so issued Refreshes are never further apart than the interval.
    pub const fn refresh_reload_cycles(&self) -> u32 {
        self.refresh_interval - self.refresh_lead
    }

    /// Cycles of Deselect after reset before the first initialization command.
    pub const fn init_wait_cycles(&self) -> u32 {
        self.init_wait
    }

    /// CAS latency from the mode configuration.
    pub const fn cas_latency(&self) -> u8 {
        self.cas_latency
    }
}
