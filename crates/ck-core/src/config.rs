//! Top-level kernel configuration.

use crate::{BudgetPolicy, CoreError, CoreResult, Cycle};

/// Kernel configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the kernel builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KernelConfig {
    /// Cycle number of the first cycle run by this kernel instance.
    pub start_cycle: u64,

    /// Total cycles to run in `Kernel::run`-style loops.  Hosts that drive
    /// the kernel one cycle at a time ignore this.
    pub total_cycles: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Lifetime in cycles of a topic request published without an explicit
    /// ttl.  Default: 50.
    pub default_request_ttl: u64,

    /// Sweep expired topic requests every N cycles.  1 = every cycle;
    /// 0 disables the sweep.
    pub stale_sweep_interval: u64,

    /// How the per-cycle CPU ceiling is derived.
    pub budget: BudgetPolicy,

    /// Report to output observers every N cycles.
    pub output_interval_cycles: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            start_cycle:            0,
            total_cycles:           1_000,
            seed:                   0,
            default_request_ttl:    50,
            stale_sweep_interval:   1,
            budget:                 BudgetPolicy::default(),
            output_interval_cycles: 1,
        }
    }
}

impl KernelConfig {
    /// The first cycle.
    #[inline]
    pub fn start(&self) -> Cycle {
        Cycle(self.start_cycle)
    }

    /// The cycle at which a full run ends (exclusive upper bound).
    #[inline]
    pub fn end_cycle(&self) -> Cycle {
        self.start() + self.total_cycles
    }

    /// Reject settings the kernel cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        let b = &self.budget;
        if !(b.limit_fraction.is_finite() && b.limit_fraction > 0.0) {
            return Err(CoreError::Config(format!(
                "budget.limit_fraction must be a positive number, got {}",
                b.limit_fraction
            )));
        }
        if !(b.burst_fraction.is_finite() && b.burst_fraction > 0.0) {
            return Err(CoreError::Config(format!(
                "budget.burst_fraction must be a positive number, got {}",
                b.burst_fraction
            )));
        }
        if b.min_ceiling.is_nan() || b.min_ceiling < 0.0 {
            return Err(CoreError::Config(format!(
                "budget.min_ceiling must be >= 0, got {}",
                b.min_ceiling
            )));
        }
        if b.burst_bucket.is_nan() {
            return Err(CoreError::Config("budget.burst_bucket must not be NaN".into()));
        }
        Ok(())
    }
}
