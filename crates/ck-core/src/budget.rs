//! Host-reported CPU usage and the per-cycle compute ceiling.
//!
//! # Model
//!
//! The host reports four numbers every cycle:
//!
//! - `used`       : compute consumed so far this cycle,
//! - `limit`      : the sustainable per-cycle allowance,
//! - `tick_limit` : the hard per-cycle maximum (may exceed `limit` when the
//!                   host lets the program spend banked CPU),
//! - `bucket`     : banked, unspent CPU carried over from earlier cycles.
//!
//! [`BudgetPolicy::ceiling`] turns those into the ceiling the scheduler
//! compares `used` against between process executions:
//!
//! ```text
//! ceiling = limit * limit_fraction
//! if bucket >= burst_bucket:
//!     ceiling = max(ceiling, tick_limit * burst_fraction)
//! ceiling = clamp(ceiling, min(min_ceiling, tick_limit), tick_limit)
//! ```
//!
//! The ceiling is recomputed at the start of every scheduler tick because any
//! of the host-reported limits may change between cycles.

use std::cell::Cell;
use std::time::Instant;

// ── CpuMeter ──────────────────────────────────────────────────────────────────

/// Read-only view of the host's compute accounting.
///
/// Only [`used`](Self::used) and [`limit`](Self::limit) are required; hosts
/// without a burst allowance can rely on the defaults.
pub trait CpuMeter {
    /// Compute used so far in the current cycle.
    fn used(&self) -> f64;

    /// Sustainable per-cycle allowance.
    fn limit(&self) -> f64;

    /// Hard per-cycle maximum.  Defaults to [`limit`](Self::limit).
    fn tick_limit(&self) -> f64 {
        self.limit()
    }

    /// Banked CPU available for bursts.  Defaults to 0 (no bursting).
    fn bucket(&self) -> f64 {
        0.0
    }

    /// Called by the kernel at the very top of each cycle.
    fn start_cycle(&mut self) {}
}

// ── BudgetPolicy ──────────────────────────────────────────────────────────────

/// How the per-cycle ceiling is derived from host-reported limits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetPolicy {
    /// Fraction of `limit` available in a normal cycle.  Default: 0.9.
    pub limit_fraction: f64,

    /// Bucket level at or above which the policy allows bursting.
    /// Default: 9000.
    pub burst_bucket: f64,

    /// Fraction of `tick_limit` available while bursting.  Default: 0.8.
    pub burst_fraction: f64,

    /// Lower bound for the ceiling, itself capped at `tick_limit`.
    /// Default: 0.
    pub min_ceiling: f64,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            limit_fraction: 0.9,
            burst_bucket:   9_000.0,
            burst_fraction: 0.8,
            min_ceiling:    0.0,
        }
    }
}

impl BudgetPolicy {
    /// Compute this cycle's ceiling from the meter's current limits.
    pub fn ceiling<M: CpuMeter + ?Sized>(&self, meter: &M) -> f64 {
        let tick_limit = meter.tick_limit();
        let mut ceiling = meter.limit() * self.limit_fraction;
        if meter.bucket() >= self.burst_bucket {
            ceiling = ceiling.max(tick_limit * self.burst_fraction);
        }
        ceiling.max(self.min_ceiling.min(tick_limit)).min(tick_limit)
    }
}

// ── ManualMeter ───────────────────────────────────────────────────────────────

/// A [`CpuMeter`] whose readings are set by hand.
///
/// Usage is interior-mutable so a runnable holding an `Rc<ManualMeter>` can
/// "spend" CPU while the scheduler holds a shared reference to the same
/// meter.  Used by tests and by deterministic replays.
#[derive(Debug)]
pub struct ManualMeter {
    used:       Cell<f64>,
    limit:      f64,
    tick_limit: f64,
    bucket:     f64,
}

impl ManualMeter {
    /// A meter with `limit == tick_limit` and an empty bucket.
    pub fn new(limit: f64) -> Self {
        Self {
            used:       Cell::new(0.0),
            limit,
            tick_limit: limit,
            bucket:     0.0,
        }
    }

    /// A meter that never runs out.
    pub fn unlimited() -> Self {
        Self::new(f64::INFINITY)
    }

    pub fn with_tick_limit(mut self, tick_limit: f64) -> Self {
        self.tick_limit = tick_limit;
        self
    }

    pub fn with_bucket(mut self, bucket: f64) -> Self {
        self.bucket = bucket;
        self
    }

    /// Overwrite the current usage reading.
    pub fn set_used(&self, used: f64) {
        self.used.set(used);
    }

    /// Add `amount` to the current usage reading.
    pub fn spend(&self, amount: f64) {
        self.used.set(self.used.get() + amount);
    }
}

impl CpuMeter for ManualMeter {
    fn used(&self) -> f64 {
        self.used.get()
    }

    fn limit(&self) -> f64 {
        self.limit
    }

    fn tick_limit(&self) -> f64 {
        self.tick_limit
    }

    fn bucket(&self) -> f64 {
        self.bucket
    }

    fn start_cycle(&mut self) {
        self.used.set(0.0);
    }
}

// ── WallClockMeter ────────────────────────────────────────────────────────────

/// A [`CpuMeter`] that reports elapsed wall-clock milliseconds since the
/// start of the current cycle.
///
/// Stands in for a real host when running the kernel natively.
#[derive(Debug)]
pub struct WallClockMeter {
    started:       Instant,
    limit_ms:      f64,
    tick_limit_ms: f64,
    bucket:        f64,
}

impl WallClockMeter {
    pub fn new(limit_ms: f64) -> Self {
        Self {
            started:       Instant::now(),
            limit_ms,
            tick_limit_ms: limit_ms,
            bucket:        0.0,
        }
    }

    pub fn with_tick_limit(mut self, tick_limit_ms: f64) -> Self {
        self.tick_limit_ms = tick_limit_ms;
        self
    }

    pub fn with_bucket(mut self, bucket: f64) -> Self {
        self.bucket = bucket;
        self
    }
}

impl CpuMeter for WallClockMeter {
    fn used(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1_000.0
    }

    fn limit(&self) -> f64 {
        self.limit_ms
    }

    fn tick_limit(&self) -> f64 {
        self.tick_limit_ms
    }

    fn bucket(&self) -> f64 {
        self.bucket
    }

    fn start_cycle(&mut self) {
        self.started = Instant::now();
    }
}
