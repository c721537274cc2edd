//! Scheduler counters consumed by observers.

use std::collections::BTreeMap;

use ck_core::Cycle;

/// Lifetime counters.  Never reset by the scheduler.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerStats {
    /// Processes successfully registered.
    pub created: u64,
    /// Processes removed (after terminating, or explicitly unregistered).
    pub terminated: u64,
    /// Process slots skipped because the cycle's budget was exhausted.
    pub out_of_time: u64,
    /// CPU spent per process kind, as reported by the meter.
    pub cpu_by_kind: BTreeMap<String, f64>,
    /// Executions per process kind.
    pub runs_by_kind: BTreeMap<String, u64>,
}

impl SchedulerStats {
    pub(crate) fn record_run(&mut self, kind: &str, cpu: f64) {
        *self.cpu_by_kind.entry(kind.to_owned()).or_default() += cpu;
        *self.runs_by_kind.entry(kind.to_owned()).or_default() += 1;
    }

    /// Total CPU across all kinds.
    pub fn total_cpu(&self) -> f64 {
        self.cpu_by_kind.values().sum()
    }
}

/// What one [`Scheduler::tick`][crate::Scheduler::tick] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub cycle:    Cycle,
    /// Ceiling computed for this tick.
    pub ceiling:  f64,
    /// Processes executed.
    pub ran:      usize,
    /// Sleeping processes flipped back to `Running`.
    pub woke:     usize,
    /// Processes skipped for lack of budget.
    pub skipped:  usize,
    /// Terminated processes removed.
    pub removed:  usize,
    /// Meter reading when the tick finished.
    pub cpu_used: f64,
}
