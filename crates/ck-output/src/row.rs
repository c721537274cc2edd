//! Plain data row types written by output backends.

use ck_kernel::CycleReport;

/// What the kernel did in one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSummaryRow {
    pub cycle:    u64,
    pub ran:      u64,
    pub woke:     u64,
    /// Processes skipped because the budget ran out.
    pub skipped:  u64,
    /// Terminated processes removed.
    pub removed:  u64,
    pub cpu_used: f64,
    pub ceiling:  f64,
}

impl From<&CycleReport> for CycleSummaryRow {
    fn from(report: &CycleReport) -> Self {
        let tick = &report.tick;
        Self {
            cycle:    tick.cycle.0,
            ran:      tick.ran as u64,
            woke:     tick.woke as u64,
            skipped:  tick.skipped as u64,
            removed:  tick.removed as u64,
            cpu_used: tick.cpu_used,
            ceiling:  tick.ceiling,
        }
    }
}

/// Lifetime CPU totals for one process kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSummaryRow {
    /// Cycle at which the totals were taken.
    pub cycle: u64,
    pub kind:  String,
    pub runs:  u64,
    pub cpu:   f64,
    /// `cpu / runs`; 0 when the kind never ran.
    pub cpu_per_run: f64,
}
