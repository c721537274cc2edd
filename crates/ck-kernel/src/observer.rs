//! Kernel observer trait for progress reporting and data collection.

use ck_core::Cycle;
use ck_schedule::SchedulerStats;

use crate::CycleReport;

/// Callbacks invoked by [`Kernel::run`][crate::Kernel::run] and
/// [`Kernel::run_cycles`][crate::Kernel::run_cycles] at cycle boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: budget watcher
///
/// ```rust,ignore
/// struct BudgetWatcher { overruns: u64 }
///
/// impl KernelObserver for BudgetWatcher {
///     fn on_cycle_end(&mut self, report: &CycleReport) {
///         if report.tick.skipped > 0 {
///             self.overruns += 1;
///         }
///     }
/// }
/// ```
pub trait KernelObserver {
    /// Called at the very start of each cycle, before the meter is reset.
    fn on_cycle_start(&mut self, _cycle: Cycle) {}

    /// Called once the cycle's tick, spawns and flush are complete.
    fn on_cycle_end(&mut self, _report: &CycleReport) {}

    /// Called once after the final cycle of [`Kernel::run`][crate::Kernel::run].
    fn on_shutdown(&mut self, _final_cycle: Cycle, _stats: &SchedulerStats) {}
}

/// A [`KernelObserver`] that does nothing.
pub struct NoopObserver;

impl KernelObserver for NoopObserver {}
