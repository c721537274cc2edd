//! `Scheduler`: priority-ordered, budget-bounded process table.

use ck_core::{BudgetPolicy, CpuMeter, Cycle, ProcessId};
use tracing::{debug, warn};

use crate::{Process, ProcessStatus, ScheduleError, ScheduleResult, SchedulerStats, TickReport};

/// Owns every registered [`Process`] and decides which of them run each
/// cycle.
///
/// `C` is the context handed to every runnable.  The scheduler itself is
/// never part of that context, so a body cannot re-enter it.
pub struct Scheduler<C: ?Sized> {
    processes: Vec<Process<C>>,
    policy:    BudgetPolicy,
    ceiling:   f64,
    stats:     SchedulerStats,
}

impl<C: ?Sized> Scheduler<C> {
    pub fn new(policy: BudgetPolicy) -> Self {
        Self {
            processes: Vec::new(),
            policy,
            ceiling: 0.0,
            stats: SchedulerStats::default(),
        }
    }

    // ── Process table ─────────────────────────────────────────────────────

    /// Add `process` to the table.
    ///
    /// A process whose id is already registered is rejected and the table
    /// is left unchanged.
    pub fn register_process(&mut self, process: Process<C>) -> ScheduleResult<()> {
        if self.has_process(process.id().as_str()) {
            warn!(process = %process.id(), "rejected duplicate process id");
            return Err(ScheduleError::DuplicateProcess(process.id().clone()));
        }
        debug!(process = %process.id(), kind = process.kind(), priority = process.priority(), "registered");
        self.processes.push(process);
        self.stats.created += 1;
        Ok(())
    }

    /// Remove a process.  Returns it if it was registered.
    pub fn unregister_process(&mut self, id: &str) -> Option<Process<C>> {
        let idx = self.processes.iter().position(|p| p.id().as_str() == id)?;
        let process = self.processes.remove(idx);
        self.stats.terminated += 1;
        debug!(process = id, "unregistered");
        Some(process)
    }

    pub fn has_process(&self, id: &str) -> bool {
        self.processes.iter().any(|p| p.id().as_str() == id)
    }

    pub fn process(&self, id: &str) -> Option<&Process<C>> {
        self.processes.iter().find(|p| p.id().as_str() == id)
    }

    /// All processes in the order of the most recent tick.
    pub fn processes(&self) -> impl Iterator<Item = &Process<C>> + '_ {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    // ── Budget ────────────────────────────────────────────────────────────

    /// Ceiling computed by the most recent tick.
    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }

    /// `true` once the meter has reached this cycle's ceiling.
    pub fn is_out_of_time<M: CpuMeter + ?Sized>(&self, meter: &M) -> bool {
        meter.used() >= self.ceiling
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Run one cycle's worth of processes.
    ///
    /// Processes are visited in `(priority, last_run)` order.  The sort is
    /// stable, so equal keys keep the order of the previous tick and
    /// equal-priority processes take turns across cycles.  The budget is
    /// checked before each process; once exhausted, the rest of the table
    /// waits for the next cycle.
    pub fn tick<M: CpuMeter + ?Sized>(&mut self, now: Cycle, meter: &M, ctx: &mut C) -> TickReport {
        self.ceiling = self.policy.ceiling(meter);
        // `sort_by_key` is a stable sort.
        self.processes.sort_by_key(Process::sort_key);

        let mut report = TickReport { cycle: now, ceiling: self.ceiling, ..TickReport::default() };
        let mut finished: Vec<ProcessId> = Vec::new();
        let total = self.processes.len();

        for idx in 0..total {
            if self.is_out_of_time(meter) {
                let skipped = total - idx;
                report.skipped = skipped;
                self.stats.out_of_time += skipped as u64;
                warn!(
                    cycle = %now,
                    used = meter.used(),
                    ceiling = self.ceiling,
                    skipped,
                    "out of CPU budget"
                );
                break;
            }

            let process = &mut self.processes[idx];
            match process.status() {
                ProcessStatus::Running => {
                    let before = meter.used();
                    process.run(now, ctx);
                    let spent = (meter.used() - before).max(0.0);
                    self.stats.record_run(process.kind(), spent);
                    report.ran += 1;
                }
                ProcessStatus::Sleeping { .. } => {
                    if process.wake_if_due(now) {
                        report.woke += 1;
                    }
                }
                ProcessStatus::Terminated => finished.push(process.id().clone()),
            }
        }

        for id in finished {
            if self.unregister_process(id.as_str()).is_some() {
                report.removed += 1;
            }
        }

        report.cpu_used = meter.used();
        debug!(
            cycle = %now,
            ran = report.ran,
            woke = report.woke,
            skipped = report.skipped,
            removed = report.removed,
            cpu = report.cpu_used,
            "scheduler tick"
        );
        report
    }
}
