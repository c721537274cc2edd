//! The `Kernel` struct and its cycle loop.

use ck_core::{CpuMeter, Cycle, CycleClock, KernelConfig};
use ck_schedule::{Scheduler, SchedulerStats, TickReport};
use tracing::{debug, warn};

use crate::{KernelObserver, KernelProcess, KernelResult, Services};

// ── CycleReport ───────────────────────────────────────────────────────────────

/// Everything one [`Kernel::run_cycle`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CycleReport {
    /// What the scheduler did this cycle.
    pub tick: TickReport,

    /// Expired topic requests removed by the stale sweep.
    pub swept: usize,

    /// Processes queued by bodies and registered after the tick.
    pub spawned: usize,

    /// Memory version after the end-of-cycle flush.
    pub memory_version: u64,

    /// Processes registered when the cycle finished.
    pub processes: usize,

    /// Requests (live or not yet swept) across all topics.
    pub pending_requests: usize,
}

// ── Kernel ────────────────────────────────────────────────────────────────────

/// The top-level runner.
///
/// `Kernel<T, M>` holds the scheduler, the services handed to every body,
/// and the host's CPU meter.  `T` is the topic payload type.
///
/// Create via [`KernelBuilder`][crate::KernelBuilder].
pub struct Kernel<T, M: CpuMeter> {
    /// Global configuration (cycles, seed, ttl, budget policy, …).
    pub config: KernelConfig,

    /// Tracks the cycle the next `run_cycle` call executes.
    pub clock: CycleClock,

    /// The process table.
    pub scheduler: Scheduler<Services<T>>,

    /// Topics, memory and per-cycle helpers shared by all bodies.
    pub services: Services<T>,

    /// The host's compute accounting.
    pub meter: M,
}

impl<T, M: CpuMeter> Kernel<T, M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Register a process directly (outside any body).
    pub fn spawn(&mut self, process: KernelProcess<T>) -> KernelResult<()> {
        self.scheduler.register_process(process)?;
        Ok(())
    }

    /// Remove a process immediately.  Returns `false` if it was not
    /// registered.
    pub fn kill(&mut self, id: &str) -> bool {
        self.scheduler.unregister_process(id).is_some()
    }

    pub fn stats(&self) -> &SchedulerStats {
        self.scheduler.stats()
    }

    /// Run the kernel from the current cycle to `config.end_cycle()`.
    ///
    /// Calls observer hooks at every cycle boundary and `on_shutdown` once
    /// at the end.
    pub fn run<O: KernelObserver>(&mut self, observer: &mut O) {
        while self.clock.current < self.config.end_cycle() {
            self.step(observer);
        }
        observer.on_shutdown(self.clock.current, self.scheduler.stats());
    }

    /// Run exactly `n` cycles from the current position (ignores
    /// `end_cycle`).  Does not call `on_shutdown`.
    pub fn run_cycles<O: KernelObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Execute the current cycle and advance the clock.
    ///
    /// Hosts that own the outer loop call this once per invocation, after
    /// [`CycleClock::set`] if they dictate the cycle number.
    pub fn run_cycle(&mut self) -> CycleReport {
        let now = self.clock.current;

        self.meter.start_cycle();
        self.services.cycle = now;
        self.services.topics.set_cycle(now);

        let swept = if self.sweep_due(now) {
            self.services.topics.remove_stale()
        } else {
            0
        };

        let tick = self.scheduler.tick(now, &self.meter, &mut self.services);
        let spawned = self.register_spawned();
        let memory_version = self.services.memory.flush();

        let report = CycleReport {
            tick,
            swept,
            spawned,
            memory_version,
            processes: self.scheduler.len(),
            pending_requests: self.services.topics.len(),
        };
        debug!(
            cycle = %now,
            processes = report.processes,
            requests = report.pending_requests,
            swept,
            spawned,
            memory_version,
            "cycle complete"
        );

        self.clock.advance();
        report
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn step<O: KernelObserver>(&mut self, observer: &mut O) {
        observer.on_cycle_start(self.clock.current);
        let report = self.run_cycle();
        observer.on_cycle_end(&report);
    }

    fn sweep_due(&self, now: Cycle) -> bool {
        let interval = self.config.stale_sweep_interval;
        interval > 0 && now.since(self.config.start()).is_multiple_of(interval)
    }

    fn register_spawned(&mut self) -> usize {
        let mut registered = 0;
        for process in self.services.take_spawned() {
            match self.scheduler.register_process(process) {
                Ok(()) => registered += 1,
                Err(e) => warn!(error = %e, "dropped spawned process"),
            }
        }
        registered
    }
}
