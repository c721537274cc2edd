//! `StatsObserver<W>`: bridges `KernelObserver` to an `OutputWriter`.

use ck_core::{Cycle, KernelConfig};
use ck_kernel::{CycleReport, KernelObserver};
use ck_schedule::SchedulerStats;

use crate::row::{CycleSummaryRow, KindSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`KernelObserver`] that writes cycle summaries and per-kind CPU totals
/// to any [`OutputWriter`] backend.
///
/// Cycle rows are written every `config.output_interval_cycles` cycles
/// (counted from `config.start_cycle`); kind totals once, at shutdown.
/// Errors from the writer are stored internally because `KernelObserver`
/// methods have no return value.  After `kernel.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct StatsObserver<W: OutputWriter> {
    writer:     W,
    start:      Cycle,
    interval:   u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> StatsObserver<W> {
    pub fn new(writer: W, config: &KernelConfig) -> Self {
        Self {
            writer,
            start:      config.start(),
            interval:   config.output_interval_cycles,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `kernel.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn due(&self, cycle: Cycle) -> bool {
        self.interval > 0 && cycle.since(self.start).is_multiple_of(self.interval)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> KernelObserver for StatsObserver<W> {
    fn on_cycle_end(&mut self, report: &CycleReport) {
        if !self.due(report.tick.cycle) {
            return;
        }
        let result = self.writer.write_cycle_summary(&CycleSummaryRow::from(report));
        self.store_err(result);
    }

    fn on_shutdown(&mut self, final_cycle: Cycle, stats: &SchedulerStats) {
        let rows: Vec<KindSummaryRow> = stats
            .cpu_by_kind
            .iter()
            .map(|(kind, &cpu)| {
                let runs = stats.runs_by_kind.get(kind).copied().unwrap_or(0);
                KindSummaryRow {
                    cycle: final_cycle.0,
                    kind: kind.clone(),
                    runs,
                    cpu,
                    cpu_per_run: if runs == 0 { 0.0 } else { cpu / runs as f64 },
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_kind_summaries(&rows);
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
