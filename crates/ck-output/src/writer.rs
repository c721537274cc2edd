//! The `OutputWriter` trait implemented by backend writers.

use crate::{CycleSummaryRow, KindSummaryRow, OutputResult};

/// Trait implemented by statistics backends.
///
/// Errors are returned here but swallowed by [`StatsObserver`], which keeps
/// the first one for [`take_error`].
///
/// [`StatsObserver`]: crate::StatsObserver
/// [`take_error`]: crate::StatsObserver::take_error
pub trait OutputWriter {
    /// Write one cycle summary row.
    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()>;

    /// Write the per-kind CPU totals.
    fn write_kind_summaries(&mut self, rows: &[KindSummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
