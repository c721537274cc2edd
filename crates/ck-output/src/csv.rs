//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `cycle_summaries.csv`
//! - `kind_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CycleSummaryRow, KindSummaryRow, OutputResult};

/// Writes kernel statistics to two CSV files.
pub struct CsvWriter {
    cycles:   Writer<File>,
    kinds:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut cycles = Writer::from_path(dir.join("cycle_summaries.csv"))?;
        cycles.write_record(["cycle", "ran", "woke", "skipped", "removed", "cpu_used", "ceiling"])?;

        let mut kinds = Writer::from_path(dir.join("kind_summaries.csv"))?;
        kinds.write_record(["cycle", "kind", "runs", "cpu", "cpu_per_run"])?;

        Ok(Self {
            cycles,
            kinds,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.cycles.write_record(&[
            row.cycle.to_string(),
            row.ran.to_string(),
            row.woke.to_string(),
            row.skipped.to_string(),
            row.removed.to_string(),
            format!("{:.3}", row.cpu_used),
            format!("{:.3}", row.ceiling),
        ])?;
        Ok(())
    }

    fn write_kind_summaries(&mut self, rows: &[KindSummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.kinds.write_record(&[
                row.cycle.to_string(),
                row.kind.clone(),
                row.runs.to_string(),
                format!("{:.3}", row.cpu),
                format!("{:.3}", row.cpu_per_run),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.cycles.flush()?;
        self.kinds.flush()?;
        Ok(())
    }
}
