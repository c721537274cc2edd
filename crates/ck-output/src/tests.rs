//! Integration tests for ck-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{CycleSummaryRow, KindSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn cycle_row(cycle: u64) -> CycleSummaryRow {
        CycleSummaryRow {
            cycle,
            ran:      3,
            woke:     1,
            skipped:  0,
            removed:  0,
            cpu_used: 4.5,
            ceiling:  18.0,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("cycle_summaries.csv").exists());
        assert!(dir.path().join("kind_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["cycle", "ran", "woke", "skipped", "removed", "cpu_used", "ceiling"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("kind_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["cycle", "kind", "runs", "cpu", "cpu_per_run"]);
    }

    #[test]
    fn cycle_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_cycle_summary(&cycle_row(7)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][1], "3");
        assert_eq!(&rows[0][5], "4.500");
        assert_eq!(&rows[0][6], "18.000");
    }

    #[test]
    fn kind_summaries_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![
            KindSummaryRow { cycle: 10, kind: "harvest".into(), runs: 4, cpu: 2.0, cpu_per_run: 0.5 },
            KindSummaryRow { cycle: 10, kind: "spawn".into(), runs: 1, cpu: 0.25, cpu_per_run: 0.25 },
        ];
        w.write_kind_summaries(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("kind_summaries.csv")).unwrap();
        let read: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][1], "harvest");
        assert_eq!(&read[0][4], "0.500");
        assert_eq!(&read[1][1], "spawn");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use ck_core::{Cycle, KernelConfig, ManualMeter};
    use ck_kernel::{KernelBuilder, KernelObserver, Services};
    use ck_schedule::{Process, RunOutcome, SchedulerStats, runnable_fn};

    use crate::row::{CycleSummaryRow, KindSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult, StatsObserver};

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Collects rows in memory; optionally fails every write.
    #[derive(Default)]
    struct MemWriter {
        cycles:   Vec<CycleSummaryRow>,
        kinds:    Vec<KindSummaryRow>,
        finished: u32,
        fail:     bool,
    }

    impl OutputWriter for MemWriter {
        fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.cycles.push(*row);
            Ok(())
        }

        fn write_kind_summaries(&mut self, rows: &[KindSummaryRow]) -> OutputResult<()> {
            self.kinds.extend_from_slice(rows);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn config(total_cycles: u64, interval: u64) -> KernelConfig {
        KernelConfig {
            total_cycles,
            output_interval_cycles: interval,
            ..KernelConfig::default()
        }
    }

    #[test]
    fn cycle_rows_follow_interval() {
        let cfg = config(10, 3);
        let mut obs = StatsObserver::new(MemWriter::default(), &cfg);
        let mut kernel = KernelBuilder::<(), _>::new(cfg, ManualMeter::unlimited()).build().unwrap();
        kernel.run(&mut obs);

        assert!(obs.take_error().is_none());
        let writer = obs.into_writer();
        let cycles: Vec<u64> = writer.cycles.iter().map(|r| r.cycle).collect();
        assert_eq!(cycles, [0, 3, 6, 9]);
        assert_eq!(writer.finished, 1);
    }

    #[test]
    fn kind_totals_written_at_shutdown() {
        let cfg = config(4, 1);
        let mut kernel = KernelBuilder::<(), _>::new(cfg.clone(), ManualMeter::unlimited())
            .process(Process::new(
                "h1",
                "harvest",
                0,
                runnable_fn(|_: &mut Services<()>| RunOutcome::Running),
            ))
            .build()
            .unwrap();

        let mut obs = StatsObserver::new(MemWriter::default(), &cfg);
        kernel.run(&mut obs);
        let writer = obs.into_writer();

        assert_eq!(writer.kinds.len(), 1);
        let row = &writer.kinds[0];
        assert_eq!(row.cycle, 4);
        assert_eq!(row.kind, "harvest");
        assert_eq!(row.runs, 4);
        assert_eq!(row.cpu, 0.0);
    }

    #[test]
    fn kind_row_averages_cpu() {
        let mut stats = SchedulerStats::default();
        stats.cpu_by_kind.insert("spawn".into(), 3.0);
        stats.runs_by_kind.insert("spawn".into(), 2);

        let mut obs = StatsObserver::new(MemWriter::default(), &config(1, 1));
        obs.on_shutdown(Cycle(1), &stats);
        let writer = obs.into_writer();
        assert_eq!(writer.kinds[0].cpu_per_run, 1.5);
    }

    #[test]
    fn first_error_kept() {
        let cfg = config(3, 1);
        let writer = MemWriter { fail: true, ..MemWriter::default() };
        let mut obs = StatsObserver::new(writer, &cfg);
        let mut kernel = KernelBuilder::<(), _>::new(cfg, ManualMeter::unlimited()).build().unwrap();
        kernel.run(&mut obs);

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn csv_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(5, 1);
        let writer = crate::CsvWriter::new(dir.path()).unwrap();
        let mut obs = StatsObserver::new(writer, &cfg);
        let mut kernel = KernelBuilder::<(), _>::new(cfg, ManualMeter::unlimited()).build().unwrap();
        kernel.run(&mut obs);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("cycle_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 5);
    }
}
