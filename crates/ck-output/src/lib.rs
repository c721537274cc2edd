//! `ck-output`: kernel statistics writers for the colony kernel.
//!
//! | Backend | Files created                                   |
//! |---------|-------------------------------------------------|
//! | CSV     | `cycle_summaries.csv`, `kind_summaries.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by [`StatsObserver`],
//! which implements `ck_kernel::KernelObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ck_output::{CsvWriter, StatsObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = StatsObserver::new(writer, &config);
//! kernel.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::StatsObserver;
pub use row::{CycleSummaryRow, KindSummaryRow};
pub use writer::OutputWriter;
