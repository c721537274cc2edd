//! `ck-schedule`: cooperative priority scheduler for the colony kernel.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`runnable`]  | `Runnable` trait, `RunOutcome`, `runnable_fn`             |
//! | [`process`]   | `Process`, `ProcessStatus`: one schedulable unit         |
//! | [`scheduler`] | `Scheduler`: ordered process table and budget check      |
//! | [`stats`]     | `SchedulerStats` (lifetime counters), `TickReport`        |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Tick model (summary)
//!
//! ```text
//! ceiling = policy.ceiling(meter)
//! stable-sort processes by (priority, last_run)
//! for p in processes:
//!     if meter.used() >= ceiling: skip p and everything after it
//!     Running   → p.run()            (last_run = now; apply outcome)
//!     Sleeping  → wake if now >= next_run (runs on a later tick)
//!     Terminated→ remove after the walk
//! ```
//!
//! The budget is only checked *between* processes; a running body is never
//! interrupted.

pub mod error;
pub mod process;
pub mod runnable;
pub mod scheduler;
pub mod stats;


pub use error::{ScheduleError, ScheduleResult};
pub use process::{Process, ProcessStatus};
pub use runnable::{FnRunnable, RunOutcome, Runnable, runnable_fn};
pub use scheduler::Scheduler;
pub use stats::{SchedulerStats, TickReport};
