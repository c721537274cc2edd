//! `ck-kernel`: per-cycle orchestrator for the colony kernel.
//!
//! # Cycle loop
//!
//! ```text
//! for cycle in config.start()..config.end_cycle():
//!   ① Meter    : meter.start_cycle(); the ceiling is derived from it.
//!   ② Services : stamp the cycle on the topic store; sweep expired
//!                 requests every `stale_sweep_interval` cycles.
//!   ③ Tick     : Scheduler::tick runs processes in priority order until
//!                 the ceiling is reached.
//!   ④ Spawns   : processes queued by bodies via Services::spawn are
//!                 registered (they first run next cycle).
//!   ⑤ Flush    : Memory::flush drops empty records and bumps the version.
//! ```
//!
//! Everything a body may touch lives in [`Services`]; the scheduler is kept
//! outside it so no body can reach the process table directly.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ck_core::{KernelConfig, WallClockMeter};
//! use ck_kernel::{KernelBuilder, NoopObserver};
//!
//! let mut kernel = KernelBuilder::<Task, _>::new(config, WallClockMeter::new(20.0))
//!     .process(spawner)
//!     .build()?;
//! kernel.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod kernel;
pub mod observer;
pub mod services;

#[cfg(test)]
mod tests;

pub use builder::KernelBuilder;
pub use error::{KernelError, KernelResult};
pub use kernel::{CycleReport, Kernel};
pub use observer::{KernelObserver, NoopObserver};
pub use services::{KernelProcess, Services};
