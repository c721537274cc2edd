//! `ck-core`: foundational types for the colony kernel.
//!
//! This crate is a dependency of every other `ck-*` crate.  It intentionally
//! has no `ck-*` dependencies and minimal external ones (`rand`,
//! `rustc-hash` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ProcessId`, `TopicId`                     |
//! | [`time`]        | `Cycle`, `CycleClock`                                 |
//! | [`budget`]      | `CpuMeter`, `BudgetPolicy`, `ManualMeter`, `WallClockMeter` |
//! | [`memory`]      | `Memory`, `AgentRecord`: the durable store           |
//! | [`config`]      | `KernelConfig`                                        |
//! | [`rng`]         | `AgentRng` (per agent, per cycle), `KernelRng`        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to flush `Memory` to the host's durable store.    |

pub mod budget;
pub mod config;
pub mod error;
pub mod ids;
pub mod memory;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use budget::{BudgetPolicy, CpuMeter, ManualMeter, WallClockMeter};
pub use config::KernelConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, ProcessId, TopicId};
pub use memory::{AgentRecord, Memory};
pub use rng::{AgentRng, KernelRng};
pub use time::{Cycle, CycleClock};
