//! `Process`: a runnable plus its status state machine.
//!
//! ```text
//!            Sleeping(d)              now >= next_run
//!  Running ───────────────▶ Sleeping ─────────────────▶ Running
//!     │                        │
//!     │ Terminated             │ (only via its own last run)
//!     ▼                        ▼
//!  Terminated  (absorbing: never woken, never run again)
//! ```

use std::fmt;

use ck_core::{Cycle, ProcessId};
use tracing::trace;

use crate::{RunOutcome, Runnable};

/// Where a process is in its lifecycle.
///
/// `next_run` only exists while sleeping, so it cannot be consulted in any
/// other state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessStatus {
    Running,
    Sleeping { next_run: Cycle },
    Terminated,
}

/// One schedulable unit.
pub struct Process<C: ?Sized> {
    id:       ProcessId,
    kind:     String,
    priority: i32,
    status:   ProcessStatus,
    last_run: Option<Cycle>,
    runnable: Box<dyn Runnable<C>>,
}

impl<C: ?Sized> Process<C> {
    /// A new process in the `Running` state that has never run.
    ///
    /// `kind` groups processes for CPU accounting (e.g. `"harvest"`,
    /// `"worker"`); `priority` orders them, lower first.
    pub fn new<R>(id: impl Into<ProcessId>, kind: impl Into<String>, priority: i32, runnable: R) -> Self
    where
        R: Runnable<C> + 'static,
    {
        Self {
            id:       id.into(),
            kind:     kind.into(),
            priority,
            status:   ProcessStatus::Running,
            last_run: None,
            runnable: Box::new(runnable),
        }
    }

    pub fn id(&self) -> &ProcessId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    /// Cycle of the last actual execution; `None` if it never ran.
    pub fn last_run(&self) -> Option<Cycle> {
        self.last_run
    }

    pub fn is_terminated(&self) -> bool {
        self.status == ProcessStatus::Terminated
    }

    /// Sort key used by the scheduler.  `None` sorts before any cycle, so a
    /// fresh process goes ahead of its equal-priority peers.
    pub(crate) fn sort_key(&self) -> (i32, Option<Cycle>) {
        (self.priority, self.last_run)
    }

    /// Execute the runnable once and apply the transition it asks for.
    ///
    /// Only a `Running` process executes; for any other status this is a
    /// no-op returning `None`.
    pub fn run(&mut self, now: Cycle, ctx: &mut C) -> Option<RunOutcome> {
        if self.status != ProcessStatus::Running {
            return None;
        }
        self.last_run = Some(now);
        let outcome = self.runnable.run(ctx);
        self.status = match outcome {
            RunOutcome::Running => ProcessStatus::Running,
            RunOutcome::Sleeping(duration) => ProcessStatus::Sleeping { next_run: now + duration },
            RunOutcome::Terminated => ProcessStatus::Terminated,
        };
        trace!(process = %self.id, cycle = %now, ?outcome, "ran");
        Some(outcome)
    }

    /// Flip a sleeping process back to `Running` once `next_run` has
    /// arrived.  Returns `true` if it woke.
    pub fn wake_if_due(&mut self, now: Cycle) -> bool {
        match self.status {
            ProcessStatus::Sleeping { next_run } if now >= next_run => {
                self.status = ProcessStatus::Running;
                trace!(process = %self.id, cycle = %now, "woke");
                true
            }
            _ => false,
        }
    }
}

impl<C: ?Sized> fmt::Debug for Process<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("status", &self.status)
            .field("last_run", &self.last_run)
            .finish_non_exhaustive()
    }
}
