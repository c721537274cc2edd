//! Tri-state node result.

use std::fmt;

/// What a node reports after one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    /// Not finished: tick me again next cycle before evaluating anything
    /// after me.
    Running,
}

impl Status {
    /// `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_done(self) -> bool {
        !matches!(self, Status::Running)
    }
}

impl From<bool> for Status {
    /// `true` → `Success`, `false` → `Failure`.
    fn from(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Running => "running",
        };
        f.write_str(s)
    }
}
