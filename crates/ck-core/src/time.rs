//! Cycle model.
//!
//! # Design
//!
//! The host invokes the kernel once per discrete *cycle* and tears down all
//! in-memory state afterwards.  Time is therefore a monotonically increasing
//! `Cycle` counter reported by the host; there is no wall-clock mapping.
//!
//! Using an integer cycle as the canonical time unit means all sleep and
//! expiry arithmetic is exact and comparisons are O(1).

use std::fmt;

// ── Cycle ─────────────────────────────────────────────────────────────────────

/// An absolute cycle number.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(pub u64);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    /// Return the cycle `n` steps after `self`, saturating at `u64::MAX`.
    ///
    /// Saturation matters for "sleep forever" durations and very long ttls.
    #[inline]
    pub fn offset(self, n: u64) -> Cycle {
        Cycle(self.0.saturating_add(n))
    }

    /// Cycles elapsed from `earlier` to `self` (0 if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: Cycle) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Cycle {
    type Output = Cycle;
    #[inline]
    fn add(self, rhs: u64) -> Cycle {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Cycle {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Cycle) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── CycleClock ────────────────────────────────────────────────────────────────

/// Tracks the current cycle.
///
/// In production the host reports the cycle number directly and the clock is
/// simply [`set`](Self::set) at the top of every invocation; in tests and the
/// demo it is [`advance`](Self::advance)d by the kernel loop.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleClock {
    pub current: Cycle,
}

impl CycleClock {
    pub fn new(start: Cycle) -> Self {
        Self { current: start }
    }

    /// Advance the clock by one cycle.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + 1;
    }

    /// Adopt the cycle number reported by the host.
    #[inline]
    pub fn set(&mut self, cycle: Cycle) {
        self.current = cycle;
    }
}

impl fmt::Display for CycleClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.current)
    }
}
