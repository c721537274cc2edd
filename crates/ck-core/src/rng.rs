//! Deterministic per-agent and kernel-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! RNG state cannot survive a cycle (everything but `Memory` is torn down),
//! and persisting it would cost durable storage for every agent.  Instead an
//! agent's generator is re-derived every cycle from:
//!
//!   seed = global_seed XOR (hash(agent) * MIXING_CONSTANT) XOR (cycle * CYCLE_MIX)
//!
//! The agent name is hashed with `FxHasher`, which is deterministic across
//! runs (unlike std's randomly keyed `SipHash`).  The mixing constants spread
//! consecutive cycles and similar names across the seed space.  This means:
//!
//! - An agent draws different numbers every cycle without storing state.
//! - Re-running a cycle from the same memory reproduces the same draws.
//! - Agents never share RNG state, so evaluation order does not matter.

use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use crate::{AgentId, Cycle};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Odd constant from splitmix64 used to mix the cycle number.
const CYCLE_MIX: u64 = 0xbf58_476d_1ce4_e5b9;

fn hash_agent(agent: &AgentId) -> u64 {
    let mut hasher = FxHasher::default();
    agent.as_str().hash(&mut hasher);
    hasher.finish()
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent, per-cycle deterministic RNG.
///
/// Build one at the top of an agent's turn; drop it at the end.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed, an agent and the
    /// current cycle.
    pub fn for_cycle(global_seed: u64, agent: &AgentId, cycle: Cycle) -> Self {
        let seed = global_seed
            ^ hash_agent(agent).wrapping_mul(MIXING_CONSTANT)
            ^ cycle.0.wrapping_mul(CYCLE_MIX);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── KernelRng ─────────────────────────────────────────────────────────────────

/// Kernel-level RNG for managers (spawn jitter, source selection, …).
///
/// Re-seeded from `(seed, cycle)` each cycle for the same reason as
/// [`AgentRng`].
pub struct KernelRng(SmallRng);

impl KernelRng {
    pub fn for_cycle(seed: u64, cycle: Cycle) -> Self {
        KernelRng(SmallRng::seed_from_u64(seed ^ cycle.0.wrapping_mul(CYCLE_MIX)))
    }

    /// Derive a child RNG with a different seed offset.
    pub fn child(&mut self, offset: u64) -> KernelRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        KernelRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
