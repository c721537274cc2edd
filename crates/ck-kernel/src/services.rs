//! `Services<T>`: the context every process body receives.

use ck_core::{AgentId, AgentRng, Cycle, KernelRng, Memory};
use ck_schedule::Process;
use ck_topic::TopicStore;

/// A process whose body runs against the kernel's [`Services`].
pub type KernelProcess<T> = Process<Services<T>>;

/// Shared state handed to every runnable for the duration of its run.
///
/// `T` is the payload type of topic requests.
pub struct Services<T> {
    /// The cycle currently being executed.
    pub cycle: Cycle,

    /// Master seed, copied from the config.
    pub seed: u64,

    /// Task queues shared between producers and consumers.
    pub topics: TopicStore<T>,

    /// Durable state.  The only thing that survives between cycles on a
    /// host that tears down transient state.
    pub memory: Memory,

    spawned: Vec<KernelProcess<T>>,
}

impl<T> Services<T> {
    pub fn new(seed: u64, default_ttl: u64, memory: Memory) -> Self {
        Self {
            cycle: Cycle::ZERO,
            seed,
            topics: TopicStore::new(default_ttl),
            memory,
            spawned: Vec::new(),
        }
    }

    /// Queue a process for registration once the current tick finishes.
    ///
    /// A queued process first runs on the following cycle.  Duplicate ids
    /// are dropped at registration time.
    pub fn spawn(&mut self, process: KernelProcess<T>) {
        self.spawned.push(process);
    }

    /// Processes queued by [`spawn`](Self::spawn) and not yet registered.
    pub fn pending_spawns(&self) -> usize {
        self.spawned.len()
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<KernelProcess<T>> {
        std::mem::take(&mut self.spawned)
    }

    /// RNG for `agent` in the current cycle.  Rebuilding it in the same
    /// cycle yields the same stream.
    pub fn agent_rng(&self, agent: &AgentId) -> AgentRng {
        AgentRng::for_cycle(self.seed, agent, self.cycle)
    }

    /// Kernel-wide RNG for the current cycle.
    pub fn kernel_rng(&self) -> KernelRng {
        KernelRng::for_cycle(self.seed, self.cycle)
    }
}
