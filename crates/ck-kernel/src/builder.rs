//! Fluent builder for constructing a [`Kernel`].

use ck_core::{CpuMeter, CycleClock, KernelConfig, Memory};
use ck_schedule::Scheduler;

use crate::{Kernel, KernelProcess, KernelResult, Services};

/// Fluent builder for [`Kernel<T, M>`].
///
/// # Required inputs
///
/// - [`KernelConfig`]: cycles, seed, request ttl, budget policy, …
/// - `M: CpuMeter`: the host's compute accounting
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default            |
/// |-----------------|--------------------|
/// | `.memory(m)`    | `Memory::new()`    |
/// | `.process(p)`   | no processes       |
///
/// # Example
///
/// ```rust,ignore
/// let mut kernel = KernelBuilder::new(config, ManualMeter::new(20.0))
///     .memory(restored)
///     .process(spawner)
///     .process(harvester)
///     .build()?;
/// ```
pub struct KernelBuilder<T, M: CpuMeter> {
    config:    KernelConfig,
    meter:     M,
    memory:    Option<Memory>,
    processes: Vec<KernelProcess<T>>,
}

impl<T, M: CpuMeter> KernelBuilder<T, M> {
    pub fn new(config: KernelConfig, meter: M) -> Self {
        Self {
            config,
            meter,
            memory:    None,
            processes: Vec::new(),
        }
    }

    /// Start from previously persisted memory instead of an empty store.
    pub fn memory(mut self, memory: Memory) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Register `process` when the kernel is built.
    pub fn process(mut self, process: KernelProcess<T>) -> Self {
        self.processes.push(process);
        self
    }

    /// Validate the config, register the initial processes and return a
    /// ready-to-run [`Kernel`].
    pub fn build(self) -> KernelResult<Kernel<T, M>> {
        self.config.validate()?;

        let mut scheduler = Scheduler::new(self.config.budget.clone());
        for process in self.processes {
            scheduler.register_process(process)?;
        }

        let services = Services::new(
            self.config.seed,
            self.config.default_request_ttl,
            self.memory.unwrap_or_default(),
        );

        Ok(Kernel {
            clock: CycleClock::new(self.config.start()),
            config: self.config,
            scheduler,
            services,
            meter: self.meter,
        })
    }
}
