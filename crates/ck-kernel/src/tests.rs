//! Integration tests for ck-kernel.

use std::cell::RefCell;
use std::rc::Rc;

use ck_core::{AgentId, CpuMeter, Cycle, KernelConfig, ManualMeter};
use ck_schedule::{Process, RunOutcome, SchedulerStats, runnable_fn};

use crate::{CycleReport, Kernel, KernelBuilder, KernelObserver, KernelProcess, NoopObserver, Services};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Topic payload used throughout: a target name.
type Task = String;

fn test_config(total_cycles: u64) -> KernelConfig {
    KernelConfig {
        total_cycles,
        seed: 7,
        ..KernelConfig::default()
    }
}

/// A meter shared between the kernel and bodies that "spend" CPU.
struct SharedMeter(Rc<ManualMeter>);

impl CpuMeter for SharedMeter {
    fn used(&self) -> f64 {
        self.0.used()
    }

    fn limit(&self) -> f64 {
        self.0.limit()
    }

    fn start_cycle(&mut self) {
        self.0.set_used(0.0);
    }
}

fn kernel(total_cycles: u64) -> Kernel<Task, ManualMeter> {
    KernelBuilder::new(test_config(total_cycles), ManualMeter::unlimited())
        .build()
        .unwrap()
}

/// A body that runs `f` and keeps running.
fn every_cycle<F>(id: &str, priority: i32, mut f: F) -> KernelProcess<Task>
where
    F: FnMut(&mut Services<Task>) + 'static,
{
    Process::new(
        id,
        "test",
        priority,
        runnable_fn(move |ctx: &mut Services<Task>| {
            f(ctx);
            RunOutcome::Running
        }),
    )
}

/// Records every hook invocation.
#[derive(Default)]
struct Recorder {
    starts:   Vec<Cycle>,
    reports:  Vec<CycleReport>,
    shutdown: Option<(Cycle, SchedulerStats)>,
}

impl KernelObserver for Recorder {
    fn on_cycle_start(&mut self, cycle: Cycle) {
        self.starts.push(cycle);
    }

    fn on_cycle_end(&mut self, report: &CycleReport) {
        self.reports.push(*report);
    }

    fn on_shutdown(&mut self, final_cycle: Cycle, stats: &SchedulerStats) {
        self.shutdown = Some((final_cycle, stats.clone()));
    }
}

// ── KernelBuilder ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::KernelError;

    #[test]
    fn builds_with_defaults() {
        let k = kernel(10);
        assert_eq!(k.clock.current, Cycle(0));
        assert!(k.scheduler.is_empty());
        assert_eq!(k.services.memory.agent_count(), 0);
        assert_eq!(k.services.topics.default_ttl(), 50);
    }

    #[test]
    fn starts_at_configured_cycle() {
        let config = KernelConfig { start_cycle: 500, ..test_config(10) };
        let k: Kernel<Task, _> = KernelBuilder::new(config, ManualMeter::unlimited()).build().unwrap();
        assert_eq!(k.clock.current, Cycle(500));
    }

    #[test]
    fn invalid_budget_rejected() {
        let mut config = test_config(10);
        config.budget.limit_fraction = 0.0;
        let result = KernelBuilder::<Task, _>::new(config, ManualMeter::unlimited()).build();
        assert!(matches!(result, Err(KernelError::Config(_))));
    }

    #[test]
    fn duplicate_initial_process_rejected() {
        let result = KernelBuilder::<Task, _>::new(test_config(10), ManualMeter::unlimited())
            .process(every_cycle("p", 0, |_| {}))
            .process(every_cycle("p", 1, |_| {}))
            .build();
        assert!(matches!(result, Err(KernelError::Schedule(_))));
    }

    #[test]
    fn restored_memory_is_used() {
        let mut memory = ck_core::Memory::new();
        memory.agent_mut(&AgentId::from("w1")).set_field("role", "worker");
        let k: Kernel<Task, _> = KernelBuilder::new(test_config(10), ManualMeter::unlimited())
            .memory(memory)
            .build()
            .unwrap();
        let record = k.services.memory.agent(&AgentId::from("w1")).unwrap();
        assert_eq!(record.field("role"), Some("worker"));
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_stops_at_end_cycle() {
        let mut k = kernel(5);
        let mut obs = Recorder::default();
        k.run(&mut obs);
        assert_eq!(obs.starts, (0..5).map(Cycle).collect::<Vec<_>>());
        assert_eq!(obs.reports.len(), 5);
        assert_eq!(k.clock.current, Cycle(5));
        let (final_cycle, _) = obs.shutdown.unwrap();
        assert_eq!(final_cycle, Cycle(5));
    }

    #[test]
    fn run_cycles_ignores_end_and_skips_shutdown() {
        let mut k = kernel(2);
        let mut obs = Recorder::default();
        k.run_cycles(4, &mut obs);
        assert_eq!(k.clock.current, Cycle(4));
        assert!(obs.shutdown.is_none());
    }

    #[test]
    fn bodies_see_current_cycle() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut k = kernel(3);
        k.spawn(every_cycle("clock", 0, move |ctx| sink.borrow_mut().push(ctx.cycle)))
            .unwrap();
        k.run(&mut NoopObserver);
        assert_eq!(*seen.borrow(), [Cycle(0), Cycle(1), Cycle(2)]);
    }

    #[test]
    fn memory_flushed_every_cycle() {
        let mut k = kernel(3);
        k.spawn(every_cycle("scratch", 0, |ctx| {
            // Touch a record without writing anything: dropped on flush.
            ctx.memory.agent_mut(&AgentId::from("ghost"));
            ctx.memory.agent_mut(&AgentId::from("kept")).set_field("n", ctx.cycle.0.to_string());
        }))
        .unwrap();

        let first = k.run_cycle();
        let second = k.run_cycle();
        assert_eq!(second.memory_version, first.memory_version + 1);
        assert!(k.services.memory.agent(&AgentId::from("ghost")).is_none());
        let kept = k.services.memory.agent(&AgentId::from("kept")).unwrap();
        assert_eq!(kept.field("n"), Some("1"));
    }

    #[test]
    fn kill_removes_immediately() {
        let mut k = kernel(3);
        k.spawn(every_cycle("p", 0, |_| {})).unwrap();
        assert!(k.kill("p"));
        assert!(!k.kill("p"));
        assert_eq!(k.stats().terminated, 1);
    }
}

// ── Topics ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod topic_tests {
    use super::*;

    #[test]
    fn producer_runs_before_consumer() {
        let taken = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&taken);

        let mut k = kernel(3);
        k.spawn(every_cycle("producer", 0, |ctx| {
            let target = format!("source-{}", ctx.cycle.0);
            ctx.topics.add_request("harvest", 1.0, target).unwrap();
        }))
        .unwrap();
        k.spawn(every_cycle("consumer", 1, move |ctx| {
            if let Some(request) = ctx.topics.get_next_request("harvest") {
                sink.borrow_mut().push(request.details);
            }
        }))
        .unwrap();

        k.run(&mut NoopObserver);
        assert_eq!(*taken.borrow(), ["source-0", "source-1", "source-2"]);
        assert!(k.services.topics.is_empty());
    }

    #[test]
    fn expired_requests_swept_at_cycle_start() {
        let mut k = kernel(10);
        k.spawn(Process::new(
            "once",
            "test",
            0,
            runnable_fn(|ctx: &mut Services<Task>| {
                ctx.topics.add_request_with_ttl("haul", 2.0, "now-only".to_owned(), 0).unwrap();
                RunOutcome::Terminated
            }),
        ))
        .unwrap();

        let first = k.run_cycle();
        assert_eq!(first.swept, 0);
        assert_eq!(first.pending_requests, 1);

        let second = k.run_cycle();
        assert_eq!(second.swept, 1);
        assert_eq!(second.pending_requests, 0);
        assert_eq!(second.tick.removed, 1);
    }

    #[test]
    fn sweep_disabled_keeps_dead_entries() {
        let config = KernelConfig { stale_sweep_interval: 0, ..test_config(10) };
        let mut k: Kernel<Task, _> = KernelBuilder::new(config, ManualMeter::unlimited()).build().unwrap();
        k.services.topics.add_request_with_ttl("haul", 1.0, "x".to_owned(), 0).unwrap();

        k.run_cycle();
        let report = k.run_cycle();
        assert_eq!(report.swept, 0);
        assert_eq!(k.services.topics.get_length("haul"), 1);
        assert!(k.services.topics.get_next_request("haul").is_none());
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn_tests {
    use super::*;

    #[test]
    fn spawned_process_runs_next_cycle() {
        let runs = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&runs);

        let mut k = kernel(10);
        let mut spawn = Some(every_cycle("child", 0, move |ctx| sink.borrow_mut().push(ctx.cycle)));
        k.spawn(Process::new(
            "parent",
            "spawner",
            0,
            runnable_fn(move |ctx: &mut Services<Task>| match spawn.take() {
                Some(child) => {
                    ctx.spawn(child);
                    RunOutcome::Running
                }
                None => RunOutcome::Terminated,
            }),
        ))
        .unwrap();

        let first = k.run_cycle();
        assert_eq!(first.spawned, 1);
        assert_eq!(first.processes, 2);
        assert!(runs.borrow().is_empty());

        k.run_cycle();
        assert_eq!(*runs.borrow(), [Cycle(1)]);
        assert_eq!(k.stats().created, 2);
    }

    #[test]
    fn duplicate_spawn_dropped() {
        let mut k = kernel(10);
        k.spawn(Process::new(
            "dup",
            "spawner",
            0,
            runnable_fn(|ctx: &mut Services<Task>| {
                ctx.spawn(every_cycle("dup", 0, |_| {}));
                RunOutcome::Running
            }),
        ))
        .unwrap();

        let report = k.run_cycle();
        assert_eq!(report.spawned, 0);
        assert_eq!(k.scheduler.len(), 1);
        assert_eq!(k.services.pending_spawns(), 0);
    }
}

// ── Budget ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod budget_tests {
    use super::*;

    #[test]
    fn meter_reset_each_cycle_and_overrun_skips() {
        let shared = Rc::new(ManualMeter::new(10.0));
        let config = test_config(4);
        let mut k: Kernel<Task, SharedMeter> =
            KernelBuilder::new(config, SharedMeter(Rc::clone(&shared))).build().unwrap();

        for name in ["a", "b"] {
            let meter = Rc::clone(&shared);
            k.spawn(every_cycle(name, 0, move |_| meter.spend(10.0))).unwrap();
        }

        let mut obs = Recorder::default();
        k.run(&mut obs);
        assert!(obs.reports.iter().all(|r| r.tick.ran == 1 && r.tick.skipped == 1));
        assert_eq!(k.stats().out_of_time, 4);
        assert_eq!(k.stats().runs_by_kind["test"], 4);
    }
}

// ── Behavior trees with durable cursors ───────────────────────────────────────

#[cfg(test)]
mod behavior_tests {
    use ck_behavior::{Status, leaf, sequence};

    use super::*;

    /// A three-step task whose middle step takes two cycles.  The tree is
    /// rebuilt on every run; only the cursor in memory carries progress.
    fn worker(agent: &'static str, log: Rc<RefCell<Vec<String>>>) -> KernelProcess<Task> {
        every_cycle(agent, 0, move |ctx| {
            let id = AgentId::from(agent);
            let mut record = ctx.memory.remove_agent(&id).unwrap_or_default();

            let tree = sequence(
                "job",
                vec![
                    leaf("fetch", |log: &mut Vec<String>, _: &mut Services<Task>| {
                        log.push("fetch".into());
                        Status::Success
                    }),
                    leaf("work", |log: &mut Vec<String>, ctx: &mut Services<Task>| {
                        log.push(format!("work@{}", ctx.cycle.0));
                        if ctx.cycle.0 >= 1 { Status::Success } else { Status::Running }
                    }),
                    leaf("deliver", |log: &mut Vec<String>, _: &mut Services<Task>| {
                        log.push("deliver".into());
                        Status::Success
                    }),
                ],
            );
            tree.tick(&mut *log.borrow_mut(), ctx, &mut record);
            *ctx.memory.agent_mut(&id) = record;
        })
    }

    #[test]
    fn cursor_survives_cycle_boundary() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut k = kernel(2);
        k.spawn(worker("w1", Rc::clone(&log))).unwrap();

        k.run_cycle();
        let record = k.services.memory.agent(&AgentId::from("w1")).unwrap();
        assert_eq!(record.cursors.get("job"), Some(&1));

        k.run_cycle();
        assert_eq!(*log.borrow(), ["fetch", "work@0", "work@1", "deliver"]);
        // Finished tree leaves no cursor; the empty record is flushed away.
        assert!(k.services.memory.agent(&AgentId::from("w1")).is_none());
    }
}
