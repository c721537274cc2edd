//! Colony processes.
//!
//! Managers publish work to the `harvest` topic; workers pull it through a
//! behavior tree.  All colony state (stock, source energy, worker records
//! and their tree cursors) lives in durable memory, so nothing here holds
//! state across cycles except process ids.

use ck_behavior::{Node, Status, leaf, repeat_until_success, selector, sequence};
use ck_core::{AgentId, AgentRecord, Cycle, Memory};
use ck_kernel::{KernelProcess, Services};
use ck_schedule::{Process, RunOutcome, Runnable};
use tracing::{debug, info, warn};

// ── Constants ─────────────────────────────────────────────────────────────────

pub const HARVEST: &str = "harvest";
pub const COLONY:  &str = "colony";
pub const SOURCES: [&str; 3] = ["alpha", "beta", "gamma"];

const SOURCE_MAX:      u32 = 300;
const SOURCE_REGEN:    u32 = 15;
const HARVEST_RATE:    u32 = 10;
const CARRY_CAPACITY:  u32 = 50;
const WORKER_COST:     u32 = 60;
const WORKER_TARGET:   usize = 6;
const WORKER_LIFESPAN: u64 = 150;
const REQUEST_TTL:     u64 = 4;
const IDLE_SLEEP:      u64 = 2;

/// Topic payload: which source to harvest.
#[derive(Clone, Debug)]
pub struct Task {
    pub source: String,
}

type Ctx = Services<Task>;

// ── Memory helpers ────────────────────────────────────────────────────────────

fn colony_id() -> AgentId {
    AgentId::from(COLONY)
}

fn source_key(source: &str) -> String {
    format!("source:{source}")
}

fn read_u32(record: &AgentRecord, key: &str) -> u32 {
    record.field(key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn read_u64(record: &AgentRecord, key: &str) -> u64 {
    record.field(key).and_then(|v| v.parse().ok()).unwrap_or(0)
}

/// Write the initial colony record: starting stock and full sources.
pub fn seed_colony(memory: &mut Memory, stock: u32) {
    let record = memory.agent_mut(&colony_id());
    record.set_field("stock", stock.to_string());
    for source in SOURCES {
        record.set_field(&source_key(source), SOURCE_MAX.to_string());
    }
}

/// Current colony stock.
pub fn stock(memory: &Memory) -> u32 {
    memory.agent(&colony_id()).map_or(0, |r| read_u32(r, "stock"))
}

/// The processes a fresh colony starts with.
pub fn managers() -> Vec<KernelProcess<Task>> {
    vec![
        Process::new("source-manager", "manager", 0, SourceManager),
        Process::new("spawn-manager", "spawn", 1, SpawnManager),
        Process::new("janitor", "janitor", 9, Janitor),
    ]
}

// ── Managers ──────────────────────────────────────────────────────────────────

/// Regenerates sources and publishes one harvest request per source that
/// has energy, fuller sources first.
pub struct SourceManager;

impl Runnable<Ctx> for SourceManager {
    fn run(&mut self, ctx: &mut Ctx) -> RunOutcome {
        let colony = ctx.memory.agent_mut(&colony_id());
        for source in SOURCES {
            let key = source_key(source);
            let energy = (read_u32(colony, &key) + SOURCE_REGEN).min(SOURCE_MAX);
            colony.set_field(&key, energy.to_string());
            if energy < HARVEST_RATE {
                continue;
            }

            let priority = f64::from(energy) / f64::from(SOURCE_MAX);
            let task = Task { source: source.to_owned() };
            if let Err(e) = ctx.topics.add_request_with_ttl(HARVEST, priority, task, REQUEST_TTL) {
                warn!(error = %e, source, "could not publish harvest request");
            }
        }
        RunOutcome::Sleeping(2)
    }
}

/// Keeps `WORKER_TARGET` workers alive while the stock can pay for them.
pub struct SpawnManager;

impl Runnable<Ctx> for SpawnManager {
    fn run(&mut self, ctx: &mut Ctx) -> RunOutcome {
        let workers = ctx
            .memory
            .agents()
            .filter(|(_, record)| record.field("role") == Some("worker"))
            .count();
        if workers >= WORKER_TARGET {
            return RunOutcome::Sleeping(5);
        }

        let colony = ctx.memory.agent_mut(&colony_id());
        let stock = read_u32(colony, "stock");
        if stock < WORKER_COST {
            return RunOutcome::Running;
        }
        let serial = read_u64(colony, "spawned");
        colony.set_field("stock", (stock - WORKER_COST).to_string());
        colony.set_field("spawned", (serial + 1).to_string());

        let name = format!("worker-{serial}");
        let id = AgentId::from(name.as_str());
        let record = ctx.memory.agent_mut(&id);
        record.set_field("role", "worker");
        record.set_field("born", ctx.cycle.0.to_string());

        ctx.spawn(worker(&name));
        info!(worker = %id, cycle = %ctx.cycle, workers = workers + 1, "spawned worker");
        RunOutcome::Running
    }
}

/// Drops worker records that outlived their lifespan without a process to
/// clean them up.
pub struct Janitor;

impl Runnable<Ctx> for Janitor {
    fn run(&mut self, ctx: &mut Ctx) -> RunOutcome {
        let now = ctx.cycle;
        let removed = ctx.memory.retain_agents(|id, record| {
            if id.as_str() == COLONY {
                return true;
            }
            record
                .field("born")
                .and_then(|v| v.parse().ok())
                .is_some_and(|born| now.since(Cycle(born)) <= WORKER_LIFESPAN)
        });
        if removed > 0 {
            info!(cycle = %now, removed, "collected orphaned records");
        }
        RunOutcome::Sleeping(25)
    }
}

// ── Workers ───────────────────────────────────────────────────────────────────

pub fn worker(name: &str) -> KernelProcess<Task> {
    Process::new(name, "worker", 2, WorkerBody { id: AgentId::from(name) })
}

struct WorkerBody {
    id: AgentId,
}

impl Runnable<Ctx> for WorkerBody {
    fn run(&mut self, ctx: &mut Ctx) -> RunOutcome {
        let Some(mut record) = ctx.memory.remove_agent(&self.id) else {
            warn!(worker = %self.id, "record missing; retiring");
            return RunOutcome::Terminated;
        };
        if ctx.cycle.since(Cycle(read_u64(&record, "born"))) >= WORKER_LIFESPAN {
            info!(worker = %self.id, delivered = read_u32(&record, "delivered"), "worker retired");
            return RunOutcome::Terminated;
        }

        let mut state = Worker::load(&self.id, &record);
        let status = worker_tree().tick(&mut state, ctx, &mut record);
        state.store(&mut record);
        *ctx.memory.agent_mut(&self.id) = record;

        match status {
            Status::Failure => RunOutcome::Sleeping(IDLE_SLEEP),
            Status::Running | Status::Success => RunOutcome::Running,
        }
    }
}

/// Worker fields decoded from its record for the duration of one run.
struct Worker {
    id:        AgentId,
    target:    Option<String>,
    carry:     u32,
    delivered: u32,
}

impl Worker {
    fn load(id: &AgentId, record: &AgentRecord) -> Self {
        Self {
            id:        id.clone(),
            target:    record.field("target").map(str::to_owned),
            carry:     read_u32(record, "carry"),
            delivered: read_u32(record, "delivered"),
        }
    }

    fn store(&self, record: &mut AgentRecord) {
        match &self.target {
            Some(target) => record.set_field("target", target.as_str()),
            None => {
                record.remove_field("target");
            }
        }
        if self.carry == 0 {
            record.remove_field("carry");
        } else {
            record.set_field("carry", self.carry.to_string());
        }
        record.set_field("delivered", self.delivered.to_string());
    }
}

/// ```text
/// job (sequence)
/// ├── acquire (selector)
/// │   ├── has-target
/// │   └── claim           pull a harvest request
/// ├── gather (repeat until success)
/// │   └── harvest         several cycles until full
/// └── deliver
/// ```
fn worker_tree<'a>() -> Node<'a, Worker, Ctx> {
    sequence(
        "job",
        vec![
            selector(
                "acquire",
                vec![
                    leaf("has-target", |w: &mut Worker, _: &mut Ctx| Status::from(w.target.is_some())),
                    leaf("claim", claim),
                ],
            ),
            repeat_until_success("gather", leaf("harvest", harvest)),
            leaf("deliver", deliver),
        ],
    )
}

fn claim(worker: &mut Worker, ctx: &mut Ctx) -> Status {
    let mut rng = ctx.agent_rng(&worker.id);
    // One of the two most urgent requests, so workers spread over sources.
    let request = ctx.topics.get_message_of_my_choice(HARVEST, |live| {
        if live.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..live.len().min(2));
        Some(live.len() - 1 - pick)
    });
    match request {
        Some(request) => {
            debug!(worker = %worker.id, source = %request.details.source, "claimed");
            worker.target = Some(request.details.source);
            Status::Success
        }
        None => Status::Failure,
    }
}

fn harvest(worker: &mut Worker, ctx: &mut Ctx) -> Status {
    let Some(source) = worker.target.as_deref() else {
        return Status::Failure;
    };
    let colony = ctx.memory.agent_mut(&colony_id());
    let key = source_key(source);
    let energy = read_u32(colony, &key);
    let take = HARVEST_RATE.min(energy).min(CARRY_CAPACITY - worker.carry);
    colony.set_field(&key, (energy - take).to_string());
    worker.carry += take;

    let depleted = take == 0 && worker.carry > 0;
    if worker.carry >= CARRY_CAPACITY || depleted {
        Status::Success
    } else {
        Status::Running
    }
}

fn deliver(worker: &mut Worker, ctx: &mut Ctx) -> Status {
    let colony = ctx.memory.agent_mut(&colony_id());
    let stock = read_u32(colony, "stock") + worker.carry;
    colony.set_field("stock", stock.to_string());
    debug!(worker = %worker.id, amount = worker.carry, stock, "delivered");

    worker.delivered += worker.carry;
    worker.carry = 0;
    worker.target = None;
    Status::Success
}
