//! colony: end-to-end example for the colony kernel.
//!
//! A source manager publishes harvest requests, a spawn manager keeps a
//! small worker population alive, and every worker drives a behavior tree
//! whose cursors live in durable memory.  After every cycle memory is torn
//! down to JSON and rebuilt, the way a host that forgets everything between
//! invocations would, so any in-flight task only survives through its
//! persisted cursor.
//!
//! Usage: `colony [config.json]`.  Set `RUST_LOG=debug` for per-cycle
//! detail.

mod colony;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use ck_core::{KernelConfig, Memory, WallClockMeter};
use ck_kernel::{KernelBuilder, KernelObserver};
use ck_output::{CsvWriter, StatsObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                   u64 = 42;
const TOTAL_CYCLES:           u64 = 300;
const OUTPUT_INTERVAL_CYCLES: u64 = 1;
const CPU_LIMIT_MS:           f64 = 5.0;
const STARTING_STOCK:         u32 = 200;
const OUTPUT_DIR:             &str = "output/colony";

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<PathBuf>) -> Result<KernelConfig> {
    let Some(path) = path else {
        return Ok(KernelConfig {
            total_cycles:           TOTAL_CYCLES,
            seed:                   SEED,
            output_interval_cycles: OUTPUT_INTERVAL_CYCLES,
            ..KernelConfig::default()
        });
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // 1. Config.
    let config = load_config(std::env::args_os().nth(1).map(PathBuf::from))?;
    println!("=== colony: cooperative kernel demo ===");
    println!(
        "Cycles: {}  |  Seed: {}  |  CPU limit: {CPU_LIMIT_MS} ms/cycle",
        config.total_cycles, config.seed
    );
    println!();

    // 2. Durable memory with the colony record.
    let mut memory = Memory::new();
    colony::seed_colony(&mut memory, STARTING_STOCK);

    // 3. Kernel with the manager processes.
    let mut builder = KernelBuilder::new(config.clone(), WallClockMeter::new(CPU_LIMIT_MS))
        .memory(memory);
    for process in colony::managers() {
        builder = builder.process(process);
    }
    let mut kernel = builder.build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = StatsObserver::new(writer, &config);

    // 5. Run, persisting memory between cycles.
    let t0 = Instant::now();
    let mut persisted_bytes = 0;
    while kernel.clock.current < config.end_cycle() {
        kernel.run_cycles(1, &mut obs);
        let json = serde_json::to_string(&kernel.services.memory)?;
        persisted_bytes = json.len();
        kernel.services.memory = serde_json::from_str(&json)?;
    }
    obs.on_shutdown(kernel.clock.current, kernel.stats());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let stats = kernel.stats();
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  processes created    : {}", stats.created);
    println!("  processes terminated : {}", stats.terminated);
    println!("  out-of-time skips    : {}", stats.out_of_time);
    println!("  colony stock         : {}", colony::stock(&kernel.services.memory));
    println!(
        "  pending requests     : {}",
        kernel.services.topics.get_length(colony::HARVEST)
    );
    println!("  memory (JSON)        : {persisted_bytes} bytes, version {}", kernel.services.memory.version());
    println!();

    println!("{:<10} {:>8} {:>12}", "Kind", "Runs", "CPU (ms)");
    println!("{}", "-".repeat(32));
    for (kind, cpu) in &stats.cpu_by_kind {
        let runs = stats.runs_by_kind.get(kind).copied().unwrap_or(0);
        println!("{kind:<10} {runs:>8} {cpu:>12.3}");
    }

    Ok(())
}
