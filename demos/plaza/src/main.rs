//! plaza — a small mixed-traffic scene for the mixsim engine.
//!
//! Pedestrians cross a plaza, queue at a pod rack, ride pods to a second
//! rack and walk out; a few cyclists pass through the other way.
//!
//! ```text
//! cargo run -p plaza                      # built-in config
//! cargo run -p plaza -- config.json       # SimConfig as JSON
//! RUST_LOG=mx_sim=debug cargo run -p plaza
//! ```

mod layout;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mx_agent::AgentSnapshot;
use mx_core::{AgentKind, SimConfig, Tick};
use mx_geometry::StraightLine;
use mx_output::{CsvWriter, OutputWriter, SimOutputObserver};
use mx_schedule::{DepartureSchedule, DistributionSet, load_distribution_reader, load_od_reader};
use mx_sim::{SimBuilder, SimObserver, TickSummary};

use layout::build_plaza;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 42;
const TICK_LENGTH_SECS:      f64 = 0.25;
const SIM_MINUTES:           u64 = 5;
const OUTPUT_INTERVAL_TICKS: u64 = 4; // one snapshot per simulated second
const OUTPUT_DIR:            &str = "output/plaza";

// ── Demand ────────────────────────────────────────────────────────────────────

// Per minute.  `west → rack-a` pedestrians wait there for a pod.
const PEDESTRIAN_OD: &str = "\
60,east,west,rack-a\n\
west,8,,6\n\
east,,8,\n\
";

const BICYCLE_OD: &str = "\
60,west\n\
east,3\n\
";

// Pods leaving rack-a always go to rack-b.
const POD_DISTRIBUTION: &str = "\
source,destination,cumulative\n\
rack-a,rack-b,100\n\
";

// Riders let off at rack-b mostly walk out east.
const PEDESTRIAN_DISTRIBUTION: &str = "\
source,destination,cumulative\n\
rack-b,east,80\n\
rack-b,west,100\n\
";

// ── Observer wrapper ──────────────────────────────────────────────────────────

struct ReportingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    snapshot_rows: usize,
    boardings:     usize,
    releases:      usize,
    peak:          [usize; AgentKind::COUNT],
}

impl<W: OutputWriter> ReportingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self {
            inner,
            snapshot_rows: 0,
            boardings:     0,
            releases:      0,
            peak:          [0; AgentKind::COUNT],
        }
    }
}

impl<W: OutputWriter> SimObserver for ReportingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.boardings += summary.boardings;
        self.releases += summary.releases;
        for (peak, &n) in self.peak.iter_mut().zip(&summary.counts) {
            *peak = (*peak).max(n);
        }
        self.inner.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[AgentSnapshot]) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_config() -> Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SimConfig {
            tick_length_secs:      TICK_LENGTH_SECS,
            total_ticks:           (SIM_MINUTES as f64 * 60.0 / TICK_LENGTH_SECS) as u64,
            seed:                  SEED,
            num_threads:           None,
            output_interval_ticks: OUTPUT_INTERVAL_TICKS,
            wander:                Default::default(),
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    println!("=== plaza — mixsim ===");
    println!(
        "Tick: {} s  |  Ticks: {}  |  Seed: {}",
        config.tick_length_secs, config.total_ticks, config.seed
    );
    println!();

    // 1. Geometry.
    let geometry = build_plaza()?;
    println!(
        "Plaza: {} barrier segments, {} crossings, {} zones",
        geometry.barrier_count(),
        geometry.crossings.len(),
        geometry.zones.len()
    );

    // 2. Demand.
    let mut schedule = DepartureSchedule::new();
    schedule.add(AgentKind::Pedestrian, 0, load_od_reader(Cursor::new(PEDESTRIAN_OD))?);
    schedule.add(AgentKind::Bicycle, 30, load_od_reader(Cursor::new(BICYCLE_OD))?);

    let mut distributions = DistributionSet::new();
    distributions.set(AgentKind::Pod, load_distribution_reader(Cursor::new(POD_DISTRIBUTION))?);
    distributions.set(
        AgentKind::Pedestrian,
        load_distribution_reader(Cursor::new(PEDESTRIAN_DISTRIBUTION))?,
    );

    // 3. Sim.
    let mut sim = SimBuilder::new(config.clone(), geometry, StraightLine)
        .schedule(schedule)
        .distributions(distributions)
        .build()?;

    // 4. Output.
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = ReportingObserver::new(SimOutputObserver::new(writer, &config));

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    info!(ticks = config.total_ticks, secs = elapsed.as_secs_f64(), "run finished");

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock);
    println!("  agent_snapshots.csv : {} rows", obs.snapshot_rows);
    println!("  boardings / releases: {} / {}", obs.boardings, obs.releases);
    println!();
    println!("{:<12} {:>6} {:>6}", "Kind", "Peak", "Final");
    println!("{}", "-".repeat(26));
    let handle = sim.handle();
    for kind in AgentKind::ALL {
        println!(
            "{:<12} {:>6} {:>6}",
            kind.as_str(),
            obs.peak[kind.index()],
            handle.agent_count(kind)
        );
    }

    Ok(())
}
