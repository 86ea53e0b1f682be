//! Simulation observer trait for progress reporting and data collection.

use std::sync::mpsc::Sender;

use tracing::debug;

use mx_agent::AgentSnapshot;
use mx_core::Tick;

use crate::TickSummary;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {} agents", summary.total_agents());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once the tick has completed, before the clock advances.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with a copy of every registered agent, in kind then id order.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentSnapshot]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every [`TickSummary`] over an mpsc channel, for hosts that run
/// the simulation on a worker thread and render elsewhere.
///
/// A hung-up receiver is not an error; summaries are dropped from then on.
pub struct ChannelObserver {
    tx:       Sender<TickSummary>,
    detached: bool,
}

impl ChannelObserver {
    pub fn new(tx: Sender<TickSummary>) -> Self {
        Self { tx, detached: false }
    }
}

impl SimObserver for ChannelObserver {
    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        if self.detached {
            return;
        }
        if self.tx.send(summary.clone()).is_err() {
            debug!(%tick, "tick receiver hung up");
            self.detached = true;
        }
    }
}
