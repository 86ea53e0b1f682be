//! Per-tick counters.

use mx_core::{AgentKind, Tick};

/// What happened during one tick.  Returned by [`Sim::tick`][crate::Sim::tick]
/// and handed to [`SimObserver::on_tick_end`][crate::SimObserver::on_tick_end].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub tick:     Tick,
    /// Agents created: departures, their auto passengers, rack fill-ups.
    pub spawned:  usize,
    /// Agents removed at their final destination, passengers included.
    pub removed:  usize,
    /// Pedestrians that boarded a carrier.
    pub boardings: usize,
    /// Passengers let off at a zone.
    pub releases: usize,
    /// Carriers evicted from overfull racks, passengers included.
    pub purged:   usize,
    /// Agents whose movement was skipped after a per-agent error.
    pub skipped:  usize,
    /// Steps dropped because they would have crossed a barrier.
    pub blocked:  usize,
    /// Departures dropped because an entrance or destination did not resolve.
    pub dropped_departures: usize,
    /// Collection sizes at the end of the tick, indexed by `AgentKind::index`.
    pub counts:   [usize; AgentKind::COUNT],
}

impl TickSummary {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    pub fn count(&self, kind: AgentKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn total_agents(&self) -> usize {
        self.counts.iter().sum()
    }
}
