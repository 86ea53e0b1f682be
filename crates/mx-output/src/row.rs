//! Plain data row types written by output backends.

use mx_agent::AgentSnapshot;
use mx_behavior::AgentState;
use mx_core::{AgentKind, Tick};
use mx_sim::TickSummary;

/// One agent's kinematic state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:   u64,
    pub tick:       u64,
    pub kind:       AgentKind,
    pub x:          f64,
    pub y:          f64,
    /// Radians.
    pub heading:    f64,
    /// Metres per second.
    pub speed:      f64,
    pub state:      AgentState,
    pub passengers: u32,
    /// Id of the carrier; `None` unless the agent is being transported.
    pub carried_by: Option<u64>,
}

impl AgentSnapshotRow {
    pub fn from_snapshot(tick: Tick, s: &AgentSnapshot) -> Self {
        Self {
            agent_id:   s.id.0,
            tick:       tick.0,
            kind:       s.kind,
            x:          s.position.x,
            y:          s.position.y,
            heading:    s.heading,
            speed:      s.speed,
            state:      s.state,
            passengers: s.passengers as u32,
            carried_by: s.carried_by.map(|c| c.0),
        }
    }
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub spawned:      u64,
    pub removed:      u64,
    pub boardings:    u64,
    pub releases:     u64,
    pub purged:       u64,
    pub skipped:      u64,
    pub pedestrians:  u64,
    pub bicycles:     u64,
    pub pods:         u64,
    pub vehicles:     u64,
}

impl TickSummaryRow {
    pub fn from_summary(s: &TickSummary, elapsed_secs: f64) -> Self {
        let count = |k: AgentKind| s.count(k) as u64;
        Self {
            tick:        s.tick.0,
            elapsed_secs,
            spawned:     s.spawned as u64,
            removed:     s.removed as u64,
            boardings:   s.boardings as u64,
            releases:    s.releases as u64,
            purged:      s.purged as u64,
            skipped:     s.skipped as u64,
            pedestrians: count(AgentKind::Pedestrian),
            bicycles:    count(AgentKind::Bicycle),
            pods:        count(AgentKind::Pod),
            vehicles:    count(AgentKind::Vehicle),
        }
    }
}
