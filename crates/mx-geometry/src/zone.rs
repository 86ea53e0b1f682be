//! Transition zones — capacity-limited racks where agents switch mode.
//!
//! A zone keeps two FIFO queues of agent ids:
//!
//! - `enclosed`: parked carriers (pods or bicycles) available for pickup.
//!   New arrivals are pushed at the back; boarding takes the newest (back);
//!   purging evicts the oldest (front).
//! - `waiting`: pedestrians that arrived and wait to board.
//!
//! The zone only stores ids.  Ids may go stale when the host deletes an
//! agent; callers skip stale ids when popping.

use std::collections::VecDeque;

use mx_core::{AgentId, AgentKind, DVec2, ZoneId};

use crate::Segment;
use crate::shape::ring_contains;

/// Slack above `capacity` tolerated before a purge is triggered.
pub const PURGE_MARGIN: usize = 3;

/// What kind of carrier a zone parks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneKind {
    PodRack,
    BikeRack,
}

impl ZoneKind {
    /// The agent kind parked in (and spawned into) zones of this kind.
    pub fn carrier_kind(self) -> AgentKind {
        match self {
            ZoneKind::PodRack  => AgentKind::Pod,
            ZoneKind::BikeRack => AgentKind::Bicycle,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneKind::PodRack  => "pod_rack",
            ZoneKind::BikeRack => "bike_rack",
        }
    }
}

/// A named, capacity-limited pickup area.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionZone {
    pub id:       ZoneId,
    pub name:     String,
    pub kind:     ZoneKind,
    pub capacity: usize,
    pub segments: Vec<Segment>,
    pub centroid: DVec2,
    enclosed:     VecDeque<AgentId>,
    waiting:      VecDeque<AgentId>,
}

impl TransitionZone {
    pub(crate) fn new(
        id:       ZoneId,
        name:     String,
        kind:     ZoneKind,
        capacity: usize,
        segments: Vec<Segment>,
        centroid: DVec2,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            capacity,
            segments,
            centroid,
            enclosed: VecDeque::new(),
            waiting:  VecDeque::new(),
        }
    }

    /// `true` if `p` lies inside the zone outline.
    pub fn contains(&self, p: DVec2) -> bool {
        ring_contains(&self.segments, p)
    }

    // ── Parked carriers ───────────────────────────────────────────────────

    pub fn enclosed(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.enclosed.iter().copied()
    }

    pub fn enclosed_len(&self) -> usize {
        self.enclosed.len()
    }

    /// Park `agent` as the newest entry.
    pub fn push_enclosed(&mut self, agent: AgentId) {
        self.enclosed.push_back(agent);
    }

    /// The newest parked carrier accepted by `usable`.  It stays parked.
    pub fn newest_where(&self, mut usable: impl FnMut(AgentId) -> bool) -> Option<AgentId> {
        self.enclosed.iter().rev().copied().find(|&id| usable(id))
    }

    /// How many carriers are missing to reach `capacity`.
    pub fn deficit(&self) -> usize {
        self.capacity.saturating_sub(self.enclosed.len())
    }

    /// `true` once the queue is longer than `capacity + PURGE_MARGIN`.
    pub fn needs_purge(&self) -> bool {
        self.enclosed.len() > self.capacity + PURGE_MARGIN
    }

    /// Evict the oldest entries until at most `capacity` remain.  Returns the
    /// evicted ids; the caller deletes those agents.  No-op unless
    /// [`needs_purge`](Self::needs_purge) holds.
    pub fn purge_excess(&mut self) -> Vec<AgentId> {
        if !self.needs_purge() {
            return Vec::new();
        }
        let excess = self.enclosed.len() - self.capacity;
        self.enclosed.drain(..excess).collect()
    }

    // ── Waiting pedestrians ───────────────────────────────────────────────

    pub fn waiting(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Queue a pedestrian for boarding (ignored if already queued).
    pub fn push_waiting(&mut self, agent: AgentId) {
        if !self.waiting.contains(&agent) {
            self.waiting.push_back(agent);
        }
    }

    /// Drop `agent` from both queues (host deletion, purge cascade).
    pub fn forget(&mut self, agent: AgentId) {
        self.enclosed.retain(|&a| a != agent);
        self.waiting.retain(|&a| a != agent);
    }
}
