//! The host bridge.
//!
//! A [`SimHandle`] lets an embedding host mirror an external feed into the
//! simulation between ticks: add, update and delete agents, and drive
//! agents whose motion is decided elsewhere.  Every call locks exactly one
//! kind's collection at a time and never holds two, so it cannot deadlock
//! against the tick loop (which takes all of them in `AgentKind::ALL`
//! order).
//!
//! Zone queues are owned by the tick loop.  Ids a host deletes are dropped
//! from them the next time the loop meets them.

use std::sync::Arc;

use tracing::debug;

use mx_agent::{Agent, AgentRegistry, AgentSnapshot, IdAllocator};
use mx_core::vector::{heading_of, lift};
use mx_core::{AgentId, AgentKind, DVec2, SimClock};

use crate::{SimError, SimResult};

#[derive(Clone, Debug)]
pub struct SimHandle {
    registry: AgentRegistry,
    ids:      Arc<IdAllocator>,
    clock:    SimClock,
}

impl SimHandle {
    pub(crate) fn new(registry: AgentRegistry, ids: Arc<IdAllocator>, clock: SimClock) -> Self {
        Self { registry, ids, clock }
    }

    /// Register a stationary agent of `kind` at `position` under a fresh id.
    pub fn add_agent(&self, kind: AgentKind, position: DVec2) -> SimResult<AgentId> {
        self.insert_agent(Agent::new(self.ids.next_id(), kind, position, &self.clock))
    }

    /// Register a fully built agent, keeping its id.  An agent already
    /// registered under that id is replaced.
    pub fn insert_agent(&self, agent: Agent) -> SimResult<AgentId> {
        let id = agent.id;
        self.ids.reserve_through(id);
        if self.registry.insert(agent)?.is_some() {
            debug!(agent = %id, "host insert replaced an existing agent");
        }
        Ok(id)
    }

    /// Delete `id`, everyone it carries, and its link into its carrier.
    pub fn remove_agent(&self, id: AgentId) -> SimResult<Agent> {
        let agent = AgentKind::ALL
            .into_iter()
            .find_map(|k| self.registry.lock(k).remove(id))
            .ok_or(SimError::UnknownAgent(id))?;

        if let Some(carrier) = agent.carried_by {
            for kind in AgentKind::ALL {
                if let Some(c) = self.registry.lock(kind).get_mut(carrier) {
                    c.transporting.remove(&id);
                    break;
                }
            }
        }
        for &passenger in &agent.transporting {
            if let Err(e) = self.remove_agent(passenger) {
                debug!(agent = %passenger, error = %e, "passenger already gone");
            }
        }
        Ok(agent)
    }

    /// Run `f` on agent `id` under its collection's lock.
    pub fn update_agent<F: FnOnce(&mut Agent)>(&self, id: AgentId, f: F) -> SimResult<()> {
        for kind in AgentKind::ALL {
            let mut agents = self.registry.lock(kind);
            if let Some(agent) = agents.get_mut(id) {
                f(agent);
                return Ok(());
            }
        }
        Err(SimError::UnknownAgent(id))
    }

    /// Move an externally driven agent.  `speed` is in metres per second
    /// and is capped at the agent's maximum; the velocity points along the
    /// displacement.  The agent is flagged so the tick loop no longer
    /// integrates it, while it keeps repelling its neighbours.
    pub fn update_external(&self, id: AgentId, position: DVec2, speed: f64) -> SimResult<()> {
        let dt = self.clock.tick_length_secs;
        let per_tick = self.clock.per_tick(speed.max(0.0));
        self.update_agent(id, |a| {
            let step = position - a.position_2d();
            a.place_at(position);
            a.velocity = lift(step.normalize_or_zero() * per_tick.min(a.max_speed));
            if let Some(h) = heading_of(lift(step)) {
                a.heading = h;
            }
            a.speed = a.velocity.length() / dt;
            a.externally_driven = true;
        })
    }

    pub fn agent_count(&self, kind: AgentKind) -> usize {
        self.registry.len(kind)
    }

    pub fn total_agents(&self) -> usize {
        self.registry.total_len()
    }

    /// Copies of every agent of `kind`, in id order.
    pub fn snapshot(&self, kind: AgentKind) -> Vec<AgentSnapshot> {
        self.registry.lock(kind).iter().map(AgentSnapshot::from).collect()
    }

    pub fn get(&self, id: AgentId) -> Option<AgentSnapshot> {
        AgentKind::ALL
            .into_iter()
            .find_map(|k| self.registry.lock(k).get(id).map(AgentSnapshot::from))
    }
}
