//! One ordered set of agents per kind.

use std::collections::BTreeMap;

use mx_core::{AgentId, AgentKind};

use crate::{Agent, AgentError, AgentResult};

/// Agents of a single kind keyed by id.  Iteration is in id order, which
/// keeps runs reproducible.
#[derive(Debug)]
pub struct AgentCollection {
    kind:   AgentKind,
    agents: BTreeMap<AgentId, Agent>,
}

impl AgentCollection {
    pub fn new(kind: AgentKind) -> Self {
        Self { kind, agents: BTreeMap::new() }
    }

    #[inline]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Insert `agent`, replacing any agent with the same id.
    pub fn insert(&mut self, agent: Agent) -> AgentResult<Option<Agent>> {
        if agent.kind != self.kind {
            return Err(AgentError::KindMismatch {
                id:       agent.id,
                expected: self.kind,
                got:      agent.kind,
            });
        }
        Ok(self.agents.insert(agent.id, agent))
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.agents.values_mut()
    }
}
