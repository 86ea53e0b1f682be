//! Per-kind lock-guarded agent collections.
//!
//! # Lock discipline
//!
//! Every kind has its own `Mutex<AgentCollection>`.  The canonical lock
//! order is [`AgentKind::ALL`]:
//!
//! - the tick loop calls [`AgentRegistry::lock_all`], which acquires every
//!   collection in that order and holds them for the whole tick;
//! - host calls lock exactly one collection at a time and never nest.
//!
//! Because no caller ever holds a later kind's lock while waiting for an
//! earlier one, lock-order inversion cannot occur.  A poisoned lock (a
//! panicking host thread) is recovered: collections hold plain data.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mx_core::{AgentId, AgentKind};

use crate::{Agent, AgentCollection, AgentError, AgentResult};

// ── AgentRegistry ─────────────────────────────────────────────────────────────

/// Shared handle to all agent collections.  Cloning is cheap and every clone
/// sees the same agents.
#[derive(Clone, Debug)]
pub struct AgentRegistry {
    collections: Arc<[Mutex<AgentCollection>; AgentKind::COUNT]>,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(AgentKind::ALL.map(|k| Mutex::new(AgentCollection::new(k)))),
        }
    }

    /// Lock one kind's collection.
    pub fn lock(&self, kind: AgentKind) -> MutexGuard<'_, AgentCollection> {
        self.collections[kind.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock every collection in canonical order.
    pub fn lock_all(&self) -> RegistryGuard<'_> {
        RegistryGuard {
            guards: AgentKind::ALL.map(|k| self.lock(k)),
        }
    }

    pub fn insert(&self, agent: Agent) -> AgentResult<Option<Agent>> {
        self.lock(agent.kind).insert(agent)
    }

    pub fn len(&self, kind: AgentKind) -> usize {
        self.lock(kind).len()
    }

    pub fn total_len(&self) -> usize {
        AgentKind::ALL.iter().map(|&k| self.len(k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}

// ── RegistryGuard ─────────────────────────────────────────────────────────────

/// All collections locked at once.  Cross-kind lookups go through here.
pub struct RegistryGuard<'a> {
    guards: [MutexGuard<'a, AgentCollection>; AgentKind::COUNT],
}

impl RegistryGuard<'_> {
    #[inline]
    pub fn collection(&self, kind: AgentKind) -> &AgentCollection {
        &self.guards[kind.index()]
    }

    #[inline]
    pub fn collection_mut(&mut self, kind: AgentKind) -> &mut AgentCollection {
        &mut self.guards[kind.index()]
    }

    /// The kind whose collection holds `id`.
    pub fn find(&self, id: AgentId) -> Option<AgentKind> {
        AgentKind::ALL.into_iter().find(|&k| self.collection(k).contains(id))
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.guards.iter().find_map(|c| c.get(id))
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let kind = self.find(id)?;
        self.collection_mut(kind).get_mut(id)
    }

    pub fn insert(&mut self, agent: Agent) -> AgentResult<Option<Agent>> {
        self.collection_mut(agent.kind).insert(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let kind = self.find(id)?;
        self.collection_mut(kind).remove(id)
    }

    /// Remove `id` and, recursively, everyone it transports.  Passengers
    /// whose removal is cascaded are returned after their carrier.
    pub fn remove_cascade(&mut self, id: AgentId) -> AgentResult<Vec<Agent>> {
        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            match self.remove(next) {
                Some(agent) => {
                    pending.extend(agent.transporting.iter().rev().copied());
                    removed.push(agent);
                }
                None if next == id => return Err(AgentError::NotFound(id)),
                None => {}
            }
        }
        if let Some(carrier) = removed.first().and_then(|a| a.carried_by) {
            if let Some(c) = self.get_mut(carrier) {
                c.transporting.remove(&id);
            }
        }
        Ok(removed)
    }

    pub fn counts(&self) -> [usize; AgentKind::COUNT] {
        AgentKind::ALL.map(|k| self.collection(k).len())
    }

    pub fn total_len(&self) -> usize {
        self.guards.iter().map(|c| c.len()).sum()
    }
}
