//! Run-unique agent ids.

use std::sync::atomic::{AtomicU64, Ordering};

use mx_core::AgentId;

/// Hands out increasing `AgentId`s.  Shared between the tick loop and host
/// handles, so it only needs `&self`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `first` (e.g. above ids a host reserved).
    pub fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    #[inline]
    pub fn next_id(&self) -> AgentId {
        AgentId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> AgentId {
        AgentId(self.next.load(Ordering::Relaxed))
    }

    /// Make sure ids handed out from now on are above `id`.
    pub fn reserve_through(&self, id: AgentId) {
        self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}
