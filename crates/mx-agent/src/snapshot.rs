//! Plain copies of agent state handed to hosts and output writers.

use mx_behavior::AgentState;
use mx_core::{AgentId, AgentKind, DVec3};

use crate::Agent;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id:         AgentId,
    pub kind:       AgentKind,
    pub position:   DVec3,
    pub velocity:   DVec3,
    pub heading:    f64,
    pub speed:      f64,
    pub state:      AgentState,
    pub passengers: usize,
    pub carried_by: Option<AgentId>,
}

impl From<&Agent> for AgentSnapshot {
    fn from(a: &Agent) -> Self {
        Self {
            id:         a.id,
            kind:       a.kind,
            position:   a.position,
            velocity:   a.velocity,
            heading:    a.heading,
            speed:      a.speed,
            state:      a.state(),
            passengers: a.transporting.len(),
            carried_by: a.carried_by,
        }
    }
}
