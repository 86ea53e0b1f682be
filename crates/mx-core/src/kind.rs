//! The static agent-type registry.
//!
//! Every agent is one of a fixed set of kinds.  Kinds differ only in their
//! constant parameter set (see `mx_agent::KindParams`); the per-kind agent
//! collections and the social-force cross-product table are built by
//! iterating [`AgentKind::ALL`].  That order is also the tick processing
//! order and the lock order of the agent registry.

use std::str::FromStr;

use crate::MxError;

/// The type tag of an agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    /// On foot.
    #[default]
    Pedestrian,
    /// Shared bicycle; carries one rider.
    Bicycle,
    /// Autonomous pod; carries passengers between pod racks.
    Pod,
    /// Any other road vehicle.
    Vehicle,
}

impl AgentKind {
    /// Every registered kind, in processing / lock order.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Pedestrian,
        AgentKind::Bicycle,
        AgentKind::Pod,
        AgentKind::Vehicle,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`AgentKind::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            AgentKind::Pedestrian => 0,
            AgentKind::Bicycle    => 1,
            AgentKind::Pod        => 2,
            AgentKind::Vehicle    => 3,
        }
    }

    /// `true` for kinds that can transport pedestrians.
    #[inline]
    pub fn is_carrier(self) -> bool {
        matches!(self, AgentKind::Bicycle | AgentKind::Pod)
    }

    /// Label used in loaders and output files.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Pedestrian => "pedestrian",
            AgentKind::Bicycle    => "bicycle",
            AgentKind::Pod        => "pod",
            AgentKind::Vehicle    => "vehicle",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = MxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pedestrian" | "ped"     => Ok(AgentKind::Pedestrian),
            "bicycle" | "bike"       => Ok(AgentKind::Bicycle),
            "pod" | "av"             => Ok(AgentKind::Pod),
            "vehicle" | "car"        => Ok(AgentKind::Vehicle),
            other => Err(MxError::Parse(format!("unknown agent kind {other:?}"))),
        }
    }
}
