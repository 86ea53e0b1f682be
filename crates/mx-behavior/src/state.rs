//! The discrete travel state carried by every path segment.

use std::fmt;
use std::str::FromStr;

use crate::BehaviorError;

/// What an agent does while its current segment is active.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Walking/driving under its own power towards the next waypoint.
    #[default]
    MoveAutonomously,
    /// Parked or queued; no physics.
    StopAndWait,
    /// Heading to a pickup point (a transition zone).
    MoveToPickup,
    /// Moving while carrying passengers.
    TransportOthers,
    /// Riding inside a carrier; position is copied from the carrier.
    Transported,
    /// Present but inert.
    NotActive,
}

impl AgentState {
    pub const ALL: [AgentState; 6] = [
        AgentState::MoveAutonomously,
        AgentState::StopAndWait,
        AgentState::MoveToPickup,
        AgentState::TransportOthers,
        AgentState::Transported,
        AgentState::NotActive,
    ];

    /// `true` if the physics step runs for an agent in this state.
    #[inline]
    pub fn permits_movement(self) -> bool {
        matches!(
            self,
            AgentState::MoveAutonomously | AgentState::MoveToPickup | AgentState::TransportOthers
        )
    }

    /// `true` if an agent in this state pushes others away.
    #[inline]
    pub fn repels(self) -> bool {
        !matches!(self, AgentState::Transported | AgentState::NotActive)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::MoveAutonomously => "MOVE_AUTONOMOUSLY",
            AgentState::StopAndWait      => "STOP_AND_WAIT",
            AgentState::MoveToPickup     => "MOVE_TO_PICKUP",
            AgentState::TransportOthers  => "TRANSPORT_OTHERS",
            AgentState::Transported      => "TRANSPORTED",
            AgentState::NotActive        => "NOT_ACTIVE",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentState {
    type Err = BehaviorError;

    /// Accepts the upper-case tags written by [`as_str`](Self::as_str), case
    /// insensitively, with `-` or ` ` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        AgentState::ALL
            .into_iter()
            .find(|st| st.as_str() == norm)
            .ok_or_else(|| BehaviorError::UnknownState(s.to_owned()))
    }
}
