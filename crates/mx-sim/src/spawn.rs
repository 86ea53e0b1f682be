//! Turning scheduled departures into agents.
//!
//! Every departure is classified once into a [`SpawnRequest`] and the
//! request is dispatched by a `match`; there is one variant per way an
//! agent can be set up.

use mx_agent::{Agent, IdAllocator};
use mx_behavior::{AgentState, BehaviorQueue, BehaviorTemplate, PathSegment};
use mx_core::{AgentKind, CrossingId, DVec2, SimClock, SimRng, ZoneId};
use mx_geometry::{Destination, Geometry, GeometryError, GeometryResult, PathService};
use mx_schedule::Departure;

/// Spawn points are spread over this fraction of the entrance half-length
/// on either side of its midpoint.
pub const SPAWN_SPREAD: f64 = 0.8;

#[derive(Clone, Debug)]
pub enum SpawnRequest {
    /// Follow a precomputed behavior, then leave through `exit`.
    ToCrossingWithTemplate {
        kind:     AgentKind,
        entrance: CrossingId,
        exit:     CrossingId,
        template: BehaviorTemplate,
    },
    /// Follow waypoints from the path service to `exit`.
    ToCrossingWithPath {
        kind:     AgentKind,
        entrance: CrossingId,
        exit:     CrossingId,
        path:     Vec<DVec2>,
    },
    /// Head straight for `exit`.
    ToCrossingPlain {
        kind:     AgentKind,
        entrance: CrossingId,
        exit:     CrossingId,
    },
    /// Follow a precomputed behavior into `zone`.
    ToZoneWithTemplate {
        kind:     AgentKind,
        entrance: CrossingId,
        zone:     ZoneId,
        template: BehaviorTemplate,
    },
    /// Head straight for `zone`.
    ToZonePlain {
        kind:     AgentKind,
        entrance: CrossingId,
        zone:     ZoneId,
    },
}

impl SpawnRequest {
    /// Resolve a departure's labels against `geometry`.
    ///
    /// Crossing-bound departures without a template ask `paths` for a route
    /// between the two crossing midpoints and fall back to a plain request.
    pub fn plan<P: PathService>(
        kind:      AgentKind,
        departure: &Departure,
        geometry:  &Geometry,
        paths:     &P,
    ) -> GeometryResult<Self> {
        let entrance = geometry.resolve_crossing(&departure.entrance)?;
        let destination = geometry.resolve_destination(&departure.exit)?;
        let template = departure.template.clone();

        Ok(match (destination, template) {
            (Destination::Crossing(exit), Some(template)) => SpawnRequest::ToCrossingWithTemplate {
                kind,
                entrance: entrance.id,
                exit,
                template,
            },
            (Destination::Crossing(exit), None) => {
                let to = geometry
                    .crossing(exit)
                    .map(|c| c.centroid)
                    .ok_or_else(|| GeometryError::UnknownDestination(departure.exit.clone()))?;
                match paths.find_path(geometry, entrance.centroid, to) {
                    Some(path) if !path.is_empty() => SpawnRequest::ToCrossingWithPath {
                        kind,
                        entrance: entrance.id,
                        exit,
                        path,
                    },
                    _ => SpawnRequest::ToCrossingPlain { kind, entrance: entrance.id, exit },
                }
            }
            (Destination::Zone(zone), Some(template)) => SpawnRequest::ToZoneWithTemplate {
                kind,
                entrance: entrance.id,
                zone,
                template,
            },
            (Destination::Zone(zone), None) => {
                SpawnRequest::ToZonePlain { kind, entrance: entrance.id, zone }
            }
        })
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            SpawnRequest::ToCrossingWithTemplate { kind, .. }
            | SpawnRequest::ToCrossingWithPath { kind, .. }
            | SpawnRequest::ToCrossingPlain { kind, .. }
            | SpawnRequest::ToZoneWithTemplate { kind, .. }
            | SpawnRequest::ToZonePlain { kind, .. } => *kind,
        }
    }

    pub fn entrance(&self) -> CrossingId {
        match self {
            SpawnRequest::ToCrossingWithTemplate { entrance, .. }
            | SpawnRequest::ToCrossingWithPath { entrance, .. }
            | SpawnRequest::ToCrossingPlain { entrance, .. }
            | SpawnRequest::ToZoneWithTemplate { entrance, .. }
            | SpawnRequest::ToZonePlain { entrance, .. } => *entrance,
        }
    }

    pub fn destination(&self) -> Destination {
        match self {
            SpawnRequest::ToCrossingWithTemplate { exit, .. }
            | SpawnRequest::ToCrossingWithPath { exit, .. }
            | SpawnRequest::ToCrossingPlain { exit, .. } => Destination::Crossing(*exit),
            SpawnRequest::ToZoneWithTemplate { zone, .. }
            | SpawnRequest::ToZonePlain { zone, .. } => Destination::Zone(*zone),
        }
    }

    /// Create the agents for one departure.
    ///
    /// The first agent is the one the request describes.  A bicycle is
    /// followed by its rider: a pedestrian created already on board.
    pub fn spawn(
        &self,
        geometry: &Geometry,
        clock:    &SimClock,
        ids:      &IdAllocator,
        rng:      &mut SimRng,
    ) -> Vec<Agent> {
        let Some(entrance) = geometry.crossing(self.entrance()) else {
            return Vec::new();
        };
        let kind = self.kind();
        let at = entrance.point_at(rng.signed_unit() * SPAWN_SPREAD);
        let mut agent = Agent::new(ids.next_id(), kind, at, clock);

        // Riders make a bicycle a carrier for its whole trip.
        let travel = (kind == AgentKind::Bicycle).then_some(AgentState::TransportOthers);

        match self {
            SpawnRequest::ToCrossingWithTemplate { exit, template, .. } => {
                agent.assign_behavior(template.instantiate(travel));
                agent.exit = Some(*exit);
            }
            SpawnRequest::ToCrossingWithPath { exit, path, .. } => {
                agent.path = path.iter().copied().collect();
                agent.exit = Some(*exit);
                if let Some(state) = travel {
                    agent.assign_behavior(hold(state));
                }
            }
            SpawnRequest::ToCrossingPlain { exit, .. } => {
                agent.target = geometry.crossing(*exit).map(|c| c.centroid);
                agent.exit = Some(*exit);
                if let Some(state) = travel {
                    agent.assign_behavior(hold(state));
                }
            }
            SpawnRequest::ToZoneWithTemplate { zone, template, .. } => {
                agent.assign_behavior(template.instantiate(travel));
                agent.current_zone = Some(*zone);
            }
            SpawnRequest::ToZonePlain { zone, .. } => {
                agent.target = geometry.zone(*zone).map(|z| z.centroid);
                agent.current_zone = Some(*zone);
                let state = match kind {
                    AgentKind::Pedestrian => Some(AgentState::MoveToPickup),
                    _ => travel,
                };
                if let Some(state) = state {
                    agent.assign_behavior(hold(state));
                }
            }
        }

        if kind != AgentKind::Bicycle {
            return vec![agent];
        }
        let mut rider = Agent::new(ids.next_id(), AgentKind::Pedestrian, at, clock);
        rider.board(agent.id);
        agent.transporting.insert(rider.id);
        vec![agent, rider]
    }
}

fn hold(state: AgentState) -> BehaviorQueue {
    BehaviorQueue::from_segments([PathSegment::hold(state)])
}
