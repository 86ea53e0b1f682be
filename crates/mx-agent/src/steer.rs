//! Target seeking.
//!
//! Each tick an agent picks exactly one point to steer to.  Sources are
//! tried in order:
//!
//! 1. the current waypoint of the behavior queue,
//! 2. the raw target,
//! 3. the external waypoint path,
//! 4. a wander point ahead of the agent.
//!
//! Reaching a queue or path waypoint (within [`WAYPOINT_RADII`] radii) pops
//! it.  Coming within [`ARRIVAL_RADII`] radii of the raw target, or popping
//! the last queue/path waypoint, reports [`Steering::Arrived`].

use tracing::trace;

use mx_behavior::WaypointOutcome;
use mx_core::vector::unit_from_heading;
use mx_core::{DVec2, SimRng, WanderConfig};

use crate::Agent;

/// Arrival distance to the raw target, in agent radii.
pub const ARRIVAL_RADII: f64 = 10.0;

/// Distance at which a waypoint counts as reached, in agent radii.
pub const WAYPOINT_RADII: f64 = 1.6;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Steering {
    /// Head for this point.
    Toward(DVec2),
    /// The agent has reached the end of its journey.
    Arrived,
}

impl Agent {
    /// Choose this tick's steering point.
    ///
    /// When the behavior queue runs out the final waypoint becomes the raw
    /// target, so an arrival that the orchestrator cannot resolve yet is
    /// reported again on the next tick.
    pub fn steer(&mut self, rng: &mut SimRng, wander: &WanderConfig) -> Steering {
        let here = self.position_2d();
        let reach = WAYPOINT_RADII * self.radius;

        while let Some(w) = self.behavior.current_waypoint() {
            if here.distance(w) > reach {
                return Steering::Toward(w);
            }
            if self.behavior.pop_waypoint() == WaypointOutcome::Finished {
                trace!(agent = %self.id, "behavior queue finished");
                self.target = Some(w);
                return Steering::Arrived;
            }
        }

        if let Some(t) = self.target {
            if here.distance(t) <= ARRIVAL_RADII * self.radius {
                return Steering::Arrived;
            }
            return Steering::Toward(t);
        }

        if !self.path.is_empty() {
            while let Some(&w) = self.path.front() {
                if here.distance(w) > reach {
                    return Steering::Toward(w);
                }
                self.path.pop_front();
            }
            return Steering::Arrived;
        }

        Steering::Toward(self.wander_point(rng, wander))
    }

    /// A random point on a circle `wander.distance` ahead of the agent.
    ///
    /// The angle on the circle drifts by at most `±wander.jitter` radians per
    /// call, which keeps the walk smooth.
    pub fn wander_point(&mut self, rng: &mut SimRng, wander: &WanderConfig) -> DVec2 {
        self.wander_angle += wander.jitter * rng.signed_unit();
        let ahead = unit_from_heading(self.heading).truncate();
        let centre = self.position_2d() + ahead * wander.distance;
        let on_circle = unit_from_heading(self.heading + self.wander_angle).truncate();
        centre + on_circle * wander.radius
    }
}
