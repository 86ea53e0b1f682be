//! The agent entity.
//!
//! One struct serves every kind; the kind only selects the constant
//! parameter set at construction time (see [`KindParams`]).

use std::collections::{BTreeSet, VecDeque};

use tracing::trace;

use mx_behavior::{AgentState, BehaviorQueue, PathSegment};
use mx_core::vector::{heading_of, is_finite, lift, planar};
use mx_core::{AgentId, AgentKind, CrossingId, DVec2, DVec3, PublisherId, SimClock, ZoneId};
use mx_geometry::Geometry;

use crate::{AgentError, AgentResult, IdAllocator, KindParams};

// ── StepReport ────────────────────────────────────────────────────────────────

/// What one [`Agent::integrate`] call did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepReport {
    /// The acceleration actually applied, after clamping to `max_force`.
    pub applied: DVec3,
    /// `false` when the step was aborted because it would cross a barrier.
    pub moved:   bool,
}

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Agent {
    pub id:        AgentId,
    pub kind:      AgentKind,
    pub publisher: PublisherId,

    // ── Kinematics (metres, metres/tick, metres/tick²) ────────────────────
    pub position:     DVec3,
    pub velocity:     DVec3,
    pub acceleration: DVec3,
    /// Radians; kept from the last non-zero velocity.
    pub heading:      f64,
    /// Metres per second, derived from `|velocity| / dt`.
    pub speed:        f64,

    // ── Constants ─────────────────────────────────────────────────────────
    pub max_speed:      f64,
    pub max_force:      f64,
    pub radius:         f64,
    pub relaxation:     f64,
    pub wall_radius:    f64,
    pub wall_magnitude: f64,

    // ── Behavior ──────────────────────────────────────────────────────────
    pub target:   Option<DVec2>,
    pub behavior: BehaviorQueue,
    /// Waypoints supplied by an external path service.
    pub path:     VecDeque<DVec2>,
    /// Wander angle offset carried between ticks.
    pub wander_angle: f64,

    // ── Transport links ───────────────────────────────────────────────────
    /// Passengers carried by this agent.
    pub transporting: BTreeSet<AgentId>,
    /// The carrier this agent rides in.
    pub carried_by:   Option<AgentId>,
    /// The zone this agent is heading to or parked at.
    pub current_zone: Option<ZoneId>,
    /// The crossing this agent leaves through.
    pub exit:         Option<CrossingId>,

    /// Position is written by a host; physics is skipped.
    pub externally_driven: bool,
}

impl Agent {
    /// A stationary agent with the built-in parameters for `kind`.
    pub fn new(id: AgentId, kind: AgentKind, position: DVec2, clock: &SimClock) -> Self {
        Self::with_params(id, kind, &KindParams::for_kind(kind), position, clock)
    }

    pub fn with_params(
        id:       AgentId,
        kind:     AgentKind,
        params:   &KindParams,
        position: DVec2,
        clock:    &SimClock,
    ) -> Self {
        Self {
            id,
            kind,
            publisher:    PublisherId::SIMULATION,
            position:     lift(position),
            velocity:     DVec3::ZERO,
            acceleration: DVec3::ZERO,
            heading:      0.0,
            speed:        0.0,

            max_speed:      params.max_speed_per_tick(clock),
            max_force:      params.max_force,
            radius:         params.radius,
            relaxation:     params.relaxation_ticks(clock),
            wall_radius:    params.wall_radius,
            wall_magnitude: params.wall_magnitude,

            target:       None,
            behavior:     BehaviorQueue::new(),
            path:         VecDeque::new(),
            wander_angle: 0.0,

            transporting: BTreeSet::new(),
            carried_by:   None,
            current_zone: None,
            exit:         None,

            externally_driven: false,
        }
    }

    /// Same physical and behavioral state under a fresh id.  Transport
    /// links are not copied: a clone carries nobody and rides nothing.
    pub fn clone_as_new_instance(&self, ids: &IdAllocator) -> Agent {
        let mut copy = self.clone();
        copy.id = ids.next_id();
        copy.transporting.clear();
        copy.carried_by = None;
        copy
    }

    #[inline]
    pub fn position_2d(&self) -> DVec2 {
        planar(self.position)
    }

    #[inline]
    pub fn velocity_2d(&self) -> DVec2 {
        planar(self.velocity)
    }

    /// Move to `p` keeping `z`.
    pub fn place_at(&mut self, p: DVec2) {
        self.position.x = p.x;
        self.position.y = p.y;
    }

    // ── State predicates ──────────────────────────────────────────────────

    /// State of the current behavior segment; an empty queue means the
    /// agent moves on its own.
    #[inline]
    pub fn state(&self) -> AgentState {
        self.behavior.current_state().unwrap_or_default()
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == AgentState::StopAndWait
    }

    pub fn is_transported(&self) -> bool {
        self.state() == AgentState::Transported
    }

    pub fn is_transporting(&self) -> bool {
        self.state() == AgentState::TransportOthers
    }

    pub fn is_not_active(&self) -> bool {
        self.state() == AgentState::NotActive
    }

    pub fn is_moving_autonomously(&self) -> bool {
        self.state() == AgentState::MoveAutonomously
    }

    pub fn is_moving_to_pickup(&self) -> bool {
        self.state() == AgentState::MoveToPickup
    }

    /// `true` if the tick loop should run forces and integration.
    pub fn is_simulated(&self) -> bool {
        !self.externally_driven && self.state().permits_movement()
    }

    // ── Mode changes ──────────────────────────────────────────────────────

    /// Replace the behavior wholesale.
    pub fn assign_behavior(&mut self, queue: BehaviorQueue) {
        self.behavior = queue;
    }

    /// Stop in place: zero velocity, hold `STOP_AND_WAIT`, forget the target.
    pub fn park(&mut self) {
        self.velocity = DVec3::ZERO;
        self.acceleration = DVec3::ZERO;
        self.speed = 0.0;
        self.target = None;
        self.path.clear();
        self.behavior = BehaviorQueue::from_segments([PathSegment::hold(AgentState::StopAndWait)]);
    }

    /// Become a passenger of `carrier`.
    pub fn board(&mut self, carrier: AgentId) {
        self.park();
        self.behavior = BehaviorQueue::from_segments([PathSegment::hold(AgentState::Transported)]);
        self.carried_by = Some(carrier);
        self.current_zone = None;
    }

    // ── Physics ───────────────────────────────────────────────────────────

    /// Accumulate `f` into this tick's acceleration.
    #[inline]
    pub fn apply_force(&mut self, f: DVec3) {
        self.acceleration += f;
    }

    /// Advance one tick.
    ///
    /// Clamps the accumulated acceleration to `max_force`, the new velocity to
    /// `max_speed`, and moves by the velocity.  If the straight step would
    /// cross or touch a wall or obstacle the whole step is dropped: velocity
    /// and position stay, acceleration is zeroed.  `dt` is the tick length in
    /// seconds and only feeds the reported scalar speed.
    pub fn integrate(&mut self, geometry: &Geometry, dt: f64) -> AgentResult<StepReport> {
        if !is_finite(self.acceleration) || !is_finite(self.velocity) {
            self.acceleration = DVec3::ZERO;
            return Err(AgentError::NonFinite(self.id));
        }
        let applied = self.acceleration.clamp_length_max(self.max_force);
        self.acceleration = DVec3::ZERO;

        let velocity = (self.velocity + applied).clamp_length_max(self.max_speed);
        let tentative = self.position + velocity;

        if geometry.blocks_step(planar(self.position), planar(tentative)) {
            trace!(agent = %self.id, "step blocked by barrier");
            return Ok(StepReport { applied, moved: false });
        }

        self.velocity = velocity;
        self.position = tentative;
        if let Some(h) = heading_of(velocity) {
            self.heading = h;
        }
        self.speed = velocity.length() / dt;
        Ok(StepReport { applied, moved: true })
    }
}
