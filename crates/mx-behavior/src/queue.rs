//! Path segments and the per-agent behavior queue.

use std::collections::VecDeque;

use mx_core::DVec2;

use crate::AgentState;

// ── PathSegment ───────────────────────────────────────────────────────────────

/// An ordered run of waypoints travelled in one state.
///
/// A segment may have no waypoints at all; it then only carries its state
/// (a passenger's TRANSPORTED marker, a parked carrier's STOP_AND_WAIT).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSegment {
    pub waypoints: VecDeque<DVec2>,
    pub state:     AgentState,
}

impl PathSegment {
    pub fn new(state: AgentState, waypoints: impl IntoIterator<Item = DVec2>) -> Self {
        Self { waypoints: waypoints.into_iter().collect(), state }
    }

    /// A waypoint-free segment that only sets `state`.
    pub fn hold(state: AgentState) -> Self {
        Self { waypoints: VecDeque::new(), state }
    }
}

// ── BehaviorQueue ─────────────────────────────────────────────────────────────

/// Result of consuming the current waypoint.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WaypointOutcome {
    /// More waypoints remain in the current segment.
    Pending,
    /// The current segment was used up; the next one is now current.
    SegmentDone,
    /// The last waypoint of the last segment was consumed; the queue is empty.
    Finished,
}

/// Ordered segments; the front one is current.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorQueue {
    segments: VecDeque<PathSegment>,
}

impl BehaviorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self { segments: segments.into_iter().collect() }
    }

    /// A queue with one segment.
    pub fn single(state: AgentState, waypoints: impl IntoIterator<Item = DVec2>) -> Self {
        Self::from_segments([PathSegment::new(state, waypoints)])
    }

    pub fn push_segment(&mut self, segment: PathSegment) {
        self.segments.push_back(segment);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> + '_ {
        self.segments.iter()
    }

    #[inline]
    pub fn current(&self) -> Option<&PathSegment> {
        self.segments.front()
    }

    #[inline]
    pub fn current_state(&self) -> Option<AgentState> {
        self.current().map(|s| s.state)
    }

    /// The point to steer to next, if the current segment has one.
    #[inline]
    pub fn current_waypoint(&self) -> Option<DVec2> {
        self.current().and_then(|s| s.waypoints.front().copied())
    }

    /// The final waypoint over all segments.
    pub fn last_waypoint(&self) -> Option<DVec2> {
        self.segments.iter().rev().find_map(|s| s.waypoints.back().copied())
    }

    /// Consume the current waypoint.
    ///
    /// Exhausted segments are removed so the next segment becomes current.
    /// Calling this on an empty queue reports `Finished`.
    pub fn pop_waypoint(&mut self) -> WaypointOutcome {
        let Some(front) = self.segments.front_mut() else {
            return WaypointOutcome::Finished;
        };
        front.waypoints.pop_front();
        if !front.waypoints.is_empty() {
            return WaypointOutcome::Pending;
        }
        self.segments.pop_front();
        if self.segments.is_empty() {
            WaypointOutcome::Finished
        } else {
            WaypointOutcome::SegmentDone
        }
    }

    /// Overwrite the state of every segment.  An empty queue gets a single
    /// waypoint-free segment so the state is still observable.
    pub fn retag(&mut self, state: AgentState) {
        if self.segments.is_empty() {
            self.segments.push_back(PathSegment::hold(state));
            return;
        }
        for s in &mut self.segments {
            s.state = state;
        }
    }
}
