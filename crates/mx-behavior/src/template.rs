//! Reusable behavior prototypes.
//!
//! Templates come from OD cells and distribution-matrix columns.  They are
//! immutable; every agent that follows one gets its own
//! [`BehaviorQueue`] via [`BehaviorTemplate::instantiate`].

use std::sync::Arc;

use tracing::debug;

use mx_core::DVec2;

use crate::{AgentState, BehaviorError, BehaviorQueue, BehaviorResult, PathSegment};

/// An immutable, cheaply clonable list of path segments.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorTemplate {
    segments: Arc<[PathSegment]>,
}

impl BehaviorTemplate {
    /// Build from segments; every segment must have at least one waypoint.
    pub fn new(segments: Vec<PathSegment>) -> BehaviorResult<Self> {
        if segments.is_empty() {
            return Err(BehaviorError::EmptyTemplate);
        }
        if let Some(i) = segments.iter().position(|s| s.waypoints.is_empty()) {
            return Err(BehaviorError::EmptySegment(i));
        }
        Ok(Self { segments: segments.into() })
    }

    /// Build from path-description rows `(segment, x, y, state)`.
    ///
    /// Rows are grouped by segment index in order of first appearance;
    /// all rows of one segment must agree on the state.
    pub fn from_rows<I>(rows: I) -> BehaviorResult<Self>
    where
        I: IntoIterator<Item = (usize, DVec2, AgentState)>,
    {
        let mut order: Vec<usize> = Vec::new();
        let mut segments: Vec<PathSegment> = Vec::new();
        for (seg, point, state) in rows {
            let slot = match order.iter().position(|&s| s == seg) {
                Some(i) => i,
                None => {
                    order.push(seg);
                    segments.push(PathSegment::hold(state));
                    segments.len() - 1
                }
            };
            let target = &mut segments[slot];
            if target.state != state {
                return Err(BehaviorError::ConflictingState {
                    segment: seg,
                    first:   target.state.to_string(),
                    second:  state.to_string(),
                });
            }
            target.waypoints.push_back(point);
        }
        debug!(segments = segments.len(), "behavior template parsed");
        Self::new(segments)
    }

    /// A one-segment template straight to `waypoints`.
    pub fn direct(state: AgentState, waypoints: impl IntoIterator<Item = DVec2>) -> BehaviorResult<Self> {
        Self::new(vec![PathSegment::new(state, waypoints)])
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The final waypoint of the template.
    pub fn destination(&self) -> Option<DVec2> {
        self.segments.last().and_then(|s| s.waypoints.back().copied())
    }

    /// A fresh queue following this template.  `state` overrides every
    /// segment's own state when given.
    pub fn instantiate(&self, state: Option<AgentState>) -> BehaviorQueue {
        let mut queue = BehaviorQueue::from_segments(self.segments.iter().cloned());
        if let Some(st) = state {
            queue.retag(st);
        }
        queue
    }
}
