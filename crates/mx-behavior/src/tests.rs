//! Unit tests for mx-behavior.

use mx_core::DVec2;

use crate::{AgentState, BehaviorQueue, BehaviorTemplate, PathSegment, WaypointOutcome};

fn v(x: f64, y: f64) -> DVec2 {
    DVec2::new(x, y)
}

// ── AgentState ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod state {
    use super::*;

    #[test]
    fn movement_permissions() {
        assert!(AgentState::MoveAutonomously.permits_movement());
        assert!(AgentState::MoveToPickup.permits_movement());
        assert!(AgentState::TransportOthers.permits_movement());
        assert!(!AgentState::StopAndWait.permits_movement());
        assert!(!AgentState::Transported.permits_movement());
        assert!(!AgentState::NotActive.permits_movement());
    }

    #[test]
    fn only_riders_and_inert_agents_do_not_repel() {
        assert!(AgentState::StopAndWait.repels());
        assert!(!AgentState::Transported.repels());
        assert!(!AgentState::NotActive.repels());
    }

    #[test]
    fn parse_round_trips_tags() {
        for st in AgentState::ALL {
            assert_eq!(st.as_str().parse::<AgentState>().unwrap(), st);
        }
        assert_eq!("move-to pickup".parse::<AgentState>().unwrap(), AgentState::MoveToPickup);
        assert!("flying".parse::<AgentState>().is_err());
    }

    #[test]
    fn default_is_autonomous() {
        assert_eq!(AgentState::default(), AgentState::MoveAutonomously);
    }
}

// ── BehaviorQueue ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use super::*;

    fn two_segments() -> BehaviorQueue {
        BehaviorQueue::from_segments([
            PathSegment::new(AgentState::MoveToPickup, [v(1.0, 0.0), v(2.0, 0.0)]),
            PathSegment::new(AgentState::TransportOthers, [v(5.0, 5.0)]),
        ])
    }

    #[test]
    fn empty_queue() {
        let mut q = BehaviorQueue::new();
        assert!(q.is_empty());
        assert!(q.current_state().is_none());
        assert!(q.current_waypoint().is_none());
        assert_eq!(q.pop_waypoint(), WaypointOutcome::Finished);
    }

    #[test]
    fn pop_walks_all_segments() {
        let mut q = two_segments();
        assert_eq!(q.current_waypoint(), Some(v(1.0, 0.0)));

        assert_eq!(q.pop_waypoint(), WaypointOutcome::Pending);
        assert_eq!(q.current_waypoint(), Some(v(2.0, 0.0)));
        assert_eq!(q.current_state(), Some(AgentState::MoveToPickup));

        assert_eq!(q.pop_waypoint(), WaypointOutcome::SegmentDone);
        assert_eq!(q.current_state(), Some(AgentState::TransportOthers));
        assert_eq!(q.current_waypoint(), Some(v(5.0, 5.0)));

        assert_eq!(q.pop_waypoint(), WaypointOutcome::Finished);
        assert!(q.is_empty());
    }

    #[test]
    fn last_waypoint_spans_segments() {
        let q = two_segments();
        assert_eq!(q.last_waypoint(), Some(v(5.0, 5.0)));
    }

    #[test]
    fn hold_segment_has_state_but_no_waypoint() {
        let q = BehaviorQueue::from_segments([PathSegment::hold(AgentState::Transported)]);
        assert_eq!(q.current_state(), Some(AgentState::Transported));
        assert!(q.current_waypoint().is_none());
    }

    #[test]
    fn retag_overwrites_every_segment() {
        let mut q = two_segments();
        q.retag(AgentState::StopAndWait);
        assert!(q.segments().all(|s| s.state == AgentState::StopAndWait));
    }

    #[test]
    fn retag_empty_queue_adds_hold() {
        let mut q = BehaviorQueue::new();
        q.retag(AgentState::NotActive);
        assert_eq!(q.len(), 1);
        assert_eq!(q.current_state(), Some(AgentState::NotActive));
    }
}

// ── BehaviorTemplate ──────────────────────────────────────────────────────────

#[cfg(test)]
mod template {
    use super::*;
    use crate::BehaviorError;

    #[test]
    fn rows_group_by_segment() {
        let t = BehaviorTemplate::from_rows([
            (0, v(0.0, 0.0), AgentState::MoveToPickup),
            (0, v(1.0, 0.0), AgentState::MoveToPickup),
            (1, v(4.0, 4.0), AgentState::TransportOthers),
        ])
        .unwrap();
        assert_eq!(t.segments().len(), 2);
        assert_eq!(t.segments()[0].waypoints.len(), 2);
        assert_eq!(t.destination(), Some(v(4.0, 4.0)));
    }

    #[test]
    fn conflicting_states_rejected() {
        let err = BehaviorTemplate::from_rows([
            (0, v(0.0, 0.0), AgentState::MoveToPickup),
            (0, v(1.0, 0.0), AgentState::StopAndWait),
        ])
        .unwrap_err();
        assert!(matches!(err, BehaviorError::ConflictingState { segment: 0, .. }));
    }

    #[test]
    fn empty_template_rejected() {
        assert!(matches!(
            BehaviorTemplate::from_rows(std::iter::empty()).unwrap_err(),
            BehaviorError::EmptyTemplate
        ));
        assert!(matches!(
            BehaviorTemplate::new(vec![PathSegment::hold(AgentState::StopAndWait)]).unwrap_err(),
            BehaviorError::EmptySegment(0)
        ));
    }

    #[test]
    fn instantiate_is_independent_copy() {
        let t = BehaviorTemplate::direct(AgentState::MoveAutonomously, [v(3.0, 0.0)]).unwrap();
        let mut a = t.instantiate(None);
        let b = t.instantiate(Some(AgentState::TransportOthers));
        assert_eq!(a.pop_waypoint(), WaypointOutcome::Finished);
        assert_eq!(b.current_state(), Some(AgentState::TransportOthers));
        assert_eq!(b.current_waypoint(), Some(v(3.0, 0.0)));
        assert_eq!(t.segments()[0].waypoints.len(), 1);
    }
}
