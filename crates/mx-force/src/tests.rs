//! Unit tests for mx-force.

use mx_agent::Agent;
use mx_core::{AgentId, AgentKind, DVec2, DVec3, SimClock};
use mx_geometry::{Geometry, GeometryBuilder};

use crate::{ForceParams, Neighbor, NeighborIndex};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn v(x: f64, y: f64) -> DVec2 {
    DVec2::new(x, y)
}

fn pedestrian(id: u64, at: DVec2) -> Agent {
    Agent::new(AgentId(id), AgentKind::Pedestrian, at, &SimClock::new(1.0))
}

fn isotropic() -> ForceParams {
    ForceParams {
        strength:               2.0,
        range:                  0.5,
        lambda:                 1.0,
        max_velocity_factor:    10.0,
        max_influence_distance: 5.0,
    }
}

fn index_of(agents: &[&Agent]) -> NeighborIndex {
    NeighborIndex::from_agents(agents.iter().copied())
}

// ── Target attraction ─────────────────────────────────────────────────────────

#[cfg(test)]
mod attraction {
    use super::*;
    use crate::target_attraction;

    #[test]
    fn from_rest_is_full_speed_over_relaxation() {
        let a = pedestrian(0, v(0.0, 0.0));
        let f = target_attraction(&a, v(10.0, 0.0));
        assert!((f - DVec3::new(1.4, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn at_cruise_speed_force_vanishes() {
        let mut a = pedestrian(0, v(0.0, 0.0));
        a.velocity = DVec3::new(0.0, 1.4, 0.0);
        let f = target_attraction(&a, v(0.0, 10.0));
        assert!(f.length() < 1e-12);
    }

    #[test]
    fn on_target_brakes() {
        let mut a = pedestrian(0, v(2.0, 2.0));
        a.velocity = DVec3::new(1.0, 0.0, 0.0);
        let f = target_attraction(&a, v(2.0, 2.0));
        assert!((f - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }
}

// ── Agent repulsion ───────────────────────────────────────────────────────────

#[cfg(test)]
mod repulsion {
    use super::*;
    use crate::agent_repulsion;
    use mx_behavior::{AgentState, BehaviorQueue, PathSegment};

    #[test]
    fn exponential_magnitude_along_separation() {
        let me = pedestrian(0, v(0.0, 0.0));
        let other = pedestrian(1, v(1.0, 0.0));
        let idx = index_of(&[&me, &other]);
        let f = agent_repulsion(&me, &idx, &isotropic());
        let expected = 2.0 * ((0.6 - 1.0) / 0.5_f64).exp();
        assert!((f.x + expected).abs() < 1e-12);
        assert!(f.y.abs() < 1e-12);
    }

    #[test]
    fn skips_self_and_coincident() {
        let me = pedestrian(0, v(0.0, 0.0));
        let twin = pedestrian(1, v(0.0, 0.0));
        let idx = index_of(&[&me, &twin]);
        assert_eq!(agent_repulsion(&me, &idx, &isotropic()), DVec3::ZERO);
    }

    #[test]
    fn ignores_beyond_influence() {
        let me = pedestrian(0, v(0.0, 0.0));
        let far = pedestrian(1, v(6.0, 0.0));
        let idx = index_of(&[&far]);
        assert_eq!(agent_repulsion(&me, &idx, &isotropic()), DVec3::ZERO);
    }

    #[test]
    fn pairwise_cap() {
        let me = pedestrian(0, v(0.0, 0.0));
        let close = pedestrian(1, v(0.05, 0.0));
        let idx = index_of(&[&close]);
        let params = ForceParams { max_velocity_factor: 1.5, ..isotropic() };
        let f = agent_repulsion(&me, &idx, &params);
        assert!((f.length() - 1.5 * me.max_force).abs() < 1e-12);
    }

    #[test]
    fn anisotropy_weakens_agents_behind() {
        let mut me = pedestrian(0, v(0.0, 0.0));
        me.velocity = DVec3::new(1.0, 0.0, 0.0);
        let ahead = pedestrian(1, v(1.0, 0.0));
        let behind = pedestrian(2, v(-1.0, 0.0));
        let params = ForceParams { lambda: 0.25, ..isotropic() };

        let f_ahead = agent_repulsion(&me, &index_of(&[&ahead]), &params).length();
        let f_behind = agent_repulsion(&me, &index_of(&[&behind]), &params).length();
        let iso = agent_repulsion(&me, &index_of(&[&ahead]), &isotropic()).length();

        assert!((f_ahead - iso).abs() < 1e-12);
        assert!((f_behind - 0.25 * iso).abs() < 1e-12);
    }

    #[test]
    fn standing_agent_is_isotropic() {
        let me = pedestrian(0, v(0.0, 0.0));
        let behind = pedestrian(2, v(-1.0, 0.0));
        let params = ForceParams { lambda: 0.25, ..isotropic() };
        let f = agent_repulsion(&me, &index_of(&[&behind]), &params).length();
        let iso = agent_repulsion(&me, &index_of(&[&behind]), &isotropic()).length();
        assert!((f - iso).abs() < 1e-12);
    }

    #[test]
    fn passengers_do_not_repel() {
        let me = pedestrian(0, v(0.0, 0.0));
        let mut rider = pedestrian(1, v(0.5, 0.0));
        rider.behavior = BehaviorQueue::from_segments([PathSegment::hold(AgentState::Transported)]);
        let idx = index_of(&[&rider]);
        assert!(idx.is_empty());
        assert_eq!(agent_repulsion(&me, &idx, &isotropic()), DVec3::ZERO);
    }

    #[test]
    fn neighbor_query_is_sorted_and_bounded() {
        let idx = NeighborIndex::new(vec![
            Neighbor { id: AgentId(1), position: v(3.0, 0.0), radius: 0.3 },
            Neighbor { id: AgentId(2), position: v(1.0, 0.0), radius: 0.3 },
            Neighbor { id: AgentId(3), position: v(9.0, 0.0), radius: 0.3 },
        ]);
        let ids: Vec<AgentId> = idx.within(v(0.0, 0.0), 3.0).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![AgentId(2), AgentId(1)]);
        assert_eq!(idx.len(), 3);
    }
}

// ── Wall & obstacle repulsion ─────────────────────────────────────────────────

#[cfg(test)]
mod walls {
    use super::*;
    use crate::wall_obstacle_repulsion;

    fn wall(a: DVec2, b: DVec2) -> Geometry {
        let mut g = GeometryBuilder::new();
        g.add_wall(&[a, b]).unwrap();
        g.build()
    }

    fn wall_force(agent: &Agent, d: f64) -> f64 {
        agent.wall_magnitude / agent.wall_radius * (-d / agent.wall_radius).exp()
    }

    #[test]
    fn projection_inside_pushes_perpendicular() {
        let g = wall(v(-5.0, 0.0), v(5.0, 0.0));
        let a = pedestrian(0, v(0.0, 1.0));
        let f = wall_obstacle_repulsion(&a, &g);
        assert!(f.x.abs() < 1e-12);
        assert!((f.y - wall_force(&a, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn lone_far_endpoint_is_ignored() {
        let g = wall(v(0.0, 0.0), v(1.0, 0.0));
        let a = pedestrian(0, v(3.0, 0.0));
        assert_eq!(wall_obstacle_repulsion(&a, &g), DVec3::ZERO);
    }

    #[test]
    fn lone_endpoint_within_radius_counts() {
        let g = wall(v(0.0, 0.0), v(1.0, 0.0));
        let a = pedestrian(0, v(1.2, 0.0));
        let f = wall_obstacle_repulsion(&a, &g);
        assert!((f.x - wall_force(&a, 0.2)).abs() < 1e-9);
    }

    #[test]
    fn convex_corner_counted_once() {
        let mut b = GeometryBuilder::new();
        b.add_obstacle(&[v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0), v(0.0, 2.0)]).unwrap();
        let g = b.build();
        let a = pedestrian(0, v(3.0, 3.0));
        let f = wall_obstacle_repulsion(&a, &g);
        let d = 2.0_f64.sqrt();
        assert!((f.x - f.y).abs() < 1e-12);
        assert!((f.length() - wall_force(&a, d)).abs() < 1e-12);
    }

    #[test]
    fn empty_world_has_no_wall_force() {
        let a = pedestrian(0, v(0.0, 0.0));
        assert_eq!(wall_obstacle_repulsion(&a, &Geometry::empty()), DVec3::ZERO);
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use super::*;
    use crate::{ForceError, SocialForceTable, ensure_finite};

    #[test]
    fn table_covers_cross_product() {
        let t = SocialForceTable::default_for_registry();
        for me in AgentKind::ALL {
            for other in AgentKind::ALL {
                let p = t.get(me, other);
                assert!(p.range > 0.0 && p.strength > 0.0, "{me}/{other}");
            }
        }
    }

    #[test]
    fn pairs_are_direction_significant() {
        let t = SocialForceTable::default_for_registry();
        assert_ne!(
            t.get(AgentKind::Pedestrian, AgentKind::Pod),
            t.get(AgentKind::Pod, AgentKind::Pedestrian)
        );
    }

    #[test]
    fn set_overrides_one_pair() {
        let mut t = SocialForceTable::uniform(isotropic());
        let custom = ForceParams { strength: 9.0, ..isotropic() };
        t.set(AgentKind::Bicycle, AgentKind::Pedestrian, custom);
        assert_eq!(t.get(AgentKind::Bicycle, AgentKind::Pedestrian).strength, 9.0);
        assert_eq!(t.get(AgentKind::Pedestrian, AgentKind::Bicycle).strength, 2.0);
    }

    #[test]
    fn non_finite_force_rejected() {
        let a = pedestrian(4, v(0.0, 0.0));
        let err = ensure_finite(&a, DVec3::new(f64::INFINITY, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ForceError::NonFinite(AgentId(4))));
        assert!(ensure_finite(&a, DVec3::X).is_ok());
    }
}
