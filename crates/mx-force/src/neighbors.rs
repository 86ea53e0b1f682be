//! R-tree over a frozen set of agent positions.
//!
//! One index is built per kind at the start of that kind's group step.  It
//! answers "every agent within `d` of `p`" by walking the nearest-neighbor
//! iterator until the distance bound is passed.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use mx_agent::Agent;
use mx_core::{AgentId, DVec2};

/// What the repulsion term needs to know about a neighbor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub id:       AgentId,
    pub position: DVec2,
    pub radius:   f64,
}

impl RTreeObject for Neighbor {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.x, self.position.y])
    }
}

impl PointDistance for Neighbor {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.position.distance_squared(DVec2::new(point[0], point[1]))
    }
}

pub struct NeighborIndex {
    tree: RTree<Neighbor>,
}

impl NeighborIndex {
    pub fn new(neighbors: Vec<Neighbor>) -> Self {
        Self { tree: RTree::bulk_load(neighbors) }
    }

    /// Index every agent that exerts repulsion.  Passengers and inactive
    /// agents are left out.
    pub fn from_agents<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Self {
        Self::new(
            agents
                .into_iter()
                .filter(|a| a.state().repels())
                .map(|a| Neighbor { id: a.id, position: a.position_2d(), radius: a.radius })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Neighbors within `distance` of `p`, nearest first.
    pub fn within(&self, p: DVec2, distance: f64) -> Vec<&Neighbor> {
        let query = [p.x, p.y];
        let limit_2 = distance * distance;
        self.tree
            .nearest_neighbor_iter(&query)
            .take_while(|n| n.distance_2(&query) <= limit_2)
            .collect()
    }
}
