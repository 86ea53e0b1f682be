//! The shortest-path service seam.
//!
//! Path search is an external collaborator: the engine only asks for an
//! ordered waypoint list between two points and never looks inside.  Plug a
//! grid planner, visibility graph or navmesh behind [`PathService`].

use mx_core::DVec2;

use crate::Geometry;

/// Pluggable waypoint provider.
///
/// Implementations must be `Send + Sync` so a `Sim` can be moved to a worker
/// thread by an embedding host.
pub trait PathService: Send + Sync {
    /// Waypoints from `from` to `to`, ending at (or near) `to`.  `None` means
    /// "no path known"; callers fall back to heading straight for the target.
    fn find_path(&self, geometry: &Geometry, from: DVec2, to: DVec2) -> Option<Vec<DVec2>>;
}

/// Never returns a path; agents steer straight at their targets.
pub struct NoPaths;

impl PathService for NoPaths {
    fn find_path(&self, _geometry: &Geometry, _from: DVec2, _to: DVec2) -> Option<Vec<DVec2>> {
        None
    }
}

/// Returns the single waypoint `to`, unless the direct line is blocked by a
/// wall or obstacle.
pub struct StraightLine;

impl PathService for StraightLine {
    fn find_path(&self, geometry: &Geometry, from: DVec2, to: DVec2) -> Option<Vec<DVec2>> {
        if geometry.blocks_step(from, to) {
            return None;
        }
        Some(vec![to])
    }
}
