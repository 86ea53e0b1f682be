//! The three force terms.

use mx_agent::Agent;
use mx_core::vector::{cos_angle, is_finite, lift};
use mx_core::{DVec2, DVec3};
use mx_geometry::Geometry;

use crate::{ForceError, ForceParams, ForceResult, NeighborIndex};

/// Distances below this are treated as coincident and skipped.
const COINCIDENT: f64 = 1e-9;

/// A moving agent's velocity must exceed this to apply anisotropy.
const MOVING: f64 = 1e-9;

// ── Target attraction ─────────────────────────────────────────────────────────

/// First-order relaxation towards `target` at full speed:
/// `(normalize(target − position) · max_speed − velocity) / relaxation`.
///
/// An agent already standing on its target is told to brake.
pub fn target_attraction(agent: &Agent, target: DVec2) -> DVec3 {
    let desired = (target - agent.position_2d()).normalize_or_zero() * agent.max_speed;
    (lift(desired) - agent.velocity) / agent.relaxation
}

// ── Agent repulsion ───────────────────────────────────────────────────────────

/// Summed repulsion on `agent` from the indexed neighbors of one kind.
///
/// Each neighbor within `max_influence_distance` (other than the agent
/// itself and anything at zero distance) pushes with
/// `A · exp((r_self + r_other − d) / B)` along `normalize(self − other)`.
/// A moving agent with `λ < 1` scales that by
/// `λ + (1 − λ)(1 + cos θ) / 2`, θ being the angle between its velocity and
/// the direction to the neighbor.
pub fn agent_repulsion(agent: &Agent, others: &NeighborIndex, params: &ForceParams) -> DVec3 {
    let here = agent.position_2d();
    let cap = params.max_velocity_factor * agent.max_force;
    let moving = agent.velocity.length() > MOVING;
    let anisotropic = moving && params.lambda < 1.0;

    let mut total = DVec3::ZERO;
    for n in others.within(here, params.max_influence_distance) {
        if n.id == agent.id {
            continue;
        }
        let away = here - n.position;
        let d = away.length();
        if d <= COINCIDENT {
            continue;
        }
        let mut magnitude = params.strength * ((agent.radius + n.radius - d) / params.range).exp();
        if anisotropic {
            if let Some(cos) = cos_angle(agent.velocity, lift(-away)) {
                magnitude *= params.lambda + (1.0 - params.lambda) * (1.0 + cos) * 0.5;
            }
        }
        total += lift(away / d * magnitude.min(cap));
    }
    total
}

// ── Wall & obstacle repulsion ─────────────────────────────────────────────────

/// Summed repulsion from every wall and obstacle segment.
///
/// Per segment the source point is the orthogonal projection of the agent
/// when it lands inside the segment.  Otherwise the nearer endpoint becomes
/// a candidate, used once if two or more segments nominate it (a corner) or
/// if it is closer than the agent's radius.  Each source pushes with
/// `(magnitude / radius_w) · exp(−d / radius_w)` away from itself.
pub fn wall_obstacle_repulsion(agent: &Agent, geometry: &Geometry) -> DVec3 {
    let here = agent.position_2d();
    let mut sources: Vec<DVec2> = Vec::new();
    let mut candidates: Vec<(DVec2, u32)> = Vec::new();

    for seg in geometry.barrier_segments() {
        match seg.project_inside(here) {
            Some(p) => sources.push(p),
            None => {
                let end = seg.nearer_endpoint(here);
                match candidates.iter_mut().find(|(c, _)| c.distance_squared(end) <= COINCIDENT) {
                    Some((_, n)) => *n += 1,
                    None => candidates.push((end, 1)),
                }
            }
        }
    }

    for (c, n) in candidates {
        if sources.iter().any(|s| s.distance_squared(c) <= COINCIDENT) {
            continue;
        }
        if n >= 2 || here.distance(c) < agent.radius {
            sources.push(c);
        }
    }

    let range = agent.wall_radius;
    let scale = agent.wall_magnitude / range;
    sources
        .into_iter()
        .filter_map(|s| {
            let away = here - s;
            let d = away.length();
            (d > COINCIDENT).then(|| lift(away / d * scale * (-d / range).exp()))
        })
        .sum()
}

/// Turn a non-finite force into a per-agent error.
pub fn ensure_finite(agent: &Agent, force: DVec3) -> ForceResult<DVec3> {
    if is_finite(force) {
        Ok(force)
    } else {
        Err(ForceError::NonFinite(agent.id))
    }
}
