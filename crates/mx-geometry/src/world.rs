//! The assembled world: walls, obstacles, crossings and transition zones.

use std::collections::HashSet;

use rstar::{PointDistance, RTree};
use tracing::info;

use mx_core::{CrossingId, DVec2, ZoneId};

use crate::segment::SegmentEntry;
use crate::shape::{check_points, polygon_centroid, segments_of};
use crate::{
    Crossing, GeometryError, GeometryResult, Obstacle, Segment, TransitionZone, Wall, ZoneKind,
};

/// A step ending closer than this to a wall counts as touching it.
const TOUCH_EPS: f64 = 1e-9;

// ── Bounds ────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box of everything in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        min: DVec2::splat(f64::INFINITY),
        max: DVec2::splat(f64::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn size(&self) -> DVec2 {
        if self.is_empty() { DVec2::ZERO } else { self.max - self.min }
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

/// Where a spawned or re-routed agent is heading.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Destination {
    /// Leave the world through a crossing.
    Crossing(CrossingId),
    /// Walk/ride to a transition zone.
    Zone(ZoneId),
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable world geometry plus the mutable zone queues.
///
/// Do not construct directly; use [`GeometryBuilder`].
pub struct Geometry {
    pub walls:     Vec<Wall>,
    pub obstacles: Vec<Obstacle>,
    pub crossings: Vec<Crossing>,
    pub zones:     Vec<TransitionZone>,
    pub bounds:    Bounds,

    segment_index: RTree<SegmentEntry>,
}

impl Geometry {
    /// A world with nothing in it.
    pub fn empty() -> Self {
        GeometryBuilder::new().build()
    }

    // ── Segment access ────────────────────────────────────────────────────

    /// Every wall and obstacle segment.
    pub fn barrier_segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.walls
            .iter()
            .flat_map(|w| w.segments.iter())
            .chain(self.obstacles.iter().flat_map(|o| o.segments.iter()))
    }

    pub fn barrier_count(&self) -> usize {
        self.segment_index.size()
    }

    /// `true` if moving in a straight line from `from` to `to` would cross or
    /// end on any wall/obstacle segment.
    ///
    /// Only segments within `|to - from|` of `from` can intersect the step,
    /// so the R-tree walk stops there.
    pub fn blocks_step(&self, from: DVec2, to: DVec2) -> bool {
        let step = Segment::new(from, to);
        if step.is_degenerate() {
            return false;
        }
        let query = [from.x, from.y];
        let reach_2 = step.length * step.length + TOUCH_EPS;
        self.segment_index
            .nearest_neighbor_iter(&query)
            .take_while(|e| e.distance_2(&query) <= reach_2)
            .any(|e| step.properly_intersects(&e.0) || e.0.distance_to(to) <= TOUCH_EPS)
    }

    /// Nearest point on any wall/obstacle to `p` and its distance.
    pub fn nearest_barrier_point(&self, p: DVec2) -> Option<(DVec2, f64)> {
        self.segment_index
            .nearest_neighbor(&[p.x, p.y])
            .map(|e| {
                let q = e.0.closest_point(p);
                (q, q.distance(p))
            })
    }

    /// The obstacle containing `p`, if any.
    pub fn obstacle_at(&self, p: DVec2) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.contains(p))
    }

    // ── Crossings & zones ─────────────────────────────────────────────────

    pub fn crossing(&self, id: CrossingId) -> Option<&Crossing> {
        self.crossings.get(id.index())
    }

    pub fn zone(&self, id: ZoneId) -> Option<&TransitionZone> {
        self.zones.get(id.index())
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut TransitionZone> {
        self.zones.get_mut(id.index())
    }

    pub fn crossing_by_name(&self, name: &str) -> Option<&Crossing> {
        self.crossings.iter().find(|c| c.name == name)
    }

    pub fn zone_by_name(&self, name: &str) -> Option<&TransitionZone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Resolve a label from an OD matrix or distribution matrix.
    ///
    /// Lookup order: crossing name, zone name, numeric zone id.
    pub fn resolve_destination(&self, label: &str) -> GeometryResult<Destination> {
        let label = label.trim();
        if let Some(c) = self.crossing_by_name(label) {
            return Ok(Destination::Crossing(c.id));
        }
        if let Some(z) = self.zone_by_name(label) {
            return Ok(Destination::Zone(z.id));
        }
        label
            .parse::<u32>()
            .ok()
            .map(ZoneId)
            .filter(|id| self.zone(*id).is_some())
            .map(Destination::Zone)
            .ok_or_else(|| GeometryError::UnknownDestination(label.to_owned()))
    }

    /// Resolve `label` as an entrance crossing (name, then numeric id).
    pub fn resolve_crossing(&self, label: &str) -> GeometryResult<&Crossing> {
        let label = label.trim();
        self.crossing_by_name(label)
            .or_else(|| {
                label
                    .parse::<u32>()
                    .ok()
                    .and_then(|i| self.crossing(CrossingId(i)))
            })
            .ok_or_else(|| GeometryError::UnknownDestination(label.to_owned()))
    }

    /// The point agents steer to for `dest`.
    pub fn destination_point(&self, dest: Destination) -> Option<DVec2> {
        match dest {
            Destination::Crossing(id) => self.crossing(id).map(|c| c.centroid),
            Destination::Zone(id)     => self.zone(id).map(|z| z.centroid),
        }
    }

    /// Human-readable name of `dest` (used in logs and distribution rows).
    pub fn destination_name(&self, dest: Destination) -> Option<&str> {
        match dest {
            Destination::Crossing(id) => self.crossing(id).map(|c| c.name.as_str()),
            Destination::Zone(id)     => self.zone(id).map(|z| z.name.as_str()),
        }
    }
}

// ── GeometryBuilder ───────────────────────────────────────────────────────────

/// Collect raw point lists, then call [`build`](Self::build) for the
/// one-time segment/centroid/bounds pass.
///
/// # Example
///
/// ```
/// use mx_core::DVec2;
/// use mx_geometry::{GeometryBuilder, ZoneKind};
///
/// let mut b = GeometryBuilder::new();
/// b.add_wall(&[DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]).unwrap();
/// b.add_crossing("north", DVec2::new(0.0, 10.0), DVec2::new(4.0, 10.0)).unwrap();
/// b.add_zone("rack", ZoneKind::PodRack, 2, &[
///     DVec2::new(6.0, 6.0), DVec2::new(8.0, 6.0), DVec2::new(8.0, 8.0), DVec2::new(6.0, 8.0),
/// ]).unwrap();
/// let geometry = b.build();
/// assert_eq!(geometry.barrier_count(), 1);
/// assert_eq!(geometry.crossings[0].centroid, DVec2::new(2.0, 10.0));
/// ```
#[derive(Default)]
pub struct GeometryBuilder {
    walls:     Vec<Vec<DVec2>>,
    obstacles: Vec<Vec<DVec2>>,
    crossings: Vec<(String, DVec2, DVec2)>,
    zones:     Vec<RawZone>,
    names:     HashSet<String>,
}

struct RawZone {
    name:     String,
    kind:     ZoneKind,
    capacity: usize,
    outline:  Vec<DVec2>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wall(&mut self, points: &[DVec2]) -> GeometryResult<()> {
        check_points(points, "wall", 2)?;
        self.walls.push(points.to_vec());
        Ok(())
    }

    pub fn add_obstacle(&mut self, vertices: &[DVec2]) -> GeometryResult<()> {
        check_points(vertices, "obstacle", 3)?;
        self.obstacles.push(vertices.to_vec());
        Ok(())
    }

    pub fn add_crossing(&mut self, name: &str, a: DVec2, b: DVec2) -> GeometryResult<CrossingId> {
        check_points(&[a, b], "crossing", 2)?;
        self.claim_name(name)?;
        let id = CrossingId(self.crossings.len() as u32);
        self.crossings.push((name.to_owned(), a, b));
        Ok(id)
    }

    pub fn add_zone(
        &mut self,
        name:     &str,
        kind:     ZoneKind,
        capacity: usize,
        outline:  &[DVec2],
    ) -> GeometryResult<ZoneId> {
        check_points(outline, "transition zone", 3)?;
        self.claim_name(name)?;
        let id = ZoneId(self.zones.len() as u32);
        self.zones.push(RawZone {
            name: name.to_owned(),
            kind,
            capacity,
            outline: outline.to_vec(),
        });
        Ok(id)
    }

    fn claim_name(&mut self, name: &str) -> GeometryResult<()> {
        if !self.names.insert(name.to_owned()) {
            return Err(GeometryError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    /// Build segments, centroids, lengths and bounds; drop the vertex lists.
    pub fn build(self) -> Geometry {
        let mut bounds = Bounds::EMPTY;
        let mut grow = |pts: &[DVec2]| pts.iter().for_each(|&p| bounds.expand(p));

        for w in &self.walls {
            grow(w);
        }
        for o in &self.obstacles {
            grow(o);
        }
        for (_, a, b) in &self.crossings {
            grow(&[*a, *b]);
        }
        for z in &self.zones {
            grow(&z.outline);
        }

        let walls: Vec<Wall> = self
            .walls
            .iter()
            .map(|pts| Wall { segments: segments_of(pts, false) })
            .collect();

        let obstacles: Vec<Obstacle> = self
            .obstacles
            .iter()
            .map(|pts| Obstacle {
                segments: segments_of(pts, true),
                centroid: polygon_centroid(pts),
            })
            .collect();

        let crossings: Vec<Crossing> = self
            .crossings
            .into_iter()
            .enumerate()
            .map(|(i, (name, a, b))| Crossing::new(CrossingId(i as u32), name, a, b))
            .collect();

        let zones: Vec<TransitionZone> = self
            .zones
            .into_iter()
            .enumerate()
            .map(|(i, z)| {
                let segments = segments_of(&z.outline, true);
                let centroid = polygon_centroid(&z.outline);
                TransitionZone::new(ZoneId(i as u32), z.name, z.kind, z.capacity, segments, centroid)
            })
            .collect();

        let entries: Vec<SegmentEntry> = walls
            .iter()
            .flat_map(|w| w.segments.iter())
            .chain(obstacles.iter().flat_map(|o| o.segments.iter()))
            .map(|s| SegmentEntry(*s))
            .collect();

        info!(
            walls     = walls.len(),
            obstacles = obstacles.len(),
            crossings = crossings.len(),
            zones     = zones.len(),
            segments  = entries.len(),
            "geometry built"
        );

        Geometry {
            walls,
            obstacles,
            crossings,
            zones,
            bounds,
            segment_index: RTree::bulk_load(entries),
        }
    }
}
