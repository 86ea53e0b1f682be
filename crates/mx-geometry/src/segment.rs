//! Directed line segments — the only primitive walls and obstacles reduce to.

use rstar::{AABB, PointDistance, RTreeObject};

use mx_core::DVec2;

/// Below this length a segment is treated as a point.
const DEGENERATE_LEN: f64 = 1e-9;

/// Orientation values smaller than this count as collinear.
const COLLINEAR_EPS: f64 = 1e-12;

/// A directed segment `start → end` with its cached length.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub start:  DVec2,
    pub end:    DVec2,
    pub length: f64,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end, length: start.distance(end) }
    }

    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    #[inline]
    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) * 0.5
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length <= DEGENERATE_LEN
    }

    /// Parameter `t` of the orthogonal projection of `p` on the supporting
    /// line; the projection falls inside the segment iff `0 ≤ t ≤ 1`.
    pub fn projection_param(&self, p: DVec2) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let d = self.direction();
        (p - self.start).dot(d) / d.length_squared()
    }

    /// The projection of `p` when it lands inside the segment, otherwise `None`.
    pub fn project_inside(&self, p: DVec2) -> Option<DVec2> {
        let t = self.projection_param(p);
        (0.0..=1.0)
            .contains(&t)
            .then(|| self.start + self.direction() * t)
    }

    /// Nearest point of the segment to `p`.
    pub fn closest_point(&self, p: DVec2) -> DVec2 {
        let t = self.projection_param(p).clamp(0.0, 1.0);
        self.start + self.direction() * t
    }

    /// The endpoint closer to `p`.
    pub fn nearer_endpoint(&self, p: DVec2) -> DVec2 {
        if self.start.distance_squared(p) <= self.end.distance_squared(p) {
            self.start
        } else {
            self.end
        }
    }

    #[inline]
    pub fn distance_to(&self, p: DVec2) -> f64 {
        self.closest_point(p).distance(p)
    }

    /// `true` if the two segments cross at a single interior point of both
    /// (touching endpoints and collinear overlaps do not count).
    pub fn properly_intersects(&self, other: &Segment) -> bool {
        let o1 = orient(self.start, self.end, other.start);
        let o2 = orient(self.start, self.end, other.end);
        let o3 = orient(other.start, other.end, self.start);
        let o4 = orient(other.start, other.end, self.end);
        o1 * o2 < 0.0 && o3 * o4 < 0.0
    }

    /// `true` if the segments share at least one point, including touching
    /// and collinear overlap.
    pub fn intersects(&self, other: &Segment) -> bool {
        if self.properly_intersects(other) {
            return true;
        }
        let on = |a: &Segment, p: DVec2| a.distance_to(p) <= DEGENERATE_LEN;
        on(self, other.start) || on(self, other.end) || on(other, self.start) || on(other, self.end)
    }
}

/// Twice the signed area of triangle `a, b, c`, snapped to zero near collinear.
#[inline]
fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    let v = (b - a).perp_dot(c - a);
    if v.abs() <= COLLINEAR_EPS { 0.0 } else { v }
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the wall/obstacle R-tree.
#[derive(Clone, Debug)]
pub(crate) struct SegmentEntry(pub Segment);

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.0.start.x, self.0.start.y],
            [self.0.end.x, self.0.end.y],
        )
    }
}

impl PointDistance for SegmentEntry {
    /// Squared Euclidean distance from the query point to the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let p = DVec2::new(point[0], point[1]);
        self.0.closest_point(p).distance_squared(p)
    }
}
