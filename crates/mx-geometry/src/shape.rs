//! Walls (open polylines) and obstacles (closed polygons).
//!
//! Both shapes only keep their segments after construction.  Obstacles also
//! keep the area centroid, computed while the vertices are still available.

use mx_core::DVec2;

use crate::{GeometryError, GeometryResult, Segment};

/// Build consecutive segments from `points`, optionally closing the ring.
pub(crate) fn segments_of(points: &[DVec2], closed: bool) -> Vec<Segment> {
    let mut segments: Vec<Segment> = points
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .filter(|s| !s.is_degenerate())
        .collect();
    if closed {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            let closing = Segment::new(last, first);
            if !closing.is_degenerate() {
                segments.push(closing);
            }
        }
    }
    segments
}

pub(crate) fn check_points(points: &[DVec2], what: &'static str, min: usize) -> GeometryResult<()> {
    if points.len() < min {
        return Err(GeometryError::TooFewPoints { what, min, got: points.len() });
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(GeometryError::NonFinite(what));
    }
    Ok(())
}

/// Area centroid of a simple polygon; falls back to the vertex mean for
/// degenerate (zero-area) rings.
pub(crate) fn polygon_centroid(points: &[DVec2]) -> DVec2 {
    let n = points.len();
    let mut area2 = 0.0;
    let mut acc = DVec2::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = a.perp_dot(b);
        area2 += cross;
        acc += (a + b) * cross;
    }
    if area2.abs() <= 1e-12 {
        let sum: DVec2 = points.iter().copied().sum();
        return sum / n.max(1) as f64;
    }
    acc / (3.0 * area2)
}

/// Even-odd ray cast against a closed ring of segments.
pub(crate) fn ring_contains(segments: &[Segment], p: DVec2) -> bool {
    let mut inside = false;
    for s in segments {
        let (a, b) = (s.start, s.end);
        if (a.y > p.y) != (b.y > p.y) {
            let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_at {
                inside = !inside;
            }
        }
    }
    inside
}

// ── Wall ──────────────────────────────────────────────────────────────────────

/// An open polyline agents cannot pass through.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall {
    pub segments: Vec<Segment>,
}

impl Wall {
    pub fn from_polyline(points: &[DVec2]) -> GeometryResult<Self> {
        check_points(points, "wall", 2)?;
        Ok(Self { segments: segments_of(points, false) })
    }

    /// Total polyline length in metres.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A closed polygon agents cannot enter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub segments: Vec<Segment>,
    pub centroid: DVec2,
}

impl Obstacle {
    pub fn from_polygon(vertices: &[DVec2]) -> GeometryResult<Self> {
        check_points(vertices, "obstacle", 3)?;
        Ok(Self {
            segments: segments_of(vertices, true),
            centroid: polygon_centroid(vertices),
        })
    }

    /// Point-in-polygon test.
    pub fn contains(&self, p: DVec2) -> bool {
        ring_contains(&self.segments, p)
    }

    pub fn perimeter(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}
