//! Crossings — the lines agents enter and leave the world through.

use mx_core::{CrossingId, DVec2};

use crate::Segment;

/// An entrance/exit line with its derived length and centroid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crossing {
    pub id:       CrossingId,
    pub name:     String,
    pub a:        DVec2,
    pub b:        DVec2,
    pub length:   f64,
    pub centroid: DVec2,
}

impl Crossing {
    pub fn new(id: CrossingId, name: impl Into<String>, a: DVec2, b: DVec2) -> Self {
        Self {
            id,
            name: name.into(),
            a,
            b,
            length:   a.distance(b),
            centroid: (a + b) * 0.5,
        }
    }

    /// Point on the crossing line, `offset ∈ [-1, 1]` measured from the
    /// centroid towards `b` in half-lengths.
    pub fn point_at(&self, offset: f64) -> DVec2 {
        self.centroid + (self.b - self.a) * 0.5 * offset.clamp(-1.0, 1.0)
    }

    pub fn segment(&self) -> Segment {
        Segment::new(self.a, self.b)
    }
}
