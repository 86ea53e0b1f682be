//! Vector types and planar helpers.
//!
//! Agents carry 3-D position/velocity/acceleration (`DVec3`) so snapshots
//! stay interoperable with 3-D hosts, but all physics happens in the x/y
//! plane: `z` is carried through untouched.  Geometry is purely 2-D
//! (`DVec2`).  All lengths are metres.

pub use glam::{DVec2, DVec3};

/// Drop the `z` component.
#[inline]
pub fn planar(v: DVec3) -> DVec2 {
    v.truncate()
}

/// Lift a planar point to 3-D with `z = 0`.
#[inline]
pub fn lift(p: DVec2) -> DVec3 {
    p.extend(0.0)
}

/// Heading angle (radians, counter-clockwise from +x) of the planar part of `v`.
///
/// Returns `None` for a zero-length vector, whose heading is undefined.
#[inline]
pub fn heading_of(v: DVec3) -> Option<f64> {
    let p = planar(v);
    if p.length_squared() <= f64::EPSILON {
        return None;
    }
    Some(p.y.atan2(p.x))
}

/// Unit vector pointing along `heading` (radians).
#[inline]
pub fn unit_from_heading(heading: f64) -> DVec3 {
    DVec3::new(heading.cos(), heading.sin(), 0.0)
}

/// `true` if every component is finite.
#[inline]
pub fn is_finite(v: DVec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Cosine of the angle between two vectors; `None` if either is zero.
pub fn cos_angle(a: DVec3, b: DVec3) -> Option<f64> {
    let la = a.length();
    let lb = b.length();
    if la <= f64::EPSILON || lb <= f64::EPSILON {
        return None;
    }
    Some((a.dot(b) / (la * lb)).clamp(-1.0, 1.0))
}
