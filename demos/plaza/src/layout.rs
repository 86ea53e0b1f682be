//! The demo plaza.
//!
//! A 60 m × 30 m square open to the west and east.  Pedestrians enter from
//! either side; some walk straight across, others head for pod rack
//! `rack-a`, ride a pod to `rack-b` and walk out east from there.  A
//! fountain in the middle gets in everyone's way.

use mx_core::DVec2;
use mx_geometry::{Geometry, GeometryBuilder, GeometryResult, ZoneKind};

pub const WIDTH:  f64 = 60.0;
pub const HEIGHT: f64 = 30.0;

fn square(cx: f64, cy: f64, half: f64) -> [DVec2; 4] {
    [
        DVec2::new(cx - half, cy - half),
        DVec2::new(cx + half, cy - half),
        DVec2::new(cx + half, cy + half),
        DVec2::new(cx - half, cy + half),
    ]
}

pub fn build_plaza() -> GeometryResult<Geometry> {
    let mut b = GeometryBuilder::new();

    // North and south facades; the short sides are the crossings.
    b.add_wall(&[DVec2::new(0.0, HEIGHT), DVec2::new(WIDTH, HEIGHT)])?;
    b.add_wall(&[DVec2::new(0.0, 0.0), DVec2::new(WIDTH, 0.0)])?;

    b.add_crossing("west", DVec2::new(0.0, 8.0), DVec2::new(0.0, 22.0))?;
    b.add_crossing("east", DVec2::new(WIDTH, 8.0), DVec2::new(WIDTH, 22.0))?;

    b.add_obstacle(&square(WIDTH / 2.0, 23.0, 2.5))?;

    b.add_zone("rack-a", ZoneKind::PodRack, 3, &square(12.0, 8.0, 2.0))?;
    b.add_zone("rack-b", ZoneKind::PodRack, 3, &square(48.0, 8.0, 2.0))?;
    b.add_zone("bikes", ZoneKind::BikeRack, 2, &square(48.0, 24.0, 2.0))?;

    Ok(b.build())
}
