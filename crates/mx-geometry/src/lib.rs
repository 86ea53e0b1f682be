//! `mx-geometry` — the static world agents react to.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`segment`]  | `Segment` — directed line segment + projection/intersection  |
//! | [`shape`]    | `Wall` (open polyline), `Obstacle` (closed polygon)          |
//! | [`crossing`] | `Crossing` — entrance/exit line                              |
//! | [`zone`]     | `TransitionZone`, `ZoneKind`, `PURGE_MARGIN`                 |
//! | [`world`]    | `Geometry`, `GeometryBuilder`, `Destination`                 |
//! | [`path`]     | `PathService` trait (external shortest path), `NoPaths`, `StraightLine` |
//! | [`error`]    | `GeometryError`, `GeometryResult<T>`                         |
//!
//! # Build pass
//!
//! Walls and obstacles are declared as point lists on a [`GeometryBuilder`].
//! [`GeometryBuilder::build`] runs the one-time pass that turns every
//! polyline/polygon into an immutable array of [`Segment`]s, computes
//! centroids, lengths and the bounding box, and bulk-loads an R-tree over
//! all wall/obstacle segments.  Vertex lists are not retained.

pub mod crossing;
pub mod error;
pub mod path;
pub mod segment;
pub mod shape;
pub mod world;
pub mod zone;


pub use crossing::Crossing;
pub use error::{GeometryError, GeometryResult};
pub use path::{NoPaths, PathService, StraightLine};
pub use segment::Segment;
pub use shape::{Obstacle, Wall};
pub use world::{Bounds, Destination, Geometry, GeometryBuilder};
pub use zone::{PURGE_MARGIN, TransitionZone, ZoneKind};
