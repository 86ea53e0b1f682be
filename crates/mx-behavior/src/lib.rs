//! `mx-behavior` — what an agent is doing and where it goes next.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`state`]    | `AgentState` — the discrete travel state of a path segment      |
//! | [`queue`]    | `PathSegment`, `BehaviorQueue`, `WaypointOutcome`               |
//! | [`template`] | `BehaviorTemplate` — shared, clonable queue prototypes          |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! An agent's behavior is an ordered queue of path segments.  The front
//! segment is "current": its state answers every `is_stopped` /
//! `is_transported` style predicate, and its first waypoint is the point the
//! agent steers to.  Reaching a waypoint pops it; popping the last waypoint of
//! a segment promotes the next one; popping the very last waypoint reports
//! [`WaypointOutcome::Finished`].
//!
//! Mode switches at transition zones never edit a queue in place.  They
//! discard it and instantiate a fresh one from a [`BehaviorTemplate`] owned by
//! the distribution matrix, optionally overriding every segment's state.

pub mod error;
pub mod queue;
pub mod state;
pub mod template;

#[cfg(test)]
mod tests;

pub use error::{BehaviorError, BehaviorResult};
pub use queue::{BehaviorQueue, PathSegment, WaypointOutcome};
pub use state::AgentState;
pub use template::BehaviorTemplate;
