//! `mx-core` — foundational types for the `mixsim` traffic microsimulation.
//!
//! This crate is a dependency of every other `mx-*` crate.  It intentionally
//! has no `mx-*` dependencies and minimal external ones (`glam`, `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ZoneId`, `CrossingId`, `PublisherId`      |
//! | [`vector`]      | `DVec2`/`DVec3` re-exports, planar helpers            |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `SimConfig`, `WanderConfig`                           |
//! | [`rng`]         | `SimRng` (the only random source of a run)            |
//! | [`kind`]        | `AgentKind` — the static agent-type registry          |
//! | [`error`]       | `MxError`, `ErrorClass`, `MxResult`                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;
pub mod vector;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SimConfig, WanderConfig};
pub use error::{ErrorClass, MxError, MxResult};
pub use ids::{AgentId, CrossingId, PublisherId, ZoneId};
pub use kind::AgentKind;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
pub use vector::{DVec2, DVec3};
