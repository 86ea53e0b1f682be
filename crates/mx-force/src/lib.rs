//! `mx-force` — the Social Force Model.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`params`]    | `ForceParams`, `SocialForceTable` (per kind-pair parameters)   |
//! | [`neighbors`] | `NeighborIndex` — R-tree over one kind's agent positions       |
//! | [`forces`]    | `target_attraction`, `agent_repulsion`, `wall_obstacle_repulsion` |
//! | [`error`]     | `ForceError`, `ForceResult<T>`                                 |
//!
//! # Design notes
//!
//! Every force function is pure: it reads one agent plus context and returns
//! a force vector (metres per tick²).  Nothing here mutates an agent, so the
//! orchestrator can evaluate a whole kind-group against a frozen snapshot,
//! in parallel if it likes, and only then apply and integrate.

pub mod error;
pub mod forces;
pub mod neighbors;
pub mod params;

#[cfg(test)]
mod tests;

pub use error::{ForceError, ForceResult};
pub use forces::{agent_repulsion, ensure_finite, target_attraction, wall_obstacle_repulsion};
pub use neighbors::{Neighbor, NeighborIndex};
pub use params::{ForceParams, SocialForceTable};
