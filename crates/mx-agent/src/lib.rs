//! `mx-agent` — the agent entity and where agents live.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`params`]     | `KindParams` — constant parameter set per `AgentKind`       |
//! | [`agent`]      | `Agent` (kinematics, behavior queue, transport links), `StepReport` |
//! | [`steer`]      | Target seeking: `Steering`, waypoint/target/path/wander precedence |
//! | [`alloc`]      | `IdAllocator` — run-unique agent ids                         |
//! | [`collection`] | `AgentCollection` — one ordered set per kind                 |
//! | [`registry`]   | `AgentRegistry` (one lock per kind), `RegistryGuard`         |
//! | [`snapshot`]   | `AgentSnapshot` — plain copy for hosts and output writers    |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                               |
//!
//! # Units
//!
//! Inside an `Agent` every speed is metres per tick, every force metres per
//! tick², relaxation time is in ticks.  [`KindParams`] stores SI values and
//! converts with the run's `SimClock` when an agent is created.

pub mod agent;
pub mod alloc;
pub mod collection;
pub mod error;
pub mod params;
pub mod registry;
pub mod snapshot;
pub mod steer;


pub use agent::{Agent, StepReport};
pub use alloc::IdAllocator;
pub use collection::AgentCollection;
pub use error::{AgentError, AgentResult};
pub use params::KindParams;
pub use registry::{AgentRegistry, RegistryGuard};
pub use snapshot::AgentSnapshot;
pub use steer::Steering;
