//! `mx-sim` — tick orchestrator for the mixsim traffic microsimulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Departures  — step every active OD matrix; each departure becomes a
//!                   SpawnRequest and is dispatched into the registry.
//!   ② Zone upkeep — purge racks holding more than capacity + PURGE_MARGIN
//!                   carriers, then fill every rack up to capacity.
//!   ③ Movement    — per kind, in AgentKind::ALL order:
//!                     steer (sequential, draws from SimRng),
//!                     forces against a frozen neighbor index
//!                       (parallel with the `parallel` feature),
//!                     integrate (sequential).
//!   ④ Arrivals    — pedestrians at a zone start waiting, carriers at a
//!                   zone park, everyone else is removed with passengers.
//!   ⑤ Mode switch — waiting pedestrians board parked carriers, parked
//!                   carriers release their passengers, racks are purged.
//!   ⑥ Propagate   — every passenger takes its carrier's position.
//! ```
//!
//! Kinds are stepped group by group, so a later kind sees the positions an
//! earlier kind moved to in the same tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Force evaluation runs on Rayon's thread pool.          |
//! | `fx-hash`  | FxHash for the per-tick passenger maps.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mx_core::SimConfig;
//! use mx_geometry::{GeometryBuilder, StraightLine};
//! use mx_sim::{NoopObserver, SimBuilder};
//!
//! let geometry = GeometryBuilder::new().build();
//! let mut sim = SimBuilder::new(SimConfig::default(), geometry, StraightLine)
//!     .schedule(schedule)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod handle;
pub mod observer;
pub mod sim;
pub mod spawn;
pub mod summary;
mod zones;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use handle::SimHandle;
pub use observer::{ChannelObserver, NoopObserver, SimObserver};
pub use sim::Sim;
pub use spawn::SpawnRequest;
pub use summary::TickSummary;
