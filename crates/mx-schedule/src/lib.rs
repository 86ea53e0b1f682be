//! `mx-schedule` — when and where agents appear, and where they go next.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                     |
//! |------------------|--------------------------------------------------------------|
//! | [`od`]           | `OdMatrix`, `OdCell`, `Departure` — per-tick departure accumulators |
//! | [`schedule`]     | `DepartureSchedule` — per-kind, activation-time keyed matrices |
//! | [`distribution`] | `DistributionMatrix`, `DistributionSet` — weighted next hops |
//! | [`loader`]       | CSV loaders for OD grids, distributions and behavior templates |
//! | [`error`]        | `ScheduleError`, `ScheduleResult<T>`                         |
//!
//! # Departure model (summary)
//!
//! Each OD cell holds a real-valued pending count `C` to release over the
//! matrix period `P` (seconds).  With tick length `dt`:
//!
//! ```text
//! rate   = C₀ · dt / P           (agents per tick)
//! ready  = rate                  (after prepare)
//! deploy = floor(ready)          (each tick, capped at what is left)
//! ready  = ready − deploy + rate
//! C      = C − deploy
//! ```
//!
//! A matrix whose cells are all at or below zero is dropped from the
//! schedule.

pub mod distribution;
pub mod error;
pub mod loader;
pub mod od;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use distribution::{DistributionColumn, DistributionMatrix, DistributionSet};
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{
    load_distribution_csv, load_distribution_reader, load_od_csv, load_od_reader,
    load_template_csv, load_template_reader,
};
pub use od::{Departure, OdCell, OdMatrix};
pub use schedule::DepartureSchedule;
