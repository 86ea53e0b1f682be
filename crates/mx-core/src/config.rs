//! Top-level simulation configuration.

use crate::{MxError, MxResult, SimClock, Tick};

/// Parameters of the random-wander fallback used by agents that have
/// neither a target nor a behavior queue.
///
/// The wander point lies on a circle of `radius` whose centre sits
/// `distance` metres ahead of the agent; each call jitters the angle on
/// that circle by up to ±`jitter` radians.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WanderConfig {
    pub distance: f64,
    pub radius:   f64,
    pub jitter:   f64,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self { distance: 2.0, radius: 1.0, jitter: 0.5 }
    }
}

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed
/// to `mx_sim::SimBuilder`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated seconds per tick.
    pub tick_length_secs: f64,

    /// Total ticks to simulate with `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the `parallel` feature.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,

    /// Report a snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Random-wander parameters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wander: WanderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_length_secs:      1.0,
            total_ticks:           3_600,
            seed:                  42,
            num_threads:           None,
            output_interval_ticks: 1,
            wander:                WanderConfig::default(),
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_length_secs)
    }

    /// Setup-time sanity checks.
    pub fn validate(&self) -> MxResult<()> {
        if !self.tick_length_secs.is_finite() || self.tick_length_secs <= 0.0 {
            return Err(MxError::Config(format!(
                "tick_length_secs must be positive, got {}",
                self.tick_length_secs
            )));
        }
        if self.wander.radius < 0.0 || self.wander.distance < 0.0 {
            return Err(MxError::Config("wander radius/distance must be non-negative".into()));
        }
        Ok(())
    }
}
