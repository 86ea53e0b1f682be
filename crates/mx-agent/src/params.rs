//! Constant parameter sets, one per agent kind.

use mx_core::{AgentKind, SimClock};

/// Physical constants shared by every agent of one kind.
///
/// Speeds are metres per second and relaxation is seconds; the agent
/// constructor converts both to per-tick units.  `max_force` is already an
/// acceleration bound in metres per tick².
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindParams {
    pub radius:          f64,
    pub max_speed_mps:   f64,
    pub max_force:       f64,
    pub relaxation_secs: f64,
    pub wall_radius:     f64,
    pub wall_magnitude:  f64,
}

impl KindParams {
    /// The built-in table.
    pub const fn for_kind(kind: AgentKind) -> KindParams {
        match kind {
            AgentKind::Pedestrian => KindParams {
                radius:          0.3,
                max_speed_mps:   1.4,
                max_force:       2.0,
                relaxation_secs: 1.0,
                wall_radius:     0.3,
                wall_magnitude:  1.0,
            },
            AgentKind::Bicycle => KindParams {
                radius:          0.5,
                max_speed_mps:   4.0,
                max_force:       3.0,
                relaxation_secs: 1.0,
                wall_radius:     0.5,
                wall_magnitude:  2.0,
            },
            AgentKind::Pod => KindParams {
                radius:          1.0,
                max_speed_mps:   5.0,
                max_force:       2.5,
                relaxation_secs: 1.5,
                wall_radius:     1.0,
                wall_magnitude:  3.0,
            },
            AgentKind::Vehicle => KindParams {
                radius:          1.2,
                max_speed_mps:   8.0,
                max_force:       3.0,
                relaxation_secs: 2.0,
                wall_radius:     1.2,
                wall_magnitude:  3.0,
            },
        }
    }

    #[inline]
    pub fn max_speed_per_tick(&self, clock: &SimClock) -> f64 {
        clock.per_tick(self.max_speed_mps)
    }

    /// Relaxation in ticks, never below one tick.
    #[inline]
    pub fn relaxation_ticks(&self, clock: &SimClock) -> f64 {
        (self.relaxation_secs / clock.tick_length_secs).max(1.0)
    }
}
