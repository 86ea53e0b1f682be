//! Social-force parameters per ordered pair of agent kinds.

use tracing::debug;

use mx_agent::KindParams;
use mx_core::AgentKind;

/// Interaction constants for "an agent of kind X reacting to kind Y".
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceParams {
    /// Interaction strength `A` (metres per tick²).
    pub strength:               f64,
    /// Interaction range `B` (metres).
    pub range:                  f64,
    /// Anisotropy `λ ∈ [0, 1]`; 1 is isotropic.
    pub lambda:                 f64,
    /// One pairwise contribution is capped at this multiple of the reacting
    /// agent's `max_force`.
    pub max_velocity_factor:    f64,
    /// Neighbors further than this (metres) are ignored.
    pub max_influence_distance: f64,
}

impl ForceParams {
    /// Built-in constants for `me` reacting to `other`.
    ///
    /// Range and influence grow with the sizes involved; pedestrians are the
    /// most anisotropic.
    pub fn default_pair(me: AgentKind, other: AgentKind) -> ForceParams {
        let r_me = KindParams::for_kind(me).radius;
        let r_other = KindParams::for_kind(other).radius;
        ForceParams {
            strength:               2.0,
            range:                  0.2 + 0.3 * r_other,
            lambda:                 if me == AgentKind::Pedestrian { 0.35 } else { 0.6 },
            max_velocity_factor:    1.0,
            max_influence_distance: 3.0 + 2.0 * (r_me + r_other),
        }
    }
}

/// The full `ALL × ALL` cross product of [`ForceParams`], indexed
/// `[reacting kind][source kind]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocialForceTable {
    pairs: [[ForceParams; AgentKind::COUNT]; AgentKind::COUNT],
}

impl Default for SocialForceTable {
    fn default() -> Self {
        Self::default_for_registry()
    }
}

impl SocialForceTable {
    /// Built by iterating the kind registry once.
    pub fn default_for_registry() -> Self {
        let pairs = AgentKind::ALL.map(|me| AgentKind::ALL.map(|other| ForceParams::default_pair(me, other)));
        debug!(pairs = AgentKind::COUNT * AgentKind::COUNT, "social force table built");
        Self { pairs }
    }

    /// Same parameters for every pair.
    pub fn uniform(params: ForceParams) -> Self {
        Self { pairs: [[params; AgentKind::COUNT]; AgentKind::COUNT] }
    }

    #[inline]
    pub fn get(&self, me: AgentKind, other: AgentKind) -> &ForceParams {
        &self.pairs[me.index()][other.index()]
    }

    pub fn set(&mut self, me: AgentKind, other: AgentKind, params: ForceParams) {
        self.pairs[me.index()][other.index()] = params;
    }
}
