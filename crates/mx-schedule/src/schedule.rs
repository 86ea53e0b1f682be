//! The per-kind departure schedule.

use std::collections::BTreeMap;

use tracing::{debug, info};

use mx_core::AgentKind;

use crate::{Departure, OdMatrix, ScheduleResult};

/// For every agent kind, OD matrices keyed by activation time (whole
/// seconds from simulation start).
#[derive(Clone, Debug, Default)]
pub struct DepartureSchedule {
    by_kind: [BTreeMap<u64, Vec<OdMatrix>>; AgentKind::COUNT],
}

impl DepartureSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `matrix` for `kind`, active from `activation_secs` on.
    pub fn add(&mut self, kind: AgentKind, activation_secs: u64, matrix: OdMatrix) {
        self.by_kind[kind.index()].entry(activation_secs).or_default().push(matrix);
    }

    /// Fix rates for every matrix.  Fails on the first bad period.
    pub fn prepare(&mut self, tick_length_secs: f64) -> ScheduleResult<()> {
        for matrices in self.by_kind.iter_mut().flat_map(|m| m.values_mut()) {
            for m in matrices {
                m.prepare(tick_length_secs)?;
            }
        }
        let total: usize = AgentKind::ALL.iter().map(|&k| self.matrix_count(k)).sum();
        info!(matrices = total, "departure schedule prepared");
        Ok(())
    }

    pub fn matrix_count(&self, kind: AgentKind) -> usize {
        self.by_kind[kind.index()].values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.iter().all(BTreeMap::is_empty)
    }

    /// Step every matrix active at `elapsed_secs` and collect the departures,
    /// in kind order.  Exhausted matrices are removed.
    pub fn due(&mut self, elapsed_secs: f64) -> Vec<(AgentKind, Departure)> {
        let mut out = Vec::new();
        for kind in AgentKind::ALL {
            let schedule = &mut self.by_kind[kind.index()];
            for (&at, matrices) in schedule.iter_mut() {
                if at as f64 > elapsed_secs {
                    break;
                }
                for m in matrices.iter_mut() {
                    out.extend(m.step().into_iter().map(|d| (kind, d)));
                }
                let before = matrices.len();
                matrices.retain(|m| !m.is_exhausted());
                if matrices.len() < before {
                    debug!(%kind, activation = at, removed = before - matrices.len(), "OD matrix exhausted");
                }
            }
            schedule.retain(|_, ms| !ms.is_empty());
        }
        out
    }
}
