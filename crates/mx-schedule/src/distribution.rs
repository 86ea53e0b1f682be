//! Transition distribution matrices.
//!
//! Rows are source zone names.  Each row lists destination columns with a
//! cumulative percentage; one uniform draw in `[0, 100]` picks the first
//! column whose cumulative value reaches it.

use std::collections::BTreeMap;

use mx_behavior::BehaviorTemplate;
use mx_core::AgentKind;

use crate::{ScheduleError, ScheduleResult};

/// Tolerance on the last cumulative value reaching 100.
const PERCENT_EPS: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct DistributionColumn {
    /// Crossing or zone name.
    pub destination: String,
    /// Cumulative percentage in `[0, 100]`.
    pub cumulative:  f64,
    /// Behavior to clone when this column is chosen.
    pub template:    Option<BehaviorTemplate>,
}

#[derive(Clone, Debug, Default)]
pub struct DistributionMatrix {
    rows: BTreeMap<String, Vec<DistributionColumn>>,
}

impl DistributionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace row `source`.  Cumulative values must not decrease and
    /// must stay within `[0, 100]`.
    pub fn insert_row(&mut self, source: &str, columns: Vec<DistributionColumn>) -> ScheduleResult<()> {
        let mut prev = 0.0;
        for c in &columns {
            if !c.cumulative.is_finite() || c.cumulative < prev || c.cumulative > 100.0 + PERCENT_EPS {
                return Err(ScheduleError::NotCumulative(source.to_owned()));
            }
            prev = c.cumulative;
        }
        self.rows.insert(source.to_owned(), columns);
        Ok(())
    }

    /// Append one column to row `source` (created if missing).
    pub fn push_column(&mut self, source: &str, column: DistributionColumn) -> ScheduleResult<()> {
        let row = self.rows.entry(source.to_owned()).or_default();
        let prev = row.last().map_or(0.0, |c| c.cumulative);
        if !column.cumulative.is_finite()
            || column.cumulative < prev
            || column.cumulative > 100.0 + PERCENT_EPS
        {
            return Err(ScheduleError::NotCumulative(source.to_owned()));
        }
        row.push(column);
        Ok(())
    }

    /// Attach `template` to the column of `source` leading to `destination`.
    pub fn set_template(&mut self, source: &str, destination: &str, template: BehaviorTemplate) -> ScheduleResult<()> {
        let row = self
            .rows
            .get_mut(source)
            .ok_or_else(|| ScheduleError::RowNotFound(source.to_owned()))?;
        let col = row
            .iter_mut()
            .find(|c| c.destination == destination)
            .ok_or_else(|| ScheduleError::UnknownColumn {
                row:         source.to_owned(),
                destination: destination.to_owned(),
            })?;
        col.template = Some(template);
        Ok(())
    }

    pub fn row(&self, source: &str) -> Option<&[DistributionColumn]> {
        self.rows.get(source).map(Vec::as_slice)
    }

    pub fn row_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column `draw ∈ [0, 100]` selects in row `source`.
    pub fn choose(&self, source: &str, draw: f64) -> ScheduleResult<&DistributionColumn> {
        let row = self
            .rows
            .get(source)
            .ok_or_else(|| ScheduleError::RowNotFound(source.to_owned()))?;
        row.iter()
            .find(|c| draw <= c.cumulative && c.cumulative > 0.0)
            .ok_or_else(|| ScheduleError::NoColumn { row: source.to_owned(), draw })
    }
}

/// One distribution matrix per agent kind.
#[derive(Clone, Debug, Default)]
pub struct DistributionSet {
    by_kind: [DistributionMatrix; AgentKind::COUNT],
}

impl DistributionSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, kind: AgentKind) -> &DistributionMatrix {
        &self.by_kind[kind.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, kind: AgentKind) -> &mut DistributionMatrix {
        &mut self.by_kind[kind.index()]
    }

    pub fn set(&mut self, kind: AgentKind, matrix: DistributionMatrix) {
        self.by_kind[kind.index()] = matrix;
    }
}
