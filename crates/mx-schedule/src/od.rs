//! Origin-destination matrices.
//!
//! A matrix is a sparse grid: row labels are entrances, column labels are
//! exits (crossing or zone names), each populated cell holds how many agents
//! still have to leave over the matrix period.

use std::collections::BTreeMap;

use mx_behavior::BehaviorTemplate;

use crate::{ScheduleError, ScheduleResult};

/// Slack on the accumulator floor so that `12 × (5/60)` still deploys one.
const READY_EPS: f64 = 1e-9;

// ── OdCell ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct OdCell {
    /// Pending departures (real-valued).
    pub count:    f64,
    /// Departures per tick, fixed by [`OdMatrix::prepare`].
    pub rate:     f64,
    /// Fractional accumulator; whole agents leave when it reaches 1.
    pub ready:    f64,
    pub template: Option<BehaviorTemplate>,
    /// Display colour, passed through to output.
    pub color:    Option<[u8; 3]>,
}

impl OdCell {
    fn new(count: f64) -> Self {
        Self { count, rate: 0.0, ready: 0.0, template: None, color: None }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.count > 0.0
    }
}

// ── Departure ─────────────────────────────────────────────────────────────────

/// "Release `count` agents at `entrance` heading for `exit`."
#[derive(Clone, Debug)]
pub struct Departure {
    pub entrance: String,
    pub exit:     String,
    pub count:    u32,
    pub template: Option<BehaviorTemplate>,
}

// ── OdMatrix ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct OdMatrix {
    period_secs: f64,
    entrances:   Vec<String>,
    exits:       Vec<String>,
    cells:       BTreeMap<(usize, usize), OdCell>,
}

impl OdMatrix {
    pub fn new(period_secs: f64, entrances: Vec<String>, exits: Vec<String>) -> Self {
        Self { period_secs, entrances, exits, cells: BTreeMap::new() }
    }

    #[inline]
    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }

    pub fn entrances(&self) -> &[String] {
        &self.entrances
    }

    pub fn exits(&self) -> &[String] {
        &self.exits
    }

    fn check(&self, row: usize, col: usize) -> ScheduleResult<()> {
        if row >= self.entrances.len() || col >= self.exits.len() {
            return Err(ScheduleError::CellOutOfRange { row, col });
        }
        Ok(())
    }

    /// Set the pending count of cell `(row, col)` (0-based entrance/exit).
    pub fn set_count(&mut self, row: usize, col: usize, count: f64) -> ScheduleResult<()> {
        self.check(row, col)?;
        self.cells
            .entry((row, col))
            .and_modify(|c| c.count = count)
            .or_insert_with(|| OdCell::new(count));
        Ok(())
    }

    pub fn set_template(&mut self, row: usize, col: usize, template: BehaviorTemplate) -> ScheduleResult<()> {
        self.check(row, col)?;
        self.cells.entry((row, col)).or_insert_with(|| OdCell::new(0.0)).template = Some(template);
        Ok(())
    }

    pub fn set_color(&mut self, row: usize, col: usize, color: [u8; 3]) -> ScheduleResult<()> {
        self.check(row, col)?;
        self.cells.entry((row, col)).or_insert_with(|| OdCell::new(0.0)).color = Some(color);
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&OdCell> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &OdCell)> + '_ {
        self.cells.iter().map(|(&k, c)| (k, c))
    }

    /// Sum of all positive pending counts.
    pub fn total_pending(&self) -> f64 {
        self.cells.values().filter(|c| c.is_pending()).map(|c| c.count).sum()
    }

    /// Fix per-tick rates for `tick_length_secs` and prime the accumulators.
    ///
    /// A non-positive period is a setup error.
    pub fn prepare(&mut self, tick_length_secs: f64) -> ScheduleResult<()> {
        if !self.period_secs.is_finite() || self.period_secs <= 0.0 {
            return Err(ScheduleError::ZeroPeriod(self.period_secs));
        }
        for cell in self.cells.values_mut() {
            cell.rate = cell.count.max(0.0) * tick_length_secs / self.period_secs;
            cell.ready = cell.rate;
        }
        Ok(())
    }

    /// Advance every pending cell by one tick and return what leaves now.
    pub fn step(&mut self) -> Vec<Departure> {
        let mut out = Vec::new();
        for (&(row, col), cell) in self.cells.iter_mut() {
            if !cell.is_pending() {
                continue;
            }
            let deploy = (cell.ready + READY_EPS).floor().max(0.0).min(cell.count.ceil());
            cell.ready = cell.ready - deploy + cell.rate;
            cell.count -= deploy;
            if deploy >= 1.0 {
                out.push(Departure {
                    entrance: self.entrances[row].clone(),
                    exit:     self.exits[col].clone(),
                    count:    deploy as u32,
                    template: cell.template.clone(),
                });
            }
        }
        out
    }

    /// `true` once no cell has anything left to release.
    pub fn is_exhausted(&self) -> bool {
        self.cells.values().all(|c| !c.is_pending())
    }
}
