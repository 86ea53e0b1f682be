//! CSV loaders.
//!
//! # OD grid
//!
//! No header row.  Cell (0,0) is the period in seconds; the rest of row 0
//! names the exits, the rest of column 0 names the entrances.  Empty cells
//! are absent; a malformed count is logged and skipped.
//!
//! ```csv
//! 60,east,rack-a
//! west,5,
//! north,2.5,1
//! ```
//!
//! # Distribution
//!
//! One row per column of the matrix, cumulative percentages in order:
//!
//! ```csv
//! source,destination,cumulative
//! rack-a,east,70
//! rack-a,rack-b,100
//! ```
//!
//! # Behavior template (path description)
//!
//! One row per waypoint; rows sharing `segment` form one path segment.
//!
//! ```csv
//! segment,x,y,state
//! 0,4.0,2.0,MOVE_TO_PICKUP
//! 1,20.0,8.0,TRANSPORT_OTHERS
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use mx_behavior::{AgentState, BehaviorTemplate};
use mx_core::DVec2;

use crate::{DistributionColumn, DistributionMatrix, OdMatrix, ScheduleError, ScheduleResult};

// ── OD grid ───────────────────────────────────────────────────────────────────

pub fn load_od_csv(path: &Path) -> ScheduleResult<OdMatrix> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_od_reader(file)
}

/// Like [`load_od_csv`] but accepts any `Read` source.
pub fn load_od_reader<R: Read>(reader: R) -> ScheduleResult<OdMatrix> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let header = records
        .next()
        .ok_or_else(|| ScheduleError::Parse("empty OD grid".into()))?
        .map_err(|e| ScheduleError::Parse(e.to_string()))?;

    let period_field = header.get(0).unwrap_or_default();
    let period: f64 = period_field
        .parse()
        .map_err(|_| ScheduleError::Parse(format!("invalid OD period {period_field:?}")))?;
    let exits: Vec<String> = header.iter().skip(1).map(str::to_owned).collect();

    let mut rows: Vec<(String, Vec<String>)> = Vec::new();
    for record in records {
        let record = record.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let Some(entrance) = record.get(0).filter(|s| !s.is_empty()) else {
            continue;
        };
        rows.push((entrance.to_owned(), record.iter().skip(1).map(str::to_owned).collect()));
    }

    let entrances = rows.iter().map(|(e, _)| e.clone()).collect();
    let mut matrix = OdMatrix::new(period, entrances, exits);

    for (r, (entrance, cells)) in rows.iter().enumerate() {
        for (c, raw) in cells.iter().enumerate() {
            if raw.is_empty() {
                continue;
            }
            let count = match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => {
                    warn!(entrance = %entrance, column = c, value = %raw, "malformed OD cell skipped");
                    continue;
                }
            };
            if let Err(e) = matrix.set_count(r, c, count) {
                warn!(entrance = %entrance, error = %e, "OD cell skipped");
            }
        }
    }
    Ok(matrix)
}

// ── Distribution ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DistributionRecord {
    source:      String,
    destination: String,
    cumulative:  f64,
}

pub fn load_distribution_csv(path: &Path) -> ScheduleResult<DistributionMatrix> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_distribution_reader(file)
}

/// Like [`load_distribution_csv`] but accepts any `Read` source.
pub fn load_distribution_reader<R: Read>(reader: R) -> ScheduleResult<DistributionMatrix> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut matrix = DistributionMatrix::new();

    for (line, result) in csv_reader.deserialize::<DistributionRecord>().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line + 2, error = %e, "malformed distribution row skipped");
                continue;
            }
        };
        let column = DistributionColumn {
            destination: row.destination,
            cumulative:  row.cumulative,
            template:    None,
        };
        if let Err(e) = matrix.push_column(&row.source, column) {
            warn!(line = line + 2, error = %e, "distribution column skipped");
        }
    }
    Ok(matrix)
}

// ── Behavior template ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaypointRecord {
    segment: usize,
    x:       f64,
    y:       f64,
    state:   String,
}

pub fn load_template_csv(path: &Path) -> ScheduleResult<BehaviorTemplate> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_template_reader(file)
}

/// Like [`load_template_csv`] but accepts any `Read` source.
pub fn load_template_reader<R: Read>(reader: R) -> ScheduleResult<BehaviorTemplate> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<WaypointRecord>() {
        let r = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let state: AgentState = r.state.parse()?;
        rows.push((r.segment, DVec2::new(r.x, r.y), state));
    }
    Ok(BehaviorTemplate::from_rows(rows)?)
}
