//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id   INTEGER NOT NULL,
                 tick       INTEGER NOT NULL,
                 kind       TEXT    NOT NULL,
                 x          REAL    NOT NULL,
                 y          REAL    NOT NULL,
                 heading    REAL    NOT NULL,
                 speed      REAL    NOT NULL,
                 state      TEXT    NOT NULL,
                 passengers INTEGER NOT NULL,
                 carried_by INTEGER
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick         INTEGER PRIMARY KEY,
                 elapsed_secs REAL    NOT NULL,
                 spawned      INTEGER NOT NULL,
                 removed      INTEGER NOT NULL,
                 boardings    INTEGER NOT NULL,
                 releases     INTEGER NOT NULL,
                 purged       INTEGER NOT NULL,
                 skipped      INTEGER NOT NULL,
                 pedestrians  INTEGER NOT NULL,
                 bicycles     INTEGER NOT NULL,
                 pods         INTEGER NOT NULL,
                 vehicles     INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, kind, x, y, heading, speed, state, passengers, carried_by) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id as i64,
                    row.tick as i64,
                    row.kind.as_str(),
                    row.x,
                    row.y,
                    row.heading,
                    row.speed,
                    row.state.as_str(),
                    row.passengers,
                    row.carried_by.map(|c| c as i64),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, elapsed_secs, spawned, removed, boardings, releases, purged, skipped, \
              pedestrians, bicycles, pods, vehicles) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                row.tick as i64,
                row.elapsed_secs,
                row.spawned as i64,
                row.removed as i64,
                row.boardings as i64,
                row.releases as i64,
                row.purged as i64,
                row.skipped as i64,
                row.pedestrians as i64,
                row.bicycles as i64,
                row.pods as i64,
                row.vehicles as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
