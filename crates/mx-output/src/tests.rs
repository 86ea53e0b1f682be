//! Integration tests for mx-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use mx_behavior::AgentState;
    use mx_core::AgentKind;

    use crate::csv::{CsvWriter, SNAPSHOT_HEADER, SUMMARY_HEADER};
    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(agent_id: u64, tick: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            agent_id,
            tick,
            kind:       AgentKind::Pedestrian,
            x:          agent_id as f64,
            y:          2.5,
            heading:    0.0,
            speed:      1.4,
            state:      AgentState::MoveAutonomously,
            passengers: 0,
            carried_by: None,
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            elapsed_secs: tick as f64 * 0.5,
            spawned:      2,
            removed:      1,
            boardings:    0,
            releases:     0,
            purged:       0,
            skipped:      0,
            pedestrians:  4,
            bicycles:     0,
            pods:         3,
            vehicles:     0,
        }
    }

    fn records(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("run").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SNAPSHOT_HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, SUMMARY_HEADER);
    }

    #[test]
    fn csv_snapshot_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let mut carried = snap_row(7, 5);
        carried.state = AgentState::Transported;
        carried.carried_by = Some(3);
        w.write_snapshots(&[snap_row(0, 5), carried]).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("agent_snapshots.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "5");
        assert_eq!(&rows[0][2], "pedestrian");
        assert_eq!(&rows[0][6], "1.400");
        assert_eq!(&rows[0][9], "", "free agents have an empty carried_by");
        assert_eq!(&rows[1][7], "TRANSPORTED");
        assert_eq!(&rows[1][9], "3");
    }

    #[test]
    fn csv_tick_summary_fields() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let rows = records(dir.path().join("tick_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "1.5");
        assert_eq!(&rows[0][2], "2");
        assert_eq!(&rows[0][8], "4"); // pedestrians
        assert_eq!(&rows[0][10], "3"); // pods
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tempfile::TempDir;

    use mx_core::{AgentKind, DVec2, SimConfig, Tick};
    use mx_geometry::{GeometryBuilder, NoPaths, ZoneKind};
    use mx_sim::{SimBuilder, SimObserver, TickSummary};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    fn config(total_ticks: u64, interval: u64) -> SimConfig {
        SimConfig {
            tick_length_secs:      0.5,
            total_ticks,
            seed:                  1,
            num_threads:           Some(1),
            output_interval_ticks: interval,
            wander:                Default::default(),
        }
    }

    /// Records everything it is handed; fails every write once `fail` is set.
    #[derive(Default, Clone)]
    struct Recorder {
        snapshots: Rc<RefCell<Vec<AgentSnapshotRow>>>,
        summaries: Rc<RefCell<Vec<TickSummaryRow>>>,
        finishes:  Rc<RefCell<usize>>,
        fail:      bool,
    }

    impl OutputWriter for Recorder {
        fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.snapshots.borrow_mut().extend_from_slice(rows);
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.summaries.borrow_mut().push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            *self.finishes.borrow_mut() += 1;
            Ok(())
        }
    }

    #[test]
    fn summary_rows_carry_elapsed_time_and_counts() {
        let config = config(4, 0);
        let recorder = Recorder::default();
        let mut obs = SimOutputObserver::new(recorder.clone(), &config);

        let mut summary = TickSummary::new(Tick(2));
        summary.spawned = 3;
        summary.counts[AgentKind::Bicycle.index()] = 5;
        obs.on_tick_end(Tick(2), &summary);

        let rows = recorder.summaries.borrow();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tick, 2);
        assert!((rows[0].elapsed_secs - 1.0).abs() < 1e-12);
        assert_eq!(rows[0].spawned, 3);
        assert_eq!(rows[0].bicycles, 5);
        assert_eq!(rows[0].pedestrians, 0);
    }

    #[test]
    fn first_error_is_kept() {
        let config = config(4, 0);
        let recorder = Recorder { fail: true, ..Recorder::default() };
        let mut obs = SimOutputObserver::new(recorder, &config);
        obs.on_tick_end(Tick(0), &TickSummary::new(Tick(0)));
        obs.on_tick_end(Tick(1), &TickSummary::new(Tick(1)));
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none(), "error is taken once");
    }

    #[test]
    fn run_feeds_writer() {
        let mut b = GeometryBuilder::new();
        b.add_zone(
            "pods",
            ZoneKind::PodRack,
            2,
            &[
                DVec2::new(8.0, 8.0),
                DVec2::new(12.0, 8.0),
                DVec2::new(12.0, 12.0),
                DVec2::new(8.0, 12.0),
            ],
        )
        .unwrap();
        let config = config(6, 2);
        let mut sim = SimBuilder::new(config.clone(), b.build(), NoPaths).build().unwrap();

        let recorder = Recorder::default();
        let mut obs = SimOutputObserver::new(recorder.clone(), &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        // Ticks 0, 2, 4 with two parked pods each.
        let snaps = recorder.snapshots.borrow();
        assert_eq!(snaps.len(), 6);
        assert!(snaps.iter().all(|r| r.kind == AgentKind::Pod && r.carried_by.is_none()));
        assert_eq!(recorder.summaries.borrow().len(), 6);
        assert_eq!(recorder.summaries.borrow()[0].pods, 2);
        assert_eq!(*recorder.finishes.borrow(), 1);
    }

    #[test]
    fn integration_csv() {
        let dir = TempDir::new().unwrap();
        let config = config(6, 3);
        let mut sim = SimBuilder::new(config.clone(), mx_geometry::Geometry::empty(), NoPaths)
            .build()
            .unwrap();
        let handle = sim.handle();
        handle.add_agent(AgentKind::Pedestrian, DVec2::new(1.0, 1.0)).unwrap();
        handle.add_agent(AgentKind::Vehicle, DVec2::new(5.0, 1.0)).unwrap();

        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 3: snapshots at ticks 0 and 3, two agents each.
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4, "expected 2 ticks × 2 agents, got {}", rows.len());

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use mx_behavior::AgentState;
    use mx_core::AgentKind;

    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn row(agent_id: u64, carried_by: Option<u64>) -> AgentSnapshotRow {
        AgentSnapshotRow {
            agent_id,
            tick:       1,
            kind:       AgentKind::Bicycle,
            x:          3.0,
            y:          4.0,
            heading:    1.5,
            speed:      5.0,
            state:      AgentState::TransportOthers,
            passengers: 1,
            carried_by,
        }
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[row(0, None), row(1, None), row(2, Some(0))]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM agent_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_carried_by_nullable() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[row(0, None), row(1, Some(0))]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let free: Option<i64> = conn
            .query_row("SELECT carried_by FROM agent_snapshots WHERE agent_id = 0", [], |r| r.get(0))
            .unwrap();
        let carried: Option<i64> = conn
            .query_row("SELECT carried_by FROM agent_snapshots WHERE agent_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(free, None);
        assert_eq!(carried, Some(0));
    }

    #[test]
    fn sqlite_labels_stored_as_text() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[row(0, None)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (kind, state): (String, String) = conn
            .query_row(
                "SELECT kind, state FROM agent_snapshots WHERE agent_id = 0",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, "bicycle");
        assert_eq!(state, "TRANSPORT_OTHERS");
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick:         7,
            elapsed_secs: 3.5,
            spawned:      1,
            removed:      0,
            boardings:    2,
            releases:     0,
            purged:       0,
            skipped:      0,
            pedestrians:  10,
            bicycles:     1,
            pods:         4,
            vehicles:     0,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, elapsed, boardings, pedestrians): (i64, f64, i64, i64) = conn
            .query_row(
                "SELECT tick, elapsed_secs, boardings, pedestrians FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .unwrap();
        assert_eq!(tick, 7);
        assert!((elapsed - 3.5).abs() < 1e-12);
        assert_eq!(boardings, 2);
        assert_eq!(pedestrians, 10);
    }
}
