//! Unit tests for mx-schedule.

use mx_core::AgentKind;

use crate::{DistributionColumn, DistributionMatrix, OdMatrix};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

/// One cell (west → east) with `count` agents over `period` seconds.
fn single_cell(count: f64, period: f64) -> OdMatrix {
    let mut m = OdMatrix::new(period, names(&["west"]), names(&["east"]));
    m.set_count(0, 0, count).unwrap();
    m
}

fn col(dest: &str, cumulative: f64) -> DistributionColumn {
    DistributionColumn { destination: dest.to_owned(), cumulative, template: None }
}

// ── OdMatrix ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod od_matrix {
    use super::*;
    use crate::ScheduleError;
    use mx_core::ErrorClass;

    #[test]
    fn rate_per_tick() {
        let mut m = single_cell(5.0, 60.0);
        m.prepare(1.0).unwrap();
        let c = m.cell(0, 0).unwrap();
        assert!((c.rate - 5.0 / 60.0).abs() < 1e-12);
        assert!((c.ready - c.rate).abs() < 1e-12);
    }

    #[test]
    fn first_departure_on_twelfth_tick() {
        let mut m = single_cell(5.0, 60.0);
        m.prepare(1.0).unwrap();
        let mut spawned = 0;
        for _ in 0..11 {
            spawned += m.step().iter().map(|d| d.count).sum::<u32>();
        }
        assert_eq!(spawned, 0);
        assert!((m.cell(0, 0).unwrap().ready - 1.0).abs() < 1e-9);

        let d = m.step();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].count, 1);
        assert_eq!(d[0].entrance, "west");
        assert_eq!(d[0].exit, "east");
    }

    #[test]
    fn conservation_then_exhaustion() {
        let mut m = single_cell(5.0, 60.0);
        m.prepare(1.0).unwrap();
        let mut spawned = 0;
        let mut last = f64::INFINITY;
        let mut ticks = 0;
        while !m.is_exhausted() {
            spawned += m.step().iter().map(|d| d.count).sum::<u32>();
            let now = m.cell(0, 0).unwrap().count;
            assert!(now <= last);
            last = now;
            ticks += 1;
            assert!(ticks <= 61, "matrix never exhausted");
        }
        assert_eq!(spawned, 5);
        assert!(m.cell(0, 0).unwrap().count <= 0.0);
    }

    #[test]
    fn fractional_count_still_drains() {
        let mut m = single_cell(2.5, 10.0);
        m.prepare(1.0).unwrap();
        let mut spawned = 0;
        for _ in 0..20 {
            spawned += m.step().iter().map(|d| d.count).sum::<u32>();
        }
        assert!(m.is_exhausted());
        assert_eq!(spawned, 3);
    }

    #[test]
    fn burst_when_rate_exceeds_one() {
        let mut m = single_cell(10.0, 2.0);
        m.prepare(1.0).unwrap();
        let d = m.step();
        assert_eq!(d[0].count, 5);
        let d = m.step();
        assert_eq!(d[0].count, 5);
        assert!(m.is_exhausted());
    }

    #[test]
    fn zero_period_is_setup_error() {
        let mut m = single_cell(5.0, 0.0);
        let err = m.prepare(1.0).unwrap_err();
        assert!(matches!(err, ScheduleError::ZeroPeriod(_)));
        assert_eq!(err.class(), ErrorClass::Setup);
    }

    #[test]
    fn cells_outside_grid_rejected() {
        let mut m = single_cell(1.0, 10.0);
        assert!(matches!(
            m.set_count(3, 0, 1.0).unwrap_err(),
            ScheduleError::CellOutOfRange { row: 3, col: 0 }
        ));
    }

    #[test]
    fn non_positive_cells_are_idle() {
        let mut m = OdMatrix::new(10.0, names(&["a"]), names(&["b", "c"]));
        m.set_count(0, 0, 0.0).unwrap();
        m.set_count(0, 1, -2.0).unwrap();
        m.prepare(1.0).unwrap();
        assert!(m.is_exhausted());
        assert!(m.step().is_empty());
        assert_eq!(m.total_pending(), 0.0);
    }

    #[test]
    fn template_travels_with_departure() {
        use mx_behavior::{AgentState, BehaviorTemplate};
        use mx_core::DVec2;

        let mut m = single_cell(1.0, 1.0);
        let t = BehaviorTemplate::direct(AgentState::MoveAutonomously, [DVec2::new(1.0, 1.0)]).unwrap();
        m.set_template(0, 0, t.clone()).unwrap();
        m.set_color(0, 0, [255, 0, 0]).unwrap();
        m.prepare(1.0).unwrap();
        let d = m.step();
        assert_eq!(d[0].template.as_ref(), Some(&t));
        assert_eq!(m.cell(0, 0).unwrap().color, Some([255, 0, 0]));
    }
}

// ── DepartureSchedule ─────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;
    use crate::DepartureSchedule;

    #[test]
    fn inactive_until_activation_time() {
        let mut s = DepartureSchedule::new();
        s.add(AgentKind::Pedestrian, 10, single_cell(1.0, 1.0));
        s.prepare(1.0).unwrap();
        assert!(s.due(9.0).is_empty());
        let d = s.due(10.0);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].0, AgentKind::Pedestrian);
    }

    #[test]
    fn exhausted_matrices_are_removed() {
        let mut s = DepartureSchedule::new();
        s.add(AgentKind::Bicycle, 0, single_cell(1.0, 1.0));
        s.add(AgentKind::Bicycle, 0, single_cell(2.0, 2.0));
        s.prepare(1.0).unwrap();
        assert_eq!(s.matrix_count(AgentKind::Bicycle), 2);
        s.due(0.0);
        assert_eq!(s.matrix_count(AgentKind::Bicycle), 1);
        s.due(1.0);
        assert!(s.is_empty());
    }

    #[test]
    fn departures_come_out_in_kind_order() {
        let mut s = DepartureSchedule::new();
        s.add(AgentKind::Pod, 0, single_cell(1.0, 1.0));
        s.add(AgentKind::Pedestrian, 0, single_cell(1.0, 1.0));
        s.prepare(1.0).unwrap();
        let kinds: Vec<AgentKind> = s.due(0.0).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![AgentKind::Pedestrian, AgentKind::Pod]);
    }

    #[test]
    fn bad_period_fails_prepare() {
        let mut s = DepartureSchedule::new();
        s.add(AgentKind::Pedestrian, 0, single_cell(1.0, -5.0));
        assert!(s.prepare(1.0).is_err());
    }
}

// ── DistributionMatrix ────────────────────────────────────────────────────────

#[cfg(test)]
mod distribution {
    use super::*;
    use crate::{DistributionSet, ScheduleError};

    fn rack_row() -> DistributionMatrix {
        let mut m = DistributionMatrix::new();
        m.insert_row("rack-a", vec![col("east", 30.0), col("rack-b", 100.0)]).unwrap();
        m
    }

    #[test]
    fn cumulative_selection() {
        let m = rack_row();
        assert_eq!(m.choose("rack-a", 0.0).unwrap().destination, "east");
        assert_eq!(m.choose("rack-a", 30.0).unwrap().destination, "east");
        assert_eq!(m.choose("rack-a", 30.1).unwrap().destination, "rack-b");
        assert_eq!(m.choose("rack-a", 100.0).unwrap().destination, "rack-b");
    }

    #[test]
    fn zero_width_leading_column_never_chosen() {
        let mut m = DistributionMatrix::new();
        m.insert_row("z", vec![col("never", 0.0), col("always", 100.0)]).unwrap();
        assert_eq!(m.choose("z", 0.0).unwrap().destination, "always");
    }

    #[test]
    fn missing_row_and_uncovered_draw() {
        let mut m = DistributionMatrix::new();
        m.insert_row("short", vec![col("x", 40.0)]).unwrap();
        assert!(matches!(m.choose("nope", 5.0).unwrap_err(), ScheduleError::RowNotFound(_)));
        assert!(matches!(m.choose("short", 50.0).unwrap_err(), ScheduleError::NoColumn { .. }));
    }

    #[test]
    fn decreasing_row_rejected() {
        let mut m = DistributionMatrix::new();
        let err = m.insert_row("bad", vec![col("a", 60.0), col("b", 40.0)]).unwrap_err();
        assert!(matches!(err, ScheduleError::NotCumulative(_)));
        assert!(m.row("bad").is_none());
    }

    #[test]
    fn set_template_on_known_column() {
        use mx_behavior::{AgentState, BehaviorTemplate};
        use mx_core::DVec2;

        let mut m = rack_row();
        let t = BehaviorTemplate::direct(AgentState::TransportOthers, [DVec2::new(9.0, 9.0)]).unwrap();
        m.set_template("rack-a", "rack-b", t).unwrap();
        assert!(m.choose("rack-a", 99.0).unwrap().template.is_some());
        assert!(m.set_template("rack-a", "moon", BehaviorTemplate::direct(
            AgentState::TransportOthers, [DVec2::ZERO]).unwrap()).is_err());
    }

    #[test]
    fn set_is_per_kind() {
        let mut s = DistributionSet::new();
        s.set(AgentKind::Pod, rack_row());
        assert!(!s.get(AgentKind::Pod).is_empty());
        assert!(s.get(AgentKind::Pedestrian).is_empty());
        s.get_mut(AgentKind::Pedestrian).insert_row("r", vec![col("e", 100.0)]).unwrap();
        assert_eq!(s.get(AgentKind::Pedestrian).row_names().collect::<Vec<_>>(), vec!["r"]);
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::{ScheduleError, load_distribution_reader, load_od_reader, load_template_reader};
    use mx_behavior::AgentState;

    const OD: &str = "\
60,east,rack-a
west,5,
north,2.5,oops
";

    #[test]
    fn od_grid_labels_and_counts() {
        let m = load_od_reader(Cursor::new(OD)).unwrap();
        assert_eq!(m.period_secs(), 60.0);
        assert_eq!(m.entrances(), &["west".to_string(), "north".to_string()]);
        assert_eq!(m.exits(), &["east".to_string(), "rack-a".to_string()]);
        assert_eq!(m.cell(0, 0).unwrap().count, 5.0);
        assert!(m.cell(0, 1).is_none());
        assert_eq!(m.cell(1, 0).unwrap().count, 2.5);
    }

    #[test]
    fn malformed_cell_is_skipped() {
        let m = load_od_reader(Cursor::new(OD)).unwrap();
        assert!(m.cell(1, 1).is_none());
        assert_eq!(m.cells().count(), 2);
    }

    #[test]
    fn bad_period_is_parse_error() {
        let err = load_od_reader(Cursor::new("soon,east\nwest,1\n")).unwrap_err();
        assert!(matches!(err, ScheduleError::Parse(_)));
    }

    #[test]
    fn empty_grid_is_parse_error() {
        assert!(load_od_reader(Cursor::new("")).is_err());
    }

    #[test]
    fn distribution_rows() {
        let csv = "source,destination,cumulative\nrack-a,east,70\nrack-a,rack-b,100\nrack-b,west,abc\n";
        let m = load_distribution_reader(Cursor::new(csv)).unwrap();
        assert_eq!(m.row("rack-a").unwrap().len(), 2);
        assert!(m.row("rack-b").is_none());
        assert_eq!(m.choose("rack-a", 71.0).unwrap().destination, "rack-b");
    }

    #[test]
    fn template_rows() {
        let csv = "segment,x,y,state\n0,1.0,0.0,MOVE_TO_PICKUP\n0,2.0,0.0,MOVE_TO_PICKUP\n1,9.0,9.0,TRANSPORT_OTHERS\n";
        let t = load_template_reader(Cursor::new(csv)).unwrap();
        assert_eq!(t.segments().len(), 2);
        assert_eq!(t.segments()[1].state, AgentState::TransportOthers);
    }

    #[test]
    fn template_unknown_state() {
        let csv = "segment,x,y,state\n0,1.0,0.0,TELEPORT\n";
        let err = load_template_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ScheduleError::Template(_)));
    }
}
