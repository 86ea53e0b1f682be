//! Unit tests for mx-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ZoneId};

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(ZoneId(100) > ZoneId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u64::MAX);
        assert_eq!(ZoneId::INVALID.0, u32::MAX);
        assert!(!AgentId::default().is_valid());
        assert!(AgentId(3).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ZoneId(2).index(), 2);
    }
}

#[cfg(test)]
mod vector {
    use crate::vector::{cos_angle, heading_of, is_finite, lift, planar, unit_from_heading};
    use crate::{DVec2, DVec3};

    #[test]
    fn planar_drops_z() {
        let v = DVec3::new(1.0, 2.0, 5.0);
        assert_eq!(planar(v), DVec2::new(1.0, 2.0));
        assert_eq!(lift(DVec2::new(1.0, 2.0)).z, 0.0);
    }

    #[test]
    fn heading_of_zero_is_none() {
        assert!(heading_of(DVec3::ZERO).is_none());
        let h = heading_of(DVec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!((h - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn heading_roundtrip() {
        let u = unit_from_heading(0.3);
        assert!((heading_of(u).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn cos_angle_cases() {
        let x = DVec3::X;
        assert!((cos_angle(x, x).unwrap() - 1.0).abs() < 1e-12);
        assert!((cos_angle(x, -x).unwrap() + 1.0).abs() < 1e-12);
        assert!(cos_angle(x, DVec3::ZERO).is_none());
    }

    #[test]
    fn finite_check() {
        assert!(is_finite(DVec3::ONE));
        assert!(!is_finite(DVec3::new(f64::NAN, 0.0, 0.0)));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(10)), 0);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(0.5);
        assert_eq!(clock.elapsed_secs(), 0.0);
        clock.advance();
        clock.advance();
        clock.advance();
        assert!((clock.elapsed_secs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn clock_hms() {
        let mut clock = SimClock::new(60.0);
        for _ in 0..61 {
            clock.advance();
        }
        assert_eq!(clock.elapsed_hms(), (1, 1, 0));
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(0.5);
        assert_eq!(clock.ticks_for_secs(1.0), 2);
        assert_eq!(clock.ticks_for_secs(1.1), 3);
    }

    #[test]
    fn per_tick_speed() {
        let clock = SimClock::new(0.5);
        assert!((clock.per_tick(1.4) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn config_validation() {
        let mut cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.end_tick(), Tick(cfg.total_ticks));
        cfg.tick_length_secs = 0.0;
        assert!(cfg.validate().is_err());
        cfg.tick_length_secs = f64::NAN;
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn percent_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            let p = rng.percent();
            assert!((0.0..=100.0).contains(&p));
            let s = rng.signed_unit();
            assert!((-1.0..=1.0).contains(&s));
        }
    }
}

#[cfg(test)]
mod kind {
    use crate::{AgentKind, ErrorClass, MxError};

    #[test]
    fn registry_order_matches_index() {
        for (i, kind) in AgentKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(AgentKind::COUNT, 4);
    }

    #[test]
    fn carriers() {
        assert!(AgentKind::Pod.is_carrier());
        assert!(AgentKind::Bicycle.is_carrier());
        assert!(!AgentKind::Pedestrian.is_carrier());
        assert!(!AgentKind::Vehicle.is_carrier());
    }

    #[test]
    fn parse_labels() {
        assert_eq!("bike".parse::<AgentKind>().unwrap(), AgentKind::Bicycle);
        assert_eq!(" Pod ".parse::<AgentKind>().unwrap(), AgentKind::Pod);
        let err = "tram".parse::<AgentKind>().unwrap_err();
        assert_eq!(err.class(), ErrorClass::Data);
        assert_eq!(AgentKind::Vehicle.to_string(), "vehicle");
    }

    #[test]
    fn error_classes() {
        assert_eq!(MxError::Config("x".into()).class(), ErrorClass::Setup);
        assert!(!ErrorClass::Setup.is_recoverable());
        assert!(ErrorClass::Agent.is_recoverable());
    }
}
