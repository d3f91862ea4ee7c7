//! Unit tests for sf-core.

#[cfg(test)]
mod geo {
    use crate::geo::{sat_overlap, segment_intersects_rect, Rect, Segment, Vec2};

    #[test]
    fn overlapping_rects() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(5.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(sat_overlap(a, b));
    }

    #[test]
    fn non_overlapping_rects() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(100.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!sat_overlap(a, b));
    }

    #[test]
    fn touching_rects_overlap_within_epsilon() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(sat_overlap(a, b));
    }

    #[test]
    fn contains_point() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(r.contains_point(Vec2::new(5.0, 5.0)));
        assert!(!r.contains_point(Vec2::new(6.0, 0.0)));
    }

    #[test]
    fn segment_crosses_rect() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let seg = Segment::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(segment_intersects_rect(seg, r));
    }

    #[test]
    fn segment_misses_rect() {
        let r = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let seg = Segment::new(Vec2::new(-10.0, 100.0), Vec2::new(10.0, 100.0));
        assert!(!segment_intersects_rect(seg, r));
    }

    #[test]
    fn vec2_clamp_length() {
        let v = Vec2::new(3.0, 4.0); // length 5
        let clamped = v.clamp_length(2.0);
        assert!((clamped.length() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn manhattan_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.manhattan_distance(b), 7.0);
    }
}

#[cfg(test)]
mod ids {
    use crate::ids::MoverId;

    #[test]
    fn default_is_invalid() {
        assert_eq!(MoverId::default(), MoverId::INVALID);
    }

    #[test]
    fn index_roundtrip() {
        let id = MoverId(3);
        assert_eq!(id.index(), 3);
    }
}

#[cfg(test)]
mod interaction {
    use crate::Interaction;

    #[test]
    fn roundtrip_all_variants() {
        for i in Interaction::ALL {
            let url = i.to_url();
            let back = Interaction::from_url(url).unwrap();
            assert_eq!(i, back);
        }
    }

    #[test]
    fn decode_is_case_insensitive() {
        let url = Interaction::Transport.to_url();
        let upper = url.to_ascii_uppercase();
        assert_eq!(Interaction::from_url(&upper).unwrap(), Interaction::Transport);
    }

    #[test]
    fn unknown_url_rejected() {
        assert!(Interaction::from_url("https://example.com/not-real").is_err());
    }
}

#[cfg(test)]
mod time {
    use crate::time::{EngineClock, EngineConfig, Tick};

    #[test]
    fn clock_starts_paused() {
        let clock = EngineClock::new();
        assert!(clock.paused);
        assert_eq!(clock.current_tick, Tick::ZERO);
    }

    #[test]
    fn advance_is_monotonic() {
        let mut clock = EngineClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
    }

    #[test]
    fn default_config_matches_spec_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.heatmap_threshold, 3);
        assert_eq!(cfg.bezier_segments_per_corner, 5);
        assert_eq!(cfg.pathfinder_queue_capacity, 250);
        assert_eq!(cfg.broker_retry_count, 10);
    }
}
