use super::*;

fn storefront() -> MappingCurve {
    MappingCurve::new(240, 0.7, true).unwrap()
}

#[test]
fn out_of_range_progress_is_clamped() {
    for curve in [
        storefront(),
        MappingCurve::new(60, 1.0, false).unwrap(),
        MappingCurve::new(10, 0.3, false)
            .unwrap()
            .with_ease(Ease::InOutCubic),
    ] {
        for p in [-1.0, -0.001, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(map_progress(p, &curve), map_progress(0.0, &curve), "p={p}");
        }
        for p in [1.001, 2.0, f64::INFINITY] {
            assert_eq!(map_progress(p, &curve), map_progress(1.0, &curve), "p={p}");
        }
    }
}

#[test]
fn reversed_full_range_hits_both_terminals() {
    for n in [2u64, 3, 60, 240, 1001] {
        let curve = MappingCurve::new(n, 1.0, true).unwrap();
        assert_eq!(curve.map(0.0), FrameIndex(n - 1));
        assert_eq!(curve.map(1.0), FrameIndex(0));

        let forward = MappingCurve::new(n, 1.0, false).unwrap();
        assert_eq!(forward.map(0.0), FrameIndex(0));
        assert_eq!(forward.map(1.0), FrameIndex(n - 1));
    }
}

#[test]
fn hold_segment_keeps_terminal_frame() {
    let curve = storefront();
    for i in 0..=300 {
        let p = 0.7 + 0.3 * f64::from(i) / 300.0;
        assert_eq!(curve.map(p), FrameIndex(0), "p={p}");
    }
    let forward = MappingCurve::new(240, 0.7, false).unwrap();
    assert_eq!(forward.map(0.85), FrameIndex(239));
}

#[test]
fn storefront_scenario() {
    let curve = storefront();
    assert_eq!(curve.map(0.0), FrameIndex(239));
    assert_eq!(curve.map(0.35), FrameIndex(120));
    assert_eq!(curve.map(0.7), FrameIndex(0));
    assert_eq!(curve.map(0.9), FrameIndex(0));
}

#[test]
fn single_frame_always_maps_to_zero() {
    let curve = MappingCurve::new(1, 0.5, true).unwrap();
    for p in [0.0, 0.3, 1.0, -5.0, f64::NAN] {
        assert_eq!(curve.map(p), FrameIndex(0));
    }
    assert_eq!(curve.last_index(), FrameIndex(0));
}

#[test]
fn mapping_is_monotonic() {
    let forward = MappingCurve::new(97, 0.8, false).unwrap();
    let reversed = MappingCurve::new(97, 0.8, true).unwrap();
    let mut prev_f = forward.map(0.0);
    let mut prev_r = reversed.map(0.0);
    for i in 1..=1000 {
        let p = f64::from(i) / 1000.0;
        let f = forward.map(p);
        let r = reversed.map(p);
        assert!(f >= prev_f);
        assert!(r <= prev_r);
        prev_f = f;
        prev_r = r;
    }
}

#[test]
fn ease_shapes_the_active_range_only() {
    let curve = MappingCurve::new(101, 1.0, false)
        .unwrap()
        .with_ease(Ease::InQuad);
    assert_eq!(curve.map(0.0), FrameIndex(0));
    assert_eq!(curve.map(0.5), FrameIndex(25));
    assert_eq!(curve.map(1.0), FrameIndex(100));
}

#[test]
fn constructor_validates() {
    assert!(MappingCurve::new(0, 0.7, false).is_err());
    assert!(MappingCurve::new(10, 0.0, false).is_err());
    assert!(MappingCurve::new(10, 1.5, false).is_err());
    assert!(MappingCurve::new(10, f64::NAN, false).is_err());
    assert!(MappingCurve::new(10, 1.0, false).is_ok());
}
