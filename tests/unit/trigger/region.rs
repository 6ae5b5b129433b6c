use super::*;

fn vp() -> Viewport {
    Viewport::new(1000.0, 800.0).unwrap()
}

fn spec(start: &str, end: &str) -> RegionSpec {
    RegionSpec::scrub(
        "r",
        TargetId::new("el"),
        start.parse().unwrap(),
        end.parse().unwrap(),
    )
}

#[test]
fn scrub_progress_is_clamped_and_monotone() {
    assert_eq!(scrub_progress(-50.0, 100.0, 300.0), 0.0);
    assert_eq!(scrub_progress(100.0, 100.0, 300.0), 0.0);
    assert_eq!(scrub_progress(200.0, 100.0, 300.0), 0.5);
    assert_eq!(scrub_progress(300.0, 100.0, 300.0), 1.0);
    assert_eq!(scrub_progress(9999.0, 100.0, 300.0), 1.0);

    let mut prev = 0.0;
    for i in 0..=400 {
        let p = scrub_progress(f64::from(i), 100.0, 300.0);
        assert!(p >= prev);
        prev = p;
    }
}

#[test]
fn degenerate_window_steps_at_start() {
    assert_eq!(scrub_progress(99.0, 100.0, 100.0), 0.0);
    assert_eq!(scrub_progress(100.0, 100.0, 100.0), 1.0);
}

#[test]
fn pin_offset_tracks_scroll_inside_window_only() {
    assert_eq!(pin_offset(50.0, 100.0, 500.0), 0.0);
    assert_eq!(pin_offset(300.0, 100.0, 500.0), 200.0);
    assert_eq!(pin_offset(900.0, 100.0, 500.0), 400.0);
}

#[test]
fn lifecycle_transitions_emit_directional_events() {
    use LifecycleEvent::*;
    assert_eq!(Lifecycle::classify(0.0, 100.0, 200.0), Lifecycle::Inactive);
    assert_eq!(Lifecycle::classify(150.0, 100.0, 200.0), Lifecycle::Active);
    assert_eq!(Lifecycle::classify(200.0, 100.0, 200.0), Lifecycle::Completed);

    assert_eq!(Lifecycle::Inactive.transition(Lifecycle::Active), &[Enter]);
    assert_eq!(
        Lifecycle::Inactive.transition(Lifecycle::Completed),
        &[Enter, Leave]
    );
    assert_eq!(Lifecycle::Completed.transition(Lifecycle::Active), &[EnterBack]);
    assert_eq!(Lifecycle::Active.transition(Lifecycle::Inactive), &[LeaveBack]);
    assert!(Lifecycle::Active.transition(Lifecycle::Active).is_empty());
}

#[test]
fn measure_resolves_edges_and_relative_end() {
    let mut r = Region::new(spec("top top", "+=90%"));
    r.measure(Geometry::Resolved(Rect::new(0.0, 500.0, 1000.0, 1300.0)), vp());
    assert_eq!(r.start(), 500.0);
    assert_eq!(r.end(), 500.0 + 720.0);

    let mut r = Region::new(spec("top 80%", "bottom 20%"));
    r.measure(Geometry::Resolved(Rect::new(0.0, 2000.0, 1000.0, 2300.0)), vp());
    assert_eq!(r.start(), 2000.0 - 640.0);
    assert_eq!(r.end(), 2300.0 - 160.0);
}

#[test]
fn unresolved_geometry_reads_as_zero_progress() {
    let mut r = Region::new(spec("top top", "+=100%"));
    r.measure(Geometry::Pending, vp());
    assert!(!r.is_measured());
    assert_eq!(r.progress_at(10_000.0, 0.0), 0.0);
}

#[test]
fn timed_drive_plays_once_after_entering() {
    let mut s = spec("top top", "+=100%");
    s.drive = Drive::Timed { duration_ms: 1000.0 };
    let mut r = Region::new(s);
    r.measure(Geometry::Resolved(Rect::new(0.0, 100.0, 1000.0, 900.0)), vp());

    assert_eq!(r.progress_at(50.0, 0.0), 0.0);
    assert_eq!(r.progress_at(150.0, 1000.0), 0.0);
    assert_eq!(r.progress_at(150.0, 1500.0), 0.5);
    // Scrolling back does not rewind a timed region.
    assert_eq!(r.progress_at(0.0, 2500.0), 1.0);
}

#[test]
fn validation_rejects_relative_start_and_bad_duration() {
    assert!(spec("+=10%", "+=100%").validate().is_err());
    let mut s = spec("top top", "+=100%");
    s.drive = Drive::Timed { duration_ms: 0.0 };
    assert!(s.validate().is_err());
    assert!(spec("top top", "bottom top").validate().is_ok());
}

#[test]
fn spec_deserializes_from_camel_case_json() {
    let s: RegionSpec = serde_json::from_str(
        r#"{"name": "chapter", "trigger": "chapter", "start": "top top", "end": "+=220%", "pin": true,
            "drive": {"timed": {"durationMs": 500}}}"#,
    )
    .unwrap();
    assert!(s.pin);
    assert!(s.pin_spacing);
    assert_eq!(s.drive, Drive::Timed { duration_ms: 500.0 });
}
