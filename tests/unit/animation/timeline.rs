use super::*;
use crate::foundation::core::Rgba8;

fn id(s: &str) -> TargetId {
    TargetId::new(s)
}

fn opacity(v: f64) -> StyleFrame {
    StyleFrame {
        opacity: Some(v),
        ..StyleFrame::default()
    }
}

fn scale_y(s: f64, y: f64) -> StyleFrame {
    StyleFrame {
        scale: Some(s),
        y: Some(y),
        ..StyleFrame::default()
    }
}

#[test]
fn endpoints_match_declared_states() {
    let tl = Timeline::new(vec![
        Track::new([id("logo"), id("sub")], opacity(1.0), opacity(0.0)),
        Track::new([id("phone")], scale_y(0.92, 40.0), scale_y(1.06, -20.0)),
    ])
    .unwrap();

    let start = tl.sample(0.0);
    assert_eq!(start.len(), 3);
    assert_eq!(start[0], (id("logo"), opacity(1.0)));
    assert_eq!(start[1], (id("sub"), opacity(1.0)));
    assert_eq!(start[2], (id("phone"), scale_y(0.92, 40.0)));

    let end = tl.sample(1.0);
    assert_eq!(end[2], (id("phone"), scale_y(1.06, -20.0)));
}

#[test]
fn track_ease_shapes_local_progress() {
    let tl = Timeline::new(vec![
        Track::new([id("cta")], opacity(0.0), opacity(1.0)).with_ease(Ease::OutQuad),
    ])
    .unwrap();

    assert_eq!(tl.sample(0.5)[0].1.opacity, Some(0.75));
    assert_eq!(tl.sample(1.0)[0].1.opacity, Some(1.0));
}

#[test]
fn sampling_is_idempotent() {
    let tl = Timeline::new(vec![Track::new(
        [id("a")],
        scale_y(0.92, 40.0),
        scale_y(1.06, -20.0),
    )])
    .unwrap();
    for i in 0..=50 {
        let p = f64::from(i) / 50.0;
        let a = tl.sample(p);
        let b = tl.sample(p);
        assert_eq!(a, b);
    }
}

#[test]
fn simultaneous_tracks_share_one_sample() {
    let tl = Timeline::new(vec![
        Track::new([id("mockup")], scale_y(0.92, 40.0), scale_y(1.06, -20.0)),
        Track::new([id("screen")], opacity(0.0), opacity(1.0)),
    ])
    .unwrap();
    let mid = tl.sample(0.5);
    assert_eq!(mid[1].1.opacity, Some(0.5));
    assert!((mid[0].1.scale.unwrap() - 0.99).abs() < 1e-12);
}

#[test]
fn offset_tracks_hold_before_and_after_window() {
    let tl = Timeline::new(vec![
        Track::new([id("a")], opacity(0.0), opacity(1.0)),
        Track::new([id("b")], opacity(0.0), opacity(1.0))
            .at(0.5)
            .with_duration(0.5),
    ])
    .unwrap();
    assert_eq!(tl.duration(), 1.0);
    assert_eq!(tl.sample(0.25)[1].1.opacity, Some(0.0));
    assert_eq!(tl.sample(0.75)[1].1.opacity, Some(0.5));
    assert_eq!(tl.sample(1.0)[1].1.opacity, Some(1.0));
}

#[test]
fn overlapping_properties_on_same_target_are_rejected() {
    let err = Timeline::new(vec![
        Track::new([id("h2")], opacity(1.0), opacity(0.0)),
        Track::new([id("h2")], opacity(0.0), opacity(1.0)),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("h2"));
}

#[test]
fn color_track_alongside_opacity_track_is_allowed() {
    let color = |c| StyleFrame {
        color: Some(c),
        ..StyleFrame::default()
    };
    let tl = Timeline::new(vec![
        Track::new([id("h2")], opacity(1.0), opacity(0.0)),
        Track::new(
            [id("h2")],
            color(Rgba8::rgb(255, 255, 255)),
            color(Rgba8::rgb(124, 252, 0)),
        ),
    ])
    .unwrap();
    let end = tl.sample(1.0);
    assert_eq!(end[0].1.opacity, Some(0.0));
    assert_eq!(end[1].1.color, Some(Rgba8::rgb(124, 252, 0)));
}

#[test]
fn mismatched_from_to_properties_fail_validation() {
    let t = Track::new([id("a")], opacity(0.0), scale_y(1.0, 0.0));
    assert!(t.validate().is_err());
    assert!(Timeline::new(vec![]).is_err());
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    let tl = Timeline::new(vec![Track::new([id("a")], opacity(0.0), opacity(1.0))]).unwrap();
    assert_eq!(tl.sample(-1.0), tl.sample(0.0));
    assert_eq!(tl.sample(7.0), tl.sample(1.0));
}
