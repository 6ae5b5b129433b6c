use super::*;

fn hero_from() -> StyleFrame {
    StyleFrame {
        x_percent: Some(0.0),
        scale: Some(1.0),
        blur: Some(0.0),
        opacity: Some(1.0),
        ..StyleFrame::default()
    }
}

fn hero_to() -> StyleFrame {
    StyleFrame {
        x_percent: Some(-18.0),
        scale: Some(1.18),
        blur: Some(12.0),
        opacity: Some(0.0),
        ..StyleFrame::default()
    }
}

#[test]
fn lerp_endpoints_are_exact() {
    let a = hero_from();
    let b = hero_to();
    assert_eq!(StyleFrame::lerp(&a, &b, 0.0), a);
    assert_eq!(StyleFrame::lerp(&a, &b, 1.0), b);
}

#[test]
fn lerp_midpoint_interpolates_each_channel() {
    let m = StyleFrame::lerp(&hero_from(), &hero_to(), 0.5);
    assert_eq!(m.x_percent, Some(-9.0));
    assert_eq!(m.opacity, Some(0.5));
    assert!((m.scale.unwrap() - 1.09).abs() < 1e-12);
}

#[test]
fn color_lerp_hits_target() {
    let a = StyleFrame {
        color: Some(Rgba8::rgb(255, 255, 255)),
        ..StyleFrame::default()
    };
    let b = StyleFrame {
        color: Some(Rgba8::rgb(124, 252, 0)),
        ..StyleFrame::default()
    };
    assert_eq!(StyleFrame::lerp(&a, &b, 1.0).color, b.color);
    assert_eq!(StyleFrame::lerp(&a, &b, 0.0).color, a.color);
}

#[test]
fn property_sets_detect_overlap() {
    let scale_opacity = hero_from().properties();
    let color = StyleFrame {
        color: Some(Rgba8::black()),
        ..StyleFrame::default()
    }
    .properties();
    assert!(scale_opacity.is_disjoint(color));
    assert!(!scale_opacity.is_disjoint(hero_to().properties()));
    assert_eq!(scale_opacity.iter().count(), 4);
}

#[test]
fn merge_overwrites_only_present_fields() {
    let mut base = hero_from();
    base.merge_from(&StyleFrame {
        opacity: Some(0.25),
        ..StyleFrame::default()
    });
    assert_eq!(base.opacity, Some(0.25));
    assert_eq!(base.scale, Some(1.0));
}

#[test]
fn css_declarations_compose_transform() {
    let f = StyleFrame {
        x_percent: Some(-18.0),
        y: Some(20.0),
        scale: Some(1.5),
        opacity: Some(0.0),
        ..StyleFrame::default()
    };
    let decls = f.css_declarations();
    assert_eq!(
        decls[0],
        (
            "transform",
            "translateX(-18%) translate(0px, 20px) scale(1.5)".to_owned()
        )
    );
    assert_eq!(decls[1], ("opacity", "0".to_owned()));
}

#[test]
fn restricted_to_drops_other_properties() {
    let mut set = PropertySet::default();
    set.insert(Property::Opacity);
    let r = hero_to().restricted_to(set);
    assert_eq!(r.opacity, Some(0.0));
    assert!(r.scale.is_none());
}
