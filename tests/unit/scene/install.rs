use super::*;
use crate::foundation::core::Viewport;
use crate::host::document::{ElementDef, StaticDocument};
use crate::host::player::RecordingPlayerLoader;
use crate::host::surface::RecordingSurface;
use crate::scroll::physics::ScrollSnapshot;

fn page() -> StaticDocument {
    StaticDocument::from_json_str(include_str!("../../data/page.json")).unwrap()
}

fn install(doc: &StaticDocument) -> (TriggerCoordinator, SceneHandles, RecordingPlayerLoader) {
    let mut loader = RecordingPlayerLoader::new();
    let mut c = TriggerCoordinator::new();
    let handles = install_scene(&SceneConfig::default(), doc, &mut loader, &mut c).unwrap();
    (c, handles, loader)
}

fn at(offset: f64) -> ScrollSnapshot {
    ScrollSnapshot {
        offset,
        target: offset,
        limit: 8200.0,
        ..ScrollSnapshot::default()
    }
}

#[test]
fn full_page_registers_every_section() {
    let d = page();
    let (c, h, loader) = install(&d);
    assert!(h.hero.is_some());
    assert_eq!(h.fades.len(), 1);
    assert!(h.chapter.is_some());
    assert!(h.track.is_some());
    assert!(h.lottie.is_some());
    assert_eq!(c.len(), 5);

    let req = &loader.log().requests[0];
    assert_eq!(req.path, "assets/lottie/scroll.json");
    assert!(!req.autoplay && !req.looping);
    assert_eq!(req.renderer, Renderer::Svg);
}

#[test]
fn region_windows_follow_thresholds() {
    let d = page();
    let (c, h, _) = install(&d);
    let window = |h: Option<RegionHandle>| {
        let r = c.region(h.unwrap()).unwrap();
        (r.start(), r.end())
    };
    assert_eq!(window(h.hero), (0.0, 720.0));
    assert_eq!(window(Some(h.fades[0])), (360.0, 1140.0));
    assert_eq!(window(h.chapter), (1400.0, 3160.0));
    assert_eq!(window(h.track), (3960.0, 6960.0));
    assert_eq!(window(h.lottie), (7120.0, 8200.0));
    assert!(c.region(h.track.unwrap()).unwrap().spec().pin);
}

#[test]
fn hero_end_state_uses_blur_variable_and_fixed_color() {
    let d = page();
    let (mut c, _, _) = install(&d);
    let mut s = RecordingSurface::new();

    c.update(&at(0.0), &d, &mut s, false);
    let h2 = s.style("heroH2");
    assert_eq!(h2.color, Some(Rgba8::rgb(255, 255, 255)));
    assert_eq!(h2.opacity, Some(1.0));

    c.update(&at(720.0), &d, &mut s, false);
    let logo = s.style("logoText");
    assert_eq!(logo.x_percent, Some(-18.0));
    assert_eq!(logo.scale, Some(1.18));
    assert_eq!(logo.blur, Some(14.0));
    assert_eq!(logo.opacity, Some(0.0));
    assert_eq!(s.style("subtitle"), logo);
    assert_eq!(s.style("phoneMock").x_percent, Some(28.0));
    let h2 = s.style("heroH2");
    assert_eq!(h2.scale, Some(1.35));
    assert_eq!(h2.color, Some(Rgba8::rgb(0x7C, 0xFC, 0x00)));
}

#[test]
fn chapter_reveal_samples_both_tracks_together() {
    let d = page();
    let (mut c, _, _) = install(&d);
    let mut s = RecordingSurface::new();

    c.update(&at(1400.0 + 880.0), &d, &mut s, false);
    let mockup = s.style("mockup");
    assert!((mockup.scale.unwrap() - 0.99).abs() < 1e-9);
    assert!((mockup.y.unwrap() - 10.0).abs() < 1e-9);
    assert!((s.style("screen").opacity.unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn four_panels_travel_minus_three_hundred_percent() {
    let d = page();
    let (mut c, _, _) = install(&d);
    let mut s = RecordingSurface::new();
    c.update(&at(6960.0), &d, &mut s, false);
    assert_eq!(s.style("htrack").x_percent, Some(-300.0));
    assert_eq!(s.element("hwrap").unwrap().pin_offset, Some(3000.0));
}

#[test]
fn missing_sections_are_skipped() {
    let d = StaticDocument::new(Viewport::new(800.0, 600.0).unwrap()).with_element(ElementDef {
        id: "x".to_owned(),
        tag: "div".to_owned(),
        classes: vec!["fade-in-out".to_owned()],
        rect: Some([0.0, 900.0, 800.0, 100.0]),
        ..ElementDef::default()
    });
    let (c, h, loader) = install(&d);
    assert_eq!(c.len(), 1);
    assert_eq!(h.fades.len(), 1);
    assert!(h.hero.is_none() && h.chapter.is_none() && h.track.is_none() && h.lottie.is_none());
    assert!(loader.log().requests.is_empty());
}

#[test]
fn failed_player_load_skips_lottie() {
    let d = page();
    let mut loader = RecordingPlayerLoader::failing();
    let mut c = TriggerCoordinator::new();
    let h = install_scene(&SceneConfig::default(), &d, &mut loader, &mut c).unwrap();
    assert!(h.lottie.is_none());
    assert_eq!(c.len(), 4);
}

#[test]
fn blur_falls_back_when_variable_is_missing() {
    let mut d = page();
    d.css_vars.clear();
    assert_eq!(max_blur(&SceneConfig::default(), &d), 12.0);
}

#[test]
fn config_round_trips_through_json_with_defaults() {
    let cfg: SceneConfig =
        serde_json::from_str(r#"{ "chapter": { "end": "+=150%" }, "blurFallbackPx": 8 }"#)
            .unwrap();
    assert_eq!(cfg.chapter.end, Threshold::Relative(Span::ViewportHeight(150.0)));
    assert_eq!(cfg.chapter.trigger, ".chapter");
    assert_eq!(cfg.blur_fallback_px, 8.0);
    assert!(cfg.validate().is_ok());

    let bad = SceneConfig {
        lottie: LottieScene {
            start: "+=10%".parse().unwrap(),
            ..LottieScene::default()
        },
        ..SceneConfig::default()
    };
    assert!(bad.validate().is_err());
}
