use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::foundation::core::TargetId;
use crate::host::document::{ElementDef, StaticDocument};
use crate::host::surface::RecordingSurface;
use crate::trigger::binding::LifecycleEvent;
use crate::trigger::threshold::Threshold;

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Progress(f64),
    Event(LifecycleEvent),
}

struct Probe {
    tag: &'static str,
    log: Rc<RefCell<Vec<(&'static str, Seen)>>>,
}

impl ProgressBinding for Probe {
    fn on_progress(&mut self, progress: f64, _surface: &mut dyn Surface) {
        self.log.borrow_mut().push((self.tag, Seen::Progress(progress)));
    }

    fn on_lifecycle(&mut self, event: LifecycleEvent, _surface: &mut dyn Surface) {
        self.log.borrow_mut().push((self.tag, Seen::Event(event)));
    }
}

fn doc() -> StaticDocument {
    StaticDocument::new(Viewport::new(1000.0, 800.0).unwrap())
        .with_element(ElementDef {
            id: "chapter".to_owned(),
            tag: "section".to_owned(),
            rect: Some([0.0, 1000.0, 1000.0, 800.0]),
            ..ElementDef::default()
        })
        .with_element(ElementDef {
            id: "late".to_owned(),
            tag: "div".to_owned(),
            rect: None,
            ..ElementDef::default()
        })
}

fn at(offset: f64) -> ScrollSnapshot {
    ScrollSnapshot {
        offset,
        limit: 10_000.0,
        target: offset,
        ..ScrollSnapshot::default()
    }
}

fn pinned_chapter() -> RegionSpec {
    RegionSpec::scrub(
        "chapter",
        TargetId::new("chapter"),
        Threshold::TOP_TOP,
        "+=100%".parse().unwrap(),
    )
    .pinned()
}

#[test]
fn missing_trigger_is_skipped() {
    let mut c = TriggerCoordinator::new();
    let spec = RegionSpec::scrub(
        "ghost",
        TargetId::new("nope"),
        Threshold::TOP_TOP,
        "+=50%".parse().unwrap(),
    );
    assert_eq!(c.register(spec, &doc()).unwrap(), None);
    assert!(c.is_empty());
}

#[test]
fn relative_start_is_rejected() {
    let mut c = TriggerCoordinator::new();
    let spec = RegionSpec::scrub(
        "bad",
        TargetId::new("chapter"),
        "+=10%".parse().unwrap(),
        "+=50%".parse().unwrap(),
    );
    assert!(c.register(spec, &doc()).is_err());
}

#[test]
fn bindings_run_in_registration_order_only_on_change() {
    let d = doc();
    let mut surface = RecordingSurface::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut c = TriggerCoordinator::new();
    let h = c.register(pinned_chapter(), &d).unwrap().unwrap();
    c.bind(h, Box::new(Probe { tag: "a", log: Rc::clone(&log) }));
    c.bind(h, Box::new(Probe { tag: "b", log: Rc::clone(&log) }));

    c.update(&at(1400.0), &d, &mut surface, false);
    c.update(&at(1400.0), &d, &mut surface, false);

    let seen = log.borrow().clone();
    assert_eq!(
        seen,
        vec![
            ("a", Seen::Event(LifecycleEvent::Enter)),
            ("b", Seen::Event(LifecycleEvent::Enter)),
            ("a", Seen::Progress(0.5)),
            ("b", Seen::Progress(0.5)),
        ]
    );
    assert_eq!(c.region(h).unwrap().progress(), 0.5);
}

#[test]
fn forced_update_republishes_unchanged_progress() {
    let d = doc();
    let mut surface = RecordingSurface::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut c = TriggerCoordinator::new();
    let h = c.register(pinned_chapter(), &d).unwrap().unwrap();
    c.bind(h, Box::new(Probe { tag: "a", log: Rc::clone(&log) }));

    c.update(&at(0.0), &d, &mut surface, false);
    c.update(&at(0.0), &d, &mut surface, true);
    let progress_calls = log
        .borrow()
        .iter()
        .filter(|(_, s)| matches!(s, Seen::Progress(_)))
        .count();
    assert_eq!(progress_calls, 2);
}

#[test]
fn pin_keeps_anchor_fixed_inside_window() {
    let d = doc();
    let mut surface = RecordingSurface::new();
    let mut c = TriggerCoordinator::new();
    c.register(pinned_chapter(), &d).unwrap();

    // Screen position of the anchor = doc y + pin offset - scroll.
    for scroll in [1000.0, 1200.0, 1650.0, 1800.0] {
        c.update(&at(scroll), &d, &mut surface, false);
        let pin = surface.element("chapter").unwrap().pin_offset.unwrap();
        assert_eq!(1000.0 + pin - scroll, 0.0, "anchor moved at {scroll}");
    }

    c.update(&at(500.0), &d, &mut surface, false);
    assert_eq!(surface.element("chapter").unwrap().pin_offset, Some(0.0));
    c.update(&at(3000.0), &d, &mut surface, false);
    assert_eq!(surface.element("chapter").unwrap().pin_offset, Some(800.0));
}

#[test]
fn refresh_publishes_pin_spacing_and_is_idempotent() {
    let mut d = doc();
    let mut surface = RecordingSurface::new();
    let mut c = TriggerCoordinator::new();
    let h = c.register(pinned_chapter(), &d).unwrap().unwrap();

    c.refresh(&d, &mut surface);
    c.refresh(&d, &mut surface);
    assert_eq!(surface.element("chapter").unwrap().pin_spacing, Some(800.0));
    assert_eq!((c.region(h).unwrap().start(), c.region(h).unwrap().end()), (1000.0, 1800.0));

    d.set_viewport(Viewport::new(1000.0, 600.0).unwrap());
    c.refresh(&d, &mut surface);
    assert_eq!(c.region(h).unwrap().end(), 1600.0);
    assert_eq!(surface.element("chapter").unwrap().pin_spacing, Some(600.0));
}

#[test]
fn pending_geometry_yields_zero_until_laid_out() {
    let mut d = doc();
    let mut surface = RecordingSurface::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut c = TriggerCoordinator::new();
    let spec = RegionSpec::scrub(
        "late",
        TargetId::new("late"),
        Threshold::TOP_TOP,
        "+=100px".parse().unwrap(),
    );
    let h = c.register(spec, &d).unwrap().unwrap();
    c.bind(h, Box::new(Probe { tag: "late", log: Rc::clone(&log) }));

    c.update(&at(5000.0), &d, &mut surface, false);
    assert!(!c.region(h).unwrap().is_measured());
    assert_eq!(c.region(h).unwrap().progress(), 0.0);

    d.set_rect("late", Some([0.0, 100.0, 100.0, 100.0]));
    c.update(&at(150.0), &d, &mut surface, false);
    assert!(c.region(h).unwrap().is_measured());
    assert_eq!(c.region(h).unwrap().progress(), 0.5);
}

#[test]
fn jumping_past_region_fires_enter_then_leave() {
    let d = doc();
    let mut surface = RecordingSurface::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut c = TriggerCoordinator::new();
    let h = c.register(pinned_chapter(), &d).unwrap().unwrap();
    c.bind(h, Box::new(Probe { tag: "a", log: Rc::clone(&log) }));

    c.update(&at(5000.0), &d, &mut surface, false);
    c.update(&at(0.0), &d, &mut surface, false);

    let events: Vec<_> = log
        .borrow()
        .iter()
        .filter_map(|(_, s)| match s {
            Seen::Event(e) => Some(*e),
            Seen::Progress(_) => None,
        })
        .collect();
    use LifecycleEvent::*;
    assert_eq!(events, vec![Enter, Leave, EnterBack, LeaveBack]);
}
