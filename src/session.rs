use crate::config::SessionConfig;
use crate::foundation::core::TargetId;
use crate::foundation::error::ScrollSyncResult;
use crate::gesture::{IdleScheduler, PointerEvent};
use crate::host::document::Document;
use crate::host::frames::{FrameScheduler, MotionPreference};
use crate::host::surface::Surface;
use crate::player::PlayerLoader;
use crate::reveal::{IntersectionEntry, RevealWatcher};
use crate::scene::{SceneHandles, install_scene};
use crate::scroll::physics::{ScrollLoop, ScrollSnapshot};
use crate::trigger::coordinator::TriggerCoordinator;

/// Native offsets this close to the last window write are echoes of it.
const ECHO_TOLERANCE_PX: f64 = 0.5;

fn scroll_limit(doc: &dyn Document) -> f64 {
    (doc.scroll_height() - doc.viewport().height).max(0.0)
}

/// Owner of every piece of mutable scroll/animation state of one page.
///
/// A session is driven entirely by host calls: [`ScrollSession::on_frame`] once per requested
/// display frame, plus the input and layout notifications. Within a frame the scroll loop
/// advances first and the trigger coordinator recomputes against the resulting snapshot.
///
/// With reduced motion the session holds no regions, no scroll loop and no gestures, and never
/// requests a frame; only the reveal watcher is live.
pub struct ScrollSession {
    cfg: SessionConfig,
    reduced_motion: bool,
    scroll: Option<ScrollLoop>,
    native: ScrollSnapshot,
    written_offset: Option<f64>,
    coordinator: TriggerCoordinator,
    scene: SceneHandles,
    reveal: RevealWatcher,
    gestures: Option<IdleScheduler>,
}

impl std::fmt::Debug for ScrollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSession")
            .field("reduced_motion", &self.reduced_motion)
            .field("smooth", &self.scroll.is_some())
            .field("regions", &self.coordinator.len())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl ScrollSession {
    /// Validate `cfg`, read the motion preference once and register everything it allows.
    ///
    /// Initial states are written to `surface` before this returns, and the first frame is
    /// requested when anything needs frames.
    #[tracing::instrument(skip_all)]
    pub fn install(
        cfg: SessionConfig,
        motion: &dyn MotionPreference,
        doc: &dyn Document,
        loader: &mut dyn PlayerLoader,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
        now_ms: f64,
    ) -> ScrollSyncResult<Self> {
        cfg.validate()?;
        let reduced_motion = motion.prefers_reduced_motion();
        let reveal = RevealWatcher::observe(cfg.reveal.clone(), doc);
        let limit = scroll_limit(doc);
        let native = ScrollSnapshot {
            limit,
            time_ms: now_ms,
            ..ScrollSnapshot::default()
        };

        if reduced_motion {
            tracing::info!("reduced motion requested; scroll-linked behaviour disabled");
            return Ok(Self {
                cfg,
                reduced_motion,
                scroll: None,
                native,
                written_offset: None,
                coordinator: TriggerCoordinator::new(),
                scene: SceneHandles::default(),
                reveal,
                gestures: None,
            });
        }

        let mut coordinator = TriggerCoordinator::new();
        let scene = install_scene(&cfg.scene, doc, loader, &mut coordinator)?;
        let scroll = cfg.smooth.enabled.then(|| ScrollLoop::new(cfg.smooth, limit));
        let mut gestures = IdleScheduler::new(cfg.gestures.clone());
        gestures.attach_all(doc, now_ms);

        let mut session = Self {
            cfg,
            reduced_motion,
            scroll,
            native,
            written_offset: None,
            coordinator,
            scene,
            reveal,
            gestures: Some(gestures),
        };
        session.coordinator.refresh(doc, surface);
        let snap = session.snapshot();
        session.coordinator.update(&snap, doc, surface, true);
        tracing::info!(
            regions = session.coordinator.len(),
            smooth = session.scroll.is_some(),
            "scroll session installed"
        );
        frames.request_frame();
        Ok(session)
    }

    /// Current scroll snapshot.
    pub fn snapshot(&self) -> ScrollSnapshot {
        match &self.scroll {
            Some(s) => s.snapshot(),
            None => self.native,
        }
    }

    /// One display frame: advance the loop, recompute regions, tick gestures, schedule the next
    /// frame.
    pub fn on_frame(
        &mut self,
        time_ms: f64,
        doc: &dyn Document,
        surface: &mut dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) {
        if self.reduced_motion {
            return;
        }
        let snap = match self.scroll.as_mut() {
            Some(s) => s.advance(time_ms),
            None => {
                self.native.velocity = 0.0;
                self.native.time_ms = time_ms;
                self.native
            }
        };
        self.coordinator.update(&snap, doc, surface, false);
        if let Some(g) = self.gestures.as_mut() {
            g.tick(time_ms, surface);
        }
        if self.scroll.is_some() && self.written_offset != Some(snap.offset) {
            surface.scroll_window_to(snap.offset);
            self.written_offset = Some(snap.offset);
        }
        frames.request_frame();
    }

    /// Wheel delta in pixels. Without smooth scrolling the host scrolls natively and reports it
    /// through [`ScrollSession::on_native_scroll`] instead.
    pub fn on_wheel(&mut self, delta_px: f64) {
        if let Some(s) = self.scroll.as_mut() {
            s.wheel(delta_px);
        }
    }

    /// Touch scroll reporting an absolute offset.
    pub fn on_touch(&mut self, offset_px: f64) {
        match self.scroll.as_mut() {
            Some(s) => s.touch(offset_px),
            None => self.set_native(offset_px),
        }
    }

    /// Native scroll events (scrollbar, keyboard, anchor links). Echoes of the session's own
    /// window writes are dropped so the loop stays the only writer.
    pub fn on_native_scroll(&mut self, offset_px: f64) {
        match self.scroll.as_mut() {
            Some(s) => {
                let echo = self
                    .written_offset
                    .is_some_and(|w| (w - offset_px).abs() <= ECHO_TOLERANCE_PX);
                if echo {
                    tracing::trace!(offset_px, "ignored scroll echo");
                } else {
                    s.sync_native(offset_px);
                }
            }
            None => self.set_native(offset_px),
        }
    }

    fn set_native(&mut self, offset_px: f64) {
        let offset = offset_px.clamp(0.0, self.native.limit);
        self.native.velocity = offset - self.native.offset;
        self.native.offset = offset;
        self.native.target = offset;
    }

    /// Layout invalidation: re-read geometry, recompute spans and force-publish every region
    /// at the current offset. Safe to call repeatedly.
    #[tracing::instrument(skip_all)]
    pub fn on_resize(&mut self, doc: &dyn Document, surface: &mut dyn Surface) {
        let limit = scroll_limit(doc);
        match self.scroll.as_mut() {
            Some(s) => s.set_limit(limit),
            None => {
                self.native.limit = limit;
                self.native.offset = self.native.offset.min(limit);
                self.native.target = self.native.offset;
            }
        }
        if self.reduced_motion {
            return;
        }
        self.coordinator.refresh(doc, surface);
        let snap = self.snapshot();
        self.coordinator.update(&snap, doc, surface, true);
    }

    /// Intersection reports from the host's observer.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry], surface: &mut dyn Surface) {
        self.reveal.on_intersection(entries, surface);
    }

    /// Reveal pass from geometry at the current offset, for hosts without an observer.
    pub fn scan_reveals(&mut self, doc: &dyn Document, surface: &mut dyn Surface) {
        let offset = self.snapshot().offset;
        self.reveal.scan(doc, offset, surface);
    }

    /// Pointer enter/leave on a gesture target.
    pub fn on_pointer(&mut self, target: &TargetId, event: PointerEvent, time_ms: f64) {
        if let Some(g) = self.gestures.as_mut() {
            g.on_pointer(target, event, time_ms);
        }
    }

    /// `true` when the motion preference disabled scroll-linked behaviour.
    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// `true` when the smooth-scroll loop is running.
    pub fn is_smooth(&self) -> bool {
        self.scroll.is_some()
    }

    /// Number of registered regions.
    pub fn region_count(&self) -> usize {
        self.coordinator.len()
    }

    /// Region registry.
    pub fn coordinator(&self) -> &TriggerCoordinator {
        &self.coordinator
    }

    /// Handles of the installed scene sections.
    pub fn scene(&self) -> &SceneHandles {
        &self.scene
    }

    /// Reveal watcher.
    pub fn reveal(&self) -> &RevealWatcher {
        &self.reveal
    }

    /// Gesture scheduler; `None` with reduced motion.
    pub fn gestures(&self) -> Option<&IdleScheduler> {
        self.gestures.as_ref()
    }

    /// Mutable gesture scheduler, e.g. to cancel a target.
    pub fn gestures_mut(&mut self) -> Option<&mut IdleScheduler> {
        self.gestures.as_mut()
    }

    /// Configuration the session was installed with.
    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }
}

#[cfg(test)]
#[path = "../tests/unit/session/session.rs"]
mod tests;
