use crate::animation::style::StyleFrame;
use crate::animation::timeline::Timeline;
use crate::foundation::core::TargetId;
use crate::host::surface::Surface;

/// Lifecycle transitions of a region, in scroll direction terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Scrolled forward past the start.
    Enter,
    /// Scrolled forward past the end.
    Leave,
    /// Scrolled backward past the end.
    EnterBack,
    /// Scrolled backward past the start.
    LeaveBack,
}

/// Subscriber to one region's progress.
pub trait ProgressBinding {
    /// Called with the new progress whenever it changes, and on every forced refresh.
    fn on_progress(&mut self, progress: f64, surface: &mut dyn Surface);

    /// Called on each lifecycle transition, before the matching progress update.
    fn on_lifecycle(&mut self, _event: LifecycleEvent, _surface: &mut dyn Surface) {}
}

/// Binds a [`Timeline`] to a region: every update writes the sampled states.
#[derive(Clone, Debug)]
pub struct TimelineBinding {
    timeline: Timeline,
    scratch: Vec<(TargetId, StyleFrame)>,
}

impl TimelineBinding {
    /// Wrap a validated timeline.
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            scratch: Vec::new(),
        }
    }

    /// Borrow the timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

impl ProgressBinding for TimelineBinding {
    fn on_progress(&mut self, progress: f64, surface: &mut dyn Surface) {
        self.timeline.sample_into(progress, &mut self.scratch);
        for (target, state) in &self.scratch {
            surface.apply_style(target, state);
        }
    }
}
