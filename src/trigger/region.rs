use crate::foundation::core::{Geometry, Rect, TargetId, Viewport};
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};
use crate::trigger::binding::LifecycleEvent;
use crate::trigger::threshold::Threshold;

/// How a region's progress is driven.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Drive {
    /// Progress follows scroll position continuously and reversibly.
    Scrub,
    /// Entering the region plays progress 0 -> 1 once over `duration_ms`.
    #[serde(rename_all = "camelCase")]
    Timed {
        /// Playback length in milliseconds.
        duration_ms: f64,
    },
}

/// Declarative description of a region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSpec {
    /// Name used in logs.
    pub name: String,
    /// Element whose geometry defines the region.
    pub trigger: TargetId,
    /// Start threshold; must be an edge pair.
    pub start: Threshold,
    /// End threshold.
    pub end: Threshold,
    /// Hold the trigger element on screen between start and end.
    #[serde(default)]
    pub pin: bool,
    /// Reserve the pinned scroll distance with a spacer.
    #[serde(default = "default_true")]
    pub pin_spacing: bool,
    /// Progress source.
    #[serde(default = "default_drive")]
    pub drive: Drive,
}

fn default_true() -> bool {
    true
}

fn default_drive() -> Drive {
    Drive::Scrub
}

impl RegionSpec {
    /// Scrubbed, unpinned region.
    pub fn scrub(
        name: impl Into<String>,
        trigger: TargetId,
        start: Threshold,
        end: Threshold,
    ) -> Self {
        Self {
            name: name.into(),
            trigger,
            start,
            end,
            pin: false,
            pin_spacing: true,
            drive: Drive::Scrub,
        }
    }

    /// Builder: pin the trigger element.
    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    /// Check threshold kinds and drive parameters.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        if matches!(self.start, Threshold::Relative(_)) {
            return Err(ScrollSyncError::validation(format!(
                "region \"{}\": start threshold must be \"<element> <viewport>\"",
                self.name
            )));
        }
        if let Drive::Timed { duration_ms } = self.drive {
            if !(duration_ms.is_finite() && duration_ms > 0.0) {
                return Err(ScrollSyncError::validation(format!(
                    "region \"{}\": timed duration must be finite and > 0",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Lifecycle state of a region relative to the current scroll offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum Lifecycle {
    /// Scroll offset is before the start.
    #[default]
    Inactive,
    /// Scroll offset is within `[start, end)`.
    Active,
    /// Scroll offset is at or past the end.
    Completed,
}

impl Lifecycle {
    /// Classify `scroll` against a resolved `[start, end]` window.
    pub fn classify(scroll: f64, start: f64, end: f64) -> Self {
        if scroll < start {
            Self::Inactive
        } else if scroll >= end {
            Self::Completed
        } else {
            Self::Active
        }
    }

    /// Events fired when moving from `self` to `next`, in order.
    pub fn transition(self, next: Self) -> &'static [LifecycleEvent] {
        use LifecycleEvent::*;
        match (self, next) {
            (Self::Inactive, Self::Active) => &[Enter],
            (Self::Inactive, Self::Completed) => &[Enter, Leave],
            (Self::Active, Self::Completed) => &[Leave],
            (Self::Completed, Self::Active) => &[EnterBack],
            (Self::Completed, Self::Inactive) => &[EnterBack, LeaveBack],
            (Self::Active, Self::Inactive) => &[LeaveBack],
            _ => &[],
        }
    }
}

/// Scrub formula: `clamp((scroll - start) / (end - start), 0, 1)`.
///
/// Degenerate windows (`end <= start`) step from 0 to 1 at `start`.
pub fn scrub_progress(scroll: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if span <= 0.0 {
        return if scroll >= start { 1.0 } else { 0.0 };
    }
    ((scroll - start) / span).clamp(0.0, 1.0)
}

/// Pin translation that keeps the anchor fixed while `scroll` is inside `[start, end]`.
pub fn pin_offset(scroll: f64, start: f64, end: f64) -> f64 {
    (scroll - start).clamp(0.0, (end - start).max(0.0))
}

/// Live state of a registered region.
#[derive(Clone, Debug)]
pub struct Region {
    pub(crate) spec: RegionSpec,
    pub(crate) bounds: Option<Rect>,
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) progress: f64,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) played_from_ms: Option<f64>,
}

impl Region {
    pub(crate) fn new(spec: RegionSpec) -> Self {
        Self {
            spec,
            bounds: None,
            start: 0.0,
            end: 0.0,
            progress: 0.0,
            lifecycle: Lifecycle::Inactive,
            played_from_ms: None,
        }
    }

    /// Re-read geometry and recompute offsets, including viewport-derived spans.
    pub(crate) fn measure(&mut self, geometry: Geometry, viewport: Viewport) {
        let Some(rect) = geometry.rect() else {
            self.bounds = None;
            return;
        };
        let start = self.spec.start.edge_offset(rect, viewport).unwrap_or(0.0);
        let end = self.spec.end.end_offset(start, rect, viewport);
        self.bounds = Some(rect);
        self.start = start;
        self.end = end.max(start);
    }

    /// Progress at `scroll` and frame time `now_ms`. Unresolved geometry yields 0.
    pub(crate) fn progress_at(&mut self, scroll: f64, now_ms: f64) -> f64 {
        if self.bounds.is_none() {
            return 0.0;
        }
        match self.spec.drive {
            Drive::Scrub => scrub_progress(scroll, self.start, self.end),
            Drive::Timed { duration_ms } => {
                if self.played_from_ms.is_none() && scroll >= self.start {
                    self.played_from_ms = Some(now_ms);
                }
                match self.played_from_ms {
                    Some(t0) => ((now_ms - t0) / duration_ms).clamp(0.0, 1.0),
                    None => 0.0,
                }
            }
        }
    }

    /// Declaration this region was registered with.
    pub fn spec(&self) -> &RegionSpec {
        &self.spec
    }

    /// Resolved start offset in pixels.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Resolved end offset in pixels.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Last published progress.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// `true` once geometry has resolved.
    pub fn is_measured(&self) -> bool {
        self.bounds.is_some()
    }

    /// Document-space bounds of the trigger element, if laid out.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/region.rs"]
mod tests;
