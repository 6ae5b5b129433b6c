use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::style::{Lerp, StyleFrame};
use crate::foundation::core::TargetId;
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

/// Duration assigned to a track when none is given, in timeline units.
pub const DEFAULT_TRACK_DURATION: f64 = 0.5;

/// One from/to interpolation applied to one or more targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Elements receiving the interpolated state.
    pub targets: SmallVec<[TargetId; 2]>,
    /// State at local progress 0.
    pub from: StyleFrame,
    /// State at local progress 1.
    pub to: StyleFrame,
    /// Curve applied to local progress.
    pub ease: Ease,
    /// Position of the track inside its timeline.
    pub start: f64,
    /// Length of the track inside its timeline.
    pub duration: f64,
}

impl Track {
    /// Linear track at position 0 with the default duration.
    pub fn new(
        targets: impl IntoIterator<Item = TargetId>,
        from: StyleFrame,
        to: StyleFrame,
    ) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from,
            to,
            ease: Ease::Linear,
            start: 0.0,
            duration: DEFAULT_TRACK_DURATION,
        }
    }

    /// Place the track at `start`.
    pub fn at(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Override the track duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Override the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Check targets, timing and that `from`/`to` declare the same properties.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        if self.targets.is_empty() {
            return Err(ScrollSyncError::validation("Track must have at least one target"));
        }
        if !(self.start.is_finite() && self.start >= 0.0) {
            return Err(ScrollSyncError::validation("Track start must be finite and >= 0"));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ScrollSyncError::validation(
                "Track duration must be finite and > 0",
            ));
        }
        let props = self.from.properties();
        if props.is_empty() {
            return Err(ScrollSyncError::validation("Track must animate at least one property"));
        }
        if props != self.to.properties() {
            return Err(ScrollSyncError::validation(
                "Track from/to states must declare the same properties",
            ));
        }
        Ok(())
    }

    /// Local progress of this track for a timeline position `pos`.
    fn local(&self, pos: f64) -> f64 {
        if pos <= self.start {
            0.0
        } else if pos >= self.end() {
            1.0
        } else {
            (pos - self.start) / self.duration
        }
    }

    /// State at local progress `t` (eased).
    pub fn sample_local(&self, t: f64) -> StyleFrame {
        let te = self.ease.apply(t);
        StyleFrame::lerp(&self.from, &self.to, te)
    }
}

/// An ordered set of tracks driven by one progress value.
///
/// Sampling is a pure function of progress. Tracks that touch the same target must animate
/// disjoint properties; otherwise the result would depend on registration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    tracks: Vec<Track>,
    total: f64,
}

impl Timeline {
    /// Validate and build a timeline.
    pub fn new(tracks: Vec<Track>) -> ScrollSyncResult<Self> {
        if tracks.is_empty() {
            return Err(ScrollSyncError::validation("Timeline must have at least one track"));
        }
        for t in &tracks {
            t.validate()?;
        }
        for (i, a) in tracks.iter().enumerate() {
            for b in &tracks[i + 1..] {
                let shares_target = a.targets.iter().any(|t| b.targets.contains(t));
                if shares_target && !a.from.properties().is_disjoint(b.from.properties()) {
                    return Err(ScrollSyncError::validation(format!(
                        "tracks on target \"{}\" animate overlapping properties",
                        a.targets
                            .iter()
                            .find(|t| b.targets.contains(t))
                            .map(TargetId::as_str)
                            .unwrap_or_default()
                    )));
                }
            }
        }
        let total = tracks.iter().map(Track::end).fold(0.0, f64::max);
        Ok(Self { tracks, total })
    }

    /// Total length in timeline units.
    pub fn duration(&self) -> f64 {
        self.total
    }

    /// Tracks in registration order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Sample every track at `progress` into `out` (cleared first), one entry per target.
    pub fn sample_into(&self, progress: f64, out: &mut Vec<(TargetId, StyleFrame)>) {
        out.clear();
        let p = progress.clamp(0.0, 1.0);
        let pos = if p >= 1.0 { self.total } else { p * self.total };
        for track in &self.tracks {
            let state = track.sample_local(track.local(pos));
            for target in &track.targets {
                out.push((target.clone(), state));
            }
        }
    }

    /// Convenience wrapper over [`Timeline::sample_into`].
    pub fn sample(&self, progress: f64) -> Vec<(TargetId, StyleFrame)> {
        let mut out = Vec::new();
        self.sample_into(progress, &mut out);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
