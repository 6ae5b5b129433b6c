//! One-shot reveal of elements entering the viewport.
//!
//! Each observed element moves `Unrevealed -> Revealed` at most once: the first time its
//! visible fraction reaches the threshold it receives the marker class and is no longer
//! observed. The watcher is a side channel; it never touches scroll state or regions.

use crate::foundation::core::{Geometry, Rect, TargetId, Viewport};
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};
use crate::host::document::Document;
use crate::host::surface::Surface;

/// Reveal settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    /// Elements to observe.
    pub selector: String,
    /// Visible fraction in `(0, 1]` that triggers the reveal.
    pub threshold: f64,
    /// Marker class added on reveal.
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_owned(),
            threshold: 0.2,
            class: "in".to_owned(),
        }
    }
}

impl RevealConfig {
    /// Check the threshold range and that names are non-empty.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ScrollSyncError::validation(
                "reveal threshold must be in (0, 1]",
            ));
        }
        if self.selector.trim().is_empty() || self.class.trim().is_empty() {
            return Err(ScrollSyncError::validation(
                "reveal selector and class must be non-empty",
            ));
        }
        Ok(())
    }
}

/// Reveal state of one element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum RevealState {
    /// Observed, not yet revealed.
    #[default]
    Unrevealed,
    /// Revealed; terminal.
    Revealed,
}

/// One visibility report from the host's intersection observer.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// Observed element.
    pub target: TargetId,
    /// Visible fraction of the element's area, in `[0, 1]`.
    pub ratio: f64,
}

/// Visible fraction of `rect` inside the viewport window at `scroll_offset`.
///
/// Zero-area elements count as fully visible when they touch the window.
pub fn intersection_ratio(rect: Rect, viewport: Viewport, scroll_offset: f64) -> f64 {
    let window = Rect::new(0.0, scroll_offset, viewport.width, scroll_offset + viewport.height);
    let area = rect.area();
    if area <= 0.0 {
        let touches = rect.x0 <= window.x1
            && rect.x1 >= window.x0
            && rect.y0 <= window.y1
            && rect.y1 >= window.y0;
        return if touches { 1.0 } else { 0.0 };
    }
    let hit = rect.intersect(window);
    (hit.area() / area).clamp(0.0, 1.0)
}

/// Tracks which observed elements have been revealed.
#[derive(Clone, Debug)]
pub struct RevealWatcher {
    cfg: RevealConfig,
    observed: Vec<(TargetId, RevealState)>,
}

impl RevealWatcher {
    /// Observe every element matching the configured selector.
    pub fn observe(cfg: RevealConfig, doc: &dyn Document) -> Self {
        let observed = doc
            .select_all(&cfg.selector)
            .into_iter()
            .map(|t| (t, RevealState::Unrevealed))
            .collect::<Vec<_>>();
        tracing::debug!(selector = %cfg.selector, count = observed.len(), "reveal watcher observing");
        Self { cfg, observed }
    }

    /// Reveal state of `target`, or `None` when it was never observed.
    pub fn state(&self, target: &TargetId) -> Option<RevealState> {
        self.observed
            .iter()
            .find(|(t, _)| t == target)
            .map(|(_, s)| *s)
    }

    /// `true` while `target` still waits for its reveal.
    pub fn is_observing(&self, target: &TargetId) -> bool {
        self.state(target) == Some(RevealState::Unrevealed)
    }

    /// Number of revealed elements.
    pub fn revealed_count(&self) -> usize {
        self.observed
            .iter()
            .filter(|(_, s)| *s == RevealState::Revealed)
            .count()
    }

    /// Number of observed elements, revealed or not.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// `true` when nothing matched the selector.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    fn reveal(&mut self, target: &TargetId, ratio: f64, surface: &mut dyn Surface) {
        let Some(entry) = self.observed.iter_mut().find(|(t, _)| t == target) else {
            return;
        };
        if entry.1 == RevealState::Revealed || ratio < self.cfg.threshold {
            return;
        }
        entry.1 = RevealState::Revealed;
        surface.add_class(target, &self.cfg.class);
        tracing::debug!(%target, ratio, "revealed");
    }

    /// Apply intersection reports delivered by the host. Reports for revealed or unknown
    /// elements are ignored.
    pub fn on_intersection(&mut self, entries: &[IntersectionEntry], surface: &mut dyn Surface) {
        for e in entries {
            self.reveal(&e.target, e.ratio, surface);
        }
    }

    /// Compute intersection ratios from live geometry, for hosts without an observer.
    pub fn scan(&mut self, doc: &dyn Document, scroll_offset: f64, surface: &mut dyn Surface) {
        let viewport = doc.viewport();
        let pending: Vec<(TargetId, f64)> = self
            .observed
            .iter()
            .filter(|(_, s)| *s == RevealState::Unrevealed)
            .filter_map(|(t, _)| match doc.geometry(t) {
                Geometry::Resolved(rect) => {
                    Some((t.clone(), intersection_ratio(rect, viewport, scroll_offset)))
                }
                Geometry::Missing | Geometry::Pending => None,
            })
            .collect();
        for (t, ratio) in pending {
            self.reveal(&t, ratio, surface);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/reveal/watcher.rs"]
mod tests;
