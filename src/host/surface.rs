use std::collections::{BTreeMap, BTreeSet};

use crate::animation::style::StyleFrame;
use crate::foundation::core::TargetId;

/// Write side of the page: every visual effect of the core goes through this trait.
pub trait Surface {
    /// Write the `Some` properties of `style` onto `target` as inline styles.
    fn apply_style(&mut self, target: &TargetId, style: &StyleFrame);
    /// Add a CSS state-marker class.
    fn add_class(&mut self, target: &TargetId, class: &str);
    /// Vertical translation that keeps a pinned anchor fixed on screen.
    fn set_pin_offset(&mut self, target: &TargetId, offset_px: f64);
    /// Height of the spacer that reserves scroll distance for a pinned anchor.
    fn set_pin_spacing(&mut self, target: &TargetId, spacing_px: f64);
    /// Move the native scroll position (smooth scrolling writes here).
    fn scroll_window_to(&mut self, offset_px: f64);
}

/// Final state of one element as seen by a [`RecordingSurface`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedElement {
    /// Merged inline style.
    pub style: StyleFrame,
    /// Marker classes added so far.
    pub classes: BTreeSet<String>,
    /// Last pin offset, if pinned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_offset: Option<f64>,
    /// Last pin spacer height, if pinned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_spacing: Option<f64>,
}

/// [`Surface`] that records the resulting page state, for tests and the CLI.
#[derive(Clone, Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSurface {
    /// Element state by id.
    pub elements: BTreeMap<TargetId, RecordedElement>,
    /// Last native scroll position written.
    pub window_scroll: Option<f64>,
    /// Number of `apply_style` calls.
    pub style_writes: u64,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state of `id`.
    pub fn element(&self, id: &str) -> Option<&RecordedElement> {
        self.elements.get(&TargetId::new(id))
    }

    /// Recorded style of `id`, or an empty frame.
    pub fn style(&self, id: &str) -> StyleFrame {
        self.element(id).map(|e| e.style).unwrap_or_default()
    }

    /// `true` when `id` carries `class`.
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.classes.contains(class))
    }

    /// `true` when nothing at all was written.
    pub fn is_untouched(&self) -> bool {
        self.elements.is_empty() && self.window_scroll.is_none() && self.style_writes == 0
    }
}

impl Surface for RecordingSurface {
    fn apply_style(&mut self, target: &TargetId, style: &StyleFrame) {
        self.style_writes += 1;
        self.elements
            .entry(target.clone())
            .or_default()
            .style
            .merge_from(style);
    }

    fn add_class(&mut self, target: &TargetId, class: &str) {
        self.elements
            .entry(target.clone())
            .or_default()
            .classes
            .insert(class.to_owned());
    }

    fn set_pin_offset(&mut self, target: &TargetId, offset_px: f64) {
        self.elements.entry(target.clone()).or_default().pin_offset = Some(offset_px);
    }

    fn set_pin_spacing(&mut self, target: &TargetId, spacing_px: f64) {
        self.elements.entry(target.clone()).or_default().pin_spacing = Some(spacing_px);
    }

    fn scroll_window_to(&mut self, offset_px: f64) {
        self.window_scroll = Some(offset_px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/surface.rs"]
mod tests;
