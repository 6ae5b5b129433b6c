use std::collections::BTreeMap;

use crate::animation::style::StyleFrame;
use crate::foundation::core::{Geometry, Rect, TargetId, Viewport};
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

/// Read-only view of the page's document and layout system.
///
/// Geometry is read live; implementations must not cache across layout changes.
pub trait Document {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;
    /// Total scrollable document height.
    fn scroll_height(&self) -> f64;
    /// All elements matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Vec<TargetId>;
    /// First descendant of `parent` matching `selector`.
    fn select_within(&self, parent: &TargetId, selector: &str) -> Option<TargetId>;
    /// Bounds of `target` in document coordinates.
    fn geometry(&self, target: &TargetId) -> Geometry;
    /// Computed values of the animatable properties of `target`. Unknown properties are `None`.
    fn computed_style(&self, target: &TargetId) -> StyleFrame;
    /// Value of a CSS custom property on the root element.
    fn css_var(&self, name: &str) -> Option<String>;
    /// Attribute value on `target`.
    fn attribute(&self, target: &TargetId, name: &str) -> Option<String>;

    /// First element matching `selector`.
    fn select(&self, selector: &str) -> Option<TargetId> {
        self.select_all(selector).into_iter().next()
    }
}

/// One element of a [`StaticDocument`].
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementDef {
    /// Unique element id.
    pub id: String,
    /// Lowercase tag name.
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
    /// Parent element id, if nested.
    pub parent: Option<String>,
    /// `[x, y, width, height]` in document coordinates; `None` means not laid out yet.
    pub rect: Option<[f64; 4]>,
    /// Computed style values.
    pub style: StyleFrame,
    /// Attributes such as `data-path`.
    pub attrs: BTreeMap<String, String>,
}

/// In-memory [`Document`] described by JSON, for tests and the CLI.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticDocument {
    /// Viewport size.
    pub viewport: Viewport,
    /// Scrollable height; defaults to the bottom of the lowest element.
    #[serde(default)]
    pub scroll_height: Option<f64>,
    /// Root CSS custom properties.
    #[serde(default)]
    pub css_vars: BTreeMap<String, String>,
    /// Elements in document order.
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

impl StaticDocument {
    /// Empty document with the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_height: None,
            css_vars: BTreeMap::new(),
            elements: Vec::new(),
        }
    }

    /// Parse from JSON and validate.
    pub fn from_json_str(s: &str) -> ScrollSyncResult<Self> {
        let doc: Self = serde_json::from_str(s)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check viewport and id uniqueness.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        let mut seen = std::collections::BTreeSet::new();
        for el in &self.elements {
            if el.id.trim().is_empty() {
                return Err(ScrollSyncError::validation("element id must be non-empty"));
            }
            if !seen.insert(el.id.as_str()) {
                return Err(ScrollSyncError::validation(format!(
                    "duplicate element id \"{}\"",
                    el.id
                )));
            }
        }
        Ok(())
    }

    /// Builder-style element insertion.
    pub fn with_element(mut self, el: ElementDef) -> Self {
        self.elements.push(el);
        self
    }

    /// Replace the viewport, as a window resize would.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replace (or clear) the bounds of `id`.
    pub fn set_rect(&mut self, id: &str, rect: Option<[f64; 4]>) {
        if let Some(el) = self.elements.iter_mut().find(|e| e.id == id) {
            el.rect = rect;
        }
    }

    fn element(&self, id: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn is_descendant(&self, el: &ElementDef, ancestor: &str) -> bool {
        let mut cur = el.parent.as_deref();
        // Bounded walk guards against accidental parent cycles in hand-written fixtures.
        for _ in 0..self.elements.len() {
            match cur {
                Some(p) if p == ancestor => return true,
                Some(p) => cur = self.element(p).and_then(|e| e.parent.as_deref()),
                None => return false,
            }
        }
        false
    }
}

/// Simple selector: `#id`, `.class`, `tag` or `tag.class`.
fn matches(el: &ElementDef, selector: &str) -> bool {
    let selector = selector.trim();
    if let Some(id) = selector.strip_prefix('#') {
        return el.id == id;
    }
    let (tag, class) = match selector.split_once('.') {
        Some((tag, class)) => (tag, Some(class)),
        None => (selector, None),
    };
    let tag_ok = tag.is_empty() || el.tag.eq_ignore_ascii_case(tag);
    let class_ok = class.is_none_or(|c| el.classes.iter().any(|k| k == c));
    tag_ok && class_ok
}

impl Document for StaticDocument {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height.unwrap_or_else(|| {
            self.elements
                .iter()
                .filter_map(|e| e.rect)
                .map(|[_, y, _, h]| y + h)
                .fold(self.viewport.height, f64::max)
        })
    }

    fn select_all(&self, selector: &str) -> Vec<TargetId> {
        self.elements
            .iter()
            .filter(|e| matches(e, selector))
            .map(|e| TargetId::new(e.id.clone()))
            .collect()
    }

    fn select_within(&self, parent: &TargetId, selector: &str) -> Option<TargetId> {
        self.elements
            .iter()
            .find(|e| matches(e, selector) && self.is_descendant(e, parent.as_str()))
            .map(|e| TargetId::new(e.id.clone()))
    }

    fn geometry(&self, target: &TargetId) -> Geometry {
        match self.element(target.as_str()) {
            None => Geometry::Missing,
            Some(ElementDef { rect: None, .. }) => Geometry::Pending,
            Some(ElementDef {
                rect: Some([x, y, w, h]),
                ..
            }) => Geometry::Resolved(Rect::new(*x, *y, x + w, y + h)),
        }
    }

    fn computed_style(&self, target: &TargetId) -> StyleFrame {
        self.element(target.as_str())
            .map(|e| e.style)
            .unwrap_or_default()
    }

    fn css_var(&self, name: &str) -> Option<String> {
        self.css_vars.get(name).cloned()
    }

    fn attribute(&self, target: &TargetId, name: &str) -> Option<String> {
        self.element(target.as_str())
            .and_then(|e| e.attrs.get(name).cloned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/document.rs"]
mod tests;
