//! Region threshold grammar.
//!
//! - `"<element> <viewport>"`: scroll offset at which the element anchor meets the viewport
//!   anchor. Anchors are `top`, `center`, `bottom`, `N%` or `Npx`.
//! - `"+=<span>"`: distance after the start offset. Spans are `N%`/`Nvh` (viewport height),
//!   `Nvw` (viewport width) or `Npx`.

use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Rect, Viewport};
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

/// A point along one axis of a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Percentage of the extent (`top` = 0, `center` = 50, `bottom` = 100).
    Percent(f64),
    /// Absolute pixel distance from the leading edge.
    Px(f64),
}

impl Anchor {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Percent(pct) => extent * pct / 100.0,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ScrollSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" | "left" => return Ok(Self::Percent(0.0)),
            "center" => return Ok(Self::Percent(50.0)),
            "bottom" | "right" => return Ok(Self::Percent(100.0)),
            _ => {}
        }
        if let Some(pct) = s.strip_suffix('%') {
            return parse_number(pct).map(Self::Percent);
        }
        parse_number(s.strip_suffix("px").unwrap_or(s)).map(Self::Px)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Percent(v) if v == 0.0 => f.write_str("top"),
            Self::Percent(v) if v == 50.0 => f.write_str("center"),
            Self::Percent(v) if v == 100.0 => f.write_str("bottom"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// Scroll distance that depends on the viewport at refresh time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Span {
    /// Percentage of the viewport height.
    ViewportHeight(f64),
    /// Percentage of the viewport width.
    ViewportWidth(f64),
    /// Fixed pixels.
    Px(f64),
}

impl Span {
    /// Pixel length for `viewport`.
    pub fn resolve(self, viewport: Viewport) -> f64 {
        match self {
            Self::ViewportHeight(pct) => viewport.height * pct / 100.0,
            Self::ViewportWidth(pct) => viewport.width * pct / 100.0,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Span {
    type Err = ScrollSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(v) = s.strip_suffix("vw") {
            return parse_number(v).map(Self::ViewportWidth);
        }
        if let Some(v) = s.strip_suffix("vh").or_else(|| s.strip_suffix('%')) {
            return parse_number(v).map(Self::ViewportHeight);
        }
        parse_number(s.strip_suffix("px").unwrap_or(s)).map(Self::Px)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ViewportHeight(v) => write!(f, "{v}%"),
            Self::ViewportWidth(v) => write!(f, "{v}vw"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// Start or end threshold of a region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Threshold {
    /// Element anchor meets viewport anchor.
    Edges {
        /// Anchor on the trigger element.
        element: Anchor,
        /// Anchor on the viewport.
        viewport: Anchor,
    },
    /// Distance after the region start. Only valid as an end threshold.
    Relative(Span),
}

impl Threshold {
    /// `"top top"`.
    pub const TOP_TOP: Self = Self::Edges {
        element: Anchor::Percent(0.0),
        viewport: Anchor::Percent(0.0),
    };

    /// Scroll offset for an edge threshold against `rect`; `None` for relative thresholds.
    pub fn edge_offset(self, rect: Rect, viewport: Viewport) -> Option<f64> {
        match self {
            Self::Edges {
                element,
                viewport: vp_anchor,
            } => Some(rect.y0 + element.resolve(rect.height()) - vp_anchor.resolve(viewport.height)),
            Self::Relative(_) => None,
        }
    }

    /// Resolve as an end threshold given the already-resolved `start`.
    pub fn end_offset(self, start: f64, rect: Rect, viewport: Viewport) -> f64 {
        match self {
            Self::Relative(span) => start + span.resolve(viewport),
            Self::Edges { .. } => self.edge_offset(rect, viewport).unwrap_or(start),
        }
    }
}

impl FromStr for Threshold {
    type Err = ScrollSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("+=") {
            return rest.parse().map(Self::Relative);
        }
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(el), Some(vp), None) => Ok(Self::Edges {
                element: el.parse()?,
                viewport: vp.parse()?,
            }),
            _ => Err(ScrollSyncError::validation(format!(
                "threshold \"{s}\" must be \"<element> <viewport>\" or \"+=<span>\""
            ))),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edges { element, viewport } => write!(f, "{element} {viewport}"),
            Self::Relative(span) => write!(f, "+={span}"),
        }
    }
}

impl TryFrom<String> for Threshold {
    type Error = ScrollSyncError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Threshold> for String {
    fn from(t: Threshold) -> Self {
        t.to_string()
    }
}

fn parse_number(s: &str) -> ScrollSyncResult<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScrollSyncError::validation(format!("invalid threshold value \"{s}\"")))
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/threshold.rs"]
mod tests;
