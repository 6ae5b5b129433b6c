use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

pub use kurbo::Rect;

/// Stable identifier of a page element as handed out by the host [`Document`].
///
/// [`Document`]: crate::Document
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TargetId(pub String);

impl TargetId {
    /// Build an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Visible viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport; both sides must be finite and positive.
    pub fn new(width: f64, height: f64) -> ScrollSyncResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ScrollSyncError::validation(
                "Viewport width and height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Element geometry as reported by the layout system.
///
/// Rects are in document coordinates (scroll offset 0), excluding any pin translation the
/// core applies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    /// No element matches.
    Missing,
    /// The element exists but has not been laid out yet.
    Pending,
    /// Laid-out bounds.
    Resolved(Rect),
}

impl Geometry {
    /// Bounds when resolved.
    pub fn rect(self) -> Option<Rect> {
        match self {
            Self::Resolved(r) => Some(r),
            Self::Missing | Self::Pending => None,
        }
    }
}

/// Straight-alpha RGBA8 color, interpolated per channel in sRGB space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque black, the CSS initial color.
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl FromStr for Rgba8 {
    type Err = ScrollSyncError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_fn(body);
        }
        Err(ScrollSyncError::validation(format!(
            "unsupported color syntax \"{s}\""
        )))
    }
}

fn parse_hex(hex: &str) -> ScrollSyncResult<Rgba8> {
    fn byte(pair: &str) -> ScrollSyncResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| ScrollSyncError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    if !hex.is_ascii() {
        return Err(ScrollSyncError::validation("hex color must be ASCII"));
    }
    match hex.len() {
        3 => {
            let mut ch = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = byte(&c.to_string())?;
                ch[i] = v * 17;
            }
            Ok(Rgba8::rgb(ch[0], ch[1], ch[2]))
        }
        6 => Ok(Rgba8::rgb(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
        )),
        8 => Ok(Rgba8 {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: byte(&hex[6..8])?,
        }),
        _ => Err(ScrollSyncError::validation(
            "hex color must be #RGB, #RRGGBB or #RRGGBBAA",
        )),
    }
}

fn parse_rgb_fn(body: &str) -> ScrollSyncResult<Rgba8> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ScrollSyncError::validation(
            "rgb()/rgba() expects 3 or 4 components",
        ));
    }
    let channel = |p: &str| -> ScrollSyncResult<u8> {
        let v: f64 = p
            .parse()
            .map_err(|_| ScrollSyncError::validation(format!("invalid color channel \"{p}\"")))?;
        Ok(v.round().clamp(0.0, 255.0) as u8)
    };
    let a = match parts.get(3) {
        Some(p) => {
            let v: f64 = p
                .parse()
                .map_err(|_| ScrollSyncError::validation(format!("invalid alpha \"{p}\"")))?;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Rgba8 {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a,
    })
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let a = f64::from(self.a) / 255.0;
            write!(f, "rgba({}, {}, {}, {a:.3})", self.r, self.g, self.b)
        }
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = ScrollSyncError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        c.to_string()
    }
}

/// Parse a CSS pixel length such as `"12px"` or `" 8 "`.
pub fn parse_px(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
