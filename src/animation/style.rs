use crate::foundation::core::Rgba8;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Sized {
    /// Interpolate from `a` (`t = 0`) to `b` (`t = 1`).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Exact at both ends so endpoint states are reproduced bit-for-bit.
        if t <= 0.0 {
            *a
        } else if t >= 1.0 {
            *b
        } else {
            a + (b - a) * t
        }
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// One animatable visual property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Property {
    /// Horizontal translation as a percentage of the element's own width.
    XPercent,
    /// Horizontal translation in pixels.
    X,
    /// Vertical translation in pixels.
    Y,
    /// Uniform scale factor.
    Scale,
    /// Gaussian blur radius in pixels.
    Blur,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Foreground text color.
    Color,
}

impl Property {
    const ALL: [Self; 7] = [
        Self::XPercent,
        Self::X,
        Self::Y,
        Self::Scale,
        Self::Blur,
        Self::Opacity,
        Self::Color,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Compact set of [`Property`] values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertySet(u8);

impl PropertySet {
    /// Insert a property.
    pub fn insert(&mut self, p: Property) {
        self.0 |= p.bit();
    }

    /// Membership test.
    pub fn contains(self, p: Property) -> bool {
        self.0 & p.bit() != 0
    }

    /// `true` when no property is shared.
    pub fn is_disjoint(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    /// `true` when the set has no properties.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Property> {
        Property::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

/// A partial visual state: only `Some` fields are written to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleFrame {
    /// Horizontal translation in percent of own width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_percent: Option<f64>,
    /// Horizontal translation in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical translation in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Uniform scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Blur radius in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    /// Opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba8>,
}

impl StyleFrame {
    /// Properties carried by this frame.
    pub fn properties(&self) -> PropertySet {
        let mut set = PropertySet::default();
        let pairs = [
            (self.x_percent.is_some(), Property::XPercent),
            (self.x.is_some(), Property::X),
            (self.y.is_some(), Property::Y),
            (self.scale.is_some(), Property::Scale),
            (self.blur.is_some(), Property::Blur),
            (self.opacity.is_some(), Property::Opacity),
            (self.color.is_some(), Property::Color),
        ];
        for (present, p) in pairs {
            if present {
                set.insert(p);
            }
        }
        set
    }

    /// Value of the CSS initial state for `p`, used when no computed value is available.
    pub fn initial(p: Property) -> Self {
        let mut f = Self::default();
        match p {
            Property::XPercent => f.x_percent = Some(0.0),
            Property::X => f.x = Some(0.0),
            Property::Y => f.y = Some(0.0),
            Property::Scale => f.scale = Some(1.0),
            Property::Blur => f.blur = Some(0.0),
            Property::Opacity => f.opacity = Some(1.0),
            Property::Color => f.color = Some(Rgba8::black()),
        }
        f
    }

    /// Keep only the properties in `set`.
    pub fn restricted_to(&self, set: PropertySet) -> Self {
        let keep = |p: Property| set.contains(p);
        Self {
            x_percent: self.x_percent.filter(|_| keep(Property::XPercent)),
            x: self.x.filter(|_| keep(Property::X)),
            y: self.y.filter(|_| keep(Property::Y)),
            scale: self.scale.filter(|_| keep(Property::Scale)),
            blur: self.blur.filter(|_| keep(Property::Blur)),
            opacity: self.opacity.filter(|_| keep(Property::Opacity)),
            color: self.color.filter(|_| keep(Property::Color)),
        }
    }

    /// Overwrite fields that are `Some` in `other`.
    pub fn merge_from(&mut self, other: &Self) {
        self.x_percent = other.x_percent.or(self.x_percent);
        self.x = other.x.or(self.x);
        self.y = other.y.or(self.y);
        self.scale = other.scale.or(self.scale);
        self.blur = other.blur.or(self.blur);
        self.opacity = other.opacity.or(self.opacity);
        self.color = other.color.or(self.color);
    }

    /// Render as CSS `(property, value)` declarations.
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        let mut transform = Vec::new();
        if let Some(xp) = self.x_percent {
            transform.push(format!("translateX({xp}%)"));
        }
        if self.x.is_some() || self.y.is_some() {
            let x = self.x.unwrap_or(0.0);
            let y = self.y.unwrap_or(0.0);
            transform.push(format!("translate({x}px, {y}px)"));
        }
        if let Some(s) = self.scale {
            transform.push(format!("scale({s})"));
        }
        if !transform.is_empty() {
            out.push(("transform", transform.join(" ")));
        }
        if let Some(b) = self.blur {
            out.push(("filter", format!("blur({b}px)")));
        }
        if let Some(o) = self.opacity {
            out.push(("opacity", o.to_string()));
        }
        if let Some(c) = self.color {
            out.push(("color", c.to_string()));
        }
        out
    }
}

impl Lerp for StyleFrame {
    /// Interpolate properties present in both frames; a property present on one side only is
    /// carried through unchanged.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn num(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
            match (a, b) {
                (Some(a), Some(b)) => Some(f64::lerp(&a, &b, t)),
                (a, b) => a.or(b),
            }
        }

        let color = match (a.color, b.color) {
            (Some(ca), Some(cb)) => Some(Rgba8::lerp(&ca, &cb, t.clamp(0.0, 1.0))),
            (ca, cb) => ca.or(cb),
        };

        Self {
            x_percent: num(a.x_percent, b.x_percent, t),
            x: num(a.x, b.x, t),
            y: num(a.y, b.y, t),
            scale: num(a.scale, b.scale, t),
            blur: num(a.blur, b.blur, t),
            opacity: num(a.opacity, b.opacity, t),
            color,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/style.rs"]
mod tests;
