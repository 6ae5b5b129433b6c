use crate::animation::ease::Ease;
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

/// Integrator advancing the virtual scroll offset toward its target.
///
/// Both variants approach the target monotonically and never overshoot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Integrator {
    /// Fixed-duration eased glide restarted from the current offset on every new target.
    #[serde(rename_all = "camelCase")]
    Duration {
        /// Glide length in seconds.
        duration_s: f64,
        /// Curve shaping the glide; must map `[0, 1]` onto `[0, 1]`.
        ease: Ease,
    },
    /// Frame-rate independent exponential damping.
    Damped {
        /// Fraction of the remaining distance covered per 60 Hz frame, in `(0, 1]`.
        lerp: f64,
    },
}

/// Smooth-scroll settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothScrollConfig {
    /// Run the physics loop at all.
    pub enabled: bool,
    /// Integrator parameters.
    pub integrator: Integrator,
    /// Smooth wheel input.
    pub smooth_wheel: bool,
    /// Smooth touch input; when off, touch scrolling maps 1:1.
    pub smooth_touch: bool,
    /// Multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            integrator: Integrator::Duration {
                duration_s: 1.2,
                ease: Ease::OutQuad,
            },
            smooth_wheel: true,
            smooth_touch: false,
            wheel_multiplier: 1.0,
        }
    }
}

impl SmoothScrollConfig {
    /// Check integrator parameters.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        match self.integrator {
            Integrator::Duration { duration_s, .. } => {
                if !(duration_s.is_finite() && duration_s > 0.0) {
                    return Err(ScrollSyncError::validation(
                        "smooth scroll duration must be finite and > 0",
                    ));
                }
            }
            Integrator::Damped { lerp } => {
                if !(lerp > 0.0 && lerp <= 1.0) {
                    return Err(ScrollSyncError::validation(
                        "smooth scroll lerp must be in (0, 1]",
                    ));
                }
            }
        }
        if !(self.wheel_multiplier.is_finite() && self.wheel_multiplier > 0.0) {
            return Err(ScrollSyncError::validation(
                "wheel multiplier must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Immutable per-frame view of the virtual scroll state.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSnapshot {
    /// Smoothed offset; the value every trigger computes against.
    pub offset: f64,
    /// Offset change since the previous frame.
    pub velocity: f64,
    /// Target offset the integrator is heading to.
    pub target: f64,
    /// Maximum scroll offset.
    pub limit: f64,
    /// Frame timestamp in milliseconds.
    pub time_ms: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct VirtualScrollState {
    offset: f64,
    velocity: f64,
    target: f64,
    limit: f64,
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    from: f64,
    to: f64,
    elapsed_s: f64,
}

/// Sub-pixel distance at which damping snaps onto the target.
const SETTLE_EPSILON_PX: f64 = 0.5;

/// Owner and single writer of the virtual scroll state.
#[derive(Clone, Debug)]
pub struct ScrollLoop {
    cfg: SmoothScrollConfig,
    state: VirtualScrollState,
    glide: Option<Glide>,
    last_time_ms: Option<f64>,
}

impl ScrollLoop {
    /// Start at offset 0 with the given scroll limit.
    pub fn new(cfg: SmoothScrollConfig, limit: f64) -> Self {
        Self {
            cfg,
            state: VirtualScrollState {
                limit: limit.max(0.0),
                ..VirtualScrollState::default()
            },
            glide: None,
            last_time_ms: None,
        }
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.state.limit)
    }

    /// Current state as a snapshot (timestamp of the last advanced frame).
    pub fn snapshot(&self) -> ScrollSnapshot {
        ScrollSnapshot {
            offset: self.state.offset,
            velocity: self.state.velocity,
            target: self.state.target,
            limit: self.state.limit,
            time_ms: self.last_time_ms.unwrap_or(0.0),
        }
    }

    /// `true` while the offset has not reached the target.
    pub fn is_animating(&self) -> bool {
        self.state.offset != self.state.target
    }

    /// Wheel input. Deltas accumulate into the target.
    pub fn wheel(&mut self, delta_px: f64) {
        let target = self.clamp(self.state.target + delta_px * self.cfg.wheel_multiplier);
        if self.cfg.smooth_wheel {
            self.glide_to(target);
        } else {
            self.jump_to(target);
        }
    }

    /// Touch input reporting an absolute offset.
    pub fn touch(&mut self, offset_px: f64) {
        let target = self.clamp(offset_px);
        if self.cfg.smooth_touch {
            self.glide_to(target);
        } else {
            self.jump_to(target);
        }
    }

    /// Native scroll that bypassed the loop (keyboard, scrollbar, anchor links).
    pub fn sync_native(&mut self, offset_px: f64) {
        let target = self.clamp(offset_px);
        self.jump_to(target);
    }

    /// Replace the maximum offset, e.g. after a resize.
    pub fn set_limit(&mut self, limit: f64) {
        self.state.limit = limit.max(0.0);
        self.state.target = self.clamp(self.state.target);
        self.state.offset = self.clamp(self.state.offset);
        if self.state.offset == self.state.target {
            self.glide = None;
        } else if let Some(g) = self.glide.as_mut() {
            if g.to != self.state.target {
                // Restart from the current offset toward the clamped target.
                g.from = self.state.offset;
                g.to = self.state.target;
                g.elapsed_s = 0.0;
            }
        }
    }

    fn glide_to(&mut self, target: f64) {
        self.state.target = target;
        self.glide = Some(Glide {
            from: self.state.offset,
            to: target,
            elapsed_s: 0.0,
        });
    }

    fn jump_to(&mut self, target: f64) {
        let prev = self.state.offset;
        self.glide = None;
        self.state.target = target;
        self.state.offset = target;
        self.state.velocity = target - prev;
    }

    /// Advance one display frame and return the snapshot for that frame.
    pub fn advance(&mut self, time_ms: f64) -> ScrollSnapshot {
        let dt_s = match self.last_time_ms {
            Some(prev) => ((time_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_time_ms = Some(time_ms);

        let prev = self.state.offset;
        match self.cfg.integrator {
            Integrator::Duration { duration_s, ease } => {
                if let Some(g) = self.glide.as_mut() {
                    g.elapsed_s += dt_s;
                    let t = (g.elapsed_s / duration_s).clamp(0.0, 1.0);
                    if t >= 1.0 {
                        self.state.offset = g.to;
                        self.glide = None;
                    } else {
                        self.state.offset = g.from + (g.to - g.from) * ease.apply(t);
                    }
                }
            }
            Integrator::Damped { lerp } => {
                if self.glide.take().is_some() || self.is_animating() {
                    let remaining = self.state.target - self.state.offset;
                    let keep = (1.0 - lerp).powf(dt_s * 60.0);
                    let next = self.state.target - remaining * keep;
                    self.state.offset = if (self.state.target - next).abs() < SETTLE_EPSILON_PX {
                        self.state.target
                    } else {
                        next
                    };
                }
            }
        }
        self.state.velocity = self.state.offset - prev;
        self.snapshot()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/physics.rs"]
mod tests;
