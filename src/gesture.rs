//! Idle micro-gestures on call-to-action elements.
//!
//! Every target breathes (an endless scale yoyo), its icon is nudged on a jittered timer, and
//! pointer hover tweens the scale. All gestures are functions of frame time, so a host that
//! stops calling [`IdleScheduler::tick`] freezes them.

use crate::animation::ease::Ease;
use crate::animation::style::{Lerp, StyleFrame};
use crate::foundation::core::TargetId;
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};
use crate::foundation::rng::Rng64;
use crate::host::document::Document;
use crate::host::surface::Surface;

/// Gesture timing and selectors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    /// Gesture targets.
    pub selector: String,
    /// Sub-element receiving the nudge.
    pub icon_selector: String,
    /// Peak scale of the breathing yoyo.
    pub breathe_scale: f64,
    /// One leg (1 -> peak) of the breathing yoyo, in milliseconds.
    pub breathe_leg_ms: f64,
    /// Horizontal nudge distance in pixels.
    pub nudge_px: f64,
    /// One leg of the nudge, in milliseconds.
    pub nudge_leg_ms: f64,
    /// Delay of the first nudge after attach.
    pub first_nudge_ms: f64,
    /// Lower bound of the delay between nudges.
    pub nudge_min_ms: f64,
    /// Random extra delay added on top of `nudge_min_ms`, drawn from `[0, nudge_jitter_ms)`.
    pub nudge_jitter_ms: f64,
    /// Scale while hovered.
    pub hover_scale: f64,
    /// Hover tween length.
    pub hover_ms: f64,
    /// Seed for the nudge jitter.
    pub seed: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            selector: ".cta-wiggle".to_owned(),
            icon_selector: ".cta-icon".to_owned(),
            breathe_scale: 1.02,
            breathe_leg_ms: 1800.0,
            nudge_px: 6.0,
            nudge_leg_ms: 280.0,
            first_nudge_ms: 3000.0,
            nudge_min_ms: 6000.0,
            nudge_jitter_ms: 3000.0,
            hover_scale: 1.05,
            hover_ms: 200.0,
            seed: 0x5C20_11C7_A000_0001,
        }
    }
}

impl GestureConfig {
    /// Check that every duration is positive and the jitter is non-negative.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        let positive = [
            ("breatheLegMs", self.breathe_leg_ms),
            ("nudgeLegMs", self.nudge_leg_ms),
            ("nudgeMinMs", self.nudge_min_ms),
            ("hoverMs", self.hover_ms),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(ScrollSyncError::validation(format!(
                    "gesture {name} must be finite and > 0"
                )));
            }
        }
        if !(self.first_nudge_ms.is_finite() && self.first_nudge_ms >= 0.0) {
            return Err(ScrollSyncError::validation(
                "gesture firstNudgeMs must be finite and >= 0",
            ));
        }
        if !(self.nudge_jitter_ms.is_finite() && self.nudge_jitter_ms >= 0.0) {
            return Err(ScrollSyncError::validation(
                "gesture nudgeJitterMs must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Pointer transitions delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerEvent {
    /// Pointer entered the target.
    Enter,
    /// Pointer left the target.
    Leave,
}

/// Handle to one gesture target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GestureHandle(usize);

/// Nudge timer of one gesture target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureTimer {
    /// Frame time at which the next nudge starts.
    pub next_fire_ms: f64,
    /// Nudges fired so far.
    pub fired: u32,
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    start_ms: f64,
}

#[derive(Clone, Debug)]
struct GestureTarget {
    target: TargetId,
    icon: Option<TargetId>,
    attached_ms: f64,
    timer: GestureTimer,
    nudge_from_ms: Option<f64>,
    hover: Option<Tween>,
    last_scale: f64,
    cancelled: bool,
}

/// Position in `[0, 1]` of an endless yoyo at `elapsed_ms`; odd legs play the curve backwards.
fn yoyo(elapsed_ms: f64, leg_ms: f64, ease: Ease) -> f64 {
    let legs = elapsed_ms.max(0.0) / leg_ms;
    let k = legs.floor();
    let frac = legs - k;
    if k as u64 % 2 == 0 {
        ease.apply(frac)
    } else {
        ease.apply(1.0 - frac)
    }
}

/// Drives breathing, nudges and hover tweens for every attached target.
#[derive(Clone, Debug)]
pub struct IdleScheduler {
    cfg: GestureConfig,
    rng: Rng64,
    targets: Vec<GestureTarget>,
}

impl IdleScheduler {
    /// Scheduler with no targets.
    pub fn new(cfg: GestureConfig) -> Self {
        let rng = Rng64::new(cfg.seed);
        Self {
            cfg,
            rng,
            targets: Vec::new(),
        }
    }

    /// Attach every element matching the configured selector.
    pub fn attach_all(&mut self, doc: &dyn Document, now_ms: f64) -> Vec<GestureHandle> {
        let found = doc.select_all(&self.cfg.selector);
        if found.is_empty() {
            tracing::debug!(selector = %self.cfg.selector, "no gesture targets");
        }
        let mut handles = Vec::with_capacity(found.len());
        for target in found {
            let icon = doc.select_within(&target, &self.cfg.icon_selector);
            handles.push(self.attach(target, icon, now_ms));
        }
        handles
    }

    /// Attach one target; the first nudge fires `first_nudge_ms` after `now_ms`.
    pub fn attach(&mut self, target: TargetId, icon: Option<TargetId>, now_ms: f64) -> GestureHandle {
        tracing::debug!(%target, has_icon = icon.is_some(), "gesture target attached");
        self.targets.push(GestureTarget {
            target,
            icon,
            attached_ms: now_ms,
            timer: GestureTimer {
                next_fire_ms: now_ms + self.cfg.first_nudge_ms,
                fired: 0,
            },
            nudge_from_ms: None,
            hover: None,
            last_scale: 1.0,
            cancelled: false,
        });
        GestureHandle(self.targets.len() - 1)
    }

    /// Stop every gesture of `handle`; the last written styles stay in place.
    pub fn cancel(&mut self, handle: GestureHandle) {
        if let Some(t) = self.targets.get_mut(handle.0) {
            t.cancelled = true;
        }
    }

    /// Cancel every target.
    pub fn cancel_all(&mut self) {
        for t in &mut self.targets {
            t.cancelled = true;
        }
    }

    /// `true` while `handle` has not been cancelled.
    pub fn is_active(&self, handle: GestureHandle) -> bool {
        self.targets.get(handle.0).is_some_and(|t| !t.cancelled)
    }

    /// Nudge timer of `handle`.
    pub fn timer(&self, handle: GestureHandle) -> Option<GestureTimer> {
        self.targets.get(handle.0).map(|t| t.timer)
    }

    /// Number of attached targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// `true` when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Start a hover tween from the current scale.
    pub fn on_pointer(&mut self, target: &TargetId, event: PointerEvent, now_ms: f64) {
        let to = match event {
            PointerEvent::Enter => self.cfg.hover_scale,
            PointerEvent::Leave => self.cfg.breathe_scale,
        };
        for t in self.targets.iter_mut().filter(|t| &t.target == target && !t.cancelled) {
            t.hover = Some(Tween {
                from: t.last_scale,
                to,
                start_ms: now_ms,
            });
        }
    }

    /// Write every gesture's state for frame time `now_ms`.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) {
        let cfg = &self.cfg;
        for t in self.targets.iter_mut().filter(|t| !t.cancelled) {
            let breathe = yoyo(now_ms - t.attached_ms, cfg.breathe_leg_ms, Ease::InOutSine);
            let mut scale = f64::lerp(&1.0, &cfg.breathe_scale, breathe);

            // Hover renders after breathing, so it wins while it runs.
            if let Some(h) = t.hover {
                let u = ((now_ms - h.start_ms) / cfg.hover_ms).clamp(0.0, 1.0);
                scale = f64::lerp(&h.from, &h.to, Ease::OutQuad.apply(u));
                if u >= 1.0 {
                    t.hover = None;
                }
            }
            t.last_scale = scale;
            surface.apply_style(
                &t.target,
                &StyleFrame {
                    scale: Some(scale),
                    ..StyleFrame::default()
                },
            );

            if now_ms >= t.timer.next_fire_ms {
                let scheduled = t.timer.next_fire_ms;
                // A timer more than one whole nudge late fires now and re-arms from now.
                let fired_at = if now_ms - scheduled >= 2.0 * cfg.nudge_leg_ms {
                    now_ms
                } else {
                    scheduled
                };
                t.nudge_from_ms = Some(fired_at);
                t.timer.fired += 1;
                t.timer.next_fire_ms = fired_at
                    + self
                        .rng
                        .range_f64(cfg.nudge_min_ms, cfg.nudge_min_ms + cfg.nudge_jitter_ms);
                tracing::trace!(target = %t.target, next = t.timer.next_fire_ms, "nudge");
            }

            let Some(icon) = t.icon.as_ref() else {
                continue;
            };
            if let Some(from) = t.nudge_from_ms {
                let elapsed = now_ms - from;
                let x = if elapsed >= 2.0 * cfg.nudge_leg_ms {
                    t.nudge_from_ms = None;
                    0.0
                } else {
                    cfg.nudge_px * yoyo(elapsed, cfg.nudge_leg_ms, Ease::InOutQuad)
                };
                surface.apply_style(
                    icon,
                    &StyleFrame {
                        x: Some(x),
                        ..StyleFrame::default()
                    },
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/gesture/scheduler.rs"]
mod tests;
