//! Frame-scrubbed vector animation playback.
//!
//! A [`ScrubbedPlayer`] never plays: every progress update seeks the underlying player to
//! `floor(progress * (frames - 1))` and holds that frame. The frame count arrives late (after
//! the asset's metadata loads), so it is modelled as a two-phase [`FrameCount`].

use crate::foundation::core::TargetId;
use crate::foundation::error::ScrollSyncResult;
use crate::host::surface::Surface;
use crate::trigger::binding::ProgressBinding;

/// Renderer requested from the vector-animation player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Renderer {
    /// Inline SVG output.
    #[default]
    Svg,
    /// Canvas 2D output.
    Canvas,
}

/// Arguments for [`PlayerLoader::load`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRequest {
    /// Element hosting the animation.
    pub container: TargetId,
    /// Renderer kind.
    pub renderer: Renderer,
    /// Start playing on load. Scrubbed players always pass `false`.
    pub autoplay: bool,
    /// Loop playback. Scrubbed players always pass `false`.
    pub looping: bool,
    /// Asset reference (path or URL).
    pub path: String,
}

/// Metadata state of a loaded asset, as reported by the player.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetMetadata {
    /// Still loading.
    Pending,
    /// Loaded; `total_frames` may be 0 when the asset does not declare a duration.
    Ready {
        /// Total frame count of the animation.
        total_frames: f64,
    },
    /// Loading failed.
    Failed(String),
}

/// Handle to one loaded vector animation.
pub trait VectorPlayer {
    /// Poll the asset's metadata.
    fn metadata(&self) -> AssetMetadata;
    /// Jump to `frame` and stop there.
    fn seek_to_frame(&mut self, frame: u32, force_redraw: bool);
}

/// Loads vector animations into containers.
pub trait PlayerLoader {
    /// Start loading; returns immediately, metadata resolves later.
    fn load(&mut self, req: PlayerRequest) -> ScrollSyncResult<Box<dyn VectorPlayer>>;
}

/// Two-phase frame count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameCount {
    /// Metadata not resolved yet; seeking is skipped.
    Pending,
    /// Known frame count (always >= 1).
    Resolved(u32),
}

impl FrameCount {
    /// Frame count used for quantization; `0` while pending.
    pub fn effective(self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::Resolved(n) => n,
        }
    }
}

/// Quantize `progress` to a frame index, or `None` when no frames are known.
pub fn frame_for_progress(progress: f64, frame_count: u32) -> Option<u32> {
    if frame_count == 0 {
        return None;
    }
    let last = f64::from(frame_count - 1);
    let p = progress.clamp(0.0, 1.0);
    Some(((p * last).floor() as u32).min(frame_count - 1))
}

/// Progress binding that scrubs a [`VectorPlayer`].
pub struct ScrubbedPlayer {
    player: Box<dyn VectorPlayer>,
    frames: FrameCount,
    fallback_frames: u32,
    last_frame: Option<u32>,
}

impl ScrubbedPlayer {
    /// Wrap a loaded player. `fallback_frames` is used when the asset reports no duration or
    /// fails to load.
    pub fn new(player: Box<dyn VectorPlayer>, fallback_frames: u32) -> Self {
        Self {
            player,
            frames: FrameCount::Pending,
            fallback_frames: fallback_frames.max(1),
            last_frame: None,
        }
    }

    /// Current frame count state.
    pub fn frame_count(&self) -> FrameCount {
        self.frames
    }

    /// Last frame sent to the player.
    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }

    /// Resolve the frame count from player metadata if still pending.
    pub fn poll_metadata(&mut self) {
        if self.frames != FrameCount::Pending {
            return;
        }
        match self.player.metadata() {
            AssetMetadata::Pending => {}
            AssetMetadata::Ready { total_frames } => {
                let n = if total_frames.is_finite() && total_frames >= 1.0 {
                    total_frames.round().min(f64::from(u32::MAX)) as u32
                } else {
                    self.fallback_frames
                };
                tracing::debug!(frames = n, "vector animation metadata resolved");
                self.frames = FrameCount::Resolved(n);
            }
            AssetMetadata::Failed(reason) => {
                tracing::warn!(%reason, fallback = self.fallback_frames, "vector animation failed to load");
                self.frames = FrameCount::Resolved(self.fallback_frames);
            }
        }
    }
}

impl ProgressBinding for ScrubbedPlayer {
    fn on_progress(&mut self, progress: f64, _surface: &mut dyn Surface) {
        self.poll_metadata();
        let Some(frame) = frame_for_progress(progress, self.frames.effective()) else {
            return;
        };
        tracing::trace!(progress, frame, "seek");
        self.player.seek_to_frame(frame, true);
        self.last_frame = Some(frame);
    }
}

#[cfg(test)]
#[path = "../tests/unit/player/scrub.rs"]
mod tests;
