//! scrollsync is a deterministic scroll-to-animation synchronization core.
//!
//! It maps a continuously changing scroll position to a recomputable set of visual states:
//! smooth-scroll physics, scroll-triggered regions with pinning, scrubbed timelines, a
//! frame-scrubbed vector animation, a one-shot reveal watcher and idle micro-gestures.
//!
//! The page itself stays outside: everything is read through [`Document`] and written through
//! [`Surface`]. The public API is session-oriented:
//!
//! - Load and validate a [`SessionConfig`]
//! - Install a [`ScrollSession`] against the host seams
//! - Drive it with [`ScrollSession::on_frame`] and the input/layout notifications
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod foundation;
mod gesture;
mod host;
mod player;
mod reveal;
mod scene;
mod scroll;
mod session;
mod trigger;

pub use crate::foundation::core::{Geometry, Rect, Rgba8, TargetId, Viewport, parse_px};
pub use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::style::{Lerp, Property, PropertySet, StyleFrame};
pub use crate::animation::timeline::{DEFAULT_TRACK_DURATION, Timeline, Track};
pub use crate::config::SessionConfig;
pub use crate::gesture::{GestureConfig, GestureHandle, GestureTimer, IdleScheduler, PointerEvent};
pub use crate::host::document::{Document, ElementDef, StaticDocument};
pub use crate::host::frames::{CountingScheduler, FrameScheduler, MotionPreference};
pub use crate::host::player::{PlayerLog, RecordingPlayer, RecordingPlayerLoader};
pub use crate::host::surface::{RecordedElement, RecordingSurface, Surface};
pub use crate::player::{
    AssetMetadata, FrameCount, PlayerLoader, PlayerRequest, Renderer, ScrubbedPlayer,
    VectorPlayer, frame_for_progress,
};
pub use crate::reveal::{
    IntersectionEntry, RevealConfig, RevealState, RevealWatcher, intersection_ratio,
};
pub use crate::scene::{
    ChapterScene, FadeScene, HeroScene, LottieScene, SceneConfig, SceneHandles, TrackScene,
    install_scene,
};
pub use crate::scroll::physics::{Integrator, ScrollLoop, ScrollSnapshot, SmoothScrollConfig};
pub use crate::session::ScrollSession;
pub use crate::trigger::binding::{LifecycleEvent, ProgressBinding, TimelineBinding};
pub use crate::trigger::coordinator::{RegionHandle, TriggerCoordinator};
pub use crate::trigger::region::{Drive, Lifecycle, Region, RegionSpec, pin_offset, scrub_progress};
pub use crate::trigger::threshold::{Anchor, Span, Threshold};
