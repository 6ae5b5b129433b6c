//! Scroll-linked scene: the concrete regions and timelines of the page.
//!
//! Every section is optional. A section whose trigger or targets are absent from the document
//! is skipped and logged; it never fails the install.

use crate::animation::style::{Property, PropertySet, StyleFrame};
use crate::animation::timeline::{Timeline, Track};
use crate::foundation::core::{Rgba8, TargetId, parse_px};
use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};
use crate::host::document::Document;
use crate::player::{PlayerLoader, PlayerRequest, Renderer, ScrubbedPlayer};
use crate::trigger::binding::TimelineBinding;
use crate::trigger::coordinator::{RegionHandle, TriggerCoordinator};
use crate::trigger::region::RegionSpec;
use crate::trigger::threshold::{Anchor, Span, Threshold};

/// `"top 80%"`: element top meets 80% of the viewport height.
const TOP_80: Threshold = Threshold::Edges {
    element: Anchor::Percent(0.0),
    viewport: Anchor::Percent(80.0),
};

/// `"bottom 20%"`.
const BOTTOM_20: Threshold = Threshold::Edges {
    element: Anchor::Percent(100.0),
    viewport: Anchor::Percent(20.0),
};

/// Hero section: titles, phone mock and heading fade out while drifting apart.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroScene {
    /// Trigger element.
    pub trigger: String,
    /// End of the scrubbed window.
    pub end: Threshold,
    /// Title elements drifting left.
    pub titles: Vec<String>,
    /// Phone mock drifting right.
    pub phone: String,
    /// Heading zooming forward.
    pub heading: String,
    /// Color the heading turns into.
    pub heading_color: Rgba8,
}

impl Default for HeroScene {
    fn default() -> Self {
        Self {
            trigger: "header.hero".to_owned(),
            end: Threshold::Relative(Span::ViewportHeight(90.0)),
            titles: vec!["#logoText".to_owned(), "#subtitle".to_owned()],
            phone: "#phoneMock".to_owned(),
            heading: "#heroH2".to_owned(),
            heading_color: Rgba8::rgb(0x7C, 0xFC, 0x00),
        }
    }
}

/// Per-element enter/exit fade.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadeScene {
    /// Elements, each one its own region.
    pub selector: String,
    /// Start threshold.
    pub start: Threshold,
    /// End threshold.
    pub end: Threshold,
    /// Initial vertical offset in pixels.
    pub rise_px: f64,
}

impl Default for FadeScene {
    fn default() -> Self {
        Self {
            selector: ".fade-in-out".to_owned(),
            start: TOP_80,
            end: BOTTOM_20,
            rise_px: 20.0,
        }
    }
}

/// Pinned chapter: the mockup zooms while its screen fades in.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChapterScene {
    /// Pinned trigger element.
    pub trigger: String,
    /// End of the pinned window.
    pub end: Threshold,
    /// Mockup container.
    pub mockup: String,
    /// Inner screen revealed alongside the mockup.
    pub screen: String,
}

impl Default for ChapterScene {
    fn default() -> Self {
        Self {
            trigger: ".chapter".to_owned(),
            end: Threshold::Relative(Span::ViewportHeight(220.0)),
            mockup: ".mockup".to_owned(),
            screen: ".mockup__screen".to_owned(),
        }
    }
}

/// Horizontally scrolling panel track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackScene {
    /// Pinned wrapper.
    pub wrap: String,
    /// Translated track.
    pub track: String,
    /// Panels; their count sets the travel distance.
    pub panel: String,
}

impl Default for TrackScene {
    fn default() -> Self {
        Self {
            wrap: ".hwrap".to_owned(),
            track: ".htrack".to_owned(),
            panel: ".hpanel".to_owned(),
        }
    }
}

/// Scroll-scrubbed vector animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LottieScene {
    /// Container element; also the trigger.
    pub container: String,
    /// Attribute holding the asset path.
    pub path_attr: String,
    /// Renderer requested from the player.
    pub renderer: Renderer,
    /// Start threshold.
    pub start: Threshold,
    /// End threshold.
    pub end: Threshold,
    /// Frame count used when the asset declares none or fails to load.
    pub fallback_frames: u32,
}

impl Default for LottieScene {
    fn default() -> Self {
        Self {
            container: "#lottie".to_owned(),
            path_attr: "data-path".to_owned(),
            renderer: Renderer::Svg,
            start: TOP_80,
            end: BOTTOM_20,
            fallback_frames: 180,
        }
    }
}

/// Selectors and constants of every scroll-linked section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    /// Root CSS variable holding the maximum blur.
    pub blur_var: String,
    /// Blur used when the variable is absent or unparseable, in pixels.
    pub blur_fallback_px: f64,
    /// Hero section.
    pub hero: HeroScene,
    /// Fade-in-out elements.
    pub fades: FadeScene,
    /// Pinned chapter.
    pub chapter: ChapterScene,
    /// Horizontal track.
    pub track: TrackScene,
    /// Scrubbed vector animation.
    pub lottie: LottieScene,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            blur_var: "--blur-max".to_owned(),
            blur_fallback_px: 12.0,
            hero: HeroScene::default(),
            fades: FadeScene::default(),
            chapter: ChapterScene::default(),
            track: TrackScene::default(),
            lottie: LottieScene::default(),
        }
    }
}

impl SceneConfig {
    /// Check thresholds and numeric constants.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        if !(self.blur_fallback_px.is_finite() && self.blur_fallback_px >= 0.0) {
            return Err(ScrollSyncError::validation(
                "blurFallbackPx must be finite and >= 0",
            ));
        }
        if !self.fades.rise_px.is_finite() {
            return Err(ScrollSyncError::validation("fades.risePx must be finite"));
        }
        for (name, start) in [("fades", self.fades.start), ("lottie", self.lottie.start)] {
            if matches!(start, Threshold::Relative(_)) {
                return Err(ScrollSyncError::validation(format!(
                    "{name}.start must be \"<element> <viewport>\""
                )));
            }
        }
        if self.lottie.fallback_frames == 0 {
            return Err(ScrollSyncError::validation(
                "lottie.fallbackFrames must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Regions registered by [`install_scene`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneHandles {
    /// Hero region.
    pub hero: Option<RegionHandle>,
    /// One region per fade element.
    pub fades: Vec<RegionHandle>,
    /// Pinned chapter region.
    pub chapter: Option<RegionHandle>,
    /// Pinned horizontal track region.
    pub track: Option<RegionHandle>,
    /// Scrubbed vector animation region.
    pub lottie: Option<RegionHandle>,
}

fn frame(
    x_percent: Option<f64>,
    scale: Option<f64>,
    blur: Option<f64>,
    opacity: Option<f64>,
) -> StyleFrame {
    StyleFrame {
        x_percent,
        scale,
        blur,
        opacity,
        ..StyleFrame::default()
    }
}

/// Current state of `props` on `target`: computed values, or CSS initial values when unknown.
fn current_state(doc: &dyn Document, target: &TargetId, props: &[Property]) -> StyleFrame {
    let mut set = PropertySet::default();
    let mut out = StyleFrame::default();
    for &p in props {
        set.insert(p);
        out.merge_from(&StyleFrame::initial(p));
    }
    out.merge_from(&doc.computed_style(target).restricted_to(set));
    out
}

fn max_blur(cfg: &SceneConfig, doc: &dyn Document) -> f64 {
    match doc.css_var(&cfg.blur_var).as_deref().and_then(parse_px) {
        Some(px) => px,
        None => {
            tracing::debug!(var = %cfg.blur_var, fallback = cfg.blur_fallback_px, "blur variable unavailable");
            cfg.blur_fallback_px
        }
    }
}

fn bind_timeline(
    coordinator: &mut TriggerCoordinator,
    doc: &dyn Document,
    spec: RegionSpec,
    tracks: Vec<Track>,
) -> ScrollSyncResult<Option<RegionHandle>> {
    if tracks.is_empty() {
        tracing::debug!(region = %spec.name, "no animated targets; region skipped");
        return Ok(None);
    }
    let timeline = Timeline::new(tracks)?;
    let handle = coordinator.register(spec, doc)?;
    if let Some(h) = handle {
        coordinator.bind(h, Box::new(TimelineBinding::new(timeline)));
    }
    Ok(handle)
}

fn missing(section: &str, selector: &str) -> ScrollSyncResult<Option<RegionHandle>> {
    tracing::debug!(section, selector, "trigger element missing; section skipped");
    Ok(None)
}

fn install_hero(
    cfg: &SceneConfig,
    doc: &dyn Document,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<Option<RegionHandle>> {
    let hero = &cfg.hero;
    let Some(trigger) = doc.select(&hero.trigger) else {
        return missing("hero", &hero.trigger);
    };
    let blur = max_blur(cfg, doc);
    let mut tracks = Vec::new();

    let titles: Vec<TargetId> = hero.titles.iter().filter_map(|s| doc.select(s)).collect();
    if !titles.is_empty() {
        tracks.push(Track::new(
            titles,
            frame(Some(0.0), Some(1.0), Some(0.0), Some(1.0)),
            frame(Some(-18.0), Some(1.18), Some(blur), Some(0.0)),
        ));
    }
    if let Some(phone) = doc.select(&hero.phone) {
        tracks.push(Track::new(
            [phone],
            frame(Some(0.0), None, None, Some(1.0)),
            frame(Some(28.0), None, None, Some(0.0)),
        ));
    }
    if let Some(heading) = doc.select(&hero.heading) {
        tracks.push(Track::new(
            [heading.clone()],
            frame(Some(0.0), Some(1.0), Some(0.0), Some(1.0)),
            frame(Some(8.0), Some(1.35), Some(blur), Some(0.0)),
        ));
        let from = current_state(doc, &heading, &[Property::Color]);
        tracks.push(Track::new(
            [heading],
            from,
            StyleFrame {
                color: Some(hero.heading_color),
                ..StyleFrame::default()
            },
        ));
    }

    let spec = RegionSpec::scrub("hero", trigger, Threshold::TOP_TOP, hero.end);
    bind_timeline(coordinator, doc, spec, tracks)
}

fn install_fades(
    cfg: &SceneConfig,
    doc: &dyn Document,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<Vec<RegionHandle>> {
    let fades = &cfg.fades;
    let mut handles = Vec::new();
    for el in doc.select_all(&fades.selector) {
        let track = Track::new(
            [el.clone()],
            StyleFrame {
                opacity: Some(0.0),
                y: Some(fades.rise_px),
                ..StyleFrame::default()
            },
            StyleFrame {
                opacity: Some(1.0),
                y: Some(0.0),
                ..StyleFrame::default()
            },
        );
        let spec = RegionSpec::scrub(format!("fade:{el}"), el, fades.start, fades.end);
        if let Some(h) = bind_timeline(coordinator, doc, spec, vec![track])? {
            handles.push(h);
        }
    }
    Ok(handles)
}

fn install_chapter(
    cfg: &SceneConfig,
    doc: &dyn Document,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<Option<RegionHandle>> {
    let chapter = &cfg.chapter;
    let Some(trigger) = doc.select(&chapter.trigger) else {
        return missing("chapter", &chapter.trigger);
    };
    let mut tracks = Vec::new();

    let mockups = doc.select_all(&chapter.mockup);
    if !mockups.is_empty() {
        tracks.push(Track::new(
            mockups,
            StyleFrame {
                scale: Some(0.92),
                y: Some(40.0),
                ..StyleFrame::default()
            },
            StyleFrame {
                scale: Some(1.06),
                y: Some(-20.0),
                ..StyleFrame::default()
            },
        ));
    }
    // Screens start together with the mockup and share its sample.
    for screen in doc.select_all(&chapter.screen) {
        let from = current_state(doc, &screen, &[Property::Opacity]);
        tracks.push(Track::new(
            [screen],
            from,
            StyleFrame {
                opacity: Some(1.0),
                ..StyleFrame::default()
            },
        ));
    }

    let spec = RegionSpec::scrub("chapter", trigger, Threshold::TOP_TOP, chapter.end).pinned();
    bind_timeline(coordinator, doc, spec, tracks)
}

fn install_track(
    cfg: &SceneConfig,
    doc: &dyn Document,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<Option<RegionHandle>> {
    let t = &cfg.track;
    let Some(wrap) = doc.select(&t.wrap) else {
        return missing("track", &t.wrap);
    };
    let panels = doc.select_all(&t.panel).len();
    if panels == 0 {
        tracing::debug!(selector = %t.panel, "no panels; track skipped");
        return Ok(None);
    }
    let steps = (panels - 1) as f64;

    let tracks = doc
        .select_all(&t.track)
        .into_iter()
        .map(|el| {
            let from = current_state(doc, &el, &[Property::XPercent]);
            Track::new(
                [el],
                from,
                StyleFrame {
                    x_percent: Some(-100.0 * steps),
                    ..StyleFrame::default()
                },
            )
        })
        .collect();

    // One viewport width per extra panel, re-resolved on every refresh.
    let end = Threshold::Relative(Span::ViewportWidth(100.0 * steps));
    let spec = RegionSpec::scrub("track", wrap, Threshold::TOP_TOP, end).pinned();
    bind_timeline(coordinator, doc, spec, tracks)
}

fn install_lottie(
    cfg: &SceneConfig,
    doc: &dyn Document,
    loader: &mut dyn PlayerLoader,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<Option<RegionHandle>> {
    let l = &cfg.lottie;
    let Some(container) = doc.select(&l.container) else {
        return missing("lottie", &l.container);
    };
    let Some(path) = doc.attribute(&container, &l.path_attr) else {
        tracing::debug!(%container, attr = %l.path_attr, "no asset path; lottie skipped");
        return Ok(None);
    };

    let req = PlayerRequest {
        container: container.clone(),
        renderer: l.renderer,
        autoplay: false,
        looping: false,
        path,
    };
    let player = match loader.load(req) {
        Ok(p) => p,
        Err(err) => {
            tracing::warn!(%container, error = %err, "vector animation load failed; lottie skipped");
            return Ok(None);
        }
    };

    let spec = RegionSpec::scrub("lottie", container, l.start, l.end);
    let handle = coordinator.register(spec, doc)?;
    if let Some(h) = handle {
        coordinator.bind(h, Box::new(ScrubbedPlayer::new(player, l.fallback_frames)));
    }
    Ok(handle)
}

/// Register every scroll-linked section found in `doc`.
#[tracing::instrument(skip_all)]
pub fn install_scene(
    cfg: &SceneConfig,
    doc: &dyn Document,
    loader: &mut dyn PlayerLoader,
    coordinator: &mut TriggerCoordinator,
) -> ScrollSyncResult<SceneHandles> {
    let handles = SceneHandles {
        hero: install_hero(cfg, doc, coordinator)?,
        fades: install_fades(cfg, doc, coordinator)?,
        chapter: install_chapter(cfg, doc, coordinator)?,
        track: install_track(cfg, doc, coordinator)?,
        lottie: install_lottie(cfg, doc, loader, coordinator)?,
    };
    tracing::debug!(regions = coordinator.len(), "scene installed");
    Ok(handles)
}

#[cfg(test)]
#[path = "../tests/unit/scene/install.rs"]
mod tests;
