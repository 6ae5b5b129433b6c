use crate::foundation::error::ScrollSyncResult;
use crate::gesture::GestureConfig;
use crate::reveal::RevealConfig;
use crate::scene::SceneConfig;
use crate::scroll::physics::SmoothScrollConfig;

/// Everything a [`ScrollSession`](crate::ScrollSession) needs besides its host seams.
///
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Smooth-scroll physics.
    pub smooth: SmoothScrollConfig,
    /// One-shot reveal watcher.
    pub reveal: RevealConfig,
    /// Scroll-linked sections.
    pub scene: SceneConfig,
    /// Idle micro-gestures.
    pub gestures: GestureConfig,
}

impl SessionConfig {
    /// Parse from JSON and validate.
    pub fn from_json_str(s: &str) -> ScrollSyncResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every section.
    pub fn validate(&self) -> ScrollSyncResult<()> {
        self.smooth.validate()?;
        self.reveal.validate()?;
        self.scene.validate()?;
        self.gestures.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/session.rs"]
mod tests;
