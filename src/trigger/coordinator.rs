use crate::foundation::core::{Geometry, Viewport};
use crate::foundation::error::ScrollSyncResult;
use crate::host::document::Document;
use crate::host::surface::Surface;
use crate::scroll::physics::ScrollSnapshot;
use crate::trigger::binding::ProgressBinding;
use crate::trigger::region::{Lifecycle, Region, RegionSpec, pin_offset};

/// Handle returned by [`TriggerCoordinator::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionHandle(usize);

struct Entry {
    region: Region,
    bindings: Vec<Box<dyn ProgressBinding>>,
    /// Progress last pushed to bindings; `None` until the first publish.
    published: Option<f64>,
    pin_published: Option<f64>,
}

/// Registry of regions; maps scroll snapshots to per-region progress and pushes it to bindings.
#[derive(Default)]
pub struct TriggerCoordinator {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for TriggerCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerCoordinator")
            .field("regions", &self.entries.len())
            .finish()
    }
}

impl TriggerCoordinator {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no region is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a region against live geometry.
    ///
    /// Returns `Ok(None)` when the trigger element does not exist; nothing is registered then.
    pub fn register(
        &mut self,
        spec: RegionSpec,
        doc: &dyn Document,
    ) -> ScrollSyncResult<Option<RegionHandle>> {
        spec.validate()?;
        let geometry = doc.geometry(&spec.trigger);
        if geometry == Geometry::Missing {
            tracing::debug!(region = %spec.name, trigger = %spec.trigger, "trigger element missing; region skipped");
            return Ok(None);
        }
        let mut region = Region::new(spec);
        region.measure(geometry, doc.viewport());
        tracing::debug!(
            region = %region.spec.name,
            start = region.start,
            end = region.end,
            pin = region.spec.pin,
            "region registered"
        );
        self.entries.push(Entry {
            region,
            bindings: Vec::new(),
            published: None,
            pin_published: None,
        });
        Ok(Some(RegionHandle(self.entries.len() - 1)))
    }

    /// Subscribe a binding; bindings run in subscription order.
    pub fn bind(&mut self, handle: RegionHandle, binding: Box<dyn ProgressBinding>) {
        if let Some(e) = self.entries.get_mut(handle.0) {
            e.bindings.push(binding);
        }
    }

    /// Live region state.
    pub fn region(&self, handle: RegionHandle) -> Option<&Region> {
        self.entries.get(handle.0).map(|e| &e.region)
    }

    /// All regions in registration order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.entries.iter().map(|e| &e.region)
    }

    /// Re-read every region's geometry and recompute viewport-derived spans.
    ///
    /// Idempotent: repeated calls against unchanged layout produce identical offsets.
    #[tracing::instrument(skip_all, fields(regions = self.entries.len()))]
    pub fn refresh(&mut self, doc: &dyn Document, surface: &mut dyn Surface) {
        let viewport: Viewport = doc.viewport();
        for e in &mut self.entries {
            e.region.measure(doc.geometry(&e.region.spec.trigger), viewport);
            if e.region.spec.pin && e.region.spec.pin_spacing && e.region.is_measured() {
                surface.set_pin_spacing(&e.region.spec.trigger, e.region.end - e.region.start);
            }
        }
    }

    /// Recompute progress for `snap` and publish changes.
    ///
    /// With `force`, every region republishes even when its progress is unchanged, which is what
    /// a layout refresh needs.
    pub fn update(
        &mut self,
        snap: &ScrollSnapshot,
        doc: &dyn Document,
        surface: &mut dyn Surface,
        force: bool,
    ) {
        let viewport = doc.viewport();
        for e in &mut self.entries {
            if !e.region.is_measured() {
                e.region.measure(doc.geometry(&e.region.spec.trigger), viewport);
            }

            let scroll = snap.offset;
            let progress = e.region.progress_at(scroll, snap.time_ms);

            if e.region.is_measured() {
                let next = Lifecycle::classify(scroll, e.region.start, e.region.end);
                for &event in e.region.lifecycle.transition(next) {
                    tracing::debug!(region = %e.region.spec.name, ?event, "lifecycle");
                    for b in &mut e.bindings {
                        b.on_lifecycle(event, surface);
                    }
                }
                e.region.lifecycle = next;

                if e.region.spec.pin {
                    let offset = pin_offset(scroll, e.region.start, e.region.end);
                    if force || e.pin_published != Some(offset) {
                        surface.set_pin_offset(&e.region.spec.trigger, offset);
                        e.pin_published = Some(offset);
                    }
                }
            }

            e.region.progress = progress;
            if force || e.published != Some(progress) {
                for b in &mut e.bindings {
                    b.on_progress(progress, surface);
                }
                e.published = Some(progress);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/coordinator.rs"]
mod tests;
