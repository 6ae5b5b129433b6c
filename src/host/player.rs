use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::error::{ScrollSyncError, ScrollSyncResult};
use crate::player::{AssetMetadata, PlayerLoader, PlayerRequest, VectorPlayer};

/// Shared log of what a [`RecordingPlayer`] was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerLog {
    /// Requests passed to the loader.
    pub requests: Vec<PlayerRequest>,
    /// Every `(frame, force_redraw)` seek, in order.
    pub seeks: Vec<(u32, bool)>,
    /// Metadata reported to the scrubber.
    pub metadata: Option<AssetMetadata>,
}

/// Vector player double whose metadata can be resolved from the outside.
#[derive(Clone, Debug)]
pub struct RecordingPlayer {
    log: Rc<RefCell<PlayerLog>>,
}

impl VectorPlayer for RecordingPlayer {
    fn metadata(&self) -> AssetMetadata {
        self.log
            .borrow()
            .metadata
            .clone()
            .unwrap_or(AssetMetadata::Pending)
    }

    fn seek_to_frame(&mut self, frame: u32, force_redraw: bool) {
        self.log.borrow_mut().seeks.push((frame, force_redraw));
    }
}

/// Loader handing out [`RecordingPlayer`]s that share one [`PlayerLog`].
#[derive(Clone, Debug, Default)]
pub struct RecordingPlayerLoader {
    log: Rc<RefCell<PlayerLog>>,
    fail: bool,
}

impl RecordingPlayerLoader {
    /// Loader whose players stay pending until [`RecordingPlayerLoader::resolve`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader whose `load` call fails outright.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Report metadata from now on.
    pub fn resolve(&self, metadata: AssetMetadata) {
        self.log.borrow_mut().metadata = Some(metadata);
    }

    /// Snapshot of the shared log.
    pub fn log(&self) -> PlayerLog {
        self.log.borrow().clone()
    }
}

impl PlayerLoader for RecordingPlayerLoader {
    fn load(&mut self, req: PlayerRequest) -> ScrollSyncResult<Box<dyn VectorPlayer>> {
        if self.fail {
            return Err(ScrollSyncError::asset(format!(
                "cannot load \"{}\"",
                req.path
            )));
        }
        self.log.borrow_mut().requests.push(req);
        Ok(Box::new(RecordingPlayer {
            log: Rc::clone(&self.log),
        }))
    }
}
