/// Source of the user's reduced-motion preference. Read once per session.
pub trait MotionPreference {
    /// `true` when the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;
}

impl MotionPreference for bool {
    fn prefers_reduced_motion(&self) -> bool {
        *self
    }
}

/// Display-frame scheduler (`requestAnimationFrame`).
///
/// The host answers a request by calling [`ScrollSession::on_frame`] once on the next frame.
///
/// [`ScrollSession::on_frame`]: crate::ScrollSession::on_frame
pub trait FrameScheduler {
    /// Ask for one callback on the next display frame.
    fn request_frame(&mut self);
}

/// [`FrameScheduler`] that only counts requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountingScheduler {
    /// Requests received so far.
    pub requested: u64,
    /// Requests not yet answered.
    pub pending: u64,
}

impl CountingScheduler {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one pending request; returns `false` when none is pending.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requested += 1;
        self.pending += 1;
    }
}
