use crate::schedule::driver::{FrameDriver, FrameHandle, FrameLoop};

/// Keeps at most one outstanding frame request per loop.
///
/// Loops are started on demand and re-armed by the tick only while there is work left, so an
/// idle session requests no frames at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationScheduler {
    animate: Option<FrameHandle>,
    wander: Option<FrameHandle>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, frame_loop: FrameLoop) -> &mut Option<FrameHandle> {
        match frame_loop {
            FrameLoop::Animate => &mut self.animate,
            FrameLoop::Wander => &mut self.wander,
        }
    }

    /// Request a frame for `frame_loop` unless one is already outstanding.
    pub fn ensure(&mut self, driver: &mut dyn FrameDriver, frame_loop: FrameLoop) {
        let slot = self.slot(frame_loop);
        if slot.is_some() {
            return;
        }
        *slot = Some(driver.request_frame(frame_loop));
        tracing::debug!(?frame_loop, "frame loop running");
    }

    /// Claim a fired frame. Returns its loop, or `None` for a stale or unknown handle.
    pub fn fired(&mut self, handle: FrameHandle) -> Option<FrameLoop> {
        for frame_loop in [FrameLoop::Animate, FrameLoop::Wander] {
            let slot = self.slot(frame_loop);
            if *slot == Some(handle) {
                *slot = None;
                return Some(frame_loop);
            }
        }
        None
    }

    /// After a tick: re-arm `frame_loop` if `keep_running`, otherwise let it go idle.
    pub fn continue_or_stop(
        &mut self,
        driver: &mut dyn FrameDriver,
        frame_loop: FrameLoop,
        keep_running: bool,
    ) -> bool {
        if keep_running {
            self.ensure(driver, frame_loop);
        } else if let Some(handle) = self.slot(frame_loop).take() {
            driver.cancel_frame(handle);
        } else {
            tracing::debug!(?frame_loop, "frame loop idle");
        }
        keep_running
    }

    /// Cancel `frame_loop`'s outstanding request, if any.
    pub fn cancel(&mut self, driver: &mut dyn FrameDriver, frame_loop: FrameLoop) {
        if let Some(handle) = self.slot(frame_loop).take() {
            driver.cancel_frame(handle);
            tracing::debug!(?frame_loop, "frame loop cancelled");
        }
    }

    pub fn cancel_all(&mut self, driver: &mut dyn FrameDriver) {
        self.cancel(driver, FrameLoop::Animate);
        self.cancel(driver, FrameLoop::Wander);
    }

    pub fn is_running(&self, frame_loop: FrameLoop) -> bool {
        match frame_loop {
            FrameLoop::Animate => self.animate.is_some(),
            FrameLoop::Wander => self.wander.is_some(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.animate.is_none() && self.wander.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
