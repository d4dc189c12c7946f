/// The two independent per-frame loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameLoop {
    /// Time-bounded animations: ripples, swellings, slaps, warp drags.
    Animate,
    /// Wandering spiders; runs while any exist.
    Wander,
}

/// Token for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// One-shot frame callback mechanism supplied by the host (display refresh, timer, test clock).
///
/// Every request fires at most once; the host reports it back through `Session::on_frame`.
pub trait FrameDriver {
    fn request_frame(&mut self, frame_loop: FrameLoop) -> FrameHandle;

    /// Cancel a pending request; unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Driver that only records requests; the caller decides when they fire.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameDriver {
    next: u64,
    pending: Vec<(FrameHandle, FrameLoop)>,
    requested: u64,
}

impl ManualFrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests not yet fired or cancelled, oldest first.
    pub fn pending(&self) -> &[(FrameHandle, FrameLoop)] {
        &self.pending
    }

    /// Remove and return every pending request, as if the frame had fired.
    pub fn take_pending(&mut self) -> Vec<(FrameHandle, FrameLoop)> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total requests made over the driver's lifetime.
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameDriver for ManualFrameDriver {
    fn request_frame(&mut self, frame_loop: FrameLoop) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.pending.push((handle, frame_loop));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }
}
