//! Frame loop control: lazy start, pause, idle stop, and resize.
//!
//! The host supplies a [`FrameScheduler`] (requestAnimationFrame in the
//! browser, [`ManualScheduler`] in tests) and calls [`AnimationLoop::tick`]
//! whenever a requested frame fires.

use crate::constants::{MAX_FRAME_DT, MIN_FRAME_DT};
use crate::engine::{FrameStatus, SerpentEngine};
use crate::render::Surface;
use std::collections::VecDeque;

/// Opaque id of one requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle);
    }
}

/// Queues requests until the caller fires them with [`ManualScheduler::take`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: i32,
    pending: VecDeque<FrameHandle>,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest pending request, if any.
    pub fn take(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending.push_back(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.cancelled += before - self.pending.len();
    }
}

/// Elapsed seconds clamped to a stable physics step.
pub fn clamp_frame_dt(elapsed: f64) -> f32 {
    let secs = elapsed as f32;
    if !secs.is_finite() {
        return MIN_FRAME_DT;
    }
    secs.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
}

/// One frame loop per canvas. At most one frame is ever pending, and it is
/// cancelled when the loop is dropped.
#[derive(Debug)]
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    paused: bool,
    last: f64,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            paused: false,
            last: 0.0,
        }
    }

    /// Schedule a frame unless one is pending or the loop is paused.
    pub fn start(&mut self, now: f64) {
        if self.pending.is_some() || self.paused {
            return;
        }
        self.last = now;
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("[loop] host refused a frame request");
        } else {
            log::debug!("[loop] resumed");
        }
    }

    /// Pausing cancels the pending frame; un-pausing restarts the loop.
    pub fn set_paused(&mut self, paused: bool, now: f64) {
        self.paused = paused;
        if paused {
            if let Some(handle) = self.pending.take() {
                self.scheduler.cancel_frame(handle);
            }
        } else {
            self.start(now);
        }
    }

    /// Run the frame that just fired and reschedule unless the engine went idle.
    pub fn tick<T: Surface>(
        &mut self,
        now: f64,
        engine: &mut SerpentEngine,
        surface: &mut T,
    ) -> FrameStatus {
        self.pending = None;
        if self.paused {
            return FrameStatus::Idle;
        }
        let dt = clamp_frame_dt(now - self.last);
        self.last = now;
        let status = engine.frame(now, dt, surface);
        match status {
            FrameStatus::Continue => self.pending = self.scheduler.request_frame(),
            FrameStatus::Idle => log::debug!("[loop] idle, stopping"),
        }
        status
    }

    /// Rebuild size-dependent state, then make sure a frame is coming.
    pub fn resize(&mut self, engine: &mut SerpentEngine, width: f32, height: f32, now: f64) {
        engine.resize(width, height);
        self.start(now);
    }

    /// Cancel any pending frame for good (host teardown).
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
