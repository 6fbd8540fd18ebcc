//! Frame scheduling with an explicit stop.
//!
//! The window's redraw requests call [`FrameLoop::tick`] once per display
//! refresh; the loop keeps asking for more frames until its [`StopSignal`]
//! is raised or its frame budget runs out. Tests drive the same loop with
//! [`FrameLoop::run`] for a bounded number of frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::time::Time;

/// Shared flag that ends a [`FrameLoop`].
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop after the current frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What the driver should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule another frame.
    Continue,
    /// The loop is finished; do not schedule more frames.
    Stop,
}

/// Per-frame timing handed to the frame callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// 1-based frame number.
    pub frame: u64,
    pub elapsed: f32,
    pub delta: f32,
    pub fps: f32,
}

/// Render loop state: clock, stop signal and optional frame budget.
#[derive(Debug)]
pub struct FrameLoop {
    time: Time,
    stop: StopSignal,
    max_frames: Option<u64>,
}

impl FrameLoop {
    /// An unbounded loop that runs until stopped.
    pub fn new() -> Self {
        Self {
            time: Time::new(),
            stop: StopSignal::new(),
            max_frames: None,
        }
    }

    /// A loop that stops by itself after `frames` frames.
    pub fn bounded(frames: u64) -> Self {
        Self {
            max_frames: Some(frames),
            ..Self::new()
        }
    }

    /// Use a custom clock (e.g. [`Time::fixed`]).
    pub fn with_time(mut self, time: Time) -> Self {
        self.time = time;
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Handle for stopping this loop from elsewhere.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.time.frame()
    }

    fn exhausted(&self) -> bool {
        self.stop.is_stopped() || self.max_frames.is_some_and(|max| self.time.frame() >= max)
    }

    /// Start the next frame, or `None` if the loop is finished.
    pub fn advance(&mut self) -> Option<FrameInfo> {
        if self.exhausted() {
            return None;
        }

        let (elapsed, delta) = self.time.update();
        Some(FrameInfo {
            frame: self.time.frame(),
            elapsed,
            delta,
            fps: self.time.fps(),
        })
    }

    /// Whether another frame should be scheduled.
    pub fn control(&self) -> LoopControl {
        if self.exhausted() {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }

    /// Run one frame, unless the loop is already finished.
    ///
    /// Returns whether another frame should be scheduled.
    pub fn tick<F: FnOnce(&FrameInfo)>(&mut self, frame: F) -> LoopControl {
        let Some(info) = self.advance() else {
            return LoopControl::Stop;
        };
        frame(&info);
        self.control()
    }

    /// Tick until the loop stops. Returns the number of frames run.
    ///
    /// Only returns if the loop is bounded or the callback raises the stop
    /// signal.
    pub fn run<F: FnMut(&FrameInfo)>(&mut self, mut frame: F) -> u64 {
        let start = self.frames();
        while self.tick(&mut frame) == LoopControl::Continue {}
        self.frames() - start
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_runs_exact_frames() {
        let mut frames = Vec::new();
        let mut lp = FrameLoop::bounded(5).with_time(Time::fixed(0.5));
        let ran = lp.run(|info| frames.push(info.frame));

        assert_eq!(ran, 5);
        assert_eq!(frames, [1, 2, 3, 4, 5]);
        assert!((lp.time().elapsed() - 2.5).abs() < 1e-6);
        // Further ticks do nothing
        assert_eq!(lp.tick(|_| panic!("ran past budget")), LoopControl::Stop);
    }

    #[test]
    fn test_stop_signal_from_callback() {
        let mut lp = FrameLoop::new().with_time(Time::fixed(1.0 / 60.0));
        let stop = lp.stop_signal();
        let ran = lp.run(|info| {
            if info.frame == 3 {
                stop.stop();
            }
        });
        assert_eq!(ran, 3);
    }

    #[test]
    fn test_tick_reports_stop_on_last_frame() {
        let mut lp = FrameLoop::bounded(2);
        assert_eq!(lp.tick(|_| {}), LoopControl::Continue);
        assert_eq!(lp.tick(|_| {}), LoopControl::Stop);
    }

    #[test]
    fn test_stopped_before_start() {
        let mut lp = FrameLoop::new();
        lp.stop_signal().stop();
        assert_eq!(lp.run(|_| {}), 0);
    }

    #[test]
    fn test_fixed_delta_in_frame_info() {
        let mut lp = FrameLoop::bounded(1).with_time(Time::fixed(0.25));
        lp.tick(|info| {
            assert_eq!(info.delta, 0.25);
            assert_eq!(info.elapsed, 0.25);
        });
    }

    #[test]
    fn test_advance_then_control() {
        let mut lp = FrameLoop::bounded(2);
        let first = lp.advance().unwrap();
        assert_eq!(first.frame, 1);
        assert_eq!(lp.control(), LoopControl::Continue);
        assert!(lp.advance().is_some());
        assert_eq!(lp.control(), LoopControl::Stop);
        assert!(lp.advance().is_none());
        assert_eq!(lp.frames(), 2);
    }
}
