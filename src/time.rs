//! Frame pacing.
//!
//! [`FramePacer`] is a throttle, not a scheduler: after a frame finishes, the
//! next one becomes due a fixed interval later. It also keeps a frame count and
//! a periodically refreshed FPS estimate.
//!
//! # Example
//!
//! ```
//! use lorenz_viewer::time::FramePacer;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut pacer = FramePacer::new(Duration::from_millis(20), start);
//! assert!(pacer.is_due(start));
//!
//! pacer.finish_frame(start);
//! assert!(!pacer.is_due(start + Duration::from_millis(10)));
//! assert!(pacer.is_due(start + Duration::from_millis(20)));
//! ```

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    /// Earliest start of the next frame.
    next_frame: Instant,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FramePacer {
    /// The first frame is due at `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_frame: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_secs(1),
        }
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    #[inline]
    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record the end of a frame at `now`.
    ///
    /// Returns `true` when the FPS estimate was refreshed.
    pub fn finish_frame(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        self.next_frame = now + self.interval;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
