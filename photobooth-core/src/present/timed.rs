use std::time::Duration;

use crate::foundation::core::{Frame, FrameSequence};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// One step of a timed presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimedFrame {
    /// Position in the source sequence.
    pub index: usize,
    /// The frame to show.
    pub frame: Frame,
    /// How long it stays up before the next one.
    pub hold: Duration,
}

/// Lazy `(frame, hold)` iterator over a [`FrameSequence`].
///
/// Cloning is cheap (frames are shared), and a clone resumes from the same position, so
/// `.cycle()` gives an endless preview loop.
#[derive(Clone, Debug)]
pub struct TimedFrames {
    frames: FrameSequence,
    hold: Duration,
    next: usize,
}

impl TimedFrames {
    /// Every frame held for `hold`.
    pub fn new(frames: &FrameSequence, hold: Duration) -> Self {
        Self {
            frames: frames.clone(),
            hold,
            next: 0,
        }
    }

    /// Every frame held for `1 / fps` seconds.
    pub fn at_fps(frames: &FrameSequence, fps: u32) -> PhotoboothResult<Self> {
        if fps == 0 {
            return Err(PhotoboothError::validation("fps must be non-zero"));
        }
        Ok(Self::new(frames, Duration::from_secs(1) / fps))
    }

    /// Per-frame hold.
    pub fn hold(&self) -> Duration {
        self.hold
    }

}

impl Iterator for TimedFrames {
    type Item = TimedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.frames().get(self.next)?.clone();
        let index = self.next;
        self.next += 1;
        Some(TimedFrame {
            index,
            frame,
            hold: self.hold,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.frames.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for TimedFrames {}

#[cfg(test)]
#[path = "../../tests/unit/present/timed.rs"]
mod tests;
