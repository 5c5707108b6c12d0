use std::time::Duration;

use image::imageops::{self, FilterType};

use crate::foundation::config::PresentOpts;
use crate::foundation::core::{FrameSequence, RgbaFrame};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::present::sink::{FrameIndex, FrameSink, SinkConfig};
use crate::present::timed::TimedFrames;

/// How an output sequence is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationMode {
    /// Nothing to show.
    Empty,
    /// One frame, shown directly.
    Single,
    /// Several frames, assembled into a clip.
    Video,
}

impl PresentationMode {
    /// Mode for a sequence of the given length.
    pub fn for_sequence(seq: &FrameSequence) -> Self {
        match seq.len() {
            0 => Self::Empty,
            1 => Self::Single,
            _ => Self::Video,
        }
    }
}

/// Timing of an assembled clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipOpts {
    /// How long each source frame stays up.
    pub hold: Duration,
    /// Encoder frame rate.
    pub fps: u32,
}

impl ClipOpts {
    /// Number of encoder frames each source frame occupies. Never zero.
    pub fn repeats_per_frame(&self) -> u64 {
        let exact = self.hold.as_secs_f64() * f64::from(self.fps);
        (exact.round() as u64).max(1)
    }
}

impl Default for ClipOpts {
    fn default() -> Self {
        Self::from(&PresentOpts::default())
    }
}

impl From<&PresentOpts> for ClipOpts {
    fn from(opts: &PresentOpts) -> Self {
        Self {
            hold: Duration::from_millis(opts.frame_hold_ms),
            fps: opts.fps,
        }
    }
}

/// Loops of the sample preview written when none is configured.
pub const DEFAULT_PREVIEW_LOOPS: u32 = 3;

/// Timing of the looping preview of captured samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewOpts {
    /// Frames per second; each sample is shown for one encoder frame.
    pub fps: u32,
    /// Full passes over the samples.
    pub loops: u32,
}

impl Default for PreviewOpts {
    fn default() -> Self {
        Self::from(&PresentOpts::default())
    }
}

impl From<&PresentOpts> for PreviewOpts {
    fn from(opts: &PresentOpts) -> Self {
        Self {
            fps: opts.preview_fps,
            loops: DEFAULT_PREVIEW_LOOPS,
        }
    }
}

/// What [`assemble_clip`] or [`assemble_preview`] wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipStats {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Source frames painted.
    pub source_frames: usize,
    /// Encoder frames pushed to the sink.
    pub encoded_frames: u64,
}

/// Paint each frame of `seq`, in order, onto a fixed canvas and feed it to `sink`.
///
/// The canvas takes the first frame's size rounded down to even dimensions; frames of another
/// size are scaled to fit it. Each frame is held for `opts.hold`, i.e. repeated
/// [`ClipOpts::repeats_per_frame`] times.
#[tracing::instrument(skip(seq, sink), fields(frames = seq.len()))]
pub fn assemble_clip(
    seq: &FrameSequence,
    opts: ClipOpts,
    sink: &mut dyn FrameSink,
) -> PhotoboothResult<ClipStats> {
    if opts.fps == 0 {
        return Err(PhotoboothError::validation("clip fps must be non-zero"));
    }
    let (width, height) = begin_canvas(seq, opts.fps, sink)?;
    let repeats = opts.repeats_per_frame();

    let mut next = 0u64;
    let mut painted = 0usize;
    for step in TimedFrames::new(seq, opts.hold) {
        let raster = step.frame.decode_rgba()?;
        let canvas = fit_canvas(raster, width, height)?;
        for _ in 0..repeats {
            sink.push_frame(FrameIndex(next), &canvas)?;
            next += 1;
        }
        painted += 1;
        tracing::debug!(index = step.index, "frame painted");
    }
    sink.end()?;

    Ok(ClipStats {
        width,
        height,
        source_frames: painted,
        encoded_frames: next,
    })
}

/// Loop `seq` `opts.loops` times at `opts.fps` into `sink`, one encoder frame per sample.
///
/// Shares the canvas rules of [`assemble_clip`]. Each distinct frame is decoded once.
#[tracing::instrument(skip(seq, sink), fields(frames = seq.len()))]
pub fn assemble_preview(
    seq: &FrameSequence,
    opts: PreviewOpts,
    sink: &mut dyn FrameSink,
) -> PhotoboothResult<ClipStats> {
    if opts.loops == 0 {
        return Err(PhotoboothError::validation("preview needs at least one loop"));
    }
    let steps = TimedFrames::at_fps(seq, opts.fps)?;
    let pass = steps.len();
    let (width, height) = begin_canvas(seq, opts.fps, sink)?;

    let canvases = seq
        .frames()
        .iter()
        .map(|frame| fit_canvas(frame.decode_rgba()?, width, height))
        .collect::<PhotoboothResult<Vec<_>>>()?;
    let mut next = 0u64;
    for step in steps.cycle().take(pass * opts.loops as usize) {
        sink.push_frame(FrameIndex(next), &canvases[step.index])?;
        next += 1;
    }
    sink.end()?;

    Ok(ClipStats {
        width,
        height,
        source_frames: pass,
        encoded_frames: next,
    })
}

/// Size the canvas from the first frame and open `sink` on it.
fn begin_canvas(
    seq: &FrameSequence,
    fps: u32,
    sink: &mut dyn FrameSink,
) -> PhotoboothResult<(u32, u32)> {
    let first = seq
        .first()
        .ok_or_else(|| PhotoboothError::validation("cannot assemble a clip from no frames"))?
        .decode_rgba()?;
    let width = first.width & !1;
    let height = first.height & !1;
    if width == 0 || height == 0 {
        return Err(PhotoboothError::validation(format!(
            "frame {}x{} is too small for a clip",
            first.width, first.height
        )));
    }
    sink.begin(SinkConfig { width, height, fps })?;
    Ok((width, height))
}

fn fit_canvas(raster: RgbaFrame, width: u32, height: u32) -> PhotoboothResult<RgbaFrame> {
    if raster.width == width && raster.height == height {
        return Ok(raster);
    }
    let img = raster.into_image()?;
    let scaled = if img.width() >= width
        && img.height() >= height
        && (img.width() - width) <= 1
        && (img.height() - height) <= 1
    {
        // Off by the odd pixel only: crop instead of resampling.
        imageops::crop_imm(&img, 0, 0, width, height).to_image()
    } else {
        imageops::resize(&img, width, height, FilterType::Triangle)
    };
    Ok(RgbaFrame::from_image(scaled))
}

#[cfg(test)]
#[path = "../../tests/unit/present/presenter.rs"]
mod tests;
