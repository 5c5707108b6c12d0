use std::path::{Path, PathBuf};

use crate::capture::encode::encode_jpeg;
use crate::foundation::core::{FrameOrigin, FrameSequence, RgbaFrame};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Number of samples to take from a video. Never below [`SampleCount::MIN`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleCount(u32);

impl SampleCount {
    /// Smallest accepted sample count.
    pub const MIN: u32 = 1;
    /// Sample count used when none is configured.
    pub const DEFAULT: SampleCount = SampleCount(10);

    /// Clamp a requested count; non-positive requests become [`SampleCount::MIN`].
    pub fn new(requested: i64) -> Self {
        if requested < i64::from(Self::MIN) {
            tracing::warn!(requested, min = Self::MIN, "sample count clamped");
            return Self(Self::MIN);
        }
        Self(u32::try_from(requested).unwrap_or(u32::MAX))
    }

    /// The count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SampleCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sample timestamps `i * (duration / n)` for `i = 0..n`, ascending.
pub fn sample_timestamps(duration_secs: f64, count: SampleCount) -> PhotoboothResult<Vec<f64>> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(PhotoboothError::media(format!(
            "video duration must be a positive number of seconds, got {duration_secs}"
        )));
    }
    let n = count.get();
    let step = duration_secs / f64::from(n);
    Ok((0..n).map(|i| f64::from(i) * step).collect())
}

/// A decoded video that can be seeked and rasterized.
pub trait VideoDecoder {
    /// Total duration in seconds.
    fn duration_secs(&self) -> f64;
    /// Seek to `time_secs` and return the frame shown there once the seek has settled.
    fn frame_at(&mut self, time_secs: f64) -> PhotoboothResult<RgbaFrame>;
}

/// Take `count` uniform samples from `decoder`, JPEG-encoded at `jpeg_quality`, in time order.
#[tracing::instrument(skip(decoder))]
pub fn sample_video(
    decoder: &mut dyn VideoDecoder,
    count: SampleCount,
    jpeg_quality: u8,
) -> PhotoboothResult<FrameSequence> {
    let timestamps = sample_timestamps(decoder.duration_secs(), count)?;
    let mut frames = Vec::with_capacity(timestamps.len());
    for (i, t) in timestamps.into_iter().enumerate() {
        let raster = decoder.frame_at(t)?;
        frames.push(encode_jpeg(&raster, jpeg_quality)?);
        tracing::debug!(index = i, time_secs = t, "sampled video frame");
    }
    Ok(FrameSequence::from_frames(FrameOrigin::VideoSamples, frames))
}

/// Basic metadata about a source video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container duration in seconds.
    pub duration_secs: f64,
}

/// [`VideoDecoder`] over the system `ffprobe`/`ffmpeg` binaries.
#[derive(Clone, Debug)]
pub struct FfmpegVideo {
    info: VideoSourceInfo,
}

impl FfmpegVideo {
    /// Probe `path`; fails for files without a decodable video stream.
    pub fn open(path: &Path) -> PhotoboothResult<Self> {
        Ok(Self {
            info: probe_video(path)?,
        })
    }

    /// Probed metadata.
    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }
}

impl VideoDecoder for FfmpegVideo {
    fn duration_secs(&self) -> f64 {
        self.info.duration_secs
    }

    fn frame_at(&mut self, time_secs: f64) -> PhotoboothResult<RgbaFrame> {
        decode_video_frame_rgba8(&self.info, time_secs)
    }
}

#[derive(serde::Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(serde::Deserialize, Default)]
struct ProbeTags {
    rotate: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    #[serde(default)]
    tags: ProbeTags,
}

impl ProbeStream {
    /// Display rotation in degrees, normalized to `0..360`.
    fn rotation_degrees(&self) -> i64 {
        let raw = self
            .side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| self.tags.rotate.as_deref().and_then(|r| r.trim().parse().ok()))
            .unwrap_or(0.0);
        (raw.round() as i64).rem_euclid(360)
    }
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Interpret `ffprobe -print_format json -show_streams -show_format` output.
///
/// Width and height are reported as displayed: a stream rotated by a quarter turn
/// has its stored dimensions swapped, matching what `ffmpeg` decodes by default.
#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
pub(crate) fn parse_stream_metadata(
    source_path: &Path,
    json: &[u8],
) -> PhotoboothResult<VideoSourceInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| PhotoboothError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| PhotoboothError::media("no video stream found"))?;
    let stored_width = video_stream
        .width
        .ok_or_else(|| PhotoboothError::media("missing video width from ffprobe"))?;
    let stored_height = video_stream
        .height
        .ok_or_else(|| PhotoboothError::media("missing video height from ffprobe"))?;
    let (width, height) = match video_stream.rotation_degrees() {
        90 | 270 => (stored_height, stored_width),
        _ => (stored_width, stored_height),
    };

    // Container duration first; some streams (webm) only report it at format level.
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video_stream.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_secs,
    })
}

/// Probe source video metadata through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> PhotoboothResult<VideoSourceInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| PhotoboothError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(PhotoboothError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_stream_metadata(source_path, &out.stdout)
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe source video metadata through `ffprobe`.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn probe_video(_source_path: &Path) -> PhotoboothResult<VideoSourceInfo> {
    Err(PhotoboothError::media(
        "video sampling requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
/// Decode the frame shown at `time_secs`, upright.
///
/// The frame travels as PNG so its dimensions come from the decoded image itself,
/// whatever rotation `ffmpeg` applied.
pub fn decode_video_frame_rgba8(
    source: &VideoSourceInfo,
    time_secs: f64,
) -> PhotoboothResult<RgbaFrame> {
    // `-ss` after `-i` seeks accurately: the frame is produced only once decoding reaches it.
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&source.source_path)
        .args([
            "-ss",
            &format!("{time_secs:.6}"),
            "-frames:v",
            "1",
            "-f",
            "image2pipe",
            "-c:v",
            "png",
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            PhotoboothError::media(format!("failed to run ffmpeg for video decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(PhotoboothError::media(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    if out.stdout.is_empty() {
        return Err(PhotoboothError::media(format!(
            "ffmpeg returned no frame at {time_secs:.3}s for '{}'",
            source.source_path.display()
        )));
    }

    let img = image::load_from_memory_with_format(&out.stdout, image::ImageFormat::Png)
        .map_err(|e| PhotoboothError::media(format!("decoded video frame is unreadable: {e}")))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    RgbaFrame::new(width, height, img.into_raw())
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode the frame shown at `time_secs`, upright.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn decode_video_frame_rgba8(
    _source: &VideoSourceInfo,
    _time_secs: f64,
) -> PhotoboothResult<RgbaFrame> {
    Err(PhotoboothError::media(
        "video sampling requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/capture/video.rs"]
mod tests;
