use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::capture::encode::encode_jpeg;
use crate::foundation::config::CameraOpts;
use crate::foundation::core::{FrameOrigin, FrameSequence, RgbaFrame};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// A camera that can be opened into a live stream.
pub trait Camera {
    /// Acquire the device. A denied or missing device is a [`PhotoboothError::Device`].
    fn open(&self) -> PhotoboothResult<Box<dyn LiveStream>>;
}

/// An acquired live video stream.
pub trait LiveStream {
    /// Read the next raster at the stream's native resolution.
    fn read_frame(&mut self) -> PhotoboothResult<RgbaFrame>;
    /// Release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Owns a live stream and stops it when dropped, whichever path the capture takes.
pub struct StreamGuard {
    stream: Box<dyn LiveStream>,
}

impl StreamGuard {
    /// Take ownership of an open stream.
    pub fn new(stream: Box<dyn LiveStream>) -> Self {
        Self { stream }
    }

    /// Read one raster from the guarded stream.
    pub fn read_frame(&mut self) -> PhotoboothResult<RgbaFrame> {
        self.stream.read_frame()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.stream.stop();
    }
}

/// Open `camera`, grab one frame, release the device, and encode it as a single-frame sequence.
#[tracing::instrument(skip(camera))]
pub fn capture_photo(camera: &dyn Camera, jpeg_quality: u8) -> PhotoboothResult<FrameSequence> {
    let raster = {
        let mut guard = StreamGuard::new(camera.open()?);
        guard.read_frame()?
    };
    tracing::debug!(
        width = raster.width,
        height = raster.height,
        "captured camera frame"
    );
    let frame = encode_jpeg(&raster, jpeg_quality)?;
    Ok(FrameSequence::single(FrameOrigin::Camera, frame))
}

/// Camera backed by the system `ffmpeg`, streaming raw RGBA from a capture device.
#[derive(Clone, Debug)]
pub struct FfmpegCamera {
    opts: CameraOpts,
}

impl FfmpegCamera {
    /// Camera for the configured device.
    pub fn new(opts: CameraOpts) -> Self {
        Self { opts }
    }
}

/// Capture arguments for `opts`. The device keeps its own mode; the requested size is only a
/// scale target, so every read is exactly `width * height * 4` bytes.
fn ffmpeg_args(opts: &CameraOpts) -> Vec<String> {
    let CameraOpts {
        device,
        input_format,
        width,
        height,
    } = opts;
    [
        "-v",
        "error",
        "-f",
        input_format.as_str(),
        "-i",
        device.as_str(),
        "-vf",
        &format!("scale={width}:{height}"),
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "pipe:1",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Camera for FfmpegCamera {
    fn open(&self) -> PhotoboothResult<Box<dyn LiveStream>> {
        let CameraOpts {
            device,
            width,
            height,
            ..
        } = &self.opts;
        if *width == 0 || *height == 0 {
            return Err(PhotoboothError::validation(
                "camera width/height must be non-zero",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(&self.opts))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                PhotoboothError::device(format!(
                    "failed to start ffmpeg for camera '{device}' (is it installed?): {e}"
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PhotoboothError::device("failed to open ffmpeg stdout (unexpected)"))?;

        tracing::debug!(device = %device, width, height, "camera stream opened");
        Ok(Box::new(FfmpegStream {
            child: Some(child),
            stdout: Some(stdout),
            width: *width,
            height: *height,
        }))
    }
}

struct FfmpegStream {
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    width: u32,
    height: u32,
}

impl FfmpegStream {
    fn stderr_text(&mut self) -> String {
        let Some(child) = self.child.as_mut() else {
            return String::new();
        };
        let _ = child.kill();
        let mut text = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut text);
        }
        text.trim().to_string()
    }
}

impl LiveStream for FfmpegStream {
    fn read_frame(&mut self) -> PhotoboothResult<RgbaFrame> {
        let len = self.width as usize * self.height as usize * 4;
        let mut buf = vec![0u8; len];
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(PhotoboothError::device("camera stream is already stopped"));
        };
        if let Err(e) = stdout.read_exact(&mut buf) {
            let stderr = self.stderr_text();
            return Err(PhotoboothError::device(format!(
                "camera stream ended before a full frame was read ({e}): {stderr}"
            )));
        }
        RgbaFrame::new(self.width, self.height, buf)
    }

    fn stop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("camera stream released");
        }
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/camera.rs"]
mod tests;
