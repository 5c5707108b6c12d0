use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// One captured or generated image plus its encoding metadata.
///
/// The encoded bytes are shared and never mutated after capture, so cloning a frame is cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Arc<Vec<u8>>,
    mime_type: String,
}

impl Frame {
    /// Wrap encoded image bytes with their MIME type (`image/jpeg`, `image/png`, ...).
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> PhotoboothResult<Self> {
        let mime_type = mime_type.into();
        if data.is_empty() {
            return Err(PhotoboothError::validation("frame data must not be empty"));
        }
        if !mime_type.starts_with("image/") {
            return Err(PhotoboothError::validation(format!(
                "frame mime type must be an image type, got '{mime_type}'"
            )));
        }
        Ok(Self {
            data: Arc::new(data),
            mime_type,
        })
    }

    /// Decode a base64 payload as delivered by the remote service.
    pub fn from_base64(data_b64: &str, mime_type: impl Into<String>) -> PhotoboothResult<Self> {
        let data = STANDARD
            .decode(data_b64.trim())
            .map_err(|e| PhotoboothError::serde(format!("invalid base64 image payload: {e}")))?;
        Self::new(data, mime_type)
    }

    /// Encoded image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME type of [`Frame::data`].
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 form of the encoded bytes, as sent over the wire.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.data.as_slice())
    }

    /// File extension matching the MIME type, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        image::ImageFormat::from_mime_type(&self.mime_type)
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin")
    }

    /// Display-only handle for this frame.
    pub fn preview(&self) -> PreviewHandle {
        PreviewHandle(format!("data:{};base64,{}", self.mime_type, self.to_base64()))
    }

    /// Decode into a straight-alpha RGBA raster.
    pub fn decode_rgba(&self) -> PhotoboothResult<RgbaFrame> {
        let img = image::load_from_memory(&self.data).map_err(|e| {
            PhotoboothError::media(format!("cannot decode {} frame: {e}", self.mime_type))
        })?;
        Ok(RgbaFrame::from_image(img.to_rgba8()))
    }
}

/// Renderable reference to a frame (a `data:` URL). Carries no meaning for the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewHandle(pub String);

impl PreviewHandle {
    /// The URL text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where the frames of a [`FrameSequence`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrigin {
    /// A single uploaded image file.
    Upload,
    /// A single live camera snapshot.
    Camera,
    /// Uniform samples from an uploaded video, in timestamp order.
    VideoSamples,
    /// Output of the stylize pipeline.
    Stylized,
}

/// Ordered frames from exactly one origin. Index order is capture/sample order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    origin: FrameOrigin,
    frames: Vec<Frame>,
}

impl FrameSequence {
    /// Empty sequence of the given origin.
    pub fn empty(origin: FrameOrigin) -> Self {
        Self {
            origin,
            frames: Vec::new(),
        }
    }

    /// Length-1 sequence.
    pub fn single(origin: FrameOrigin, frame: Frame) -> Self {
        Self {
            origin,
            frames: vec![frame],
        }
    }

    /// Sequence from frames already in order.
    pub fn from_frames(origin: FrameOrigin, frames: Vec<Frame>) -> Self {
        Self { origin, frames }
    }

    /// Origin shared by every frame in the sequence.
    pub fn origin(&self) -> FrameOrigin {
        self.origin
    }

    /// Frames in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// First frame, if any.
    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` when the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}

/// Straight-alpha RGBA8 raster (row-major, `width * height * 4` bytes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Wrap raw pixel bytes, checking the buffer length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PhotoboothResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 {
            return Err(PhotoboothError::validation("raster width/height must be non-zero"));
        }
        if data.len() != expected {
            return Err(PhotoboothError::validation(format!(
                "raster size mismatch: got {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub(crate) fn into_image(self) -> PhotoboothResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| PhotoboothError::validation("raster buffer does not match its size"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
