use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Frame, FrameOrigin, FrameSequence};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv", "avi", "mpeg", "mpg"];

/// What an uploaded file turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadKind {
    /// A still image with its declared MIME type.
    Image {
        /// MIME type, e.g. `image/png`.
        mime_type: String,
    },
    /// A video to be sampled.
    Video,
}

/// Classify an upload by extension, then by content sniffing for images.
pub fn classify_upload(path: &Path) -> PhotoboothResult<UploadKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if let Some(ext) = ext.as_deref()
        && VIDEO_EXTENSIONS.contains(&ext)
    {
        return Ok(UploadKind::Video);
    }
    if let Ok(format) = image::ImageFormat::from_path(path) {
        return Ok(UploadKind::Image {
            mime_type: format.to_mime_type().to_string(),
        });
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("read upload '{}'", path.display()))?;
    let format = image::guess_format(&bytes).map_err(|_| {
        PhotoboothError::validation(format!(
            "'{}' is neither a supported image nor a video",
            path.display()
        ))
    })?;
    Ok(UploadKind::Image {
        mime_type: format.to_mime_type().to_string(),
    })
}

/// Load an uploaded image as a single-frame sequence. The bytes are kept as-is.
pub fn load_image_upload(path: &Path) -> PhotoboothResult<FrameSequence> {
    let UploadKind::Image { mime_type } = classify_upload(path)? else {
        return Err(PhotoboothError::validation(format!(
            "'{}' is a video; sample it instead",
            path.display()
        )));
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("read upload '{}'", path.display()))?;
    frame_from_bytes(bytes, &mime_type)
}

/// Single-frame upload sequence from in-memory bytes and their declared MIME type.
pub fn frame_from_bytes(bytes: Vec<u8>, mime_type: &str) -> PhotoboothResult<FrameSequence> {
    let frame = Frame::new(bytes, mime_type)?;
    tracing::debug!(
        mime_type,
        bytes = frame.data().len(),
        "loaded image upload"
    );
    Ok(FrameSequence::single(FrameOrigin::Upload, frame))
}

#[cfg(test)]
#[path = "../../tests/unit/capture/upload.rs"]
mod tests;
