use std::io::Cursor;

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::core::{Frame, RgbaFrame};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Encode a raster as a JPEG frame at `quality` (1..=100). Alpha is dropped.
pub fn encode_jpeg(raster: &RgbaFrame, quality: u8) -> PhotoboothResult<Frame> {
    if quality == 0 || quality > 100 {
        return Err(PhotoboothError::validation(
            "jpeg quality must be within 1..=100",
        ));
    }
    let rgba = raster.clone().into_image()?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
        .encode_image(&rgb)
        .context("encode jpeg")?;
    Frame::new(buf, "image/jpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/capture/encode.rs"]
mod tests;
