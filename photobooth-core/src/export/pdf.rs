//! A4 portrait PDF export: one image per page, built with `lopdf`.
//!
//! Every frame is decoded and re-encoded as a three-channel baseline JPEG before embedding, so
//! the `/DeviceRGB` image dictionary always matches the stream it describes.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::capture::encode::encode_jpeg;
use crate::export::unix_millis;
use crate::foundation::core::{Frame, FrameSequence, RgbaFrame};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::present::ffmpeg::ensure_parent_dir;

/// A4 width in points.
pub const A4_WIDTH_PT: f64 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT_PT: f64 = 841.89;
const PT_PER_MM: f64 = 72.0 / 25.4;
const EMBED_QUALITY: u8 = 92;
const IMAGE_NAME: &str = "Im0";

/// Placement of one image on its page, in points from the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
}

/// Where a `px_width`x`px_height` image goes on an A4 page with `margin_mm` margins.
///
/// The image spans the page width minus both margins, keeps its aspect ratio and sits at the
/// top margin. Images too tall for the page are scaled down and centered horizontally.
pub fn place_image(px_width: u32, px_height: u32, margin_mm: f64) -> ImagePlacement {
    let margin = margin_mm * PT_PER_MM;
    let avail_w = A4_WIDTH_PT - 2.0 * margin;
    let avail_h = A4_HEIGHT_PT - 2.0 * margin;

    let mut width = avail_w;
    let mut height = avail_w * f64::from(px_height) / f64::from(px_width);
    if height > avail_h {
        width *= avail_h / height;
        height = avail_h;
    }
    ImagePlacement {
        x: (A4_WIDTH_PT - width) / 2.0,
        y: A4_HEIGHT_PT - margin - height,
        width,
        height,
    }
}

struct PageImage {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

// CMYK and grayscale JPEGs would not match `/DeviceRGB`; decoding to RGB first covers both.
fn page_image(frame: &Frame) -> PhotoboothResult<PageImage> {
    let img = image::load_from_memory(frame.data()).map_err(|e| {
        PhotoboothError::media(format!("cannot decode {} frame: {e}", frame.mime_type()))
    })?;
    let (width, height) = (img.width(), img.height());
    let jpeg = encode_jpeg(&RgbaFrame::from_image(img.to_rgba8()), EMBED_QUALITY)?;
    Ok(PageImage {
        jpeg: jpeg.data().to_vec(),
        width,
        height,
    })
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    page: PageImage,
    margin_mm: f64,
) -> PhotoboothResult<ObjectId> {
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(page.width),
            "Height" => i64::from(page.height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        page.jpeg,
    ));

    let at = place_image(page.width, page.height, margin_mm);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(at.width),
                    real(0.0),
                    real(0.0),
                    real(at.height),
                    real(at.x),
                    real(at.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| PhotoboothError::media(format!("pdf page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(A4_WIDTH_PT), real(A4_HEIGHT_PT)],
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
        },
        "Contents" => content_id,
    }))
}

/// Render `seq` as a PDF document, one frame per page in sequence order.
pub fn render_pdf(seq: &FrameSequence, margin_mm: f64) -> PhotoboothResult<Vec<u8>> {
    if seq.is_empty() {
        return Err(PhotoboothError::validation("nothing to export"));
    }
    if !margin_mm.is_finite() || margin_mm < 0.0 || margin_mm * 2.0 * PT_PER_MM >= A4_WIDTH_PT {
        return Err(PhotoboothError::validation(format!(
            "pdf margin {margin_mm} mm does not fit an A4 page"
        )));
    }

    let pages = seq
        .frames()
        .iter()
        .map(page_image)
        .collect::<PhotoboothResult<Vec<_>>>()?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        kids.push(Object::Reference(add_page(&mut doc, pages_id, page, margin_mm)?));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| PhotoboothError::media(format!("serialize pdf: {e}")))?;
    Ok(out)
}

/// Render `seq` and write it to `path`.
#[tracing::instrument(skip(seq), fields(frames = seq.len()))]
pub fn write_pdf(seq: &FrameSequence, margin_mm: f64, path: &Path) -> PhotoboothResult<()> {
    let bytes = render_pdf(seq, margin_mm)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, &bytes).with_context(|| format!("write pdf '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "pdf written");
    Ok(())
}

/// Write `seq` under `dir` as `export-<ms>.pdf` and return the path.
pub fn save_pdf(seq: &FrameSequence, margin_mm: f64, dir: &Path) -> PhotoboothResult<PathBuf> {
    let path = dir.join(format!("export-{}.pdf", unix_millis()));
    write_pdf(seq, margin_mm, &path)?;
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pdf.rs"]
mod tests;
