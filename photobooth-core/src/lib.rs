//! Photobooth turns a captured photo or video into stylized artwork through a remote
//! generative-image service.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: an uploaded image, a camera still, or evenly spaced samples of a video become a
//!    [`FrameSequence`].
//! 2. **Stylize**: the [`Orchestrator`] sends each frame, one call at a time and in order, to a
//!    [`Stylizer`] and appends the results to the [`Session`] output.
//! 3. **Edit** (optional): a free-form instruction is applied to the first output frame,
//!    collapsing the output to that one frame.
//! 4. **Present / export**: one frame is shown as is; several are assembled into a clip through a
//!    [`FrameSink`] (MP4 via the system `ffmpeg`). Output can be saved, written to a PDF, or
//!    committed to a GitHub repository.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No retries**: every failure is terminal for the current operation.
//! - **Order is preserved**: output frame `i` always comes from an earlier-or-equal input frame
//!   than output frame `i + 1`.
//! - **Explicit state**: the session is passed around as a [`SessionHandle`]; there are no globals.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod capture;
mod export;
mod foundation;
mod pipeline;
mod present;
mod stylize;

pub use capture::camera::{Camera, FfmpegCamera, LiveStream, StreamGuard, capture_photo};
pub use capture::encode::encode_jpeg;
pub use capture::upload::{UploadKind, classify_upload, frame_from_bytes, load_image_upload};
pub use capture::video::{
    FfmpegVideo, SampleCount, VideoDecoder, VideoSourceInfo, decode_video_frame_rgba8,
    probe_video, sample_timestamps, sample_video,
};
pub use export::download::{SavedOutput, save_output, save_preview};
pub use export::github::{GitHubUploader, UploadReceipt};
pub use export::pdf::{
    A4_HEIGHT_PT, A4_WIDTH_PT, ImagePlacement, place_image, render_pdf, save_pdf, write_pdf,
};
pub use export::settings::ExportSettings;
pub use foundation::config::{
    API_KEY_ENV, CameraOpts, CaptureOpts, DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_STYLE,
    ExportOpts, PhotoboothConfig, PresentOpts, StylizeConfig, StylizeEndpoint,
};
pub use foundation::core::{Frame, FrameOrigin, FrameSequence, PreviewHandle, RgbaFrame};
pub use foundation::error::{PhotoboothError, PhotoboothResult};
pub use pipeline::orchestrator::{BatchHandle, BatchReport, EditOutcome, Orchestrator, SkippedFrame};
pub use pipeline::session::{Session, SessionHandle};
pub use present::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use present::presenter::{
    ClipOpts, ClipStats, DEFAULT_PREVIEW_LOOPS, PresentationMode, PreviewOpts, assemble_clip,
    assemble_preview,
};
pub use present::sink::{FrameIndex, FrameSink, InMemorySink, SinkConfig};
pub use present::timed::{TimedFrame, TimedFrames};
pub use stylize::client::{Instruction, StyleResult, Stylizer, build_stylizer};
pub use stylize::gemini::GeminiStylizer;
pub use stylize::proxy::ProxyStylizer;
pub use stylize::wire::{ErrorBody, ServiceDescriptor, StylizeRequestBody, StylizeResponseBody};
