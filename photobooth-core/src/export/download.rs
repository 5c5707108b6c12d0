use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::export::unix_millis;
use crate::foundation::core::FrameSequence;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::present::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::present::presenter::{
    ClipOpts, ClipStats, PresentationMode, PreviewOpts, assemble_clip, assemble_preview,
};

/// What [`save_output`] produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SavedOutput {
    /// The single output frame, written with its own encoding.
    Image(PathBuf),
    /// The assembled clip.
    Video {
        /// Written MP4.
        path: PathBuf,
        /// Clip geometry and frame counts.
        stats: ClipStats,
    },
}

impl SavedOutput {
    /// Path of the written file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Image(path) | Self::Video { path, .. } => path,
        }
    }
}

/// Save the current output under `dir`: one frame as `art-<ms>.<ext>`, several as the
/// assembled clip `art-vid-<ms>.mp4` (requires `ffmpeg` on `PATH`).
pub fn save_output(seq: &FrameSequence, dir: &Path, opts: ClipOpts) -> PhotoboothResult<SavedOutput> {
    let stamp = unix_millis();
    match PresentationMode::for_sequence(seq) {
        PresentationMode::Empty => Err(PhotoboothError::validation("nothing to download")),
        PresentationMode::Single => {
            let frame = seq
                .first()
                .ok_or_else(|| PhotoboothError::validation("nothing to download"))?;
            let path = dir.join(format!("art-{stamp}.{}", frame.extension()));
            ensure_parent_dir(&path)?;
            std::fs::write(&path, frame.data())
                .with_context(|| format!("write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "image saved");
            Ok(SavedOutput::Image(path))
        }
        PresentationMode::Video => {
            let path = dir.join(format!("art-vid-{stamp}.mp4"));
            let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(path.clone()));
            let stats = assemble_clip(seq, opts, &mut sink)?;
            tracing::info!(path = %path.display(), frames = stats.encoded_frames, "clip saved");
            Ok(SavedOutput::Video { path, stats })
        }
    }
}

/// Write the looping preview of `seq` under `dir` as `preview-<ms>.mp4` (requires `ffmpeg` on
/// `PATH`).
pub fn save_preview(
    seq: &FrameSequence,
    dir: &Path,
    opts: PreviewOpts,
) -> PhotoboothResult<SavedOutput> {
    if seq.is_empty() {
        return Err(PhotoboothError::validation("nothing to preview"));
    }
    let path = dir.join(format!("preview-{}.mp4", unix_millis()));
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(path.clone()));
    let stats = assemble_preview(seq, opts, &mut sink)?;
    tracing::info!(path = %path.display(), frames = stats.encoded_frames, "preview saved");
    Ok(SavedOutput::Video { path, stats })
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
