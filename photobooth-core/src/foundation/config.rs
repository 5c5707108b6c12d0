use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Environment variable consulted when a direct endpoint has no inline API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default public endpoint of the image-generation service.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp-image-generation";

/// Style used when the caller does not pick one.
pub const DEFAULT_STYLE: &str = "Watercolor Painting";

/// Full application configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoboothConfig {
    /// Remote stylize capability.
    pub stylize: StylizeConfig,
    /// Frame capture knobs.
    pub capture: CaptureOpts,
    /// Result presentation knobs.
    pub present: PresentOpts,
    /// Export destinations.
    pub export: ExportOpts,
}

impl PhotoboothConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(s: &str) -> PhotoboothResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PhotoboothError::serde(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> PhotoboothResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> PhotoboothResult<()> {
        if self.stylize.model.trim().is_empty() {
            return Err(PhotoboothError::validation("stylize.model must not be empty"));
        }
        if self.stylize.timeout_ms == 0 {
            return Err(PhotoboothError::validation("stylize.timeout_ms must be > 0"));
        }
        for (name, q) in [
            ("capture.photo_jpeg_quality", self.capture.photo_jpeg_quality),
            ("capture.sample_jpeg_quality", self.capture.sample_jpeg_quality),
        ] {
            if q == 0 || q > 100 {
                return Err(PhotoboothError::validation(format!(
                    "{name} must be within 1..=100"
                )));
            }
        }
        if self.capture.camera.width == 0 || self.capture.camera.height == 0 {
            return Err(PhotoboothError::validation(
                "capture.camera width/height must be non-zero",
            ));
        }
        if self.present.fps == 0 || self.present.preview_fps == 0 {
            return Err(PhotoboothError::validation("present fps values must be > 0"));
        }
        if self.present.frame_hold_ms == 0 {
            return Err(PhotoboothError::validation("present.frame_hold_ms must be > 0"));
        }
        if !self.export.pdf_margin_mm.is_finite() || self.export.pdf_margin_mm < 0.0 {
            return Err(PhotoboothError::validation(
                "export.pdf_margin_mm must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Which deployment shape the stylize client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StylizeEndpoint {
    /// Call the service directly with a caller-held credential.
    Direct {
        /// Service base URL.
        #[serde(default = "default_gemini_base_url")]
        base_url: String,
        /// Inline API key; falls back to [`API_KEY_ENV`].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
    /// Call a trusted proxy that injects the credential server-side.
    Proxy {
        /// Proxy base URL.
        base_url: String,
    },
}

impl Default for StylizeEndpoint {
    fn default() -> Self {
        Self::Direct {
            base_url: default_gemini_base_url(),
            api_key: None,
        }
    }
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

/// Remote stylize settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylizeConfig {
    /// Deployment shape.
    pub endpoint: StylizeEndpoint,
    /// Model identifier for direct calls.
    pub model: String,
    /// Per-call timeout.
    pub timeout_ms: u64,
}

impl Default for StylizeConfig {
    fn default() -> Self {
        Self {
            endpoint: StylizeEndpoint::default(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl StylizeConfig {
    /// Direct-mode key: inline value first, then the environment. Blank keys count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        match &self.endpoint {
            StylizeEndpoint::Direct { api_key, .. } => api_key
                .clone()
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .filter(|k| !k.trim().is_empty()),
            StylizeEndpoint::Proxy { .. } => None,
        }
    }
}

/// Capture settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOpts {
    /// Samples taken from an uploaded video.
    pub sample_count: u32,
    /// JPEG quality of a single camera snapshot.
    pub photo_jpeg_quality: u8,
    /// JPEG quality of each video sample (lower: batches are bandwidth-bound).
    pub sample_jpeg_quality: u8,
    /// Live camera device.
    pub camera: CameraOpts,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            sample_count: 10,
            photo_jpeg_quality: 95,
            sample_jpeg_quality: 85,
            camera: CameraOpts::default(),
        }
    }
}

/// Live camera device selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOpts {
    /// Device path or name passed to ffmpeg.
    pub device: String,
    /// ffmpeg input format (`v4l2`, `avfoundation`, `dshow`).
    pub input_format: String,
    /// Requested capture width.
    pub width: u32,
    /// Requested capture height.
    pub height: u32,
}

impl Default for CameraOpts {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            input_format: "v4l2".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Presentation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentOpts {
    /// How long each frame stays on screen in an assembled clip.
    pub frame_hold_ms: u64,
    /// Encoder frame rate of assembled clips.
    pub fps: u32,
    /// Frame rate of the looping preview of captured samples.
    pub preview_fps: u32,
}

impl Default for PresentOpts {
    fn default() -> Self {
        Self {
            frame_hold_ms: 100,
            fps: 10,
            preview_fps: 5,
        }
    }
}

/// Export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    /// Where the persisted export settings live. `None` uses the platform config dir.
    pub settings_path: Option<PathBuf>,
    /// Page margin of the PDF export.
    pub pdf_margin_mm: f64,
    /// GitHub REST API base.
    pub github_api_base: String,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            settings_path: None,
            pdf_margin_mm: 10.0,
            github_api_base: "https://api.github.com".to_string(),
        }
    }
}

impl ExportOpts {
    /// Settings file location, falling back to `<config_dir>/photobooth/settings.json`.
    pub fn resolved_settings_path(&self) -> PathBuf {
        self.settings_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("photobooth")
                .join("settings.json")
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
