use std::io::Cursor;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::export::settings::ExportSettings;
use crate::export::unix_millis;
use crate::foundation::core::Frame;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::stylize::client::{agent, map_transport_error};

const USER_AGENT: &str = concat!("photobooth/", env!("CARGO_PKG_VERSION"));

/// Body of the contents API `PUT`.
#[derive(Debug, Serialize)]
pub(crate) struct PutContentBody {
    pub(crate) message: String,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    content: Option<PutContentFile>,
}

#[derive(Debug, Deserialize)]
struct PutContentFile {
    path: String,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Where an uploaded artwork ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Path inside the repository.
    pub path: String,
    /// Browser link to the file, when GitHub reports one.
    pub html_url: Option<String>,
}

/// Pushes one frame into a repository through the GitHub contents API.
pub struct GitHubUploader {
    api_base: String,
    agent: ureq::Agent,
}

impl GitHubUploader {
    /// Uploader against `api_base` (normally `https://api.github.com`).
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            agent: agent(timeout),
        }
    }

    /// Commit `frame` as `output/art-<ms>.png` in `settings.github_repo`.
    ///
    /// Unconfigured settings fail with [`PhotoboothError::Config`] before any request is made.
    #[tracing::instrument(skip(self, frame, settings), fields(repo = %settings.github_repo))]
    pub fn upload(&self, frame: &Frame, settings: &ExportSettings) -> PhotoboothResult<UploadReceipt> {
        if !settings.is_configured() {
            return Err(PhotoboothError::config(
                "GitHub export is not configured: set a repository and token first",
            ));
        }
        let repo = settings.github_repo.trim();
        let name = format!("art-{}.png", unix_millis());
        let url = content_url(&self.api_base, repo, &name);
        let body = put_body(frame, &name)?;

        let resp = self
            .agent
            .put(&url)
            .set("Authorization", &format!("token {}", settings.github_token.trim()))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .send_json(&body)
            .map_err(|e| map_transport_error(e, github_message))?;

        let parsed: PutContentResponse = resp
            .into_json()
            .map_err(|e| PhotoboothError::remote(format!("unreadable GitHub response: {e}")))?;
        let receipt = match parsed.content {
            Some(file) => UploadReceipt {
                path: file.path,
                html_url: file.html_url,
            },
            None => UploadReceipt {
                path: format!("output/{name}"),
                html_url: None,
            },
        };
        tracing::info!(path = %receipt.path, "artwork uploaded");
        Ok(receipt)
    }
}

pub(crate) fn content_url(api_base: &str, repo: &str, name: &str) -> String {
    format!("{api_base}/repos/{repo}/contents/output/{name}")
}

/// Build the commit body. The file is always PNG, so other encodings are converted.
pub(crate) fn put_body(frame: &Frame, name: &str) -> PhotoboothResult<PutContentBody> {
    let content = if frame.mime_type() == "image/png" {
        frame.to_base64()
    } else {
        let img = image::load_from_memory(frame.data()).map_err(|e| {
            PhotoboothError::media(format!("cannot decode {} frame: {e}", frame.mime_type()))
        })?;
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| PhotoboothError::media(format!("png encode failed: {e}")))?;
        STANDARD.encode(png.into_inner())
    };
    Ok(PutContentBody {
        message: format!("Add artwork: {name}"),
        content,
    })
}

fn github_message(resp: ureq::Response) -> String {
    let status_text = resp.status_text().to_string();
    resp.into_json::<GitHubErrorBody>()
        .map(|b| b.message)
        .unwrap_or(status_text)
}

#[cfg(test)]
#[path = "../../tests/unit/export/github.rs"]
mod tests;
