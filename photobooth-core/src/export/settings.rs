use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// User-supplied export destination, persisted between runs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// `owner/name` of the destination repository.
    pub github_repo: String,
    /// Token sent as `Authorization: token ...`.
    pub github_token: String,
}

impl std::fmt::Debug for ExportSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportSettings")
            .field("github_repo", &self.github_repo)
            .field("github_token", &if self.github_token.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

impl ExportSettings {
    /// Settings with both fields trimmed.
    pub fn new(repo: impl AsRef<str>, token: impl AsRef<str>) -> Self {
        Self {
            github_repo: repo.as_ref().trim().to_string(),
            github_token: token.as_ref().trim().to_string(),
        }
    }

    /// `true` when both the repository and the token are set.
    pub fn is_configured(&self) -> bool {
        !self.github_repo.trim().is_empty() && !self.github_token.trim().is_empty()
    }

    /// Load from `path`. A missing file yields empty settings.
    pub fn load(path: &Path) -> PhotoboothResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no export settings yet");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read export settings '{}'", path.display()))
                    .into());
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            PhotoboothError::serde(format!(
                "invalid export settings '{}': {e}",
                path.display()
            ))
        })
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> PhotoboothResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PhotoboothError::serde(format!("encode export settings: {e}")))?;
        std::fs::write(path, json)
            .with_context(|| format!("write export settings '{}'", path.display()))?;
        tracing::info!(path = %path.display(), repo = %self.github_repo, "export settings saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/settings.rs"]
mod tests;
