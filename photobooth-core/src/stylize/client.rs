use std::sync::Arc;
use std::time::Duration;

use crate::foundation::config::{StylizeConfig, StylizeEndpoint};
use crate::foundation::core::Frame;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::stylize::gemini::GeminiStylizer;
use crate::stylize::proxy::ProxyStylizer;

/// What to do with a frame: a named style for the first pass, free text for later edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Named style label such as `"Watercolor Painting"`.
    Style(String),
    /// Free-form edit text, sent verbatim.
    Edit(String),
}

impl Instruction {
    /// Style instruction.
    pub fn style(label: impl Into<String>) -> Self {
        Self::Style(label.into())
    }

    /// Edit instruction.
    pub fn edit(text: impl Into<String>) -> Self {
        Self::Edit(text.into())
    }

    /// Prompt text sent alongside the frame.
    pub fn prompt(&self) -> String {
        match self {
            Self::Style(label) => format!(
                "Transform this image into a {} style. Preserve the main subject.",
                label.trim()
            ),
            Self::Edit(text) => text.trim().to_string(),
        }
    }

    /// Reject blank labels and edit texts before any call is made.
    pub fn validate(&self) -> PhotoboothResult<()> {
        let (kind, text) = match self {
            Self::Style(label) => ("style label", label),
            Self::Edit(text) => ("edit instruction", text),
        };
        if text.trim().is_empty() {
            return Err(PhotoboothError::validation(format!("{kind} must not be empty")));
        }
        Ok(())
    }
}

/// Outcome of one successful remote call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleResult {
    /// The service returned an image.
    Output {
        /// The transformed frame.
        frame: Frame,
        /// Advisory text returned alongside the image, if any.
        advisory: Option<String>,
    },
    /// The service answered without an image (e.g. a text-only refusal). Not an error.
    NoOutput {
        /// Advisory text explaining the empty result, if any.
        advisory: Option<String>,
    },
}

impl StyleResult {
    /// The output frame, if one was produced.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Output { frame, .. } => Some(frame),
            Self::NoOutput { .. } => None,
        }
    }

    /// Advisory text, if any.
    pub fn advisory(&self) -> Option<&str> {
        match self {
            Self::Output { advisory, .. } | Self::NoOutput { advisory } => advisory.as_deref(),
        }
    }
}

/// One remote call per request. Implementations never retry.
pub trait Stylizer: Send + Sync {
    /// Fail fast with [`PhotoboothError::Auth`] when the call could not possibly be authorized.
    fn check_credentials(&self) -> PhotoboothResult<()> {
        Ok(())
    }

    /// Transform `frame` under `instruction`.
    ///
    /// Errors: [`PhotoboothError::Auth`] for missing/rejected credentials,
    /// [`PhotoboothError::Remote`] for transport failures, timeouts and non-success statuses.
    fn stylize(&self, frame: &Frame, instruction: &Instruction) -> PhotoboothResult<StyleResult>;
}

impl<T: Stylizer + ?Sized> Stylizer for Arc<T> {
    fn check_credentials(&self) -> PhotoboothResult<()> {
        (**self).check_credentials()
    }

    fn stylize(&self, frame: &Frame, instruction: &Instruction) -> PhotoboothResult<StyleResult> {
        (**self).stylize(frame, instruction)
    }
}

/// Build the client for the configured deployment shape.
pub fn build_stylizer(cfg: &StylizeConfig) -> Arc<dyn Stylizer> {
    let timeout = Duration::from_millis(cfg.timeout_ms);
    match &cfg.endpoint {
        StylizeEndpoint::Direct { base_url, .. } => Arc::new(GeminiStylizer::new(
            base_url.clone(),
            cfg.resolve_api_key(),
            cfg.model.clone(),
            timeout,
        )),
        StylizeEndpoint::Proxy { base_url } => {
            Arc::new(ProxyStylizer::new(base_url.clone(), timeout))
        }
    }
}

pub(crate) fn agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(timeout).build()
}

/// Map a ureq failure onto the stylize error taxonomy.
pub(crate) fn map_transport_error(
    err: ureq::Error,
    status_message: impl FnOnce(ureq::Response) -> String,
) -> PhotoboothError {
    match err {
        ureq::Error::Status(status @ (401 | 403), resp) => PhotoboothError::auth(format!(
            "service rejected the credential ({status}): {}",
            status_message(resp)
        )),
        ureq::Error::Status(status, resp) => {
            PhotoboothError::remote(format!("status {status}: {}", status_message(resp)))
        }
        ureq::Error::Transport(transport) => {
            PhotoboothError::remote(format!("transport failure: {transport}"))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stylize/client.rs"]
mod tests;
