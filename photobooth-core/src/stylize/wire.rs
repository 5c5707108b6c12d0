//! JSON bodies exchanged between [`crate::ProxyStylizer`] and the proxy service.

use serde::{Deserialize, Serialize};

use crate::foundation::core::Frame;
use crate::foundation::error::PhotoboothResult;
use crate::stylize::client::StyleResult;

/// `POST /v1/stylize` request: one frame plus an already-resolved instruction text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeRequestBody {
    /// Base64 image bytes.
    pub image: String,
    /// MIME type of `image`.
    pub mime_type: String,
    /// Prompt text.
    pub instruction: String,
}

/// `POST /v1/stylize` success response. No `image` means the call produced no output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylizeResponseBody {
    /// Base64 image bytes of the output frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// MIME type of `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Advisory text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl StylizeResponseBody {
    /// Wire form of a stylize outcome.
    pub fn from_result(result: &StyleResult) -> Self {
        Self {
            image: result.frame().map(Frame::to_base64),
            mime_type: result.frame().map(|f| f.mime_type().to_string()),
            text: result.advisory().map(str::to_string),
        }
    }

    /// Decode back into a stylize outcome.
    pub fn into_result(self) -> PhotoboothResult<StyleResult> {
        match self.image {
            Some(data) => {
                let mime = self.mime_type.unwrap_or_else(|| "image/png".to_string());
                Ok(StyleResult::Output {
                    frame: Frame::from_base64(&data, mime)?,
                    advisory: self.text,
                })
            }
            None => Ok(StyleResult::NoOutput { advisory: self.text }),
        }
    }
}

/// Error body of any non-2xx proxy response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// Static liveness descriptor returned by `GET /health`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub service: String,
    /// Always `"healthy"` when the service answers.
    pub status: String,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
#[path = "../../tests/unit/stylize/wire.rs"]
mod tests;
