use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::foundation::core::Frame;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::stylize::client::{Instruction, StyleResult, Stylizer, agent, map_transport_error};

/// Direct client for the `generateContent` image API, holding the caller's credential.
pub struct GeminiStylizer {
    base_url: String,
    api_key: Option<String>,
    model: String,
    agent: ureq::Agent,
}

impl GeminiStylizer {
    /// Client for `model` at `base_url`. A `None` key fails every call with an auth error.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            agent: agent(timeout),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl Stylizer for GeminiStylizer {
    fn check_credentials(&self) -> PhotoboothResult<()> {
        match self.api_key.as_deref() {
            Some(k) if !k.trim().is_empty() => Ok(()),
            _ => Err(PhotoboothError::auth(
                "no API key configured for direct calls (set GEMINI_API_KEY or use the proxy)",
            )),
        }
    }

    #[tracing::instrument(skip(self, frame), fields(model = %self.model, bytes = frame.data().len()))]
    fn stylize(&self, frame: &Frame, instruction: &Instruction) -> PhotoboothResult<StyleResult> {
        self.check_credentials()?;
        let key = self.api_key.as_deref().unwrap_or_default();
        let body = generate_request_body(frame, instruction);

        let resp = self
            .agent
            .post(&self.endpoint())
            .set("Content-Type", "application/json")
            .set("x-goog-api-key", key)
            .send_json(body)
            .map_err(|e| map_transport_error(e, api_error_message))?;

        let parsed: GenerateResponse = resp
            .into_json()
            .map_err(|e| PhotoboothError::remote(format!("unreadable response body: {e}")))?;
        parse_generate_response(parsed)
    }
}

/// JSON body of one `generateContent` call: the frame inline, then the prompt.
pub(crate) fn generate_request_body(frame: &Frame, instruction: &Instruction) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                { "inlineData": { "mimeType": frame.mime_type(), "data": frame.to_base64() } },
                { "text": instruction.prompt() }
            ]
        }],
        "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// First inline image of the first candidate wins; text parts become advisory.
pub(crate) fn parse_generate_response(resp: GenerateResponse) -> PhotoboothResult<StyleResult> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Ok(StyleResult::NoOutput {
                advisory: Some(format!("request blocked: {reason}")),
            });
        }
        return Err(PhotoboothError::remote("response contained no candidates"));
    };

    let mut image = None;
    let mut texts = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(inline) = part.inline_data {
            if image.is_none() {
                image = Some(inline);
            }
        } else if let Some(text) = part.text {
            let text = text.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        }
    }

    let advisory = if texts.is_empty() {
        candidate.finish_reason.filter(|r| r != "STOP")
    } else {
        Some(texts.join("\n"))
    };

    match image {
        Some(inline) => Ok(StyleResult::Output {
            frame: Frame::from_base64(&inline.data, inline.mime_type)?,
            advisory,
        }),
        None => Ok(StyleResult::NoOutput { advisory }),
    }
}

fn api_error_message(resp: ureq::Response) -> String {
    let status_text = resp.status_text().to_string();
    resp.into_json::<serde_json::Value>()
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(status_text)
}

#[cfg(test)]
#[path = "../../tests/unit/stylize/gemini.rs"]
mod tests;
