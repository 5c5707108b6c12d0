use std::time::Duration;

use crate::foundation::core::Frame;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::stylize::client::{Instruction, StyleResult, Stylizer, agent, map_transport_error};
use crate::stylize::wire::{ErrorBody, ServiceDescriptor, StylizeRequestBody, StylizeResponseBody};

/// Client for the credential-injecting proxy. Holds no credential itself.
pub struct ProxyStylizer {
    base_url: String,
    agent: ureq::Agent,
}

impl ProxyStylizer {
    /// Client for the proxy at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: agent(timeout),
        }
    }

    /// Liveness check: fetch the proxy's static service descriptor.
    pub fn health(&self) -> PhotoboothResult<ServiceDescriptor> {
        let resp = self
            .agent
            .get(&format!("{}/health", self.base_url))
            .call()
            .map_err(|e| map_transport_error(e, error_body_message))?;
        resp.into_json()
            .map_err(|e| PhotoboothError::remote(format!("unreadable health response: {e}")))
    }
}

impl Stylizer for ProxyStylizer {
    #[tracing::instrument(skip(self, frame), fields(base_url = %self.base_url, bytes = frame.data().len()))]
    fn stylize(&self, frame: &Frame, instruction: &Instruction) -> PhotoboothResult<StyleResult> {
        let body = StylizeRequestBody {
            image: frame.to_base64(),
            mime_type: frame.mime_type().to_string(),
            instruction: instruction.prompt(),
        };
        let resp = self
            .agent
            .post(&format!("{}/v1/stylize", self.base_url))
            .send_json(&body)
            .map_err(|e| map_transport_error(e, error_body_message))?;

        let parsed: StylizeResponseBody = resp
            .into_json()
            .map_err(|e| PhotoboothError::remote(format!("unreadable proxy response: {e}")))?;
        parsed.into_result()
    }
}

fn error_body_message(resp: ureq::Response) -> String {
    let status_text = resp.status_text().to_string();
    resp.into_json::<ErrorBody>()
        .map(|b| b.error)
        .unwrap_or(status_text)
}
