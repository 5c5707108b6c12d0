//! Thin proxy in front of the image-generation backend.
//!
//! Native clients talk to this service instead of the backend so the backend credential never
//! leaves the server. Requests and responses use the JSON bodies in [`photobooth`]'s wire module
//! ([`StylizeRequestBody`], [`StylizeResponseBody`], [`ErrorBody`]).
//!
//! Endpoints:
//! - `GET /health` returns a static [`ServiceDescriptor`]
//! - `POST /v1/stylize` forwards one frame and one instruction upstream
#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use photobooth::{
    ErrorBody, Frame, Instruction, PhotoboothError, ServiceDescriptor, StylizeRequestBody,
    StylizeResponseBody, Stylizer,
};

/// Name reported by `GET /health`.
pub const SERVICE_NAME: &str = "photobooth-proxy";
/// Largest accepted request body. Base64 photos from phone cameras fit comfortably.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct ProxyState {
    upstream: Arc<dyn Stylizer>,
}

impl ProxyState {
    /// State forwarding to `upstream`, which holds the server-side credential.
    pub fn new(upstream: Arc<dyn Stylizer>) -> Self {
        Self { upstream }
    }
}

/// Routes of the proxy service.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/stylize", post(stylize))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Static liveness descriptor.
pub fn service_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        service: SERVICE_NAME.to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

async fn health() -> Json<ServiceDescriptor> {
    Json(service_descriptor())
}

async fn stylize(
    State(state): State<ProxyState>,
    body: Result<Json<StylizeRequestBody>, JsonRejection>,
) -> Result<Json<StylizeResponseBody>, ProxyError> {
    let Json(body) = body?;
    let frame = Frame::from_base64(&body.image, body.mime_type).map_err(ProxyError::invalid_input)?;
    let instruction = Instruction::edit(body.instruction);
    instruction.validate().map_err(ProxyError::invalid_input)?;

    let upstream = state.upstream.clone();
    let bytes = frame.data().len();
    let result = tokio::task::spawn_blocking(move || upstream.stylize(&frame, &instruction))
        .await
        .map_err(|e| ProxyError::Internal(format!("stylize task failed: {e}")))?
        .map_err(ProxyError::upstream)?;

    tracing::info!(bytes, output = result.frame().is_some(), "stylize forwarded");
    Ok(Json(StylizeResponseBody::from_result(&result)))
}

/// Failure of a proxy request, rendered as `{ "error": ... }`.
#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    /// The request body could not be read.
    #[error("{1}")]
    Rejected(StatusCode, String),
    /// The request was well-formed JSON but not a usable frame or instruction.
    #[error("{0}")]
    BadRequest(String),
    /// The upstream service did not produce an answer.
    #[error("{0}")]
    Upstream(String),
    /// The proxy itself failed.
    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(status, _) => *status,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// A problem with what the caller sent, found before anything goes upstream.
    fn invalid_input(err: PhotoboothError) -> Self {
        match err {
            PhotoboothError::Validation(msg)
            | PhotoboothError::Serde(msg)
            | PhotoboothError::Media(msg) => Self::BadRequest(msg),
            other => Self::BadRequest(other.to_string()),
        }
    }

    /// Any failure of the upstream call. Whatever went wrong there is a gateway problem, not
    /// the caller's.
    fn upstream(err: PhotoboothError) -> Self {
        match err {
            // The caller never sees anything about the server-side key.
            PhotoboothError::Auth(_) => {
                Self::Upstream("the proxy's upstream credential was missing or rejected".to_string())
            }
            PhotoboothError::Remote(msg) => Self::Upstream(msg),
            other => Self::Upstream(format!("upstream returned an unusable answer: {other}")),
        }
    }
}

impl From<JsonRejection> for ProxyError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "stylize request failed");
        } else {
            tracing::debug!(%status, error = %self, "stylize request rejected");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
#[path = "../tests/unit/lib.rs"]
mod tests;
