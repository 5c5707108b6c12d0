/// Convenience result type used across the photo booth.
pub type PhotoboothResult<T> = Result<T, PhotoboothError>;

/// Top-level error taxonomy used by pipeline, capture and export APIs.
///
/// Every error is terminal for the operation that produced it. Nothing in this crate retries
/// automatically; callers decide whether to re-invoke.
#[derive(thiserror::Error, Debug)]
pub enum PhotoboothError {
    /// Missing or rejected credential for the image-generation service or an export destination.
    #[error("auth error: {0}")]
    Auth(String),

    /// The remote call failed, timed out, or reported a non-success status.
    #[error("remote error: {0}")]
    Remote(String),

    /// Camera or media device was denied, missing, or failed mid-capture.
    #[error("device error: {0}")]
    Device(String),

    /// An export destination is not configured.
    #[error("config error: {0}")]
    Config(String),

    /// Undecodable or empty media, or an encoder failure.
    #[error("media error: {0}")]
    Media(String),

    /// Invalid caller-provided input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A pipeline run is already in flight for this session.
    #[error("session busy: a pipeline run is already in flight")]
    Busy,

    /// The session was reset while a run was in flight; its late results were dropped.
    #[error("run superseded: session was reset while the run was in flight")]
    Superseded,

    /// A bulk run stopped at `index`; the `produced` frames before it stay in the session.
    #[error("batch aborted at frame {index} ({produced} frames kept): {source}")]
    BatchAborted {
        /// Input index of the frame whose call failed.
        index: usize,
        /// Output frames kept from before the failure.
        produced: usize,
        /// The failure that stopped the run.
        #[source]
        source: Box<PhotoboothError>,
    },

    /// Errors when serializing or deserializing config, settings, or wire bodies.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotoboothError {
    /// Build a [`PhotoboothError::Auth`] value.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Build a [`PhotoboothError::Remote`] value.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Build a [`PhotoboothError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`PhotoboothError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PhotoboothError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`PhotoboothError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PhotoboothError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// The underlying failure, looking through [`PhotoboothError::BatchAborted`].
    pub fn root(&self) -> &PhotoboothError {
        match self {
            Self::BatchAborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// `true` when the root failure is a credential problem.
    pub fn is_auth(&self) -> bool {
        matches!(self.root(), Self::Auth(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
