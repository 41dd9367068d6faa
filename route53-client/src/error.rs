use serde::Serialize;
use thiserror::Error;

/// Unified error type for all client operations.
///
/// Variants fall into the families callers branch on:
///
/// - transport failures: [`Network`](Self::Network), [`Timeout`](Self::Timeout)
/// - remote rejections: [`Api`](Self::Api), [`MalformedErrorBody`](Self::MalformedErrorBody)
/// - codec failures: [`Decode`](Self::Decode), [`Encode`](Self::Encode)
/// - change tracking: [`ChangeSyncTimeout`](Self::ChangeSyncTimeout),
///   [`ChangeTrackerGone`](Self::ChangeTrackerGone)
/// - local setup: [`Credentials`](Self::Credentials), [`InvalidEndpoint`](Self::InvalidEndpoint)
///
/// Nothing is retried inside the client. Every variant is serializable so that
/// front ends can report it as structured output.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum ClientError {
    /// Connection failure, TLS failure, or a body that could not be read.
    #[error("Network error: {detail}")]
    Network {
        /// Error details.
        detail: String,
    },

    /// The HTTP exchange exceeded the configured request timeout.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The service rejected the request with a well-formed error document.
    #[error("{code}: {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Remote error code, e.g. `NoSuchHostedZone`.
        code: String,
        /// Human-readable message from the service.
        message: String,
        /// Request identifier for support correlation, when the service sent one.
        request_id: Option<String>,
    },

    /// The service answered with a failure status and a body that is not an error document.
    #[error("HTTP {status}: could not parse error body")]
    MalformedErrorBody {
        /// HTTP status of the response.
        status: u16,
        /// Raw response body.
        raw: String,
    },

    /// A success response did not match the expected document shape.
    #[error("Decode error: {detail}")]
    Decode {
        /// Details about the mismatch.
        detail: String,
        /// Raw payload that failed to decode.
        raw: String,
    },

    /// A request body could not be serialized.
    #[error("Encode error: {detail}")]
    Encode {
        /// Details about the serialization failure.
        detail: String,
    },

    /// A change did not reach `INSYNC` before the wait deadline.
    #[error("Change '{change_id}' not in sync after {waited_ms}ms")]
    ChangeSyncTimeout {
        /// Identifier of the change being tracked.
        change_id: String,
        /// The deadline that elapsed, in milliseconds.
        waited_ms: u64,
    },

    /// The background poller ended without reporting an outcome (runtime shutdown).
    #[error("Change tracker for '{change_id}' stopped without a result")]
    ChangeTrackerGone {
        /// Identifier of the change being tracked.
        change_id: String,
    },

    /// No usable credential could be obtained.
    #[error("Credential error: {detail}")]
    Credentials {
        /// Error details.
        detail: String,
    },

    /// The configured endpoint or HTTP client could not be set up.
    #[error("Invalid endpoint '{endpoint}': {detail}")]
    InvalidEndpoint {
        /// The offending endpoint.
        endpoint: String,
        /// Error details.
        detail: String,
    },
}

impl ClientError {
    /// Remote error code, for rejections that carried one.
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the service reported a missing resource (`NoSuchHostedZone`,
    /// `NoSuchChange`, `NoSuchHealthCheck`, ...).
    pub fn is_not_found(&self) -> bool {
        self.remote_code().is_some_and(|code| code.starts_with("NoSuch"))
    }

    /// Whether the failure happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    pub(crate) fn decode(detail: impl ToString, raw: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.to_string(),
            raw: raw.into(),
        }
    }
}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;
