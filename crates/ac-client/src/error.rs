//! Error types for activecampaign-client.
//!
//! Every failure surfaced by the request pipeline is an [`Error`] whose
//! [`ErrorKind`] tells callers what went wrong. Status code, message and a
//! diagnostic context map travel with every kind.

use serde_json::{Map, Value};

use crate::response::{sanitize_error_message, RawResponse};
use crate::transport::{FailureKind, TransportFailure};

/// Result type alias for activecampaign-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for activecampaign-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, or 0 when no response was received.
    pub status: u16,
    /// Diagnostic side channel (error type, status code, raw body, ...).
    pub context: Map<String, Value>,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: 0,
            context: Map::new(),
            source: None,
        }
    }

    /// Create a new error with the given kind, message and source.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Set the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach a diagnostic context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Convert a terminal transport failure into a typed error.
    ///
    /// Failures without a response become [`ErrorKind::Generic`] with status 0
    /// and a message prefixed `Connection error`, except requests that could
    /// not be built, which are [`ErrorKind::Configuration`]. Failures
    /// carrying a response, including a partially read one, are classified
    /// by status code; the message prefers the body's `message` field, then
    /// its `error` field, then the transport message.
    pub fn from_failure(failure: TransportFailure) -> Self {
        let error_type = failure.type_name();
        let TransportFailure {
            kind: failure_kind,
            message,
            response,
            source,
        } = failure;

        let Some(response) = response else {
            let (kind, message) = match failure_kind {
                FailureKind::Build => (
                    ErrorKind::Configuration,
                    format!("Invalid request: {message}"),
                ),
                _ => (ErrorKind::Generic, format!("Connection error: {message}")),
            };
            let mut err = Error::new(kind, message)
                .with_context("error_type", error_type)
                .with_context("status_code", 0);
            err.source = source;
            return err;
        };

        let parsed = response.json_body();
        let message = parsed
            .as_ref()
            .and_then(message_from_body)
            .unwrap_or(message);
        let kind = classify_status(&response, parsed.as_ref());

        let mut err = Error::new(kind, sanitize_error_message(&message))
            .with_status(response.status())
            .with_context("error_type", error_type)
            .with_context("status_code", response.status())
            .with_context("response_body", response.body());
        if let Some(parsed) = parsed {
            err = err.with_context("parsed_body", parsed);
        }
        err.source = source;
        err
    }

    /// HTTP status code, 0 when no response was received.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic context.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind, ErrorKind::Configuration)
    }

    /// Returns true if this is an authentication error (401 or 403).
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Returns true if the resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// Returns true if the server rejected the payload.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation { .. })
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimit { .. })
    }

    /// Seconds to wait before retrying, when the server supplied a hint.
    pub fn retry_after(&self) -> Option<u64> {
        match &self.kind {
            ErrorKind::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Field errors returned with a 422 response.
    pub fn validation_errors(&self) -> Option<&Value> {
        match &self.kind {
            ErrorKind::Validation { errors } => errors.as_ref(),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// Invalid client configuration. Raised at construction, never retried.
    #[error("Configuration error")]
    Configuration,

    /// Any request failure without a more specific kind, including
    /// connection failures and malformed responses.
    #[error("API error")]
    Generic,

    /// The API token was rejected (HTTP 401 or 403).
    #[error("Authentication error")]
    Authentication,

    /// Resource not found (HTTP 404).
    #[error("Not found")]
    NotFound,

    /// The server rejected the request payload (HTTP 422).
    #[error("Validation error")]
    Validation { errors: Option<Value> },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limited{}", retry_after.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimit { retry_after: Option<u64> },
}

fn classify_status(response: &RawResponse, parsed: Option<&Value>) -> ErrorKind {
    match response.status() {
        401 | 403 => ErrorKind::Authentication,
        404 => ErrorKind::NotFound,
        422 => ErrorKind::Validation {
            errors: parsed.and_then(|body| body.get("errors")).cloned(),
        },
        429 => ErrorKind::RateLimit {
            retry_after: response.retry_after(),
        },
        _ => ErrorKind::Generic,
    }
}

fn message_from_body(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(
            ErrorKind::Generic,
            format!("Serialization error: {err}"),
            err,
        )
        .with_context("error_type", "Serialization")
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(
            ErrorKind::Configuration,
            format!("Invalid URL: {err}"),
            err,
        )
    }
}
