//! HTTP transport: one round trip per call, no retry.
//!
//! A [`Transport`] performs a single request and reports either a 2xx
//! [`RawResponse`] or a [`TransportFailure`]. A failure keeps whatever the
//! round trip produced, so the executor can tell "no response" (connect
//! error, timeout) apart from "response with an error status". When the
//! status line and headers arrived but the body could not be read, the
//! failure still carries them, along with any part of the body read.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::config::Configuration;
use crate::error::{Error, ErrorKind, Result};
use crate::request::Request;
use crate::response::RawResponse;

/// Outcome of a single round trip.
pub type TransportResult = std::result::Result<RawResponse, TransportFailure>;

/// Performs one HTTP round trip using the settings in a [`Configuration`].
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `request` and wait for the full response.
    fn send<'a>(
        &'a self,
        config: &'a Configuration,
        request: &'a Request,
    ) -> BoxFuture<'a, TransportResult>;

    /// Called after the configuration changed.
    fn reconfigure(&mut self, config: &Configuration) -> Result<()> {
        let _ = config;
        Ok(())
    }
}

/// Why a round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The connection could not be established.
    Connect,
    /// The request or connection timed out.
    Timeout,
    /// A response arrived with a non-2xx status.
    Status,
    /// Status and headers arrived but reading the body failed.
    Body,
    /// The request could not be built; nothing was sent.
    Build,
    /// Any other failure before a response was received.
    Other,
}

/// A failed round trip.
#[derive(Debug)]
pub struct TransportFailure {
    pub kind: FailureKind,
    pub message: String,
    /// The response, when one was received.
    pub response: Option<RawResponse>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportFailure {
    /// A failure where no response was obtained.
    pub fn no_response(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            source: None,
        }
    }

    /// A response with a non-2xx status.
    pub fn status(response: RawResponse, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Status,
            message: message.into(),
            response: Some(response),
            source: None,
        }
    }

    /// A response whose body could not be read completely.
    pub fn body(response: RawResponse, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Body,
            message: message.into(),
            response: Some(response),
            source: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Status code of the response, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(RawResponse::status)
    }

    /// Returns false if sending the same request again cannot succeed.
    pub fn is_transient(&self) -> bool {
        self.kind != FailureKind::Build
    }

    /// Name of the failure class, recorded in error context.
    pub fn type_name(&self) -> &'static str {
        match (self.kind, self.status_code()) {
            (FailureKind::Connect, _) => "ConnectError",
            (FailureKind::Timeout, _) => "TimeoutError",
            (FailureKind::Build, _) => "BuilderError",
            (FailureKind::Body, _) => "BodyError",
            (_, Some(400..=499)) => "ClientError",
            (_, Some(500..=599)) => "ServerError",
            (FailureKind::Status, _) => "HttpStatusError",
            (FailureKind::Other, _) => "RequestError",
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            FailureKind::Build
        } else if err.is_timeout() {
            FailureKind::Timeout
        } else if err.is_connect() {
            FailureKind::Connect
        } else {
            FailureKind::Other
        };

        TransportFailure::no_response(kind, err.to_string()).with_source(err)
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// The connection timeout is fixed when the inner client is built; the
/// request timeout and headers are read from the configuration on every
/// call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: reqwest::Client,
    connect_timeout: Duration,
    base_url: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the given configuration.
    pub fn new(config: &Configuration) -> Result<Self> {
        Ok(Self {
            inner: build_client(config.connect_timeout())?,
            connect_timeout: config.connect_timeout(),
            base_url: None,
        })
    }

    /// Send requests to `base_url` instead of the configured account URL,
    /// e.g. a local proxy or mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Build the full URL for a path.
    pub fn url(&self, config: &Configuration, path: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or(config.account_url());
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    async fn send_once(&self, config: &Configuration, request: &Request) -> TransportResult {
        let url = self.url(config, &request.path);
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &url)
            .timeout(config.timeout());

        for (name, value) in config.default_headers() {
            req = req.header(name.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        debug!(method = %request.method, url = %url, "Sending request");

        let mut response = req.send().await?;
        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    info!(status = status.as_u16(), error = %e, "Failed to read response body");
                    let raw =
                        RawResponse::new(status.as_u16(), headers, String::from_utf8_lossy(&body));
                    return Err(TransportFailure::body(
                        raw,
                        format!(
                            "{} {} returned HTTP {} but the body could not be read: {e}",
                            request.method, request.path, status
                        ),
                    )
                    .with_source(e));
                }
            }
        }
        let raw = RawResponse::new(status.as_u16(), headers, String::from_utf8_lossy(&body));

        if status.is_success() {
            debug!(status = status.as_u16(), "Response received");
            return Ok(raw);
        }

        info!(status = status.as_u16(), "Non-success response");
        Err(TransportFailure::status(
            raw,
            format!("{} {} returned HTTP {}", request.method, request.path, status),
        ))
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        config: &'a Configuration,
        request: &'a Request,
    ) -> BoxFuture<'a, TransportResult> {
        Box::pin(self.send_once(config, request))
    }

    fn reconfigure(&mut self, config: &Configuration) -> Result<()> {
        if config.connect_timeout() != self.connect_timeout {
            self.inner = build_client(config.connect_timeout())?;
            self.connect_timeout = config.connect_timeout();
        }
        Ok(())
    }
}

fn build_client(connect_timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .gzip(true)
        .deflate(true)
        .build()
        .map_err(|e| {
            Error::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })
}
