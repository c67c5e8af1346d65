//! Request execution: retry loop, failure classification and decoding.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::config::Configuration;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{Request, RequestMethod, RequestOptions};
use crate::response::{sanitize_error_message, RawResponse};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::{HttpTransport, Transport};

/// Executes logical API requests against the configured account.
///
/// Owns the [`Configuration`]; configuration changes go through
/// [`RequestExecutor::update_configuration`] and apply from the next
/// request on. Each call is independent: retries for one call run strictly
/// one after another, and nothing is shared between calls except the
/// read-only configuration and the transport.
///
/// # Example
///
/// ```rust,ignore
/// use activecampaign_client::{Configuration, RequestExecutor, RequestMethod, RequestOptions};
///
/// let config = Configuration::new("api-token", "https://acme.api-us1.com")?;
/// let executor = RequestExecutor::new(config)?;
///
/// let contacts = executor
///     .execute(
///         RequestMethod::Get,
///         "/api/3/contacts",
///         RequestOptions::new().query("limit", "20"),
///     )
///     .await?;
/// ```
pub struct RequestExecutor {
    config: Configuration,
    transport: Box<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("sleeper", &self.sleeper)
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor using the `reqwest` transport.
    pub fn new(config: Configuration) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create an executor with a custom transport.
    pub fn with_transport(config: Configuration, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper used for backoff.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Get the configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Change the configuration.
    ///
    /// `update` runs against a copy; the copy is committed only if `update`
    /// and the transport's reconfiguration both succeed.
    pub fn update_configuration<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut Configuration) -> Result<()>,
    {
        let mut config = self.config.clone();
        update(&mut config)?;
        self.transport.reconfigure(&config)?;
        self.config = config;
        Ok(())
    }

    /// Execute a request and decode the JSON response.
    ///
    /// Retryable failures (no response, or status 429/500/502/503/504) are
    /// retried up to `max_retries` times with linear backoff. Any other
    /// status, or a request that could not be built, is returned as a typed
    /// error straight away.
    #[instrument(skip(self, options), fields(method = %method, path = %path))]
    pub async fn execute(
        &self,
        method: RequestMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let request = Request::new(method, path, options);
        let mut policy = RetryPolicy::from_config(&self.config);

        loop {
            let failure = match self.transport.send(&self.config, &request).await {
                Ok(response) => return decode_body(&request, response),
                Err(failure) => failure,
            };

            let retryable =
                failure.is_transient() && policy.is_retryable(request.method, failure.status_code());
            if retryable {
                if let Some(delay) = policy.next_delay() {
                    warn!(
                        attempt = policy.attempt(),
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "Request failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    continue;
                }
            }

            let attempts = policy.attempt() + 1;
            let err = Error::from_failure(failure)
                .with_context("method", request.method.as_str())
                .with_context("path", request.path.as_str())
                .with_context("attempts", attempts);
            info!(status = err.status(), attempts, error = %err, "Request failed");
            return Err(err);
        }
    }

    /// GET request.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(RequestMethod::Get, path, RequestOptions::new())
            .await
    }

    /// GET request with query parameters.
    pub async fn get_with_query<K, V>(
        &self,
        path: &str,
        query: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Value>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let options = RequestOptions::new().query_pairs(query);
        self.execute(RequestMethod::Get, path, options).await
    }

    /// POST request with a JSON body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let options = RequestOptions::new().json(body)?;
        self.execute(RequestMethod::Post, path, options).await
    }

    /// PUT request with a JSON body.
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let options = RequestOptions::new().json(body)?;
        self.execute(RequestMethod::Put, path, options).await
    }

    /// DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(RequestMethod::Delete, path, RequestOptions::new())
            .await
    }
}

/// Decode a 2xx body. An empty body decodes to an empty object.
fn decode_body(request: &Request, response: RawResponse) -> Result<Value> {
    if response.body().trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(response.body()).map_err(|e| {
        Error::with_source(
            ErrorKind::Generic,
            format!("Malformed JSON response: {e}"),
            e,
        )
        .with_status(response.status())
        .with_context("error_type", "MalformedResponse")
        .with_context("status_code", response.status())
        .with_context("response_body", sanitize_error_message(response.body()))
        .with_context("method", request.method.as_str())
        .with_context("path", request.path.as_str())
    })
}
