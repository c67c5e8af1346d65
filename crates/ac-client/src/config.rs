//! Client configuration.
//!
//! A [`Configuration`] is validated when it is built: the API token must be
//! non-blank and usable as a header value, custom headers must be valid
//! HTTP headers, and the account URL must be an `https` ActiveCampaign API
//! host.
//! The `Api-Token` header is computed from the current token every time
//! [`Configuration::default_headers`] is called.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use regex_lite::Regex;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::error::{Error, Result};

/// Header carrying the API token.
pub const API_TOKEN_HEADER: &str = "Api-Token";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of extra attempts after a retryable failure.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Default backoff unit; retry `n` waits `n` times this.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

// `<account>.api-us<N>.com` or `<account>.activehosted.com`
static ACCOUNT_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*\.(api-us[0-9]+\.com|activehosted\.com)$")
        .expect("account host pattern is valid")
});

/// Settings shared by every request a client makes.
///
/// The API token is redacted in Debug output.
#[derive(Clone)]
pub struct Configuration {
    api_token: String,
    account_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    retry_non_idempotent: bool,
    default_headers: BTreeMap<String, String>,
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("api_token", &"[REDACTED]")
            .field("account_url", &self.account_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("retry_non_idempotent", &self.retry_non_idempotent)
            .field("default_headers", &self.default_headers.keys())
            .finish()
    }
}

impl Configuration {
    /// Create a configuration with default timeouts and retry policy.
    pub fn new(api_token: impl Into<String>, account_url: impl Into<String>) -> Result<Self> {
        Self::builder(api_token, account_url).build()
    }

    /// Create a new configuration builder.
    pub fn builder(
        api_token: impl Into<String>,
        account_url: impl Into<String>,
    ) -> ConfigurationBuilder {
        ConfigurationBuilder::new(api_token, account_url)
    }

    /// Get the API token.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// Replace the API token. Applies to every later request.
    pub fn set_api_token(&mut self, api_token: impl Into<String>) -> Result<()> {
        self.api_token = validate_api_token(api_token.into())?;
        Ok(())
    }

    /// Get the account URL (never ends with `/`).
    pub fn account_url(&self) -> &str {
        &self.account_url
    }

    /// Replace the account URL. Trailing slashes are stripped before validation.
    pub fn set_account_url(&mut self, account_url: impl Into<String>) -> Result<()> {
        self.account_url = normalize_account_url(&account_url.into())?;
        Ok(())
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Set the request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Get the connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Set the connection timeout.
    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = timeout;
    }

    /// Get the number of extra attempts after a retryable failure.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Set the number of extra attempts after a retryable failure.
    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    /// Get the backoff unit.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Set the backoff unit.
    pub fn set_retry_delay(&mut self, retry_delay: Duration) {
        self.retry_delay = retry_delay;
    }

    /// Whether POST requests are retried after transient failures.
    pub fn retry_non_idempotent(&self) -> bool {
        self.retry_non_idempotent
    }

    /// Allow or forbid retrying POST requests after transient failures.
    pub fn set_retry_non_idempotent(&mut self, enabled: bool) {
        self.retry_non_idempotent = enabled;
    }

    /// Merge headers into the custom default headers.
    ///
    /// Nothing is merged if any name or value is not a valid HTTP header.
    pub fn set_default_headers<K, V>(
        &mut self,
        headers: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(name, value)| {
                let (name, value) = (name.into(), value.into());
                validate_header(&name, &value)?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>>>()?;

        for (name, value) in headers {
            insert_header(&mut self.default_headers, name, value);
        }
        Ok(())
    }

    /// Headers sent with every request.
    ///
    /// Built-in `Content-Type`, `Accept` and `User-Agent`, overridden by any
    /// custom headers, then `Api-Token` with the current token.
    pub fn default_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("User-Agent".to_string(), crate::USER_AGENT.to_string());

        for (name, value) in &self.default_headers {
            insert_header(&mut headers, name.clone(), value.clone());
        }

        insert_header(
            &mut headers,
            API_TOKEN_HEADER.to_string(),
            self.api_token.clone(),
        );
        headers
    }
}

/// Builder for Configuration.
#[derive(Debug)]
pub struct ConfigurationBuilder {
    api_token: String,
    account_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    retry_non_idempotent: bool,
    default_headers: BTreeMap<String, String>,
}

impl ConfigurationBuilder {
    fn new(api_token: impl Into<String>, account_url: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            account_url: account_url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_non_idempotent: true,
            default_headers: BTreeMap::new(),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the number of extra attempts after a retryable failure.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff unit.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Disable retries.
    pub fn without_retry(mut self) -> Self {
        self.max_retries = 0;
        self
    }

    /// Allow or forbid retrying POST requests.
    pub fn with_retry_non_idempotent(mut self, enabled: bool) -> Self {
        self.retry_non_idempotent = enabled;
        self
    }

    /// Add a custom default header. Checked by [`build`](Self::build).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.default_headers, name.into(), value.into());
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<Configuration> {
        for (name, value) in &self.default_headers {
            validate_header(name, value)?;
        }

        Ok(Configuration {
            api_token: validate_api_token(self.api_token)?,
            account_url: normalize_account_url(&self.account_url)?,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
            retry_non_idempotent: self.retry_non_idempotent,
            default_headers: self.default_headers,
        })
    }
}

fn validate_api_token(token: String) -> Result<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(Error::configuration("API token must not be empty"));
    }
    if HeaderValue::from_str(trimmed).is_err() {
        return Err(Error::configuration(
            "API token contains characters not allowed in an HTTP header",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_header(name: &str, value: &str) -> Result<()> {
    if HeaderName::from_bytes(name.as_bytes()).is_err() {
        return Err(Error::configuration(format!(
            "Invalid header name: {name:?}"
        )));
    }
    if HeaderValue::from_str(value).is_err() {
        return Err(Error::configuration(format!(
            "Invalid value for header '{name}'"
        )));
    }
    Ok(())
}

fn normalize_account_url(account_url: &str) -> Result<String> {
    let trimmed = account_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::configuration("Account URL must not be empty"));
    }

    let parsed = Url::parse(trimmed)?;
    if parsed.scheme() != "https" {
        return Err(Error::configuration(format!(
            "Account URL must use https: {trimmed}"
        )));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::configuration(format!(
            "Account URL must not contain a path, query or fragment: {trimmed}"
        )));
    }

    let host = parsed.host_str().unwrap_or_default();
    if !ACCOUNT_HOST.is_match(host) {
        return Err(Error::configuration(format!(
            "Account URL host '{host}' is not an ActiveCampaign API host \
             (expected <account>.api-us1.com or <account>.activehosted.com)"
        )));
    }

    Ok(trimmed.to_string())
}

// Header names are case-insensitive; replace any existing spelling.
fn insert_header(headers: &mut BTreeMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}
