//! ActiveCampaign API client.
//!
//! This client wraps `RequestExecutor` from `ac-client` and exposes the
//! endpoint groups through fixed accessors.

use activecampaign_client::{Configuration, RequestExecutor, Result};

mod accounts;
mod contacts;
mod custom_fields;
mod custom_objects;
mod deals;

pub use accounts::Accounts;
pub use contacts::Contacts;
pub use custom_fields::CustomFields;
pub use custom_objects::CustomObjects;
pub use deals::Deals;

/// ActiveCampaign v3 API client.
///
/// Endpoint groups:
/// - Accounts and account notes
/// - Contacts, contact sync and custom field values
/// - Deals and deal notes
/// - Custom fields, field groups and field options
/// - Custom object schemas and records
///
/// Every call returns the decoded JSON payload as a `serde_json::Value`.
///
/// # Example
///
/// ```rust,ignore
/// use activecampaign_rest::ActiveCampaignClient;
/// use serde_json::json;
///
/// let client = ActiveCampaignClient::from_credentials(
///     "api_token_here",
///     "https://myaccount.api-us1.com",
/// )?;
///
/// // Create
/// let created = client
///     .contacts()
///     .create(&json!({"contact": {"email": "jane@example.com"}}))
///     .await?;
///
/// // Read
/// let contact = client.contacts().get(1).await?;
///
/// // List with query parameters
/// let deals = client.deals().list(&[("filters[stage]", "3")]).await?;
///
/// // Delete
/// client.contacts().delete(1).await?;
/// ```
#[derive(Debug)]
pub struct ActiveCampaignClient {
    executor: RequestExecutor,
}

impl ActiveCampaignClient {
    /// Create a client from a validated configuration.
    pub fn new(config: Configuration) -> Result<Self> {
        let executor = RequestExecutor::new(config)?;
        Ok(Self { executor })
    }

    /// Create a client from an API token and account URL with default settings.
    pub fn from_credentials(
        api_token: impl Into<String>,
        account_url: impl Into<String>,
    ) -> Result<Self> {
        Self::new(Configuration::new(api_token, account_url)?)
    }

    /// Create a client from an existing executor.
    pub fn from_executor(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Get the underlying executor.
    pub fn inner(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Get the configuration.
    pub fn configuration(&self) -> &Configuration {
        self.executor.configuration()
    }

    /// Change the configuration; applies from the next request.
    pub fn update_configuration<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut Configuration) -> Result<()>,
    {
        self.executor.update_configuration(update)
    }

    /// Accounts endpoint group.
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(&self.executor)
    }

    /// Contacts endpoint group.
    pub fn contacts(&self) -> Contacts<'_> {
        Contacts::new(&self.executor)
    }

    /// Deals endpoint group.
    pub fn deals(&self) -> Deals<'_> {
        Deals::new(&self.executor)
    }

    /// Custom fields endpoint group.
    pub fn custom_fields(&self) -> CustomFields<'_> {
        CustomFields::new(&self.executor)
    }

    /// Custom objects endpoint group.
    pub fn custom_objects(&self) -> CustomObjects<'_> {
        CustomObjects::new(&self.executor)
    }
}

/// Client wired to a mock server, without retries.
#[cfg(test)]
pub(crate) fn mock_client(server: &wiremock::MockServer) -> ActiveCampaignClient {
    use activecampaign_client::HttpTransport;

    let config = Configuration::builder("test-token", "https://acme.api-us1.com")
        .without_retry()
        .build()
        .unwrap();
    let transport = HttpTransport::new(&config)
        .unwrap()
        .with_base_url(server.uri());
    ActiveCampaignClient::from_executor(RequestExecutor::with_transport(config, transport))
}
