//! # ac-rest
//!
//! ActiveCampaign v3 REST endpoints on top of the `ac-client` request pipeline.
//!
//! ## Features
//!
//! - **Accounts** - CRUD, bulk delete and account notes
//! - **Contacts** - CRUD, sync by email and custom field values
//! - **Deals** - CRUD and deal notes
//! - **Custom Fields** - CRUD, field groups and field options
//! - **Custom Objects** - Schemas and records
//!
//! ## Example
//!
//! ```rust,ignore
//! use activecampaign_rest::ActiveCampaignClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), activecampaign_rest::Error> {
//!     let client = ActiveCampaignClient::from_credentials(
//!         "api_token_here",
//!         "https://myaccount.api-us1.com",
//!     )?;
//!
//!     let contact = client
//!         .contacts()
//!         .sync(&json!({"contact": {"email": "jane@example.com"}}))
//!         .await?;
//!
//!     let id: u64 = contact["contact"]["id"]
//!         .as_str()
//!         .and_then(|id| id.parse().ok())
//!         .unwrap_or_default();
//!     client.contacts().delete(id).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;

// Main client
pub use client::{ActiveCampaignClient, Accounts, Contacts, CustomFields, CustomObjects, Deals};

// Re-export ac-client types that users might need
pub use activecampaign_client::{
    Configuration, ConfigurationBuilder, Error, ErrorKind, RequestExecutor, Result,
};
