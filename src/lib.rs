//! # activecampaign-api
//!
//! An ActiveCampaign v3 API client library for Rust.
//!
//! This library provides typed access to the ActiveCampaign REST API with
//! configuration validation, retry logic, and error classification.
//!
//! ## Security
//!
//! - The API token is redacted in Debug output
//! - Tracing skips request bodies and credential parameters
//! - Error messages are truncated and long hex tokens redacted
//!
//! ## Crates
//!
//! - **activecampaign-client** - Configuration, transport, request executor, retry, errors
//! - **activecampaign-rest** - Endpoint groups: accounts, contacts, deals, custom fields, custom objects
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use activecampaign_api::{ActiveCampaignClient, Configuration};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Configuration::builder("api-token", "https://myaccount.api-us1.com")
//!         .with_max_retries(3)
//!         .build()?;
//!     let client = ActiveCampaignClient::new(config)?;
//!
//!     let contacts = client.contacts().list(&[("limit", "10")]).await?;
//!     for contact in contacts["contacts"].as_array().into_iter().flatten() {
//!         println!("{}", contact["email"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "client")]
pub use activecampaign_client as client;
#[cfg(feature = "rest")]
pub use activecampaign_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "client")]
pub use activecampaign_client::{Configuration, Error, ErrorKind, RequestExecutor, Result};
#[cfg(feature = "rest")]
pub use activecampaign_rest::ActiveCampaignClient;
