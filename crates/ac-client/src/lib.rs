//! # ac-client
//!
//! Core HTTP request pipeline for the ActiveCampaign v3 API.
//!
//! This crate provides:
//! - Validated configuration (API token, account URL, timeouts, retries)
//! - A swappable transport with a `reqwest` implementation
//! - A request executor with linear-backoff retry
//! - A typed error taxonomy with diagnostic context
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (ac-rest: accounts, contacts, deals, custom fields, ...)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   RequestExecutor                           │
//! │  - Owns the Configuration                                   │
//! │  - Retry loop with linear backoff                           │
//! │  - Decodes JSON, classifies failures into Error             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Transport                              │
//! │  - One round trip per call (HttpTransport uses reqwest)     │
//! │  - Headers, timeouts, query and JSON body                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use activecampaign_client::{Configuration, RequestExecutor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), activecampaign_client::Error> {
//!     let config = Configuration::new("api-token", "https://acme.api-us1.com")?;
//!     let executor = RequestExecutor::new(config)?;
//!
//!     let contact = executor.get("/api/3/contacts/1").await?;
//!     println!("{}", contact["contact"]["email"]);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod executor;
mod request;
mod response;
mod retry;
pub mod security;
mod transport;

pub use config::{
    Configuration, ConfigurationBuilder, API_TOKEN_HEADER, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT,
};
pub use error::{Error, ErrorKind, Result};
pub use executor::RequestExecutor;
pub use request::{Request, RequestMethod, RequestOptions};
pub use response::RawResponse;
pub use retry::{is_retryable_status, RetryPolicy, Sleeper, TokioSleeper, RETRYABLE_STATUSES};
pub use transport::{
    FailureKind, HttpTransport, Transport, TransportFailure, TransportResult,
};

/// Base path of the v3 API.
pub const API_BASE_PATH: &str = "/api/3";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("activecampaign-rust/", env!("CARGO_PKG_VERSION"));
