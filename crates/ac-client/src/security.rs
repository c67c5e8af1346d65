//! Security utilities for building request paths.
//!
//! ## URL Parameter Encoding
//!
//! Caller-provided identifiers that are not plain integers MUST be encoded
//! before they are placed in a path:
//!
//! ```rust
//! use activecampaign_client::security::url;
//!
//! // CORRECT
//! let schema_id = url::encode_param("schema/../../contacts");
//! let path = format!("/api/3/customObjects/schemas/{}", schema_id);
//!
//! // WRONG - NEVER do this with user input
//! // let path = format!("/api/3/customObjects/schemas/{}", user_id);
//! ```

/// URL encoding utilities.
pub mod url {
    /// URL-encode a parameter value.
    ///
    /// User-provided values cannot break out of URL paths or inject
    /// additional query parameters once encoded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use activecampaign_client::security::url;
    ///
    /// let encoded = url::encode_param("abc/../../secret");
    /// assert_eq!(encoded, "abc%2F..%2F..%2Fsecret");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}
