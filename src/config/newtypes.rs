//! Newtype wrappers for configuration values.
//!
//! Credentials are wrapped so their `Debug` output is masked, and the API
//! endpoint is wrapped so it always reads back with a single trailing slash.
//! None of these types reject input: a malformed value only fails when a
//! request is sent with it.

use std::fmt;

use crate::redact::{mask, API_KEY_MASKED_PREFIX, APPLICATION_KEY_MASKED_PREFIX};

/// A Datadog API key.
///
/// The `Debug` implementation hides the first 28 characters, leaving the
/// last four of a standard 32-character key visible.
///
/// # Example
///
/// ```rust
/// use datadog_api::ApiKey;
///
/// let key = ApiKey::new("9775a026f1ca7d1c6c5af9d94d9595a4");
/// assert_eq!(key.as_ref(), "9775a026f1ca7d1c6c5af9d94d9595a4");
/// assert!(!format!("{key:?}").contains("9775a026"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps an API key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", mask(&self.0, &self.0, API_KEY_MASKED_PREFIX))
    }
}

/// A Datadog application key.
///
/// The `Debug` implementation hides the first 36 characters, leaving the
/// last four of a standard 40-character key visible.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApplicationKey(String);

impl ApplicationKey {
    /// Wraps an application key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl AsRef<str> for ApplicationKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ApplicationKey({})",
            mask(&self.0, &self.0, APPLICATION_KEY_MASKED_PREFIX)
        )
    }
}

/// Base URL for API requests.
///
/// The value is kept as given, but [`as_ref`](AsRef::as_ref) always yields it
/// with exactly one trailing `/` so relative request paths join cleanly.
/// Equality compares the normalized form.
///
/// # Example
///
/// ```rust
/// use datadog_api::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("https://app.datadoghq.com/api/v1");
/// assert_eq!(endpoint.as_ref(), "https://app.datadoghq.com/api/v1/");
/// assert_eq!(endpoint.raw(), "https://app.datadoghq.com/api/v1");
/// ```
#[derive(Clone, Debug)]
pub struct ApiEndpoint {
    raw: String,
    normalized: String,
}

impl ApiEndpoint {
    /// Wraps an endpoint URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let raw = url.into();
        let normalized = format!("{}/", raw.trim_end_matches('/'));
        Self { raw, normalized }
    }

    /// Returns the endpoint exactly as it was stored.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl AsRef<str> for ApiEndpoint {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for ApiEndpoint {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for ApiEndpoint {}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_masks_value_in_debug() {
        let key = ApiKey::new("9775a026f1ca7d1c6c5af9d94d9595a4");
        let debug_output = format!("{key:?}");
        assert_eq!(debug_output, format!("ApiKey({}95a4)", "*".repeat(28)));
    }

    #[test]
    fn test_application_key_masks_value_in_debug() {
        let key = ApplicationKey::new("87614b09dd141c22800f96f11737ade5226d7ba8");
        let debug_output = format!("{key:?}");
        assert!(!debug_output.contains("87614b09"));
        assert!(debug_output.ends_with("7ba8)"));
    }

    #[test]
    fn test_short_api_key_is_fully_masked() {
        let key = ApiKey::new("short");
        assert_eq!(format!("{key:?}"), "ApiKey(*****)");
    }

    #[test]
    fn test_api_endpoint_adds_trailing_slash() {
        let endpoint = ApiEndpoint::new("https://app.example.com/api/v1");
        assert_eq!(endpoint.as_ref(), "https://app.example.com/api/v1/");
    }

    #[test]
    fn test_api_endpoint_collapses_trailing_slashes() {
        for raw in [
            "https://app.example.com/api/v1",
            "https://app.example.com/api/v1/",
            "https://app.example.com/api/v1///",
        ] {
            let endpoint = ApiEndpoint::new(raw);
            assert_eq!(endpoint.as_ref(), "https://app.example.com/api/v1/");
            assert_eq!(endpoint.raw(), raw);
        }
    }

    #[test]
    fn test_api_endpoint_equality_uses_normalized_form() {
        assert_eq!(
            ApiEndpoint::new("https://app.example.com/api/v1"),
            ApiEndpoint::new("https://app.example.com/api/v1/")
        );
        assert_ne!(
            ApiEndpoint::new("https://app.example.com/api/v1"),
            ApiEndpoint::new("https://app.example.com/api/v2")
        );
    }
}
