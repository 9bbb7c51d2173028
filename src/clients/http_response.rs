//! HTTP response types for the Datadog API client.
//!
//! This module provides the [`HttpResponse`] type: a snapshot of status,
//! headers and raw body, plus the method and URL that produced it so error
//! messages can be built from the response alone.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::http_request::HttpMethod;
use crate::redact::redact_url;

/// An HTTP response from the Datadog API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The method of the request that produced this response.
    pub method: HttpMethod,
    /// The full request URL, including authentication parameters.
    pub url: String,
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lower-case name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    ///
    /// Header names are lower-cased so lookups are case-insensitive.
    #[must_use]
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<String>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .fold(HashMap::new(), |mut acc: HashMap<String, Vec<String>>, (k, v)| {
                acc.entry(k.to_ascii_lowercase()).or_default().extend(v);
                acc
            });

        Self {
            method,
            url: url.into(),
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns `true` if the `Content-Type` header mentions JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|content_type| content_type.contains("json"))
    }

    /// Returns the request URL with credentials removed.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }

    /// Returns the decoded response body.
    ///
    /// An empty body decodes to `null`. A JSON body is parsed; anything else,
    /// including JSON that fails to parse, is returned as a string.
    #[must_use]
    pub fn data(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        if self.is_json() {
            if let Ok(value) = serde_json::from_str(&self.body) {
                return value;
            }
        }
        Value::String(self.body.clone())
    }
}
