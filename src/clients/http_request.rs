//! HTTP request types for the Datadog API client.
//!
//! This module provides [`RequestOptions`], the loosely-typed option map a
//! caller passes to a request, and [`HttpRequest`], the outbound request it
//! is partitioned into.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::clients::errors::InvalidHttpRequestError;

/// Option keys relocated into the header set for query-style requests.
pub const CONVENIENCE_HEADERS: [&str; 2] = ["accept", "content_type"];

/// Option key holding explicit query parameters.
pub const QUERY_KEY: &str = "query";

/// Option key holding explicit headers.
pub const HEADERS_KEY: &str = "headers";

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for fetching headers only.
    Head,
}

impl HttpMethod {
    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }

    /// Returns `true` if leftover options are sent as a JSON body rather than
    /// as query parameters.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    pub(crate) const fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single request.
///
/// Plain entries become query parameters (GET, HEAD, DELETE) or the JSON
/// body (POST, PUT, PATCH). Two entries are reserved: `query` holds explicit
/// query parameters and `headers` holds explicit headers. For query-style
/// requests, `accept` and `content_type` entries are moved into the headers.
///
/// # Example
///
/// ```rust
/// use datadog_api::clients::{HttpMethod, HttpRequest, RequestOptions};
///
/// let options = RequestOptions::new()
///     .param("foo", "bar")
///     .accept("text/plain");
///
/// let request = HttpRequest::from_options(HttpMethod::Get, "zen", options).unwrap();
/// assert_eq!(request.query.get("foo").map(String::as_str), Some("bar"));
/// assert_eq!(
///     request.headers.unwrap().get("accept").map(String::as_str),
///     Some("text/plain")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions(Map<String, Value>);

impl RequestOptions {
    /// Creates an empty option map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain option.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Adds an explicit query parameter.
    #[must_use]
    pub fn query_param(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.nested(QUERY_KEY, key.into(), value.into())
    }

    /// Adds an explicit header.
    #[must_use]
    pub fn header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.nested(HEADERS_KEY, key.into(), Value::String(value.into()))
    }

    /// Sets the `accept` convenience option.
    #[must_use]
    pub fn accept(self, media_type: impl Into<String>) -> Self {
        self.param("accept", media_type.into())
    }

    /// Sets the `content_type` convenience option.
    #[must_use]
    pub fn content_type(self, media_type: impl Into<String>) -> Self {
        self.param("content_type", media_type.into())
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the options and returns the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn nested(mut self, section: &str, key: String, value: Value) -> Self {
        let entry = self
            .0
            .entry(section)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(key, value);
        }
        self
    }
}

impl From<Map<String, Value>> for RequestOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// An outbound request, after options have been partitioned.
///
/// Authentication parameters and default headers are not part of the
/// request; the agent adds them when the request is sent.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The percent-escaped path, relative to the API endpoint.
    pub path: String,
    /// Query parameters to append to the URL.
    pub query: BTreeMap<String, String>,
    /// Headers for this request, or `None` if there are none.
    pub headers: Option<BTreeMap<String, String>>,
    /// The JSON body, sent only for POST, PUT and PATCH.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Partitions `options` into query parameters, headers and body.
    ///
    /// Explicit `query` entries win over plain options with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidOptions`] if the reserved
    /// `query` or `headers` entries are not objects, and
    /// [`InvalidHttpRequestError::MissingContentType`] if a content type
    /// header is present but empty.
    pub fn from_options(
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Self, InvalidHttpRequestError> {
        let mut data = options.into_map();

        let explicit_query = take_object(&mut data, QUERY_KEY)?;
        let mut headers: BTreeMap<String, String> = take_object(&mut data, HEADERS_KEY)?
            .into_iter()
            .flatten()
            .map(|(k, v)| (k, value_to_param(&v)))
            .collect();

        if !method.has_body() {
            for key in CONVENIENCE_HEADERS {
                if let Some(value) = data.remove(key) {
                    headers.insert(key.to_string(), value_to_param(&value));
                }
            }
        }

        if headers
            .iter()
            .any(|(name, value)| header_name(name) == "content-type" && value.is_empty())
        {
            return Err(InvalidHttpRequestError::MissingContentType);
        }

        let mut query = BTreeMap::new();
        let body = if method.has_body() {
            Some(Value::Object(data))
        } else {
            for (key, value) in data {
                query.insert(key, value_to_param(&value));
            }
            None
        };
        for (key, value) in explicit_query.into_iter().flatten() {
            query.insert(key, value_to_param(&value));
        }

        Ok(Self {
            http_method: method,
            path: escape_path(path),
            query,
            headers: (!headers.is_empty()).then_some(headers),
            body,
        })
    }
}

/// Maps an option-style header key (`content_type`) to its HTTP name
/// (`content-type`).
#[must_use]
pub fn header_name(key: &str) -> String {
    key.replace('_', "-").to_ascii_lowercase()
}

/// Percent-escapes characters that are not allowed in a URI path.
///
/// Reserved URI characters such as `/`, `?` and `=` pass through untouched.
/// A leading `/` is dropped so the path always resolves below the endpoint.
#[must_use]
pub fn escape_path(path: &str) -> String {
    const SAFE: &str = "-_.!~*'();/?:@&=+$,[]";

    path.trim_start_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || SAFE.contains(c) {
                c.to_string()
            } else {
                urlencoding::encode(c.encode_utf8(&mut [0; 4])).into_owned()
            }
        })
        .collect()
}

fn take_object(
    data: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Option<Map<String, Value>>, InvalidHttpRequestError> {
    match data.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(InvalidHttpRequestError::InvalidOptions { key }),
    }
}

fn value_to_param(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_param)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
