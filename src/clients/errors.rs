//! HTTP-specific error types for the Datadog API client.
//!
//! # Error Handling
//!
//! - [`ResponseError`]: a 4xx or 5xx response, tagged with an [`ErrorKind`]
//! - [`InvalidHttpRequestError`]: a request rejected before it was sent
//! - [`HttpError`]: unified error returned by every client call
//!
//! Classification is by status code alone. The response body only
//! contributes to the message.
//!
//! # Example
//!
//! ```rust,ignore
//! use datadog_api::{ErrorKind, HttpError};
//!
//! match client.get("monitor/42", RequestOptions::new()).await {
//!     Ok(monitor) => println!("{monitor}"),
//!     Err(HttpError::Response(e)) if e.kind == ErrorKind::NotFound => {
//!         println!("no such monitor");
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::HttpResponse;
use crate::error::ConfigError;

/// The class of an error response, derived from its status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401 Unauthorized.
    Unauthorized,
    /// 403 Forbidden.
    Forbidden,
    /// 404 Not Found.
    NotFound,
    /// 409 Conflict.
    Conflict,
    /// 422 Unprocessable Entity.
    UnprocessableEntity,
    /// Any other status in 400-499.
    ClientError,
    /// 500 Internal Server Error.
    InternalServerError,
    /// 501 Not Implemented.
    NotImplemented,
    /// 502 Bad Gateway.
    BadGateway,
    /// 503 Service Unavailable.
    ServiceUnavailable,
    /// Any other status in 500-599.
    ServerError,
}

impl ErrorKind {
    /// Classifies a status code, returning `None` for non-error statuses.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datadog_api::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_status(404), Some(ErrorKind::NotFound));
    /// assert_eq!(ErrorKind::from_status(418), Some(ErrorKind::ClientError));
    /// assert_eq!(ErrorKind::from_status(204), None);
    /// ```
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            409 => Some(Self::Conflict),
            422 => Some(Self::UnprocessableEntity),
            400..=499 => Some(Self::ClientError),
            500 => Some(Self::InternalServerError),
            501 => Some(Self::NotImplemented),
            502 => Some(Self::BadGateway),
            503 => Some(Self::ServiceUnavailable),
            500..=599 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Returns `true` for the 4xx family.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized
                | Self::Forbidden
                | Self::NotFound
                | Self::Conflict
                | Self::UnprocessableEntity
                | Self::ClientError
        )
    }

    /// Returns `true` for the 5xx family.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the name of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::Conflict => "Conflict",
            Self::UnprocessableEntity => "UnprocessableEntity",
            Self::ClientError => "ClientError",
            Self::InternalServerError => "InternalServerError",
            Self::NotImplemented => "NotImplemented",
            Self::BadGateway => "BadGateway",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::ServerError => "ServerError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known fields of a JSON error body.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<Value>,
    error: Option<Value>,
    errors: Option<Value>,
    documentation_url: Option<Value>,
}

/// Error returned when the API responds with a 4xx or 5xx status.
///
/// All fields are extracted once, when the error is built from the response.
/// The URL has its `api_key` and `application_key` values redacted.
///
/// # Message Format
///
/// ```text
/// <METHOD> <url>: <status> - <message>Error: <error>
/// Error summary:
///   <key>: <value>
///  // See: <documentation_url>
/// ```
///
/// Each part after `<status> - ` appears only when the body provides it.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ResponseError {
    /// The classified kind of the error.
    pub kind: ErrorKind,
    /// The HTTP status code of the response.
    pub status: u16,
    /// The method of the failed request.
    pub method: HttpMethod,
    /// The request URL with credentials redacted.
    pub url: String,
    /// The `message` field of the body, or the whole body if it was text.
    pub server_message: Option<String>,
    /// The `error` field of the body.
    pub error: Option<String>,
    /// Entries of the `errors` array of the body.
    pub errors: Vec<Value>,
    /// The `documentation_url` field of the body.
    pub documentation_url: Option<String>,
    /// The full diagnostic message.
    pub message: String,
}

impl ResponseError {
    /// Classifies a response, returning `None` if its status is not an error.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        let kind = ErrorKind::from_status(response.status)?;

        let mut server_message = None;
        let mut body = ErrorBody::default();
        match Self::decode_body(response) {
            Some(Value::String(text)) => server_message = Some(text),
            Some(value @ Value::Object(_)) => {
                body = serde_json::from_value(value).unwrap_or_default();
                server_message = body.message.as_ref().and_then(display_value);
            }
            _ => {}
        }

        let errors = match body.errors {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other],
        };

        let mut error = Self {
            kind,
            status: response.status,
            method: response.method,
            url: response.redacted_url(),
            server_message,
            error: body.error.as_ref().and_then(display_value),
            errors,
            documentation_url: body.documentation_url.as_ref().and_then(display_value),
            message: String::new(),
        };
        error.message = error.build_message();
        Some(error)
    }

    /// Returns the error body, or `None` if it is empty or undecodable JSON.
    fn decode_body(response: &HttpResponse) -> Option<Value> {
        if response.body.is_empty() {
            return None;
        }
        if response.is_json() {
            serde_json::from_str(&response.body).ok()
        } else {
            Some(Value::String(response.body.clone()))
        }
    }

    /// Renders the `errors` entries, one `  key: value` line per field.
    #[must_use]
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }

        let lines: Vec<String> = self
            .errors
            .iter()
            .flat_map(|entry| match entry {
                Value::Object(fields) => fields
                    .iter()
                    .map(|(key, value)| format!("  {key}: {}", display_value(value).unwrap_or_default()))
                    .collect::<Vec<_>>(),
                other => vec![format!("  {}", display_value(other).unwrap_or_default())],
            })
            .collect();

        Some(format!("\nError summary:\n{}", lines.join("\n")))
    }

    fn build_message(&self) -> String {
        let mut message = format!("{} {}: {} - ", self.method.as_str(), self.url, self.status);

        if let Some(server_message) = &self.server_message {
            message.push_str(server_message);
        }
        if let Some(error) = &self.error {
            message.push_str(&format!("Error: {error}"));
        }
        if let Some(summary) = self.error_summary() {
            message.push_str(&summary);
        }
        if let Some(url) = &self.documentation_url {
            message.push_str(&format!(" // See: {url}"));
        }

        message
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Error returned when request options cannot be turned into a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A content type header was given without a value.
    #[error("A content type header was provided without a value.")]
    MissingContentType,

    /// A reserved option key holds something other than an object.
    #[error("The '{key}' option must be an object.")]
    InvalidOptions {
        /// The reserved key (`query` or `headers`).
        key: &'static str,
    },

    /// The endpoint and path do not form a valid URL.
    #[error("Invalid request URL '{url}'.")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },
}

/// Unified error type for all client calls.
///
/// # Example
///
/// ```rust,ignore
/// match client.validate().await {
///     Ok(valid) => { /* handle success */ }
///     Err(HttpError::Response(e)) => { /* classified API error */ }
///     Err(HttpError::InvalidRequest(e)) => { /* bad options */ }
///     Err(HttpError::Config(e)) => { /* agent could not be built */ }
///     Err(HttpError::Network(e)) => { /* transport failure */ }
///     Err(HttpError::Deserialize(e)) => { /* unexpected response shape */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// A classified error response (4xx or 5xx).
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Request options were invalid.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The transport agent could not be built from the configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl HttpError {
    /// Returns the kind of a classified response error.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Response(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Returns `true` if this is a 404 response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }
}
