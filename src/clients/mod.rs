//! HTTP transport types for Datadog API communication.
//!
//! This module provides the layer underneath [`Client`](crate::Client):
//! turning per-call options into requests, sending them with credentials
//! attached, and classifying error responses.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The transport agent bound to one effective configuration
//! - [`RequestOptions`]: Per-call options (query, headers, body fields)
//! - [`HttpRequest`]: A request derived from an HTTP method, path and options
//! - [`HttpResponse`]: A response snapshot
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE, HEAD)
//! - [`ResponseError`] / [`ErrorKind`]: Classified 4xx and 5xx responses
//! - [`HttpError`]: The unified error type returned by client calls
//!
//! # Example
//!
//! ```rust,ignore
//! use datadog_api::DatadogConfig;
//! use datadog_api::clients::{HttpClient, HttpMethod, HttpRequest, RequestOptions};
//!
//! let agent = HttpClient::new(&DatadogConfig::from_env())?;
//!
//! let request = HttpRequest::from_options(
//!     HttpMethod::Get,
//!     "hosts",
//!     RequestOptions::new().param("filter", "web"),
//! )?;
//!
//! let response = agent.execute(&request).await?;
//! ```
//!
//! # Error Classification
//!
//! The agent returns every response it receives. Classification into
//! [`ResponseError`] happens in the configured
//! [`Middleware`](crate::config::Middleware) stack:
//!
//! - **401, 403, 404, 409, 422**: a named 4xx [`ErrorKind`]
//! - **Other 4xx**: [`ErrorKind::ClientError`]
//! - **500, 501, 502, 503**: a named 5xx [`ErrorKind`]
//! - **Other 5xx**: [`ErrorKind::ServerError`]

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ErrorKind, HttpError, InvalidHttpRequestError, ResponseError};
pub use http_client::{HttpClient, CONTENT_TYPE, SDK_VERSION};
pub use http_request::{
    escape_path, header_name, HttpMethod, HttpRequest, RequestOptions, CONVENIENCE_HEADERS,
    HEADERS_KEY, QUERY_KEY,
};
pub use http_response::HttpResponse;
