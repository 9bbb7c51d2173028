//! # Datadog API Rust Client
//!
//! A Rust client for the Datadog HTTP API, providing layered configuration,
//! credential handling, request shaping and classified error responses.
//!
//! ## Overview
//!
//! This crate provides:
//! - Explicit configuration via [`DatadogConfig`] with `DATADOG_*`
//!   environment defaults and per-client overrides via [`ClientOptions`]
//! - Credential newtypes ([`ApiKey`], [`ApplicationKey`]) whose `Debug`
//!   output is masked
//! - An async [`Client`] with `get`, `post`, `put`, `patch`, `delete` and
//!   `head` calls that attach credentials and convenience headers
//! - Error responses classified by status into [`ErrorKind`], with messages
//!   that never contain plaintext credentials
//! - A [`Datadog`] handle that caches one client per configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use datadog_api::{ApiKey, ApplicationKey, Client, ClientOptions, DatadogConfig};
//!
//! // Process-level configuration, read from the environment
//! let process = DatadogConfig::from_lookup(|_| None);
//!
//! // Explicit options win over the process configuration
//! let client = Client::from_options(
//!     &ClientOptions::new()
//!         .api_key(ApiKey::new("your-api-key"))
//!         .application_key(ApplicationKey::new("your-application-key")),
//!     &process,
//! );
//!
//! assert_eq!(client.api_endpoint(), "https://app.datadoghq.com/api/v1/");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use datadog_api::{Client, DatadogConfig, ErrorKind, HttpError, RequestOptions};
//!
//! let mut client = Client::new(DatadogConfig::from_env());
//!
//! // Plain options on GET become query parameters; `accept` becomes a header
//! let hosts = client
//!     .get("hosts", RequestOptions::new().param("filter", "web").accept("application/json"))
//!     .await?;
//!
//! // Plain options on POST become the JSON body
//! let monitor = client
//!     .post("monitor", RequestOptions::new().param("type", "metric alert").param("query", "..."))
//!     .await?;
//!
//! match client.get("monitor/0", RequestOptions::new()).await {
//!     Err(HttpError::Response(e)) if e.kind == ErrorKind::NotFound => { /* ... */ }
//!     other => { /* ... */ }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Permissive configuration**: Values are not validated until a request
//!   is sent with them
//! - **No credential leaks**: `Debug` output masks keys and error messages
//!   redact them
//! - **Async-first**: Designed for use with the Tokio async runtime

pub mod client;
pub mod clients;
pub mod config;
pub mod datadog;
pub mod error;
pub mod redact;

// Re-export public types at crate root for convenience
pub use client::Client;
pub use config::{
    ApiEndpoint, ApiKey, ApplicationKey, ClientOptions, ConfigKey, ConnectionOptions,
    DatadogConfig, Middleware, ResponseStage,
};
pub use datadog::Datadog;
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse,
    InvalidHttpRequestError, RequestOptions, ResponseError,
};
