//! Client for the Datadog HTTP API.
//!
//! This module provides the [`Client`] type: a resolved configuration, a
//! lazily built transport agent and the most recent response.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::config::{ApiKey, ApplicationKey, ClientOptions, DatadogConfig};
use crate::error::ConfigError;

/// Client for the Datadog HTTP API.
///
/// Each call builds a request from the path and options, sends it through the
/// cached agent, records the response as [`last_response`](Self::last_response)
/// and runs the configured middleware over it. A classified error response
/// is returned as [`HttpError::Response`]; anything else yields the decoded
/// body.
///
/// The agent is built on the first call and discarded whenever the
/// credentials or the configuration change, so the next call picks up the new
/// values.
///
/// Calls take `&mut self`: a client runs one request at a time.
///
/// # Example
///
/// ```rust,ignore
/// use datadog_api::{ApiKey, Client, ClientOptions, DatadogConfig, RequestOptions};
///
/// let mut client = Client::from_options(
///     &ClientOptions::new().api_key(ApiKey::new("my-api-key")),
///     &DatadogConfig::from_env(),
/// );
///
/// assert!(client.validate().await?);
///
/// let hosts = client
///     .get("hosts", RequestOptions::new().param("filter", "web"))
///     .await?;
/// ```
pub struct Client {
    /// The effective configuration.
    config: DatadogConfig,
    /// Transport agent, built on first use.
    agent: Option<HttpClient>,
    /// The response to the most recent call.
    last_response: Option<HttpResponse>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

#[derive(Deserialize)]
struct Validation {
    valid: bool,
}

impl Client {
    /// Creates a client that runs with `config` as its effective
    /// configuration.
    #[must_use]
    pub const fn new(config: DatadogConfig) -> Self {
        Self {
            config,
            agent: None,
            last_response: None,
        }
    }

    /// Creates a client from explicit options resolved over a process-level
    /// configuration.
    ///
    /// See [`ClientOptions::resolve`] for the precedence rules.
    #[must_use]
    pub fn from_options(options: &ClientOptions, process: &DatadogConfig) -> Self {
        Self::new(options.resolve(process))
    }

    /// Returns the effective configuration.
    #[must_use]
    pub const fn config(&self) -> &DatadogConfig {
        &self.config
    }

    /// Returns the API endpoint, always ending in exactly one `/`.
    #[must_use]
    pub fn api_endpoint(&self) -> &str {
        self.config.api_endpoint()
    }

    /// Applies changes to the effective configuration.
    ///
    /// The cached agent is discarded.
    pub fn configure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut DatadogConfig),
    {
        f(&mut self.config);
        self.discard_agent();
        self
    }

    /// Replaces the API key, discarding the cached agent.
    pub fn set_api_key(&mut self, key: Option<ApiKey>) -> &mut Self {
        self.config.set_api_key(key);
        self.discard_agent();
        self
    }

    /// Replaces the application key, discarding the cached agent.
    pub fn set_application_key(&mut self, key: Option<ApplicationKey>) -> &mut Self {
        self.config.set_application_key(key);
        self.discard_agent();
        self
    }

    /// Returns `true` if this client runs with a configuration equal to
    /// `config`.
    #[must_use]
    pub fn same_options(&self, config: &DatadogConfig) -> bool {
        self.config == *config
    }

    /// Returns `true` if the agent has been built and not discarded since.
    #[must_use]
    pub const fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Returns the transport agent, building it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the agent cannot be built from the current
    /// configuration.
    pub fn agent(&mut self) -> Result<&HttpClient, ConfigError> {
        let agent = match self.agent.take() {
            Some(agent) => agent,
            None => HttpClient::new(&self.config)?,
        };
        Ok(&*self.agent.insert(agent))
    }

    /// Returns the response to the most recent call, or `None` if no call has
    /// been made.
    #[must_use]
    pub const fn last_response(&self) -> Option<&HttpResponse> {
        self.last_response.as_ref()
    }

    /// Sends a GET request.
    ///
    /// Plain options become query parameters; `accept` and `content_type`
    /// become headers.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn get(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Get, path, options).await
    }

    /// Sends a POST request.
    ///
    /// Plain options become the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn post(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Post, path, options).await
    }

    /// Sends a PUT request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn put(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Put, path, options).await
    }

    /// Sends a PATCH request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn patch(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Patch, path, options).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn delete(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Delete, path, options).await
    }

    /// Sends a HEAD request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn head(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.request(HttpMethod::Head, path, options).await
    }

    /// Checks the configured API key against `GET validate`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the call fails, including
    /// [`ErrorKind::Forbidden`](crate::ErrorKind::Forbidden) for a rejected
    /// key, or [`HttpError::Deserialize`] if the body has no `valid` flag.
    pub async fn validate(&mut self) -> Result<bool, HttpError> {
        let data = self.get("validate", RequestOptions::new()).await?;
        let validation: Validation = serde_json::from_value(data)?;
        Ok(validation.valid)
    }

    /// Sends a request whose outcome is a yes/no answer.
    ///
    /// Returns `true` if the response status is 204 and `false` if it is
    /// 404. Any other error propagates.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for every failure except a 404 response.
    pub async fn boolean_from_response(
        &mut self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<bool, HttpError> {
        match self.send(method, path, options).await {
            Ok(response) => Ok(response.status == 204),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Sends a request and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request cannot be built or sent, or if
    /// the response has an error status.
    pub async fn request(
        &mut self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, HttpError> {
        self.send(method, path, options).await.map(HttpResponse::data)
    }

    async fn send(
        &mut self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<&HttpResponse, HttpError> {
        let request = HttpRequest::from_options(method, path, options)?;
        let response = self.agent()?.execute(&request).await?;

        let response: &HttpResponse = self.last_response.insert(response);
        self.config.middleware().on_complete(response)?;

        Ok(response)
    }

    fn discard_agent(&mut self) {
        if self.agent.take().is_some() {
            tracing::debug!("Discarded Datadog API agent after configuration change");
        }
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_endpoint", &self.config.api_endpoint())
            .field("api_key", &self.config.api_key())
            .field("application_key", &self.config.application_key())
            .field("has_agent", &self.agent.is_some())
            .field(
                "last_status",
                &self.last_response.as_ref().map(|response| response.status),
            )
            .finish_non_exhaustive()
    }
}
