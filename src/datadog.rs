//! Convenience handle pairing a process-level configuration with a cached
//! client.

use serde_json::Value;

use crate::client::Client;
use crate::clients::{HttpError, HttpResponse, RequestOptions};
use crate::config::{ClientOptions, DatadogConfig};

/// A process-level configuration and the client built from it.
///
/// Applications that talk to a single Datadog account can keep one `Datadog`
/// around instead of passing a [`DatadogConfig`] to every [`Client`]. The
/// client is built on first use and reused for as long as the effective
/// configuration stays the same; after [`configure`](Self::configure) or
/// [`reset`](Self::reset) the next call gets a fresh client.
///
/// # Example
///
/// ```rust,ignore
/// use datadog_api::{ApiKey, Datadog, RequestOptions};
///
/// let mut datadog = Datadog::new();
/// datadog.configure(|c| {
///     c.set_api_key(Some(ApiKey::new("my-api-key")));
/// });
///
/// let monitors = datadog.get("monitor", RequestOptions::new()).await?;
/// ```
#[derive(Debug, Default)]
pub struct Datadog {
    config: DatadogConfig,
    client: Option<Client>,
}

impl Datadog {
    /// Creates a handle with the default configuration, reading `DATADOG_*`
    /// environment variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle with the given process-level configuration.
    #[must_use]
    pub const fn with_config(config: DatadogConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Returns the process-level configuration.
    #[must_use]
    pub const fn config(&self) -> &DatadogConfig {
        &self.config
    }

    /// Applies changes to the process-level configuration.
    pub fn configure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut DatadogConfig),
    {
        self.config.configure(f);
        self
    }

    /// Restores every configuration field to its default.
    pub fn reset(&mut self) -> &mut Self {
        self.config.reset();
        self
    }

    /// Returns the cached client, replacing it if its configuration no longer
    /// matches the effective configuration.
    pub fn client(&mut self) -> &mut Client {
        let effective = ClientOptions::new().resolve(&self.config);
        let client = match self.client.take() {
            Some(client) if client.same_options(&effective) => client,
            _ => {
                tracing::debug!(endpoint = effective.api_endpoint(), "Building Datadog API client");
                Client::new(effective)
            }
        };
        self.client.insert(client)
    }

    /// Creates a client with explicit options resolved over the process-level
    /// configuration.
    ///
    /// The client is not cached.
    #[must_use]
    pub fn client_with(&self, options: &ClientOptions) -> Client {
        Client::from_options(options, &self.config)
    }

    /// Returns the response to the cached client's most recent call.
    #[must_use]
    pub fn last_response(&self) -> Option<&HttpResponse> {
        self.client.as_ref().and_then(Client::last_response)
    }

    /// Sends a GET request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::get`].
    pub async fn get(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().get(path, options).await
    }

    /// Sends a POST request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::post`].
    pub async fn post(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().post(path, options).await
    }

    /// Sends a PUT request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::put`].
    pub async fn put(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().put(path, options).await
    }

    /// Sends a PATCH request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::patch`].
    pub async fn patch(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().patch(path, options).await
    }

    /// Sends a DELETE request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::delete`].
    pub async fn delete(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().delete(path, options).await
    }

    /// Sends a HEAD request through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::head`].
    pub async fn head(&mut self, path: &str, options: RequestOptions) -> Result<Value, HttpError> {
        self.client().head(path, options).await
    }

    /// Validates the configured API key through the cached client.
    ///
    /// # Errors
    ///
    /// See [`Client::validate`].
    pub async fn validate(&mut self) -> Result<bool, HttpError> {
        self.client().validate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApplicationKey};

    fn test_datadog() -> Datadog {
        let mut config = DatadogConfig::from_lookup(|_| None);
        config
            .set_api_endpoint("https://app.example.com/api/v1")
            .set_api_key(Some(ApiKey::new("process-key")))
            .set_application_key(Some(ApplicationKey::new("process-app-key")));
        Datadog::with_config(config)
    }

    #[test]
    fn test_client_uses_process_configuration() {
        let mut datadog = test_datadog();
        let client = datadog.client();

        assert_eq!(client.api_endpoint(), "https://app.example.com/api/v1/");
        assert_eq!(
            client.config().api_key().map(AsRef::as_ref),
            Some("process-key")
        );
    }

    #[test]
    fn test_client_is_cached_while_configuration_is_unchanged() {
        let mut datadog = test_datadog();
        datadog.client().agent().unwrap();

        assert!(datadog.client().has_agent());
    }

    #[test]
    fn test_configure_replaces_cached_client() {
        let mut datadog = test_datadog();
        datadog.client().agent().unwrap();

        datadog.configure(|c| {
            c.set_api_endpoint("https://api.datadoghq.eu/api/v1");
        });

        let client = datadog.client();
        assert!(!client.has_agent());
        assert_eq!(client.api_endpoint(), "https://api.datadoghq.eu/api/v1/");
    }

    #[test]
    fn test_client_with_explicit_options_is_not_cached() {
        let mut datadog = test_datadog();
        datadog.client().agent().unwrap();

        let explicit = datadog.client_with(&ClientOptions::new().api_key(ApiKey::new("explicit")));
        assert_eq!(
            explicit.config().api_key().map(AsRef::as_ref),
            Some("explicit")
        );
        assert_eq!(
            explicit.config().application_key().map(AsRef::as_ref),
            Some("process-app-key")
        );
        assert!(datadog.client().has_agent());
    }

    #[test]
    fn test_last_response_is_none_before_any_call() {
        let mut datadog = test_datadog();
        assert!(datadog.last_response().is_none());
        datadog.client();
        assert!(datadog.last_response().is_none());
    }
}
