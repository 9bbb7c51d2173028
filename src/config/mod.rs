//! Configuration types for the Datadog API client.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`DatadogConfig`]: the eight configuration values every client runs with
//! - [`ClientOptions`]: explicit per-client overrides applied over a config
//! - [`ConfigKey`]: names of the configuration fields
//! - [`ApiKey`] / [`ApplicationKey`]: credentials with masked debug output
//! - [`ApiEndpoint`]: base URL that always reads back with a trailing `/`
//! - [`ConnectionOptions`] / [`Middleware`]: transport settings
//!
//! # Precedence
//!
//! A client's effective configuration takes each field from, in order:
//!
//! 1. the explicit [`ClientOptions`] value, if set
//! 2. the process-level [`DatadogConfig`] the client is created from
//! 3. the hardcoded defaults, overridable through `DATADOG_*` environment
//!    variables
//!
//! # Example
//!
//! ```rust
//! use datadog_api::{ApiKey, ClientOptions, DatadogConfig};
//!
//! let mut config = DatadogConfig::from_lookup(|_| None);
//! config.configure(|c| {
//!     c.set_api_endpoint("https://api.datadoghq.eu/api/v1");
//! });
//!
//! let effective = ClientOptions::new()
//!     .api_key(ApiKey::new("my-api-key"))
//!     .resolve(&config);
//!
//! assert_eq!(effective.api_endpoint(), "https://api.datadoghq.eu/api/v1/");
//! assert_eq!(effective.api_key().map(AsRef::as_ref), Some("my-api-key"));
//! ```

mod defaults;
mod newtypes;
mod transport;

pub use defaults::{
    user_agent as default_user_agent, API_PATH, DATADOG_HOST, ENV_API_ENDPOINT, ENV_API_KEY,
    ENV_APP_KEY, ENV_HOST, ENV_MEDIA_TYPE, ENV_PROXY, ENV_USER_AGENT, MEDIA_TYPE,
};
pub use newtypes::{ApiEndpoint, ApiKey, ApplicationKey};
pub use transport::{ConnectionOptions, Middleware, ResponseStage};

use std::fmt;

use defaults::Defaults;

/// Names of the configuration fields shared by [`DatadogConfig`] and
/// [`ClientOptions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Base URL for API requests.
    ApiEndpoint,
    /// API key sent as the `api_key` query parameter.
    ApiKey,
    /// Application key sent as the `application_key` query parameter.
    ApplicationKey,
    /// Transport connection options.
    ConnectionOptions,
    /// Media type sent in the `Accept` header.
    DefaultMediaType,
    /// Response middleware stack.
    Middleware,
    /// Proxy URL.
    Proxy,
    /// `User-Agent` header value.
    UserAgent,
}

impl ConfigKey {
    /// Every configuration key, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::ApiEndpoint,
        Self::ApiKey,
        Self::ApplicationKey,
        Self::ConnectionOptions,
        Self::DefaultMediaType,
        Self::Middleware,
        Self::Proxy,
        Self::UserAgent,
    ];

    /// Returns the snake case name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApiEndpoint => "api_endpoint",
            Self::ApiKey => "api_key",
            Self::ApplicationKey => "application_key",
            Self::ConnectionOptions => "connection_options",
            Self::DefaultMediaType => "default_media_type",
            Self::Middleware => "middleware",
            Self::Proxy => "proxy",
            Self::UserAgent => "user_agent",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field comparison and copy, used wherever every field is visited.
struct Field {
    key: ConfigKey,
    eq: fn(&DatadogConfig, &DatadogConfig) -> bool,
    copy: fn(&mut DatadogConfig, &DatadogConfig),
}

macro_rules! field {
    ($key:ident, $name:ident) => {
        Field {
            key: ConfigKey::$key,
            eq: |a, b| a.$name == b.$name,
            copy: |to, from| to.$name = from.$name.clone(),
        }
    };
}

static FIELDS: [Field; 8] = [
    field!(ApiEndpoint, api_endpoint),
    field!(ApiKey, api_key),
    field!(ApplicationKey, application_key),
    field!(ConnectionOptions, connection_options),
    field!(DefaultMediaType, default_media_type),
    field!(Middleware, middleware),
    field!(Proxy, proxy),
    field!(UserAgent, user_agent),
];

fn field(key: ConfigKey) -> &'static Field {
    // FIELDS is declared in ConfigKey order
    &FIELDS[key as usize]
}

/// Configuration for the Datadog API client.
///
/// Two configurations are equal when every field compares equal; clients
/// use this to decide whether a cached instance can be reused.
///
/// # Thread Safety
///
/// `DatadogConfig` is `Clone`, `Send`, and `Sync`. It carries no interior
/// mutability, so sharing one across threads requires the usual `&mut`
/// discipline for updates.
///
/// # Example
///
/// ```rust
/// use datadog_api::{ApiKey, ConfigKey, DatadogConfig};
///
/// let defaults = DatadogConfig::from_lookup(|_| None);
/// let mut config = defaults.clone();
/// config.set_api_key(Some(ApiKey::new("key")));
///
/// assert_ne!(config, defaults);
/// assert_eq!(config.differing_keys(&defaults), vec![ConfigKey::ApiKey]);
/// ```
#[derive(Clone, Debug)]
pub struct DatadogConfig {
    api_endpoint: ApiEndpoint,
    api_key: Option<ApiKey>,
    application_key: Option<ApplicationKey>,
    connection_options: ConnectionOptions,
    default_media_type: String,
    middleware: Middleware,
    proxy: Option<String>,
    user_agent: String,
}

// Verify DatadogConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DatadogConfig>();
};

impl Default for DatadogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PartialEq for DatadogConfig {
    fn eq(&self, other: &Self) -> bool {
        FIELDS.iter().all(|f| (f.eq)(self, other))
    }
}

impl Eq for DatadogConfig {}

impl DatadogConfig {
    /// Creates the default configuration, reading `DATADOG_*` environment
    /// variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates the default configuration, reading variables through `lookup`
    /// instead of the process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Defaults::resolve(lookup);
        let connection_options =
            ConnectionOptions::derived(&defaults.default_media_type, &defaults.user_agent);

        Self {
            api_endpoint: ApiEndpoint::new(defaults.api_endpoint),
            api_key: defaults.api_key.map(ApiKey::new),
            application_key: defaults.application_key.map(ApplicationKey::new),
            connection_options,
            default_media_type: defaults.default_media_type,
            middleware: Middleware::default(),
            proxy: defaults.proxy,
            user_agent: defaults.user_agent,
        }
    }

    /// Returns the API endpoint, always ending in exactly one `/`.
    #[must_use]
    pub fn api_endpoint(&self) -> &str {
        self.api_endpoint.as_ref()
    }

    /// Returns the API key, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the application key, if configured.
    #[must_use]
    pub const fn application_key(&self) -> Option<&ApplicationKey> {
        self.application_key.as_ref()
    }

    /// Returns the transport connection options.
    #[must_use]
    pub const fn connection_options(&self) -> &ConnectionOptions {
        &self.connection_options
    }

    /// Returns the media type sent in the `Accept` header.
    #[must_use]
    pub fn default_media_type(&self) -> &str {
        &self.default_media_type
    }

    /// Returns the response middleware stack.
    #[must_use]
    pub const fn middleware(&self) -> &Middleware {
        &self.middleware
    }

    /// Returns the proxy URL, if configured.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Sets the API endpoint. The value is not validated.
    pub fn set_api_endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        self.api_endpoint = ApiEndpoint::new(endpoint);
        self
    }

    /// Sets or clears the API key.
    pub fn set_api_key(&mut self, key: Option<ApiKey>) -> &mut Self {
        self.api_key = key;
        self
    }

    /// Sets or clears the application key.
    pub fn set_application_key(&mut self, key: Option<ApplicationKey>) -> &mut Self {
        self.application_key = key;
        self
    }

    /// Sets the transport connection options.
    pub fn set_connection_options(&mut self, options: ConnectionOptions) -> &mut Self {
        self.connection_options = options;
        self
    }

    /// Sets the media type sent in the `Accept` header.
    pub fn set_default_media_type(&mut self, media_type: impl Into<String>) -> &mut Self {
        self.default_media_type = media_type.into();
        self
    }

    /// Sets the response middleware stack.
    pub fn set_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware = middleware;
        self
    }

    /// Sets or clears the proxy URL.
    pub fn set_proxy(&mut self, proxy: Option<String>) -> &mut Self {
        self.proxy = proxy;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Applies a block of changes to this configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datadog_api::DatadogConfig;
    ///
    /// let mut config = DatadogConfig::from_lookup(|_| None);
    /// config.configure(|c| {
    ///     c.set_user_agent("my-app/1.0").set_proxy(Some("http://proxy:3128".into()));
    /// });
    ///
    /// assert_eq!(config.user_agent(), "my-app/1.0");
    /// ```
    pub fn configure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        f(self);
        self
    }

    /// Restores every field to its default, re-reading the environment.
    pub fn reset(&mut self) -> &mut Self {
        self.reset_to(&Self::from_env())
    }

    /// Restores every field from `defaults`.
    pub fn reset_to(&mut self, defaults: &Self) -> &mut Self {
        for f in &FIELDS {
            (f.copy)(self, defaults);
        }
        self
    }

    /// Restores a single field to its default, re-reading the environment.
    pub fn reset_key(&mut self, key: ConfigKey) -> &mut Self {
        (field(key).copy)(self, &Self::from_env());
        self
    }

    /// Returns the keys whose values differ between `self` and `other`.
    #[must_use]
    pub fn differing_keys(&self, other: &Self) -> Vec<ConfigKey> {
        FIELDS
            .iter()
            .filter(|f| !(f.eq)(self, other))
            .map(|f| f.key)
            .collect()
    }
}

/// Explicit configuration overrides for a single client.
///
/// Unset fields fall back to the process-level configuration passed to
/// [`resolve`](Self::resolve).
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    api_endpoint: Option<ApiEndpoint>,
    api_key: Option<ApiKey>,
    application_key: Option<ApplicationKey>,
    connection_options: Option<ConnectionOptions>,
    default_media_type: Option<String>,
    middleware: Option<Middleware>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl ClientOptions {
    /// Creates an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(ApiEndpoint::new(endpoint));
        self
    }

    /// Overrides the API key.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Overrides the application key.
    #[must_use]
    pub fn application_key(mut self, key: ApplicationKey) -> Self {
        self.application_key = Some(key);
        self
    }

    /// Overrides the transport connection options.
    #[must_use]
    pub fn connection_options(mut self, options: ConnectionOptions) -> Self {
        self.connection_options = Some(options);
        self
    }

    /// Overrides the default media type.
    #[must_use]
    pub fn default_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.default_media_type = Some(media_type.into());
        self
    }

    /// Overrides the response middleware stack.
    #[must_use]
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware = Some(middleware);
        self
    }

    /// Overrides the proxy URL.
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Overrides the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the keys this set of options overrides.
    #[must_use]
    pub fn keys(&self) -> Vec<ConfigKey> {
        let set = [
            self.api_endpoint.is_some(),
            self.api_key.is_some(),
            self.application_key.is_some(),
            self.connection_options.is_some(),
            self.default_media_type.is_some(),
            self.middleware.is_some(),
            self.proxy.is_some(),
            self.user_agent.is_some(),
        ];
        ConfigKey::ALL
            .into_iter()
            .zip(set)
            .filter_map(|(key, is_set)| is_set.then_some(key))
            .collect()
    }

    /// Resolves the effective configuration over `process`, falling back to
    /// the environment defaults for fields `process` leaves unset.
    #[must_use]
    pub fn resolve(&self, process: &DatadogConfig) -> DatadogConfig {
        self.resolve_with(process, &DatadogConfig::from_env())
    }

    /// Resolves the effective configuration: each field comes from these
    /// options, else `process`, else `defaults`.
    #[must_use]
    pub fn resolve_with(&self, process: &DatadogConfig, defaults: &DatadogConfig) -> DatadogConfig {
        DatadogConfig {
            api_endpoint: self
                .api_endpoint
                .clone()
                .unwrap_or_else(|| process.api_endpoint.clone()),
            api_key: self
                .api_key
                .clone()
                .or_else(|| process.api_key.clone())
                .or_else(|| defaults.api_key.clone()),
            application_key: self
                .application_key
                .clone()
                .or_else(|| process.application_key.clone())
                .or_else(|| defaults.application_key.clone()),
            connection_options: self
                .connection_options
                .clone()
                .unwrap_or_else(|| process.connection_options.clone()),
            default_media_type: self
                .default_media_type
                .clone()
                .unwrap_or_else(|| process.default_media_type.clone()),
            middleware: self
                .middleware
                .clone()
                .unwrap_or_else(|| process.middleware.clone()),
            proxy: self
                .proxy
                .clone()
                .or_else(|| process.proxy.clone())
                .or_else(|| defaults.proxy.clone()),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| process.user_agent.clone()),
        }
    }
}
