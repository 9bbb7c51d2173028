//! Transport agent for Datadog API communication.
//!
//! This module provides the [`HttpClient`] type: a `reqwest` client bound to
//! one effective configuration, with its default headers and authentication
//! parameters fixed at construction.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::{header_name, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::DatadogConfig;
use crate::error::ConfigError;
use crate::redact::redact_url;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content type sent with every request.
pub const CONTENT_TYPE: &str = "application/json";

/// Transport agent for the Datadog API.
///
/// The agent handles:
/// - Request URL construction relative to the API endpoint
/// - Default headers: `accept`, `content-type` and `user-agent`
/// - Authentication: `api_key` and `application_key` query parameters
/// - Proxy and timeout settings from the connection options
///
/// An agent never changes after it is built. Clients discard and rebuild it
/// when their credentials change.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`.
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL, ending in `/`.
    endpoint: String,
    /// Default headers included in all requests.
    default_headers: BTreeMap<String, String>,
    /// Query parameters included in all requests.
    default_params: BTreeMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("endpoint", &self.endpoint)
            .field("default_headers", &self.default_headers)
            .field("default_params", &self.default_params.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Builds an agent for the given effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a default header or the proxy URL is
    /// invalid, or if the underlying client cannot be created.
    pub fn new(config: &DatadogConfig) -> Result<Self, ConfigError> {
        let connection = config.connection_options();

        let mut default_headers: BTreeMap<String, String> = connection
            .headers()
            .iter()
            .map(|(name, value)| (header_name(name), value.clone()))
            .collect();
        default_headers.insert("accept".to_string(), config.default_media_type().to_string());
        default_headers.insert("content-type".to_string(), CONTENT_TYPE.to_string());
        default_headers.insert("user-agent".to_string(), config.user_agent().to_string());

        let mut header_map = HeaderMap::new();
        for (name, value) in &default_headers {
            let invalid = || ConfigError::InvalidHeader { name: name.clone() };
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            header_map.insert(header, value);
        }

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(header_map);
        if let Some(timeout) = connection.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = config.proxy() {
            let proxy = reqwest::Proxy::all(proxy).map_err(|_| ConfigError::InvalidProxy {
                url: proxy.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().map_err(ConfigError::Agent)?;

        let credentials = [
            ("api_key", config.api_key().map(AsRef::<str>::as_ref)),
            (
                "application_key",
                config.application_key().map(AsRef::<str>::as_ref),
            ),
        ];
        let default_params: BTreeMap<String, String> = credentials
            .into_iter()
            .filter_map(|(name, key)| key.filter(|k| !k.is_empty()).map(|k| (name, k)))
            .map(|(name, key)| (name.to_string(), key.to_string()))
            .collect();

        tracing::debug!(
            endpoint = config.api_endpoint(),
            params = ?default_params.keys().collect::<Vec<_>>(),
            "Built Datadog API agent"
        );

        Ok(Self {
            client,
            endpoint: config.api_endpoint().to_string(),
            default_headers,
            default_params,
        })
    }

    /// Returns the base URL for this agent.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the default headers for this agent.
    #[must_use]
    pub const fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    /// Returns the authentication query parameters for this agent.
    #[must_use]
    pub const fn default_params(&self) -> &BTreeMap<String, String> {
        &self.default_params
    }

    /// Resolves the full URL for a request, including query parameters.
    ///
    /// Request query parameters override authentication parameters of the
    /// same name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::InvalidUrl`] if the endpoint and
    /// path do not form a valid URL.
    pub fn url_for(&self, request: &HttpRequest) -> Result<reqwest::Url, InvalidHttpRequestError> {
        let raw = format!("{}{}", self.endpoint, request.path);
        let mut url = reqwest::Url::parse(&raw).map_err(|_| InvalidHttpRequestError::InvalidUrl {
            url: redact_url(&raw),
        })?;

        let mut params = self.default_params.clone();
        params.extend(request.query.iter().map(|(k, v)| (k.clone(), v.clone())));
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Sends a request and returns the raw response.
    ///
    /// Error statuses are returned as responses; classifying them is left to
    /// the middleware stack.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - The request URL is invalid (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.url_for(request)?;

        let mut req_builder = self
            .client
            .request(request.http_method.to_reqwest(), url.clone());

        if let Some(headers) = &request.headers {
            for (key, value) in headers {
                req_builder = req_builder.header(header_name(key), value);
            }
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!("{} {}", request.http_method, redact_url(url.as_str()));

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let final_url = res.url().to_string();
        let body = res.text().await?;

        Ok(HttpResponse::new(
            request.http_method,
            final_url,
            status,
            headers,
            body,
        ))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpMethod, RequestOptions};
    use crate::config::{ApiKey, ApplicationKey, ConnectionOptions};

    fn test_config() -> DatadogConfig {
        let mut config = DatadogConfig::from_lookup(|_| None);
        config
            .set_api_endpoint("https://app.example.com/api/v1")
            .set_api_key(Some(ApiKey::new("test-api-key")));
        config
    }

    #[test]
    fn test_agent_construction_from_config() {
        let agent = HttpClient::new(&test_config()).unwrap();

        assert_eq!(agent.endpoint(), "https://app.example.com/api/v1/");
        assert_eq!(
            agent.default_params().get("api_key"),
            Some(&"test-api-key".to_string())
        );
    }

    #[test]
    fn test_default_headers() {
        let mut config = test_config();
        config
            .set_default_media_type("application/vnd.datadog+json")
            .set_user_agent("tests/1.0");
        let agent = HttpClient::new(&config).unwrap();

        let headers = agent.default_headers();
        assert_eq!(
            headers.get("accept"),
            Some(&"application/vnd.datadog+json".to_string())
        );
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("user-agent"), Some(&"tests/1.0".to_string()));
    }

    #[test]
    fn test_connection_option_headers_are_included() {
        let mut config = test_config();
        config.set_connection_options(
            ConnectionOptions::default()
                .with_header("x_team", "observability")
                .with_header("user_agent", "overridden-by-config"),
        );
        let agent = HttpClient::new(&config).unwrap();

        assert_eq!(
            agent.default_headers().get("x-team"),
            Some(&"observability".to_string())
        );
        assert_eq!(
            agent.default_headers().get("user-agent").map(String::as_str),
            Some(config.user_agent())
        );
    }

    #[test]
    fn test_application_key_param_only_when_set() {
        let agent = HttpClient::new(&test_config()).unwrap();
        assert!(!agent.default_params().contains_key("application_key"));

        let mut config = test_config();
        config.set_application_key(Some(ApplicationKey::new("test-app-key")));
        let agent = HttpClient::new(&config).unwrap();
        assert_eq!(
            agent.default_params().get("application_key"),
            Some(&"test-app-key".to_string())
        );
    }

    #[test]
    fn test_no_api_key_param_without_api_key() {
        let mut config = test_config();
        config.set_api_key(None);
        let agent = HttpClient::new(&config).unwrap();
        assert!(agent.default_params().is_empty());
    }

    #[test]
    fn test_url_includes_auth_and_request_params() {
        let agent = HttpClient::new(&test_config()).unwrap();
        let request = HttpRequest::from_options(
            HttpMethod::Get,
            "hosts",
            RequestOptions::new().param("filter", "web"),
        )
        .unwrap();

        let url = agent.url_for(&request).unwrap();
        assert_eq!(url.path(), "/api/v1/hosts");
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("api_key"), Some(&"test-api-key".to_string()));
        assert_eq!(pairs.get("filter"), Some(&"web".to_string()));
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let mut config = test_config();
        config.set_api_key(None);
        let agent = HttpClient::new(&config).unwrap();
        let request =
            HttpRequest::from_options(HttpMethod::Get, "validate", RequestOptions::new()).unwrap();

        let url = agent.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "https://app.example.com/api/v1/validate");
    }

    #[test]
    fn test_invalid_endpoint_is_reported_at_request_time() {
        let mut config = test_config();
        config.set_api_endpoint("not a url");
        let agent = HttpClient::new(&config).unwrap();
        let request =
            HttpRequest::from_options(HttpMethod::Get, "validate", RequestOptions::new()).unwrap();

        assert!(matches!(
            agent.url_for(&request),
            Err(InvalidHttpRequestError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let mut config = test_config();
        config.set_proxy(Some("::not a proxy::".to_string()));

        assert!(matches!(
            HttpClient::new(&config),
            Err(ConfigError::InvalidProxy { .. })
        ));
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let mut config = test_config();
        config.set_user_agent("bad\nagent");

        assert!(matches!(
            HttpClient::new(&config),
            Err(ConfigError::InvalidHeader { name }) if name == "user-agent"
        ));
    }

    #[test]
    fn test_debug_output_hides_param_values() {
        let agent = HttpClient::new(&test_config()).unwrap();
        let debug_str = format!("{agent:?}");
        assert!(debug_str.contains("api_key"));
        assert!(!debug_str.contains("test-api-key"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
