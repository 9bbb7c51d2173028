//! Transport-level configuration: connection options and the response
//! middleware stack.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::clients::{HttpResponse, ResponseError};

/// Options applied to the underlying HTTP connection.
///
/// By default these carry the `accept` and `user-agent` headers derived from
/// the configured media type and user agent. The agent sets those two headers
/// from the configuration again when it is built, so the values here only
/// matter for additional headers and the timeout.
///
/// # Example
///
/// ```rust
/// use datadog_api::ConnectionOptions;
/// use std::time::Duration;
///
/// let options = ConnectionOptions::derived("application/json", "my-agent")
///     .with_header("x-team", "observability")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(options.headers().get("accept").map(String::as_str), Some("application/json"));
/// assert_eq!(options.timeout(), Some(Duration::from_secs(10)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl ConnectionOptions {
    /// Builds the default connection options for a media type and user agent.
    #[must_use]
    pub fn derived(media_type: &str, user_agent: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("accept".to_string(), media_type.to_string());
        headers.insert("user-agent".to_string(), user_agent.to_string());
        Self {
            headers,
            timeout: None,
        }
    }

    /// Adds a default header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a timeout applied to every request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the default headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// A single stage in the response middleware stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseStage {
    /// Turns 4xx and 5xx responses into a classified [`ResponseError`].
    RaiseError,
    /// Logs each response at debug level with its URL redacted.
    Logger,
}

/// Ordered stack of stages run over every response.
///
/// The default stack contains only [`ResponseStage::RaiseError`]. Without it,
/// error responses are returned to the caller as data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Middleware {
    stages: Vec<ResponseStage>,
}

impl Default for Middleware {
    fn default() -> Self {
        Self {
            stages: vec![ResponseStage::RaiseError],
        }
    }
}

impl Middleware {
    /// Creates a stack from the given stages, run in order.
    #[must_use]
    pub fn new(stages: impl IntoIterator<Item = ResponseStage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Returns the stages in run order.
    #[must_use]
    pub fn stages(&self) -> &[ResponseStage] {
        &self.stages
    }

    /// Runs every stage over a completed response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ResponseError`] from the first
    /// [`ResponseStage::RaiseError`] stage that sees an error status.
    pub fn on_complete(&self, response: &HttpResponse) -> Result<(), ResponseError> {
        for stage in &self.stages {
            match stage {
                ResponseStage::RaiseError => {
                    if let Some(error) = ResponseError::from_response(response) {
                        tracing::warn!(kind = ?error.kind, status = error.status, "{}", error);
                        return Err(error);
                    }
                }
                ResponseStage::Logger => {
                    tracing::debug!(
                        status = response.status,
                        "{} {}",
                        response.method.as_str(),
                        response.redacted_url()
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ErrorKind, HttpMethod};
    use std::collections::HashMap;

    fn response(status: u16) -> HttpResponse {
        HttpResponse::new(
            HttpMethod::Get,
            "https://app.datadoghq.com/api/v1/validate?api_key=secret",
            status,
            HashMap::new(),
            String::new(),
        )
    }

    #[test]
    fn test_derived_connection_options_carry_accept_and_user_agent() {
        let options = ConnectionOptions::derived("application/json", "agent/1.0");

        assert_eq!(
            options.headers().get("accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            options.headers().get("user-agent"),
            Some(&"agent/1.0".to_string())
        );
        assert!(options.timeout().is_none());
    }

    #[test]
    fn test_default_middleware_raises_errors() {
        let middleware = Middleware::default();
        assert_eq!(middleware.stages(), &[ResponseStage::RaiseError]);

        let error = middleware.on_complete(&response(404)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_default_middleware_passes_success() {
        assert!(Middleware::default().on_complete(&response(200)).is_ok());
    }

    #[test]
    fn test_middleware_without_raise_error_passes_error_statuses() {
        let middleware = Middleware::new([ResponseStage::Logger]);
        assert!(middleware.on_complete(&response(500)).is_ok());
    }

    #[test]
    fn test_middleware_equality_is_by_stages() {
        assert_eq!(
            Middleware::new([ResponseStage::RaiseError]),
            Middleware::default()
        );
        assert_ne!(
            Middleware::new([ResponseStage::Logger, ResponseStage::RaiseError]),
            Middleware::default()
        );
    }
}
