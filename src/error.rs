//! Error types for the Datadog API client.
//!
//! This module contains the configuration error type raised while turning a
//! [`DatadogConfig`](crate::DatadogConfig) into a live transport agent.
//!
//! Configuration values themselves are never validated when they are set:
//! a malformed endpoint or proxy only surfaces once an agent is built from it.
//!
//! # Example
//!
//! ```rust
//! use datadog_api::ConfigError;
//!
//! let error = ConfigError::InvalidProxy {
//!     url: "not a url".to_string(),
//! };
//! assert!(error.to_string().contains("not a url"));
//! ```

use thiserror::Error;

/// Errors that can occur while building a transport agent from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured proxy could not be parsed as a URL.
    #[error("Invalid proxy URL '{url}'. Please provide a valid URL with scheme (e.g., 'http://proxy.example.com:8080').")]
    InvalidProxy {
        /// The proxy value that was configured.
        url: String,
    },

    /// A default header name or value is not valid HTTP.
    #[error("Invalid value for default header '{name}'.")]
    InvalidHeader {
        /// The header that could not be encoded.
        name: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP agent: {0}")]
    Agent(#[source] reqwest::Error),

    /// An operation requires both an API key and an application key.
    ///
    /// No client operation currently raises this; it is kept so callers can
    /// match on it once application-level authentication is supported.
    #[error("Both api_key and application_key are required for this operation.")]
    ApplicationCredentialsRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_error_message() {
        let error = ConfigError::InvalidProxy {
            url: "::bad::".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("::bad::"));
        assert!(message.contains("Invalid proxy URL"));
    }

    #[test]
    fn test_invalid_header_error_message() {
        let error = ConfigError::InvalidHeader {
            name: "user-agent".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for default header 'user-agent'."
        );
    }

    #[test]
    fn test_application_credentials_required_message() {
        let error = ConfigError::ApplicationCredentialsRequired;
        assert!(error.to_string().contains("api_key"));
        assert!(error.to_string().contains("application_key"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::ApplicationCredentialsRequired;
        let _: &dyn std::error::Error = &error;
    }
}
