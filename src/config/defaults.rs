//! Hardcoded defaults and their environment variable overrides.

use crate::clients::SDK_VERSION;

/// Default Datadog host.
pub const DATADOG_HOST: &str = "https://app.datadoghq.com";

/// Path of the API below the host.
pub const API_PATH: &str = "/api/v1";

/// Default media type for the `Accept` header.
pub const MEDIA_TYPE: &str = "application/json";

/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "DATADOG_API_KEY";
/// Environment variable for the application key.
pub const ENV_APP_KEY: &str = "DATADOG_APP_KEY";
/// Environment variable for the API host.
pub const ENV_HOST: &str = "DATADOG_HOST";
/// Environment variable for the full API endpoint.
pub const ENV_API_ENDPOINT: &str = "DATADOG_API_ENDPOINT";
/// Environment variable for the default media type.
pub const ENV_MEDIA_TYPE: &str = "DATADOG_MEDIA_TYPE";
/// Environment variable for the proxy URL.
pub const ENV_PROXY: &str = "DATADOG_PROXY";
/// Environment variable for the user agent.
pub const ENV_USER_AGENT: &str = "DATADOG_USER_AGENT";

/// Default `User-Agent` header value.
#[must_use]
pub fn user_agent() -> String {
    format!("Datadog API Rust Library v{SDK_VERSION}")
}

/// Raw default values resolved from a variable lookup.
///
/// `DATADOG_API_ENDPOINT` takes precedence over `DATADOG_HOST`; when only the
/// host is set the endpoint is `<host>/api/v1`. Empty values count as unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Defaults {
    pub api_endpoint: String,
    pub api_key: Option<String>,
    pub application_key: Option<String>,
    pub default_media_type: String,
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Defaults {
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let host = var(ENV_HOST).unwrap_or_else(|| DATADOG_HOST.to_string());
        let api_endpoint = var(ENV_API_ENDPOINT)
            .unwrap_or_else(|| format!("{}{API_PATH}", host.trim_end_matches('/')));

        Self {
            api_endpoint,
            api_key: var(ENV_API_KEY),
            application_key: var(ENV_APP_KEY),
            default_media_type: var(ENV_MEDIA_TYPE).unwrap_or_else(|| MEDIA_TYPE.to_string()),
            proxy: var(ENV_PROXY),
            user_agent: var(ENV_USER_AGENT).unwrap_or_else(user_agent),
        }
    }
}
