//! Credential redaction for display and error messages.
//!
//! Two forms of redaction are provided:
//!
//! - [`mask`] replaces a known secret with asterisks, keeping only its tail
//!   visible. This is used when a client is formatted with `{:?}`.
//! - [`redact_url`] removes `api_key=...` and `application_key=...` query
//!   values from a URL before it is put into an error message or log line.
//!
//! # Example
//!
//! ```rust
//! use datadog_api::redact::{mask, redact_url};
//!
//! assert_eq!(mask("key=abcdef", "abcdef", 4), "key=****ef");
//! assert_eq!(
//!     redact_url("https://app.datadoghq.com/api/v1/validate?api_key=abc123"),
//!     "https://app.datadoghq.com/api/v1/validate?api_key=(redacted)"
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Number of leading API key characters hidden in debug output.
pub const API_KEY_MASKED_PREFIX: usize = 28;

/// Number of leading application key characters hidden in debug output.
pub const APPLICATION_KEY_MASKED_PREFIX: usize = 36;

/// Query parameter names whose values are removed by [`redact_url`].
pub const REDACTED_PARAMS: [&str; 2] = ["api_key", "application_key"];

static REDACTION_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    REDACTED_PARAMS
        .iter()
        .filter_map(|name| {
            Regex::new(&format!(r"{name}=\S+"))
                .ok()
                .map(|re| (*name, re))
        })
        .collect()
});

/// Replaces every occurrence of `secret` in `text` with a masked form.
///
/// The masked form is `masked_prefix` asterisks followed by the characters of
/// `secret` beyond that prefix. A secret shorter than the prefix is masked
/// completely, so the output always has the same length as the input.
///
/// Returns `text` unchanged if `secret` is empty.
#[must_use]
pub fn mask(text: &str, secret: &str, masked_prefix: usize) -> String {
    if secret.is_empty() {
        return text.to_string();
    }

    let hidden = secret.chars().count().min(masked_prefix);
    let tail: String = secret.chars().skip(hidden).collect();
    let masked = format!("{}{tail}", "*".repeat(hidden));

    text.replace(secret, &masked)
}

/// Replaces `api_key=<value>` and `application_key=<value>` in `url` with
/// `<name>=(redacted)`.
///
/// The value is the whole run of non-whitespace characters after `=`, so any
/// parameters that follow a credential in the same query string are removed
/// along with it.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let mut redacted = url.to_string();
    for (name, pattern) in REDACTION_PATTERNS.iter() {
        if redacted.contains(name) {
            redacted = pattern
                .replace_all(&redacted, format!("{name}=(redacted)").as_str())
                .into_owned();
        }
    }
    redacted
}
