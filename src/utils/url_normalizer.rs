//! URL normalization and validation.
//!
//! Inputs without an explicit scheme are treated as HTTPS. Only absolute
//! `http`/`https` URLs with a host are accepted.

use url::Url;

/// Scheme prepended to inputs that do not carry one.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Reasons a URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedProtocol(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Normalizes raw input into the form that is validated and stored.
///
/// Surrounding whitespace is trimmed and, if the input has no `://`,
/// `https://` is prepended. The result is otherwise left untouched, so
/// normalization is idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("example.com/page"), "https://example.com/page");
/// assert_eq!(normalize("http://example.com"), "http://example.com");
/// ```
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    }
}

/// Validates an already normalized URL.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for empty input
/// - [`UrlValidationError::InvalidFormat`] if the URL does not parse
/// - [`UrlValidationError::UnsupportedProtocol`] for schemes other than http/https
/// - [`UrlValidationError::MissingHost`] if the host component is empty
pub fn validate(url: &str) -> Result<(), UrlValidationError> {
    if url.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedProtocol(other.to_string())),
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Normalizes `input` and validates the result.
///
/// Returns the normalized URL, ready to be persisted.
pub fn normalize_and_validate(input: &str) -> Result<String, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let normalized = normalize(input);
    validate(&normalized)?;
    Ok(normalized)
}

/// Returns true if `input` is acceptable after normalization.
pub fn is_valid(input: &str) -> bool {
    normalize_and_validate(input).is_ok()
}
