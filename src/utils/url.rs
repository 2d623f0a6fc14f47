//! Endpoint validation for the calculation service URL.

use std::error::Error as StdError;
use std::fmt;

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// The value is not a URL at all.
    Invalid { value: String, reason: String },

    /// The URL uses something other than http or https.
    UnsupportedScheme { value: String, scheme: String },
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::Invalid { value, reason } => {
                write!(f, "invalid endpoint '{value}': {reason}")
            }
            EndpointError::UnsupportedScheme { value, scheme } => write!(
                f,
                "invalid endpoint '{value}': scheme '{scheme}' is not http or https"
            ),
        }
    }
}

impl StdError for EndpointError {}

/// Check that `raw` is an absolute http(s) URL and return it trimmed.
///
/// The path is kept exactly as given: the service is posted to the endpoint
/// itself, not to a path below it.
///
/// # Examples
///
/// ```
/// use fundbot::utils::url::validate_endpoint;
///
/// assert_eq!(
///     validate_endpoint("  https://fund.example/chat ").unwrap(),
///     "https://fund.example/chat"
/// );
/// assert!(validate_endpoint("ftp://fund.example/chat").is_err());
/// ```
pub fn validate_endpoint(raw: &str) -> Result<String, EndpointError> {
    let value = raw.trim();
    let url = Url::parse(value).map_err(|err| EndpointError::Invalid {
        value: value.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(value.to_string()),
        scheme => Err(EndpointError::UnsupportedScheme {
            value: value.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            validate_endpoint("https://ai-fund-bot.glitch.me/chat"),
            Ok("https://ai-fund-bot.glitch.me/chat".to_string())
        );
        assert_eq!(
            validate_endpoint("http://127.0.0.1:8080/chat/"),
            Ok("http://127.0.0.1:8080/chat/".to_string())
        );
    }

    #[test]
    fn rejects_relative_urls() {
        assert!(matches!(
            validate_endpoint("/chat"),
            Err(EndpointError::Invalid { .. })
        ));
        assert!(matches!(
            validate_endpoint(""),
            Err(EndpointError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_other_schemes() {
        let err = validate_endpoint("file:///etc/passwd").expect_err("file is not allowed");
        assert_eq!(
            err,
            EndpointError::UnsupportedScheme {
                value: "file:///etc/passwd".to_string(),
                scheme: "file".to_string(),
            }
        );
        assert!(err.to_string().contains("not http or https"));
    }
}
