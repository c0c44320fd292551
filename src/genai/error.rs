//! Error taxonomy for the generative text/image services.
//!
//! Every failure ends up as a [`GenAiError`]; [`GenAiError::user_message`]
//! maps it to the text shown in the error banner.  Rate-limit and
//! environment problems get friendly wording, structured service
//! payloads (`{"error":{"message":…}}`) are unwrapped, anything else
//! surfaces its raw message.

use thiserror::Error;

// ---------------------------------------------------------------------------
// GenAiError
// ---------------------------------------------------------------------------

/// Errors returned by the text and image generation clients.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// The service rejected the request for rate/quota reasons
    /// (HTTP 429 or a `RESOURCE_EXHAUSTED` status in the payload).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request could not be carried out in this environment at all
    /// (connection refused, TLS/proxy trouble, client build failure).
    #[error("environment compatibility problem: {0}")]
    Compat(String),

    /// The service returned a structured error payload; `0` is its
    /// `error.message` field.
    #[error("API error: {0}")]
    Api(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Any other HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The HTTP response could not be parsed as the expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The service answered successfully but with no usable content.
    #[error("service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenAiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenAiError::Timeout
        } else if e.is_connect() || e.is_builder() {
            GenAiError::Compat(e.to_string())
        } else {
            GenAiError::Request(e.to_string())
        }
    }
}

impl GenAiError {
    /// Classify a non-success HTTP response body.
    ///
    /// Order matters: rate limiting is recognised first (status code or
    /// `RESOURCE_EXHAUSTED` marker), then a structured
    /// `{"error":{"message":…}}` payload, then the raw body.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED")
        {
            return GenAiError::RateLimited(format!("HTTP {status}"));
        }
        if let Some(message) = extract_api_message(body) {
            return GenAiError::Api(message);
        }
        let detail = if body.trim().is_empty() {
            status.to_string()
        } else {
            format!("{status}: {body}")
        };
        GenAiError::Request(detail)
    }

    /// The text shown to the user in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            GenAiError::RateLimited(_) => "The request rate is too high, which can happen with \
                 longer explanations. Please wait a moment and try again, or try a shorter prompt."
                .to_string(),
            GenAiError::Compat(detail) => format!(
                "Environment compatibility issue: your network or proxy may not support the \
                 requests this application needs. (Technical details: {detail})"
            ),
            GenAiError::Api(message) => format!("API Error: {message}"),
            other => other.to_string(),
        }
    }
}

/// Pull `error.message` out of a JSON error payload, if present.
///
/// The payload may be the whole body or embedded in surrounding text, so
/// the first `{ … }` span is tried as JSON, mirroring how services wrap
/// their structured errors in transport messages.
fn extract_api_message(body: &str) -> Option<String> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    let json: serde_json::Value = serde_json::from_str(&body[start..=end]).ok()?;
    json["error"]["message"].as_str().map(|s| s.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
