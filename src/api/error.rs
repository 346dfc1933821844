//! API error type
//!
//! Errors produced by the transport and the resource converters. The CRUD
//! layer never inspects or rewraps these; they reach the caller as-is.

use thiserror::Error;

/// Longest error message shown to the user
const MAX_DISPLAY_CHARS: usize = 80;

/// Result alias used across the API layer
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API request failed: {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL or resource path could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Format an API error for display
/// Security: Maps status codes to generic messages so raw server bodies never reach the terminal
pub fn format_api_error(error: &ApiError) -> String {
    let message = match error.status() {
        Some(401) => "Authentication failed. Check your API token.",
        Some(403) => "Permission denied. You cannot access this resource.",
        Some(404) => "Resource not found.",
        Some(409) => "Resource conflict. The resource may have been modified.",
        Some(429) => "Rate limit exceeded. Please try again later.",
        Some(400) => "Invalid request. Check your parameters.",
        Some(500) | Some(503) => "Server temporarily unavailable. Please try again.",
        Some(_) => "Request failed. Check your network connection and try again.",
        None => return truncate_for_display(&error.to_string()),
    };
    message.to_string()
}

/// Truncate long error messages and drop non-printable characters
fn truncate_for_display(error_str: &str) -> String {
    let printable: Vec<char> = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();

    if printable.len() > MAX_DISPLAY_CHARS {
        let kept: String = printable[..MAX_DISPLAY_CHARS].iter().collect();
        format!("{}...", kept)
    } else {
        printable.into_iter().collect()
    }
}
