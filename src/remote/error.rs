use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unauthorized - check the API key")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl RemoteError {
    /// Truncate a response body to avoid logging excessive data. The cut
    /// must land on a char boundary or the slice panics on multi-byte text.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => RemoteError::Unauthorized,
            403 => RemoteError::AccessDenied(truncated),
            404 => RemoteError::NotFound(truncated),
            409 => RemoteError::Conflict(truncated),
            429 => RemoteError::RateLimited,
            500..=599 => RemoteError::ServerError(truncated),
            _ => RemoteError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Short stable code carried in sink event details.
    pub fn code(&self) -> &'static str {
        match self {
            RemoteError::Unauthorized => "unauthorized",
            RemoteError::AccessDenied(_) => "access_denied",
            RemoteError::NotFound(_) => "not_found",
            RemoteError::Conflict(_) => "conflict",
            RemoteError::RateLimited => "rate_limited",
            RemoteError::ServerError(_) => "server_error",
            RemoteError::Network(_) => "network",
            RemoteError::InvalidResponse(_) => "invalid_response",
        }
    }
}
