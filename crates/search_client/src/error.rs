use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// Outcome of a failed `/search` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Superseded by a newer dispatch. Never surfaced to the user.
    #[error("request cancelled")]
    Cancelled,
    #[error("HTTP {status}{}", .api.as_ref().map(|a| format!(": {a}")).unwrap_or_default())]
    Http { status: u16, api: Option<ApiError> },
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl SearchError {
    pub fn http(status: u16, api: Option<ApiError>) -> Self {
        // An unrecognised code adds nothing over the status.
        let api = api.filter(|a| a.error != ErrorCode::Unknown);
        SearchError::Http { status, api }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::Cancelled => ErrorCategory::Cancelled,
            SearchError::Http { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                429 => ErrorCategory::RateLimited,
                400..=499 => ErrorCategory::Validation,
                _ => ErrorCategory::Server,
            },
            SearchError::Timeout | SearchError::Transport(_) => ErrorCategory::Transport,
            SearchError::Decode(_) => ErrorCategory::Decode,
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_decode() {
            SearchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            SearchError::http(status.as_u16(), None)
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode(format!("malformed search response: {err}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Cancelled,
    Auth,
    RateLimited,
    Validation,
    Server,
    Transport,
    Decode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_message_reflects_status_and_server_code() {
        assert_eq!(SearchError::http(500, None).to_string(), "HTTP 500");
        assert_eq!(
            SearchError::http(401, Some(ApiError::new(ErrorCode::Unauthorized))).to_string(),
            "HTTP 401: unauthorized"
        );
        assert_eq!(
            SearchError::http(404, Some(ApiError::new(ErrorCode::Unknown))).to_string(),
            "HTTP 404"
        );
    }

    #[test]
    fn classifies_failures() {
        assert_eq!(SearchError::http(403, None).category(), ErrorCategory::Auth);
        assert_eq!(SearchError::http(429, None).category(), ErrorCategory::RateLimited);
        assert_eq!(SearchError::http(400, None).category(), ErrorCategory::Validation);
        assert_eq!(SearchError::http(502, None).category(), ErrorCategory::Server);
        assert_eq!(SearchError::Timeout.category(), ErrorCategory::Transport);
        assert_eq!(
            SearchError::Decode("bad".into()).category(),
            ErrorCategory::Decode
        );
        assert!(SearchError::Cancelled.is_cancelled());
    }
}
