use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes the search endpoint reports in its `{"error": ...}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    InvalidQuery,
    QueryRequired,
    RateLimitExceeded,
    NotFound,
    InternalError,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::QueryRequired => "query_required",
            ErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            ErrorCode::NotFound => "not_found",
            ErrorCode::InternalError => "internal_error",
            ErrorCode::Unknown => "unknown",
        }
    }
}

/// Body of a non-2xx response from the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", error.as_str())]
pub struct ApiError {
    pub error: ErrorCode,
}

impl ApiError {
    pub fn new(error: ErrorCode) -> Self {
        Self { error }
    }
}
