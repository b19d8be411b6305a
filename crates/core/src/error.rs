use serde::Serialize;
use thiserror::Error;

/// Failures the meta endpoint reports to addon clients.
///
/// Stream and catalog requests answer empty lists instead.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Upstream(_) => "upstream_error",
        }
    }

    /// 404 for a missing item, 502 when Jellyfin could not be asked.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Upstream(_) => 502,
        }
    }
}

/// `{ "error": { "code", "message", "details" } }`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code(),
                message: e.to_string(),
                details: serde_json::Map::new(),
            },
        }
    }
}
