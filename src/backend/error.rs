use thiserror::Error;

/// Failure of a single backend request.
///
/// `Status` carries the response body verbatim so callers can surface the
/// server's own message (e.g. "Already enrolled").
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    Url(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for a toast; falls back when the server answered with an empty body.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { body, .. } if body.trim().is_empty() => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_body_verbatim() {
        let err = ApiError::Status { status: 409, body: "Already enrolled".into() };
        assert_eq!(err.to_string(), "Already enrolled");
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message("Failed to enroll"), "Already enrolled");
    }

    #[test]
    fn empty_body_falls_back_to_caller_message() {
        let err = ApiError::Status { status: 404, body: "  ".into() };
        assert_eq!(err.user_message("Unenroll not supported"), "Unenroll not supported");
        assert_eq!(ApiError::Network("refused".into()).status(), None);
    }
}
