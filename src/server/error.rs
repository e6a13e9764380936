//! HTTP error responses.
//!
//! Store errors map onto exactly three outcomes: missing memos are 404,
//! malformed requests are 400, and everything else is a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::error::MemoError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] MemoError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::FormatError;
    use std::io;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(MemoError::not_found("2024-01-01-1"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_store_errors_map_to_500() {
        let io_err = ApiError::from(MemoError::io(
            "read",
            "2024-01-01-1",
            io::Error::new(io::ErrorKind::Other, "disk"),
        ));
        assert_eq!(io_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let format_err = ApiError::from(MemoError::Format {
            id: "2024-01-01-1".to_string(),
            source: FormatError::UnterminatedFrontmatter,
        });
        assert_eq!(format_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request() {
        let err = ApiError::BadRequest("No file received".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No file received");
    }

    #[test]
    fn test_message_passes_through_store_error() {
        let err = ApiError::from(MemoError::not_found("2024-01-01-7"));
        assert_eq!(err.to_string(), "Memo not found: 2024-01-01-7");
    }
}
