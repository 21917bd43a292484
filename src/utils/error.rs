use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    UploadError(String),
    NotFound(String),
    InvalidId(String),
    InvalidRequest(String),
    UnsupportedFileType(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::UploadError(msg) => write!(f, "Upload error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidId(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "{}", msg),
            AppError::UnsupportedFileType(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Every per-request error is translated here into an HTTP status plus a
/// `{"message": ...}` body; nothing bubbles past the handler boundary.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) | AppError::UploadError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidId(_)
            | AppError::InvalidRequest(_)
            | AppError::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::NotFound("User not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidId("Invalid user ID".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidRequest("bad body".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedFileType("Only image files are allowed".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::UploadError("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn client_facing_messages_are_unprefixed() {
        assert_eq!(
            AppError::NotFound("User not found".into()).to_string(),
            "User not found"
        );
        assert_eq!(
            AppError::DatabaseError("boom".into()).to_string(),
            "Database error: boom"
        );
    }
}
