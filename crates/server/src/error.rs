use axum::{
    Json,
    extract::multipart::MultipartError,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use services::services::{catalog::CatalogError, submission::SubmissionError};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

pub const ADMIN_REALM: &str = r#"Basic realm="keeviqo-admin", charset="UTF-8""#;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Catalog(_) => (StatusCode::NOT_FOUND, "CatalogError"),
            ApiError::Submission(err) => match err {
                SubmissionError::MissingFeatureId | SubmissionError::MissingFile => {
                    (StatusCode::BAD_REQUEST, "SubmissionError")
                }
                SubmissionError::Database(_) | SubmissionError::Io(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "SubmissionError")
                }
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            ApiError::Multipart(err) => (err.status(), "MultipartError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };

        let error_message = if status_code.is_server_error() {
            error!(error_type, error = %self, "Request failed");
            "An internal error occurred. Please try again.".to_string()
        } else {
            self.to_string()
        };

        let mut response =
            (status_code, Json(ApiResponse::<()>::error(&error_message))).into_response();
        if status_code == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(ADMIN_REALM),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let not_found = ApiError::from(CatalogError::CategoryNotFound(4)).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing = ApiError::from(SubmissionError::MissingFeatureId).into_response();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let unauthorized = ApiError::Unauthorized.into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert!(unauthorized.headers().contains_key(header::WWW_AUTHENTICATE));

        let internal = ApiError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
