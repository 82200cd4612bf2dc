use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::CacheError;
use crate::database::StoreError;
use crate::utils::error_codes;
use crate::utils::error_to_api_response;
use crate::utils::token::TokenError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("code is invalid or expired")]
    InvalidOrExpiredCode,
    #[error("code is incorrect")]
    InvalidCode,
    #[error("an account with this phone number already exists")]
    AccountAlreadyExists,
    #[error("{0}")]
    Validation(String),
    #[error("authorization required")]
    Unauthorized,
    #[error("invalid token: {0}")]
    InvalidToken(#[source] TokenError),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
    #[error("token issuance failed: {0}")]
    TokenIssuance(#[source] TokenError),
    #[error("verification unavailable: {0}")]
    VerificationUnavailable(#[from] CacheError),
    #[error("request cancelled")]
    Cancelled,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::InvalidOrExpiredCode | AppError::InvalidCode => {
                (StatusCode::BAD_REQUEST, error_codes::INVALID_CODE)
            }
            AppError::AccountAlreadyExists => (StatusCode::BAD_REQUEST, error_codes::USER_EXISTS),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::Unauthorized | AppError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED)
            }
            AppError::Persistence(StoreError::AlreadyExists(_)) => {
                (StatusCode::BAD_REQUEST, error_codes::ALREADY_EXISTS)
            }
            AppError::Persistence(StoreError::ReferenceNotFound(_)) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
            }
            AppError::Persistence(StoreError::NotFound(_) | StoreError::RowsAffectedZero(_)) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND)
            }
            AppError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, error_codes::UNAVAILABLE),
            AppError::Persistence(StoreError::Database(_))
            | AppError::TokenIssuance(_)
            | AppError::VerificationUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }

    /// Message safe to show to the caller; storage details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Persistence(StoreError::Database(_)) | AppError::TokenIssuance(_) => {
                "internal server error".to_string()
            }
            AppError::VerificationUnavailable(_) => "failed to check verification code".to_string(),
            AppError::InvalidToken(_) => "invalid token".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, error_to_api_response::<()>(code, self.public_message())).into_response()
    }
}
