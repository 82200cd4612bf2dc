use axum::{Json, extract::FromRequest};
use serde::Serialize;

use crate::error::AppError;

use crate::result::ApiResponse;

pub mod token;

pub use token::{TokenClaims, TokenIssuer, TokenPair};

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

/// `Json` body extractor whose rejections come back in the response envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Generates a fresh entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_field(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const INVALID_CODE: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const ALREADY_EXISTS: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const UNAVAILABLE: i32 = 5003;
}
