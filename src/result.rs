use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint. `code` is 0 on success.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}
