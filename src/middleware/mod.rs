mod auth;
mod error_handler;

pub use auth::{authenticate, current_user};
pub use error_handler::log_errors;
