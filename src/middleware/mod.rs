mod auth;
mod error_handler;

pub use auth::{AccessGate, auth_middleware};
pub use error_handler::log_errors;
