//! Project-specific utilities live here.

use axum::{extract::rejection::JsonRejection, Json};
use inout_http::error::{AppError, AppResult};
use serde_json::Value;

/// Formats a shared log prefix for project logs.
pub fn log_prefix(module: &str) -> String {
    format!("project::{module}")
}

/// Unwrap a JSON body; unreadable or non-JSON bodies are a bad request.
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::warn!(reason = %rejection.body_text(), "Bad Request: unreadable JSON body");
        AppError::bad_input("Bad Request")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_prefix_names_the_module() {
        assert_eq!(log_prefix("books"), "project::books");
    }
}
