//! Error handling for the HTTP layer
//!
//! Every failure a handler can produce is an [`AppError`]. Rendering happens in
//! two steps: `into_response` writes the public JSON body and attaches an
//! [`ErrorReport`] extension, then the [`expose_stack`] middleware decides,
//! once per response, whether the report's stack is added to the body.

use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inout_kernel::settings::Environment;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: String) -> Self {
        Self {
            kind: "error",
            status: status.as_u16(),
            message,
            stack: None,
        }
    }
}

/// Response extension carrying what the stack responder needs.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub body: ErrorBody,
    pub stack: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    BadInput { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Request Timeout")]
    RequestTimeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("Not Found")]
    RouteNotFound,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Malformed or invalid request shape
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: "Unauthorized".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadInput { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to clients; internal causes stay in the stack.
    fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    fn stack(&self) -> String {
        let kind = match self {
            AppError::BadInput { .. } => "BadInput",
            AppError::Unauthorized { .. } => "Unauthorized",
            AppError::NotFound { .. } => "NotFound",
            AppError::Conflict { .. } => "Conflict",
            AppError::RequestTimeout => "RequestTimeout",
            AppError::Internal(_) => "InternalError",
            AppError::RouteNotFound => "RouteNotFound",
        };
        match self {
            // anyhow's Debug output lists the cause chain
            AppError::Internal(cause) => format!("{kind}: {cause:?}"),
            other => format!("{kind}: {other}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let status = self.status();
        let stack = self.stack();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %stack,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                error = %stack,
                "Request rejected"
            );
        }

        let body = ErrorBody::new(status, self.public_message());
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(ErrorReport { body, stack });
        response
    }
}

/// Whether error bodies carry the `stack` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackTraces {
    Expose,
    Hide,
}

impl StackTraces {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_development() {
            StackTraces::Expose
        } else {
            StackTraces::Hide
        }
    }
}

/// Terminal error responder, installed with `map_response_with_state`.
pub async fn expose_stack(State(mode): State<StackTraces>, mut response: Response) -> Response {
    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };
    if mode == StackTraces::Hide {
        return response;
    }

    let body = ErrorBody {
        stack: Some(report.stack),
        ..report.body
    };
    match serde_json::to_vec(&body) {
        Ok(bytes) => *response.body_mut() = Body::from(bytes),
        Err(err) => tracing::warn!(error = %err, "failed to render error stack"),
    }
    response
}

/// Render the timeout layer's bare 408 as an error body.
pub async fn timeout_as_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && response.extensions().get::<ErrorReport>().is_none()
    {
        return AppError::RequestTimeout.into_response();
    }
    response
}

/// Fallback for unmatched paths and methods
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware::map_response_with_state, routing::get, Router};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::bad_input("Bad Request").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::not_found("Book not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::conflict("dup").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::RequestTimeout.status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::bad_input("Input must be a number").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<ErrorReport>().is_some());

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "type": "error",
                "status": 400,
                "message": "Input must be a number"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let cause = anyhow::anyhow!("Database connection failed");
        let response = AppError::Internal(cause).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let report = response.extensions().get::<ErrorReport>().cloned().unwrap();
        assert!(report.stack.contains("Database connection failed"));

        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal Server Error");
    }

    fn failing_router(mode: StackTraces) -> Router {
        Router::new()
            .route(
                "/fail",
                get(|| async { AppError::not_found("Book not found") }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(map_response_with_state(mode, expose_stack))
    }

    #[tokio::test]
    async fn test_stack_exposed_when_enabled() {
        let response = failing_router(StackTraces::Expose)
            .oneshot(
                axum::http::Request::get("/fail")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Book not found");
        assert_eq!(body["stack"], "NotFound: Book not found");
    }

    #[tokio::test]
    async fn test_stack_hidden_when_disabled() {
        let response = failing_router(StackTraces::Hide)
            .oneshot(
                axum::http::Request::get("/fail")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_success_responses_pass_through() {
        let response = failing_router(StackTraces::Expose)
            .oneshot(axum::http::Request::get("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");
    }

    #[tokio::test]
    async fn test_bare_timeout_becomes_error_body() {
        let bare = Response::builder()
            .status(StatusCode::REQUEST_TIMEOUT)
            .body(Body::empty())
            .unwrap();

        let response = timeout_as_error(bare).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.extensions().get::<ErrorReport>().is_some());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"type": "error", "status": 408, "message": "Request Timeout"})
        );
    }

    #[test]
    fn test_stack_mode_follows_environment() {
        assert_eq!(
            StackTraces::for_environment(Environment::Development),
            StackTraces::Expose
        );
        assert_eq!(
            StackTraces::for_environment(Environment::Production),
            StackTraces::Hide
        );
    }
}
