use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use inout_authz::{CredentialVerifier, Credentials};
use inout_http::error::{AppError, AppResult};
use inout_kernel::{settings::AuthSettings, InitCtx, Module};
use serde::Serialize;
use serde_json::{json, Value};

use crate::utils;

/// Placeholder login against a fixed credential pair.
pub struct AuthModule {
    verifier: Arc<CredentialVerifier>,
}

impl AuthModule {
    pub fn new(settings: &AuthSettings) -> Self {
        let reference = Credentials::new(settings.email.clone(), settings.password.clone());
        Self {
            verifier: Arc::new(CredentialVerifier::new(reference)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            target: "project.modules",
            prefix = %utils::log_prefix(self.name()),
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/login", post(login))
            .with_state(self.verifier.clone())
    }

    fn openapi(&self) -> Option<Value> {
        let error = json!({
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        });

        Some(json!({
            "paths": {
                "/login": {
                    "post": {
                        "summary": "Check credentials",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/LoginRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Authentication successful",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/LoginResponse" }
                                    }
                                }
                            },
                            "400": { "description": "Email or password missing", "content": error },
                            "401": { "description": "Credentials do not match", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "LoginRequest": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string" },
                            "password": { "type": "string" }
                        },
                        "required": ["email", "password"]
                    },
                    "LoginResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" }
                        },
                        "required": ["message"]
                    }
                }
            }
        }))
    }
}

/// Pull a string field out of the login body.
fn credential_field(body: &Value, field: &str) -> AppResult<String> {
    match body.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        other => {
            tracing::warn!(field, present = other.is_some(), "Bad Request: missing credential field");
            Err(AppError::bad_input("Bad Request"))
        }
    }
}

/// POST /api/login
async fn login(
    State(verifier): State<Arc<CredentialVerifier>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let body = utils::json_body(payload)?;
    let presented = Credentials::new(
        credential_field(&body, "email")?,
        credential_field(&body, "password")?,
    );

    verifier
        .verify(&presented)
        .map_err(|_| AppError::unauthorized())?;

    Ok(Json(LoginResponse {
        message: "Authentication successful",
    }))
}

/// Create a new instance of the auth module
pub fn create_module(settings: &AuthSettings) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(settings))
}
