use std::sync::OnceLock;

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::LoginCommand;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::FieldRule;
use crate::inbound::http::validation::Schema;
use crate::inbound::http::validation::Validate;
use crate::inbound::http::validation::ValidatedJson;

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let command = LoginCommand {
        email: body.email,
        password: body.password,
    };

    state
        .account_service
        .login(command)
        .await
        .map_err(|e| match e {
            AccountError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            _ => ApiError::internal("Failed to login", e),
        })
        .map(|token| ApiSuccess::new(StatusCode::OK, "Login successful", LoginResponseData { token }))
}

/// Only presence and type are checked; a malformed email simply fails to match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl Validate for LoginRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new()
                .field("email", FieldRule::string())
                .field("password", FieldRule::string())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}
