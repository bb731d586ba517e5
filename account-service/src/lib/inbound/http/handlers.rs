use std::fmt;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::account::models::AccountProfile;
use crate::inbound::http::validation::Violation;

pub mod health;
pub mod list_users;
pub mod login;
pub mod register;

/// Successful reply, rendered as the success envelope.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::success(status, message.into(), data)),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn body(&self) -> &ApiResponseBody<T> {
        &self.1 .0
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failed reply, rendered as the failure envelope.
///
/// `InternalServerError` carries only the public message; build it through
/// [`ApiError::internal`] so the cause is logged and kept server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    ValidationFailed(Vec<Violation>),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    MethodNotAllowed(String),
    InternalServerError(String),
}

impl ApiError {
    /// Log an infrastructure failure and return a generic 500.
    pub fn internal(message: &str, cause: impl fmt::Display) -> Self {
        tracing::error!(error = %cause, "{}", message);
        ApiError::InternalServerError(message.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_body(self) -> ApiResponseBody<()> {
        let status = self.status();
        let (message, error) = match self {
            ApiError::ValidationFailed(violations) => (
                "Validation failed".to_string(),
                ErrorDetail::Violations(violations),
            ),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::InternalServerError(msg) => (msg.clone(), ErrorDetail::Message(msg)),
        };

        ApiResponseBody::failure(status, message, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.into_body())).into_response()
    }
}

/// Reply body shared by every endpoint.
///
/// Exactly one of `data` and `error` is present: `data` when `success` is
/// true, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseBody<T: Serialize> {
    success: bool,
    status_code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorDetail>,
    timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponseBody<T> {
    pub fn success(status_code: StatusCode, message: String, data: T) -> Self {
        Self {
            success: true,
            status_code: status_code.as_u16(),
            message,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponseBody<()> {
    pub fn failure(status_code: StatusCode, message: String, error: ErrorDetail) -> Self {
        Self {
            success: false,
            status_code: status_code.as_u16(),
            message,
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

/// Diagnostic detail of a failure: a message or the full list of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Violations(Vec<Violation>),
}

/// Account fields exposed over HTTP. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AccountProfile> for AccountData {
    fn from(account: &AccountProfile) -> Self {
        Self {
            id: account.id.to_string(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.as_str().to_string(),
            role: account.role.to_string(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use serde_json::Value;

    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let success = ApiSuccess::new(StatusCode::CREATED, "Created", json!({ "id": 1 }));
        let body = serde_json::to_value(success.body()).unwrap();

        assert_eq!(success.status(), StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["message"], "Created");
        assert_eq!(body["data"]["id"], 1);
        assert!(body.get("error").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_error_envelope_shape() {
        let error = ApiError::Unauthorized("Invalid email or password".to_string());
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);

        let body = serde_json::to_value(error.into_body()).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 401);
        assert_eq!(body["message"], "Invalid email or password");
        assert_eq!(body["error"], "Invalid email or password");
        assert!(body.get("data").is_none());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_validation_envelope_lists_violations() {
        let error = ApiError::ValidationFailed(vec![
            Violation::new("email", "Invalid email address"),
            Violation::new("password", "Password must be at least 6 characters long"),
        ]);

        let body = serde_json::to_value(error.into_body()).unwrap();

        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(
            body["error"],
            json!([
                { "field": "email", "message": "Invalid email address" },
                { "field": "password", "message": "Password must be at least 6 characters long" }
            ])
        );
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let error = ApiError::internal("Failed to login", "connection refused by 10.0.0.5");
        let body: Value = serde_json::to_value(error.into_body()).unwrap();

        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Failed to login");
        assert!(!body.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden(String::new()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound(String::new()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::MethodNotAllowed(String::new()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
