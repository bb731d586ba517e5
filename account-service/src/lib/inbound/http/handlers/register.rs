use std::str::FromStr;
use std::sync::OnceLock;

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::RoleError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterAccountCommand;
use crate::domain::account::models::Registration;
use crate::domain::account::models::Role;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::FieldRule;
use crate::inbound::http::validation::Schema;
use crate::inbound::http::validation::Validate;
use crate::inbound::http::validation::ValidatedJson;
use crate::inbound::http::validation::Violation;

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(|e| match e {
            AccountError::EmailAlreadyExists(_) => {
                ApiError::BadRequest("User already exists".to_string())
            }
            _ => ApiError::internal("Failed to register user", e),
        })
        .map(|ref registration| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully",
                registration.into(),
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: Option<String>,
}

impl Validate for RegisterRequest {
    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let roles = Role::ALL.map(|role| role.as_str());
            Schema::new()
                .field(
                    "firstName",
                    FieldRule::string().min_length(1, "First name is required"),
                )
                .field(
                    "lastName",
                    FieldRule::string().min_length(1, "Last name is required"),
                )
                .field("email", FieldRule::string().email("Invalid email address"))
                .field(
                    "password",
                    FieldRule::string().min_length(6, "Password must be at least 6 characters long"),
                )
                .field(
                    "role",
                    FieldRule::string()
                        .optional()
                        .one_of(roles, format!("Role must be one of: {}", roles.join(", "))),
                )
        })
    }
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email address")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Role(#[from] RoleError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterAccountCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let role = self.role.as_deref().map(Role::from_str).transpose()?;

        Ok(RegisterAccountCommand {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            password: self.password,
            role,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        let field = match err {
            ParseRegisterRequestError::Email(_) => "email",
            ParseRegisterRequestError::Role(_) => "role",
        };
        ApiError::ValidationFailed(vec![Violation::new(field, err.to_string())])
    }
}

/// Registered account fields plus its first access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    #[serde(flatten)]
    pub account: AccountData,
    pub token: String,
}

impl From<&Registration> for RegisterResponseData {
    fn from(registration: &Registration) -> Self {
        Self {
            account: (&registration.account).into(),
            token: registration.token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_schema_accepts_valid_payload() {
        let request: RegisterRequest = RegisterRequest::schema()
            .parse(&json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "password": "secret1"
            }))
            .unwrap();

        let command = request.try_into_command().unwrap();
        assert_eq!(command.email.as_str(), "jane@example.com");
        assert_eq!(command.role, None);
    }

    #[test]
    fn test_schema_rejects_unknown_role() {
        let violations = RegisterRequest::schema()
            .validate(&json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "password": "secret1",
                "role": "ROOT"
            }))
            .unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "role");
        assert_eq!(violations[0].message, "Role must be one of: USER, ADMIN");
    }

    #[test]
    fn test_explicit_role_parsed() {
        let request: RegisterRequest = RegisterRequest::schema()
            .parse(&json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "password": "secret1",
                "role": "ADMIN"
            }))
            .unwrap();

        assert_eq!(request.try_into_command().unwrap().role, Some(Role::Admin));
    }
}
