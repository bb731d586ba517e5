//! Schema validation for inbound JSON payloads.
//!
//! A [`Schema`] maps field names to [`FieldRule`]s. Validation reports every
//! violation at once and returns a payload holding only the declared fields,
//! which is then deserialized into the request type. [`ValidatedJson`] wires
//! this into axum so handlers only ever see checked input.

use async_trait::async_trait;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::inbound::http::handlers::ApiError;

/// One failed check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation failed with {} violation(s)", .0.len())]
    Violations(Vec<Violation>),

    /// The schema accepted a payload the target type cannot represent.
    #[error("Schema does not match target type: {0}")]
    Schema(String),
}

#[derive(Debug, Clone)]
enum Constraint {
    MinLength { min: usize, message: String },
    Email { message: String },
    OneOf { allowed: Vec<String>, message: String },
}

impl Constraint {
    fn check(&self, value: &str) -> Option<&str> {
        let passes = match self {
            Constraint::MinLength { min, .. } => value.chars().count() >= *min,
            Constraint::Email { .. } => email_address::EmailAddress::is_valid(value),
            Constraint::OneOf { allowed, .. } => allowed.iter().any(|a| a == value),
        };

        if passes {
            None
        } else {
            Some(match self {
                Constraint::MinLength { message, .. }
                | Constraint::Email { message }
                | Constraint::OneOf { message, .. } => message,
            })
        }
    }
}

/// Rules for a single string field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    required: bool,
    constraints: Vec<Constraint>,
}

impl FieldRule {
    /// A required string field.
    pub fn string() -> Self {
        Self {
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Allow the field to be absent or null.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::MinLength {
            min,
            message: message.into(),
        });
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Email {
            message: message.into(),
        });
        self
    }

    pub fn one_of<I, S>(mut self, allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(Constraint::OneOf {
            allowed: allowed.into_iter().map(Into::into).collect(),
            message: message.into(),
        });
        self
    }

    fn check(&self, field: &str, value: Option<&Value>, violations: &mut Vec<Violation>) {
        match value {
            None | Some(Value::Null) if !self.required => {}
            None => violations.push(Violation::new(field, "Required")),
            Some(Value::String(s)) => violations.extend(
                self.constraints
                    .iter()
                    .filter_map(|c| c.check(s))
                    .map(|message| Violation::new(field, message)),
            ),
            Some(other) => violations.push(Violation::new(
                field,
                format!("Expected string, received {}", json_type_name(other)),
            )),
        }
    }
}

/// Field name to rule mapping, checked in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    /// Check a payload against every rule.
    ///
    /// # Returns
    /// The payload reduced to declared, present, non-null fields
    ///
    /// # Errors
    /// All violations found, in field declaration order
    pub fn validate(&self, payload: &Value) -> Result<Value, Vec<Violation>> {
        let Value::Object(object) = payload else {
            return Err(vec![Violation::new(
                "body",
                format!("Expected object, received {}", json_type_name(payload)),
            )]);
        };

        let mut violations = Vec::new();
        let mut validated = Map::new();

        for (name, rule) in &self.fields {
            let value = object.get(name);
            rule.check(name, value, &mut violations);

            if let Some(value) = value.filter(|v| !v.is_null()) {
                validated.insert(name.clone(), value.clone());
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(validated))
        } else {
            Err(violations)
        }
    }

    /// Validate then deserialize into `T`.
    pub fn parse<T: DeserializeOwned>(&self, payload: &Value) -> Result<T, ValidationError> {
        let validated = self.validate(payload).map_err(ValidationError::Violations)?;
        serde_json::from_value(validated).map_err(|e| ValidationError::Schema(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Request payloads that carry their own schema.
pub trait Validate: DeserializeOwned {
    fn schema() -> &'static Schema;
}

/// JSON body extractor that runs the payload's schema before the handler.
///
/// Rejections: malformed JSON is a 400, violations are a 400 listing every
/// violation, and a schema/type mismatch is a generic 500.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        match T::schema().parse::<T>(&payload) {
            Ok(value) => Ok(ValidatedJson(value)),
            Err(ValidationError::Violations(violations)) => {
                tracing::debug!(violations = violations.len(), "Payload rejected by schema");
                Err(ApiError::ValidationFailed(violations))
            }
            Err(e) => Err(ApiError::internal("Unexpected validation error", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .field("name", FieldRule::string().min_length(1, "Name is required"))
            .field("email", FieldRule::string().email("Invalid email address"))
            .field(
                "password",
                FieldRule::string().min_length(6, "Password must be at least 6 characters long"),
            )
            .field(
                "role",
                FieldRule::string()
                    .optional()
                    .one_of(["USER", "ADMIN"], "Invalid role"),
            )
    }

    #[test]
    fn test_valid_payload_strips_unknown_fields() {
        let validated = schema()
            .validate(&json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "secret1",
                "isAdmin": true
            }))
            .unwrap();

        assert_eq!(
            validated,
            json!({ "name": "Jane", "email": "jane@example.com", "password": "secret1" })
        );
    }

    #[test]
    fn test_reports_every_violation() {
        let violations = schema()
            .validate(&json!({
                "name": "",
                "email": "nope",
                "password": "ab",
                "role": "ROOT"
            }))
            .unwrap_err();

        assert_eq!(
            violations,
            vec![
                Violation::new("name", "Name is required"),
                Violation::new("email", "Invalid email address"),
                Violation::new("password", "Password must be at least 6 characters long"),
                Violation::new("role", "Invalid role"),
            ]
        );
    }

    #[test]
    fn test_only_failing_field_reported() {
        let violations = schema()
            .validate(&json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "ab"
            }))
            .unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "password");
        assert!(violations[0].message.contains("at least 6"));
    }

    #[test]
    fn test_missing_and_mistyped_fields() {
        let violations = schema()
            .validate(&json!({ "name": 42, "password": null }))
            .unwrap_err();

        assert_eq!(
            violations,
            vec![
                Violation::new("name", "Expected string, received number"),
                Violation::new("email", "Required"),
                Violation::new("password", "Expected string, received null"),
            ]
        );
    }

    #[test]
    fn test_optional_field_accepts_null() {
        let validated = schema()
            .validate(&json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "secret1",
                "role": null
            }))
            .unwrap();

        assert!(validated.get("role").is_none());
    }

    #[test]
    fn test_min_length_counts_characters() {
        let schema = Schema::new().field("p", FieldRule::string().min_length(3, "short"));
        assert!(schema.validate(&json!({ "p": "äöü" })).is_ok());
    }

    #[test]
    fn test_non_object_payload() {
        let violations = schema().validate(&json!(["a"])).unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::new("body", "Expected object, received array")]
        );
    }

    #[test]
    fn test_parse_reports_schema_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsNumber {
            name: u32,
        }

        let schema = Schema::new().field("name", FieldRule::string());
        let result = schema.parse::<NeedsNumber>(&json!({ "name": "Jane" }));

        assert!(matches!(result, Err(ValidationError::Schema(_))));
    }
}
