use std::collections::BTreeSet;
use std::sync::Arc;

use auth::TokenService;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::account::models::AccountId;
use crate::domain::account::models::Role;
use crate::inbound::http::handlers::ApiError;

pub const NO_TOKEN_MESSAGE: &str = "Access denied. No token provided.";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
pub const INSUFFICIENT_ROLE_MESSAGE: &str = "Access denied. Insufficient permissions.";

/// Identity attached to request extensions once a request is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: AccountId,
    pub role: Role,
}

/// Per-route authorization policy: a token verifier plus the roles allowed through.
///
/// Built at route registration:
///
/// ```ignore
/// RoleGuard::new(token_service).allow(Role::User)
/// ```
///
/// An empty allow-list denies every authenticated caller.
#[derive(Clone)]
pub struct RoleGuard {
    token_service: Arc<TokenService>,
    allowed_roles: Arc<BTreeSet<Role>>,
}

impl RoleGuard {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self {
            token_service,
            allowed_roles: Arc::new(BTreeSet::new()),
        }
    }

    pub fn allow(mut self, role: Role) -> Self {
        Arc::make_mut(&mut self.allowed_roles).insert(role);
        self
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    /// Decide a request from its headers.
    ///
    /// Missing token → 401, unverifiable token → 401, role outside the
    /// allow-list (known or not) → 403.
    pub fn check(&self, headers: &HeaderMap) -> Result<AuthenticatedAccount, ApiError> {
        let token = bearer_token(headers).ok_or_else(|| {
            tracing::debug!("Request without bearer token");
            ApiError::Unauthorized(NO_TOKEN_MESSAGE.to_string())
        })?;

        let identity = self.token_service.verify(token).map_err(|e| {
            tracing::warn!(error = %e, "Token verification failed");
            invalid_token()
        })?;

        let id = AccountId::from_string(&identity.subject).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not an account id");
            invalid_token()
        })?;

        // Unknown roles are never on the allow-list.
        let role = match identity.role.parse::<Role>() {
            Ok(role) if self.allows(role) => role,
            _ => {
                tracing::warn!(
                    account_id = %id,
                    role = %identity.role,
                    "Access denied, role not allowed"
                );
                return Err(insufficient_role());
            }
        };

        Ok(AuthenticatedAccount { id, role })
    }
}

/// Middleware enforcing a [`RoleGuard`]. A denied request never reaches `next`.
pub async fn authorize(
    State(guard): State<RoleGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let account = guard.check(req.headers())?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

fn invalid_token() -> ApiError {
    ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
}

fn insufficient_role() -> ApiError {
    ApiError::Forbidden(INSUFFICIENT_ROLE_MESSAGE.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
