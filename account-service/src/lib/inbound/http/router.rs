use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::method_not_allowed;
use super::handlers::route_not_found;
use super::middleware::authorize;
use super::middleware::RoleGuard;
use crate::domain::account::models::Role;
use crate::domain::account::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub token_service: Arc<TokenService>,
}

/// Build the HTTP application.
///
/// Routes live under `api_prefix`:
/// - `GET  /health`
/// - `POST /auth/register` (validated)
/// - `POST /auth/login` (validated)
/// - `GET  /users` (bearer token, role `USER`)
pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    token_service: Arc<TokenService>,
    api_prefix: &str,
) -> Router {
    let state = AppState {
        account_service,
        token_service,
    };

    let public_routes = Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route("/auth/register", post(register).fallback(method_not_allowed))
        .route("/auth/login", post(login).fallback(method_not_allowed));

    let user_routes = Router::new()
        .route("/users", get(list_users).fallback(method_not_allowed))
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(Arc::clone(&state.token_service)).allow(Role::User),
            authorize,
        ));

    let api_routes = public_routes.merge(user_routes);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let prefix = api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api_routes)
    } else {
        Router::new().nest(prefix, api_routes)
    };

    router
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
