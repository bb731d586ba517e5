use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::AccountPage;
use crate::domain::account::models::PageRequest;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    query: Option<Query<ListUsersQuery>>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    let request = query
        .map(|Query(q)| PageRequest::parse(q.limit.as_deref(), q.page.as_deref()))
        .unwrap_or_default();

    tracing::debug!(
        account_id = %caller.id,
        limit = request.limit(),
        page = request.page(),
        "Listing users"
    );

    state
        .account_service
        .list_accounts(request)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch users", e))
        .map(|ref page| {
            ApiSuccess::new(
                StatusCode::OK,
                "Users fetched successfully",
                page.into(),
            )
        })
}

/// Raw query values; coercion and defaults happen in [`PageRequest::parse`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    limit: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponseData {
    pub users: Vec<AccountData>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

impl From<&AccountPage> for ListUsersResponseData {
    fn from(page: &AccountPage) -> Self {
        Self {
            users: page.accounts.iter().map(AccountData::from).collect(),
            total_count: page.total_count,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}
