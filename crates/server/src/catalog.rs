//! Categories and accounts endpoints

use api_types::{
    account::AccountsResponse,
    category::{CategoriesResponse, CategoryNew, CategoryQuery, CategoryView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
    views::{balance_view, category_view, engine_kind},
};

const RECENT_WINDOW_DAYS: u64 = 60;
const RECENT_LIMIT: usize = 6;

pub async fn categories(
    Extension(_): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state
        .engine
        .categories(query.kind.map(engine_kind))
        .await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(category_view).collect(),
    }))
}

pub async fn category_new(
    Extension(_): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let category = state
        .engine
        .add_category(&payload.name, engine_kind(payload.kind))
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}

pub async fn recent_categories(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let today = Utc::now().date_naive();
    let categories = state
        .engine
        .recent_categories(&owner, today, RECENT_WINDOW_DAYS, RECENT_LIMIT)
        .await?;
    Ok(Json(CategoriesResponse {
        categories: categories.into_iter().map(category_view).collect(),
    }))
}

/// Accounts of the caller with their current balance.
pub async fn accounts(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let balances = state.engine.account_balances(&owner).await?;
    Ok(Json(AccountsResponse {
        accounts: balances.into_iter().map(balance_view).collect(),
    }))
}
