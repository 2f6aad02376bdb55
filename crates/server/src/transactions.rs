//! Transactions API endpoints

use api_types::{
    PeriodQuery,
    fixed::{FixedImport, FixedImported},
    transaction::{
        StatusToggled, TransactionCreated, TransactionListQuery, TransactionListResponse,
        TransactionNew, TransactionUpdate,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EditTransactionCmd, NewTransactionCmd, TransactionFilter, TransactionStatus};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
    views::{engine_kind, entry_view, selected_period},
};

pub async fn list(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let period = selected_period(PeriodQuery {
        year: query.year,
        month: query.month,
    })?;

    let mut filter = TransactionFilter::for_owner(owner);
    if let Some(period) = period {
        filter = filter.period(period)?;
    }
    if let Some(kind) = query.kind {
        filter = filter.kind(engine_kind(kind));
    }
    if let Some(status) = query.status.as_deref() {
        filter = filter.status(TransactionStatus::try_from(status)?);
    }
    if let Some(account_id) = query.account_id {
        filter = filter.account(account_id);
    }
    match query.limit {
        Some(0) => {
            return Err(ServerError::Generic(
                "limit must be greater than 0".to_string(),
            ));
        }
        Some(limit) => filter = filter.limit(limit),
        None => {}
    }

    let entries = state.engine.list_transactions(&filter).await?;
    Ok(Json(TransactionListResponse {
        period: period.map(|period| period.to_string()),
        transactions: entries.into_iter().map(entry_view).collect(),
    }))
}

pub async fn create(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let cmd = NewTransactionCmd::new(
        owner,
        payload.account_id,
        payload.category_id,
        payload.amount,
        payload.date,
    )
    .description(payload.description.unwrap_or_default())
    .status(TransactionStatus::from_form(payload.status.as_deref()))
    .installments(payload.installments.unwrap_or(1))
    .fixed(payload.is_fixed.unwrap_or(false));

    let ids = state.engine.split_and_create(&cmd).await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { ids })))
}

pub async fn update(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    let cmd = EditTransactionCmd::new(
        owner,
        payload.account_id,
        payload.category_id,
        payload.amount,
        payload.date,
    )
    .description(payload.description.unwrap_or_default())
    .status(TransactionStatus::from_form(payload.status.as_deref()));

    state.engine.update_transaction(id, &cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&owner, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusToggled>, ServerError> {
    let status = state.engine.toggle_status(&owner, id).await?;
    Ok(Json(StatusToggled {
        status: status.as_str().to_string(),
    }))
}

pub async fn import_fixed(
    Extension(AuthUser(owner)): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<FixedImport>,
) -> Result<Json<FixedImported>, ServerError> {
    let created = state
        .engine
        .import_fixed(&owner, engine_kind(payload.kind), payload.year, payload.month)
        .await?;
    Ok(Json(FixedImported { created }))
}
