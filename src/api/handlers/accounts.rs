use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use crate::journal::{AccountForm, AccountUpdateForm, TransactionForm};
use crate::stats::AccountSummary;
use crate::storage::models::{AccountTransaction, TradingAccount};

#[derive(Debug, Deserialize)]
pub struct NameTakenQuery {
    pub name: String,
    #[serde(default)]
    pub exclude: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct NameTakenResponse {
    pub taken: bool,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<TradingAccount>>> {
    Ok(Json(state.journal.get_accounts(&user).await?))
}

pub async fn create_account(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(form): Json<AccountForm>,
) -> ApiResult<(StatusCode, Json<TradingAccount>)> {
    let account = state.journal.create_account(&user, &form).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// 沒有主要帳戶時回傳 `null`
pub async fn primary_account(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Option<TradingAccount>>> {
    Ok(Json(state.journal.get_primary_account(&user).await?))
}

pub async fn name_taken(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<NameTakenQuery>,
) -> ApiResult<Json<NameTakenResponse>> {
    let taken = state
        .journal
        .is_account_name_taken(&user, &query.name, query.exclude)
        .await?;
    Ok(Json(NameTakenResponse { taken }))
}

pub async fn get_account(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<TradingAccount>> {
    Ok(Json(state.journal.get_account(&user, account_id).await?))
}

pub async fn update_account(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
    Json(form): Json<AccountUpdateForm>,
) -> ApiResult<Json<TradingAccount>> {
    Ok(Json(state.journal.update_account(&user, account_id, &form).await?))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.journal.delete_account(&user, account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn account_summary(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<AccountSummary>> {
    Ok(Json(state.journal.account_summary(&user, account_id).await?))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<Vec<AccountTransaction>>> {
    Ok(Json(state.journal.get_account_transactions(&user, account_id).await?))
}

pub async fn add_transaction(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
    Json(form): Json<TransactionForm>,
) -> ApiResult<(StatusCode, Json<AccountTransaction>)> {
    let transaction = state.journal.add_transaction(&user, account_id, &form).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(transaction_id): Path<Uuid>,
    Json(form): Json<TransactionForm>,
) -> ApiResult<Json<AccountTransaction>> {
    Ok(Json(
        state.journal.update_transaction(&user, transaction_id, &form).await?,
    ))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.journal.delete_transaction(&user, transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
