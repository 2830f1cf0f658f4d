use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::api::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use crate::domain_types::TickSpec;
use crate::journal::TradeForm;
use crate::stats::{compute_trade_stats, TradeStats};
use crate::storage::models::{Trade, TradeWithActions};

/// 單筆交易回應，附上由成交明細即時重算的統計
#[derive(Debug, Serialize)]
pub struct TradeDetail {
    #[serde(flatten)]
    pub trade: TradeWithActions,
    pub stats: Option<TradeStats>,
}

impl From<TradeWithActions> for TradeDetail {
    fn from(trade: TradeWithActions) -> Self {
        let stats = TickSpec::new(trade.trade.tick_size, trade.trade.tick_value)
            .ok()
            .map(|tick| compute_trade_stats(&trade.entries(), tick));
        Self { trade, stats }
    }
}

pub async fn list_account_trades(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Trade>>> {
    Ok(Json(state.journal.get_trades_for_account(&user, account_id).await?))
}

pub async fn list_primary_trades(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<Trade>>> {
    Ok(Json(state.journal.get_trades_for_primary_account(&user).await?))
}

pub async fn create_trade(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Json(form): Json<TradeForm>,
) -> ApiResult<(StatusCode, Json<TradeDetail>)> {
    let trade = state.journal.create_trade(&user, &form).await?;
    Ok((StatusCode::CREATED, Json(trade.into())))
}

pub async fn get_trade(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(trade_id): Path<Uuid>,
) -> ApiResult<Json<TradeDetail>> {
    Ok(Json(state.journal.get_trade(&user, trade_id).await?.into()))
}

pub async fn update_trade(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(trade_id): Path<Uuid>,
    Json(form): Json<TradeForm>,
) -> ApiResult<Json<TradeDetail>> {
    Ok(Json(state.journal.update_trade(&user, trade_id, &form).await?.into()))
}

pub async fn delete_trade(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(trade_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.journal.delete_trade(&user, trade_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
