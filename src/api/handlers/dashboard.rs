use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{auth::AuthenticatedUser, error::ApiResult, state::AppState};
use crate::journal::Dashboard;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// 未指定時使用主要帳戶
    #[serde(default)]
    pub account_id: Option<Uuid>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.journal.dashboard(&user, query.account_id).await?))
}
