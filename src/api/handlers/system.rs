use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::storage::database;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 未配置連接池時為 `None`
    database: Option<bool>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db_pool {
        Some(pool) => Some(database::health_check(pool).await),
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
