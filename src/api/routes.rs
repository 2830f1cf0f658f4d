use axum::Router;

use super::state::AppState;

pub mod accounts;
pub mod dashboard;
pub mod system;
pub mod trades;

/// 需要簽名驗證的路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(trades::routes())
        .merge(dashboard::routes())
}
