// src/api/routes/trades.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers::trades, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trades", post(trades::create_trade))
        .route("/trades/primary", get(trades::list_primary_trades))
        .route(
            "/trades/{id}",
            get(trades::get_trade)
                .put(trades::update_trade)
                .delete(trades::delete_trade),
        )
        .route("/accounts/{id}/trades", get(trades::list_account_trades))
}
