// src/api/routes/accounts.rs
use axum::{
    routing::{get, put},
    Router,
};

use crate::api::{handlers::accounts, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(accounts::list_accounts).post(accounts::create_account))
        .route("/accounts/primary", get(accounts::primary_account))
        .route("/accounts/name-taken", get(accounts::name_taken))
        .route(
            "/accounts/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/accounts/{id}/summary", get(accounts::account_summary))
        .route(
            "/accounts/{id}/transactions",
            get(accounts::list_transactions).post(accounts::add_transaction),
        )
        .route(
            "/transactions/{id}",
            put(accounts::update_transaction).delete(accounts::delete_transaction),
        )
}
