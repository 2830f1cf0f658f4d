// src/api/routes/dashboard.rs
use axum::{routing::get, Router};

use crate::api::{handlers::dashboard, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard::dashboard))
}
