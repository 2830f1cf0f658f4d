// src/api/state.rs
use std::sync::Arc;

use sqlx::PgPool;

use crate::journal::JournalService;

/// 處理器共享狀態
#[derive(Clone)]
pub struct AppState {
    pub journal: Arc<JournalService>,
    /// 健康檢查用，未設定時不檢查資料庫
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(journal: Arc<JournalService>, db_pool: Option<PgPool>) -> Self {
        Self { journal, db_pool }
    }
}
