use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::{TransactionInsert, TransactionUpsert};

/// 交易帳戶模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TradingAccount {
    pub account_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub is_active: bool,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 交易帳戶插入模型，連同初始資金異動一併寫入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingAccountInsert {
    pub user_id: String,
    pub name: String,
    pub is_active: bool,
    pub is_primary: bool,
    pub transactions: Vec<TransactionInsert>,
}

/// 交易帳戶部分更新模型
///
/// `transactions` 為 `Some` 時視為完整清單：帶 id 的更新、不帶 id 的新增、
/// 清單外的既有紀錄刪除。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingAccountUpdate {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_primary: Option<bool>,
    pub transactions: Option<Vec<TransactionUpsert>>,
}

impl TradingAccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.is_active.is_none()
            && self.is_primary.is_none()
            && self.transactions.is_none()
    }
}
