use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain_types::{TransactionCategory, TransactionType};
use crate::stats::CashFlow;

/// 帳戶資金異動模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountTransaction {
    pub transaction_id: Uuid,
    pub account_id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category: Option<TransactionCategory>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CashFlow for AccountTransaction {
    fn kind(&self) -> TransactionType {
        self.kind
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// 資金異動插入模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInsert {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category: Option<TransactionCategory>,
    pub description: Option<String>,
}

/// 帳戶更新時的資金異動，`transaction_id` 為空表示新增
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpsert {
    pub transaction_id: Option<Uuid>,
    #[serde(flatten)]
    pub data: TransactionInsert,
}
