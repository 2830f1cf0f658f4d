//! 交易日誌輸入表單
//!
//! 表單只描述呼叫端送來的原始資料，驗證與轉換在 [`super::validator`] 進行。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain_types::{TradeSide, TransactionCategory, TransactionType};

/// 單筆成交輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionForm {
    pub action: TradeSide,
    pub date: DateTime<Utc>,
    pub qty: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub fee: Decimal,
}

/// 建立或整筆替換交易的輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeForm {
    pub account_id: Uuid,
    pub symbol: String,
    pub tick_size: Decimal,
    pub tick_value: Decimal,
    pub actions: Vec<ActionForm>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

/// 資金異動輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<TransactionCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 帳戶更新時的資金異動輸入，沒有 id 代表新增
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpsertForm {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub transaction: TransactionForm,
}

fn default_active() -> bool {
    true
}

/// 建立帳戶的輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountForm {
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub transactions: Vec<TransactionForm>,
}

/// 帳戶部分更新輸入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountUpdateForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_primary: Option<bool>,
    #[serde(default)]
    pub transactions: Option<Vec<TransactionUpsertForm>>,
}
