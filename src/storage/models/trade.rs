use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain_types::{ActionEntry, TradeSide, TradeStatus};
use crate::stats::TradeOutcome;

/// 交易模型，衍生欄位（均價、報酬、狀態）由成交明細計算後落地
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Trade {
    pub trade_id: Uuid,
    pub user_id: String,
    pub account_id: Uuid,
    pub symbol: String,
    pub tick_size: Decimal,
    pub tick_value: Decimal,
    pub avg_entry_price: Decimal,
    pub avg_exit_price: Option<Decimal>,
    pub total_return: Option<Decimal>,
    pub total_fees: Decimal,
    pub status: TradeStatus,
    pub notes: Option<String>,
    pub screenshots: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TradeOutcome for Trade {
    fn status(&self) -> TradeStatus {
        self.status
    }

    fn total_return(&self) -> Option<Decimal> {
        self.total_return
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn fees(&self) -> Decimal {
        self.total_fees
    }
}

/// 成交明細模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TradeAction {
    pub trade_id: Uuid,
    pub sequence: i32,
    pub action: TradeSide,
    pub date: DateTime<Utc>,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
}

impl From<&TradeAction> for ActionEntry {
    fn from(action: &TradeAction) -> Self {
        ActionEntry::new(action.action, action.date, action.quantity, action.price, action.fee)
    }
}

/// 成交明細插入模型，序號於寫入時依順序指派為 1..N
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeActionInsert {
    pub action: TradeSide,
    pub date: DateTime<Utc>,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
}

/// 交易插入模型（建立與整筆替換共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeInsert {
    pub user_id: String,
    pub account_id: Uuid,
    pub symbol: String,
    pub tick_size: Decimal,
    pub tick_value: Decimal,
    pub avg_entry_price: Decimal,
    pub avg_exit_price: Option<Decimal>,
    pub total_return: Option<Decimal>,
    pub total_fees: Decimal,
    pub status: TradeStatus,
    pub notes: Option<String>,
    pub screenshots: Vec<String>,
    pub actions: Vec<TradeActionInsert>,
}

/// 交易連同依序排列的成交明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeWithActions {
    #[serde(flatten)]
    pub trade: Trade,
    pub actions: Vec<TradeAction>,
}

impl TradeWithActions {
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.actions.iter().map(ActionEntry::from).collect()
    }
}
