#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use trade_journal::domain_types::{ActionEntry, TradeSide, TradeStatus, TransactionType};
use trade_journal::stats::TradeOutcome;
use trade_journal::storage::models::{
    TradeActionInsert, TradeInsert, TradingAccountInsert, TransactionInsert,
};
use uuid::Uuid;

/// 測試用固定時間
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, day, hour, 0, 0).unwrap()
}

pub fn buy(qty: Decimal, price: Decimal, fee: Decimal) -> ActionEntry {
    ActionEntry::new(TradeSide::Buy, at(10, 9), qty, price, fee)
}

pub fn sell(qty: Decimal, price: Decimal, fee: Decimal) -> ActionEntry {
    ActionEntry::new(TradeSide::Sell, at(10, 15), qty, price, fee)
}

/// 只帶聚合所需欄位的交易
#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: TradeStatus,
    pub total_return: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Outcome {
    pub fn closed(day: u32, pnl: Decimal) -> Self {
        Self {
            status: TradeStatus::Closed,
            total_return: Some(pnl),
            created_at: at(day, 12),
        }
    }

    pub fn open(day: u32) -> Self {
        Self {
            status: TradeStatus::Open,
            total_return: None,
            created_at: at(day, 12),
        }
    }
}

impl TradeOutcome for Outcome {
    fn status(&self) -> TradeStatus {
        self.status
    }

    fn total_return(&self) -> Option<Decimal> {
        self.total_return
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub fn account_insert(user_id: &str, name: &str, is_primary: bool) -> TradingAccountInsert {
    TradingAccountInsert {
        user_id: user_id.to_string(),
        name: name.to_string(),
        is_active: true,
        is_primary,
        transactions: Vec::new(),
    }
}

pub fn deposit(amount: Decimal) -> TransactionInsert {
    TransactionInsert {
        kind: TransactionType::Deposit,
        amount,
        date: at(1, 9),
        category: None,
        description: None,
    }
}

pub fn action_insert(side: TradeSide, qty: Decimal, price: Decimal) -> TradeActionInsert {
    TradeActionInsert {
        action: side,
        date: at(10, 9),
        quantity: qty,
        price,
        fee: Decimal::ZERO,
    }
}

/// 尚未平倉的單筆買進交易
pub fn open_trade_insert(user_id: &str, account_id: Uuid, actions: Vec<TradeActionInsert>) -> TradeInsert {
    TradeInsert {
        user_id: user_id.to_string(),
        account_id,
        symbol: "ES".to_string(),
        tick_size: Decimal::new(25, 2),
        tick_value: Decimal::new(125, 1),
        avg_entry_price: Decimal::ZERO,
        avg_exit_price: None,
        total_return: None,
        total_fees: Decimal::ZERO,
        status: TradeStatus::Open,
        notes: None,
        screenshots: Vec::new(),
        actions,
    }
}
