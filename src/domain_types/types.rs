//! 交易日誌基本枚舉類型
//!
//! 所有枚舉序列化為小寫字串，並對應 PostgreSQL 中同名的 enum 類型。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 無法解析的枚舉字串
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("無效的 {kind} 值: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// 成交方向（買/賣）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "trade_side", rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            _ => Err(ParseEnumError {
                kind: "trade_side",
                value: s.to_string(),
            }),
        }
    }
}

/// 交易狀態
///
/// 淨部位為零且買賣兩側皆有成交時為 `Closed`，其餘皆為 `Open`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "trade_status", rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Closed => "closed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TradeStatus::Closed)
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TradeStatus::Open),
            "closed" => Ok(TradeStatus::Closed),
            _ => Err(ParseEnumError {
                kind: "trade_status",
                value: s.to_string(),
            }),
        }
    }
}

/// 帳戶資金異動類型（入金/出金）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "deposit"),
            TransactionType::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// 資金異動分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_category", rename_all = "lowercase")]
pub enum TransactionCategory {
    Contribution, // 定期投入
    Distribution, // 提領
    Rollover,     // 轉存
    Other,
}
