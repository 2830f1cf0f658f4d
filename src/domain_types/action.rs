//! 成交動作與最小跳動規格

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::TradeSide;

/// 最小跳動規格錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickSpecError {
    #[error("tick_size 必須大於 0，實際為 {0}")]
    NonPositiveSize(Decimal),

    #[error("tick_value 必須大於 0，實際為 {0}")]
    NonPositiveValue(Decimal),
}

/// 商品的最小跳動單位及其每單位價值
///
/// 只能透過 [`TickSpec::new`] 建立，兩個欄位皆保證為正數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSpec {
    tick_size: Decimal,
    tick_value: Decimal,
}

impl TickSpec {
    pub fn new(tick_size: Decimal, tick_value: Decimal) -> Result<Self, TickSpecError> {
        if tick_size <= Decimal::ZERO {
            return Err(TickSpecError::NonPositiveSize(tick_size));
        }
        if tick_value <= Decimal::ZERO {
            return Err(TickSpecError::NonPositiveValue(tick_value));
        }
        Ok(Self {
            tick_size,
            tick_value,
        })
    }

    pub fn tick_size(&self) -> Decimal {
        self.tick_size
    }

    pub fn tick_value(&self) -> Decimal {
        self.tick_value
    }

    /// 將價差換算為每單位數量的金額，超出 `Decimal` 範圍時為 `None`
    pub fn price_move_value(&self, price_difference: Decimal) -> Option<Decimal> {
        price_difference
            .checked_div(self.tick_size)?
            .checked_mul(self.tick_value)
    }
}

/// 單筆買賣成交
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(rename = "action")]
    pub side: TradeSide,
    pub date: DateTime<Utc>,
    pub qty: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
}

impl ActionEntry {
    pub fn new(side: TradeSide, date: DateTime<Utc>, qty: Decimal, price: Decimal, fee: Decimal) -> Self {
        Self {
            side,
            date,
            qty,
            price,
            fee,
        }
    }

    /// 成交金額（數量 × 價格），溢位時為 `None`
    pub fn notional(&self) -> Option<Decimal> {
        self.qty.checked_mul(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tick_spec_rejects_non_positive() {
        assert_matches!(
            TickSpec::new(dec!(0), dec!(1)),
            Err(TickSpecError::NonPositiveSize(_))
        );
        assert_matches!(
            TickSpec::new(dec!(0.25), dec!(-5)),
            Err(TickSpecError::NonPositiveValue(_))
        );
    }

    #[test]
    fn test_price_move_value() {
        // ES 期貨：0.25 點一跳，每跳 12.5 美元
        let tick = TickSpec::new(dec!(0.25), dec!(12.5)).unwrap();
        assert_eq!(tick.price_move_value(dec!(2)), Some(dec!(100)));
    }

    #[test]
    fn test_action_entry_deserializes_action_field() {
        let json = r#"{"action":"sell","date":"2025-08-10T14:30:00Z","qty":"3","price":"101.5","fee":"0.65"}"#;
        let entry: ActionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.side, TradeSide::Sell);
        assert_eq!(entry.notional(), Some(dec!(304.5)));
    }

    #[test]
    fn test_price_move_value_overflow() {
        let tiny = TickSpec::new(Decimal::new(1, 22), dec!(1)).unwrap();
        assert_eq!(tiny.price_move_value(dec!(100000000000)), None);

        let entry = ActionEntry::new(
            TradeSide::Buy,
            chrono::Utc::now(),
            Decimal::MAX,
            dec!(2),
            Decimal::ZERO,
        );
        assert_eq!(entry.notional(), None);
    }
}
