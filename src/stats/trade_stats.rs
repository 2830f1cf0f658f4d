//! 單筆交易統計
//!
//! 由一筆交易的全部買賣動作、最小跳動單位與每跳價值，推導出：
//! 平均進場價、平均出場價、開倉/平倉狀態，以及扣除手續費後的已實現損益。
//! 只使用各側的加總值，因此動作的順序不影響結果。

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain_types::{ActionEntry, TickSpec, TradeSide, TradeStatus};

/// 單筆交易的統計結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeStats {
    /// 加權平均買入價（四捨五入至分），沒有買入時為 0
    pub avg_entry_price: Decimal,
    /// 加權平均賣出價，僅在平倉時存在
    pub avg_exit_price: Option<Decimal>,
    /// 扣除手續費後的已實現損益，僅在平倉時存在
    pub total_return: Option<Decimal>,
    pub status: TradeStatus,
    pub total_buy_qty: Decimal,
    pub total_sell_qty: Decimal,
    pub total_fees: Decimal,
    /// 買入數量減賣出數量
    pub net_qty: Decimal,
}

impl TradeStats {
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// 是否持有淨多頭部位
    pub fn is_long(&self) -> bool {
        self.net_qty > Decimal::ZERO
    }
}

#[derive(Debug)]
struct SideTotals {
    qty: Decimal,
    /// 成交金額總和，溢位後為 `None`
    value: Option<Decimal>,
}

impl Default for SideTotals {
    fn default() -> Self {
        Self {
            qty: Decimal::ZERO,
            value: Some(Decimal::ZERO),
        }
    }
}

impl SideTotals {
    fn add(&mut self, action: &ActionEntry) {
        self.qty = self.qty.saturating_add(action.qty);
        self.value = self
            .value
            .zip(action.notional())
            .and_then(|(total, notional)| total.checked_add(notional));
    }

    fn average(&self) -> Option<Decimal> {
        if self.qty.is_zero() {
            Some(Decimal::ZERO)
        } else {
            self.value?.checked_div(self.qty)
        }
    }
}

/// 四捨五入至分
///
/// 半分一律往正無限大方向進位（-2.345 → -2.34，2.345 → 2.35），
/// 結果固定保留兩位小數。
pub fn round_cents(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    let mut rounded = value.round_dp_with_strategy(2, strategy);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);
    rounded
}

/// 平倉時的平均出場價與已實現損益，任一步驟溢位時為 `None`
fn realized(
    buys: &SideTotals,
    sells: &SideTotals,
    tick: TickSpec,
    total_fees: Decimal,
) -> Option<(Decimal, Decimal)> {
    let avg_entry_price = buys.average()?;
    let avg_exit_price = sells.average()?;
    let per_unit = tick.price_move_value(avg_exit_price.checked_sub(avg_entry_price)?)?;
    let total_return = per_unit.checked_mul(buys.qty)?.checked_sub(total_fees)?;
    Some((round_cents(avg_exit_price), round_cents(total_return)))
}

/// 計算單筆交易統計
///
/// 對任何輸入皆不會 panic：金額超出 `Decimal` 可表示範圍時，平均進場價
/// 飽和為 `Decimal::MAX`，損益無法計算的交易視為未平倉。
pub fn compute_trade_stats(actions: &[ActionEntry], tick: TickSpec) -> TradeStats {
    let mut buys = SideTotals::default();
    let mut sells = SideTotals::default();
    let mut total_fees = Decimal::ZERO;

    for action in actions {
        total_fees = total_fees.saturating_add(action.fee);
        match action.side {
            TradeSide::Buy => buys.add(action),
            TradeSide::Sell => sells.add(action),
        }
    }

    let net_qty = buys.qty.saturating_sub(sells.qty);
    let flat = net_qty.is_zero() && buys.qty > Decimal::ZERO && sells.qty > Decimal::ZERO;

    let closed = flat
        .then(|| realized(&buys, &sells, tick, total_fees))
        .flatten();

    let (status, avg_exit_price, total_return) = match closed {
        Some((avg_exit_price, total_return)) => {
            (TradeStatus::Closed, Some(avg_exit_price), Some(total_return))
        }
        None => (TradeStatus::Open, None, None),
    };

    TradeStats {
        avg_entry_price: buys.average().map_or(Decimal::MAX, round_cents),
        avg_exit_price,
        total_return,
        status,
        total_buy_qty: buys.qty,
        total_sell_qty: sells.qty,
        total_fees,
        net_qty,
    }
}
