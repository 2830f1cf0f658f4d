//! 投資組合聚合
//!
//! 對一組已帶有狀態與已實現損益的交易做四個彼此獨立的歸約：
//! 總損益、勝率、獲利因子、每日損益。所有函數對任意輸入（含空集合）
//! 皆有定義，且結果與輸入順序無關。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain_types::TradeStatus;
use crate::utils::time_utils::date_key;

/// 沒有虧損但有獲利時回傳的獲利因子上限
pub const PROFIT_FACTOR_CAP: Decimal = dec!(999);

/// 聚合計算所需的交易欄位
pub trait TradeOutcome {
    fn status(&self) -> TradeStatus;
    fn total_return(&self) -> Option<Decimal>;
    fn created_at(&self) -> DateTime<Utc>;

    /// 交易累計手續費，只用於帳戶摘要
    fn fees(&self) -> Decimal {
        Decimal::ZERO
    }
}

/// 單日已實現損益與平倉筆數
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub pnl: Decimal,
    pub trades: u32,
}

fn closed<T: TradeOutcome>(trades: &[T]) -> impl Iterator<Item = &T> {
    trades.iter().filter(|trade| trade.status().is_closed())
}

fn realized<T: TradeOutcome>(trade: &T) -> Decimal {
    trade.total_return().unwrap_or(Decimal::ZERO)
}

/// 所有平倉交易的已實現損益總和
pub fn total_pnl<T: TradeOutcome>(trades: &[T]) -> Decimal {
    closed(trades).map(realized).sum()
}

/// 平倉交易中獲利筆數的百分比（0-100）
pub fn win_percentage<T: TradeOutcome>(trades: &[T]) -> Decimal {
    let (wins, total) = closed(trades).fold((0u32, 0u32), |(wins, total), trade| {
        let won = realized(trade) > Decimal::ZERO;
        (wins + u32::from(won), total + 1)
    });

    if total == 0 {
        return Decimal::ZERO;
    }

    Decimal::from(wins) / Decimal::from(total) * dec!(100)
}

/// 總獲利 / |總虧損|
///
/// 沒有虧損時：有獲利回傳 [`PROFIT_FACTOR_CAP`]，否則回傳 0。
pub fn profit_factor<T: TradeOutcome>(trades: &[T]) -> Decimal {
    let (profits, losses) = closed(trades).map(realized).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(profits, losses), pnl| {
            if pnl > Decimal::ZERO {
                (profits + pnl, losses)
            } else if pnl < Decimal::ZERO {
                (profits, losses + pnl)
            } else {
                (profits, losses)
            }
        },
    );

    let losses = losses.abs();
    if losses.is_zero() {
        return if profits > Decimal::ZERO {
            PROFIT_FACTOR_CAP
        } else {
            Decimal::ZERO
        };
    }

    profits / losses
}

/// 以交易建立日期（UTC，`YYYY-MM-DD`）分桶的每日損益
///
/// 日期取自交易紀錄的建立時間而非最後一筆賣出的時間。
/// 沒有已實現損益的平倉交易不列入；沒有平倉交易的日期不會出現在結果中。
pub fn daily_stats<T: TradeOutcome>(trades: &[T]) -> BTreeMap<String, DailyStat> {
    let mut buckets: BTreeMap<String, DailyStat> = BTreeMap::new();

    for trade in closed(trades) {
        let Some(pnl) = trade.total_return() else {
            continue;
        };
        let bucket = buckets.entry(date_key(&trade.created_at())).or_default();
        bucket.pnl += pnl;
        bucket.trades += 1;
    }

    buckets
}

/// 儀表板所需的全部聚合值
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total_pnl: Decimal,
    pub win_percentage: Decimal,
    pub profit_factor: Decimal,
    pub daily_stats: BTreeMap<String, DailyStat>,
}

impl PortfolioSummary {
    pub fn from_trades<T: TradeOutcome>(trades: &[T]) -> Self {
        Self {
            total_pnl: total_pnl(trades),
            win_percentage: win_percentage(trades),
            profit_factor: profit_factor(trades),
            daily_stats: daily_stats(trades),
        }
    }
}
