//! 帳戶摘要
//!
//! 帳戶餘額 = 入金 − 出金 + 已實現損益。所有數值皆由當下的交易與資金異動
//! 即時推導，不落地儲存。

use rust_decimal::Decimal;
use serde::Serialize;

use super::portfolio::{profit_factor, total_pnl, win_percentage, TradeOutcome};
use crate::domain_types::{TradeStatus, TransactionType};

/// 帳戶資金異動
pub trait CashFlow {
    fn kind(&self) -> TransactionType;
    fn amount(&self) -> Decimal;
}

/// 單一帳戶的統計摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub total_pnl: Decimal,
    pub total_trades: usize,
    pub open_trades: usize,
    pub closed_trades: usize,
    pub win_rate: Decimal,
    pub profit_factor: Decimal,
    pub total_fees: Decimal,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    /// 入金減出金
    pub net_deposits: Decimal,
    /// 淨入金加上已實現損益
    pub current_balance: Decimal,
}

impl AccountSummary {
    pub fn compute<T, C>(trades: &[T], transactions: &[C]) -> Self
    where
        T: TradeOutcome,
        C: CashFlow,
    {
        let sum_of = |kind: TransactionType| -> Decimal {
            transactions
                .iter()
                .filter(|t| t.kind() == kind)
                .map(CashFlow::amount)
                .sum()
        };

        let total_deposits = sum_of(TransactionType::Deposit);
        let total_withdrawals = sum_of(TransactionType::Withdrawal);
        let net_deposits = total_deposits - total_withdrawals;
        let pnl = total_pnl(trades);

        let closed_trades = trades
            .iter()
            .filter(|t| t.status() == TradeStatus::Closed)
            .count();

        Self {
            total_pnl: pnl,
            total_trades: trades.len(),
            open_trades: trades.len() - closed_trades,
            closed_trades,
            win_rate: win_percentage(trades),
            profit_factor: profit_factor(trades),
            total_fees: trades.iter().map(TradeOutcome::fees).sum(),
            total_deposits,
            total_withdrawals,
            net_deposits,
            current_balance: net_deposits + pnl,
        }
    }
}
