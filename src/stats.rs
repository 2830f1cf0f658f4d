// stats.rs - 交易績效計算核心
//
// 純函數計算層，不做任何 I/O：
// - 單筆交易統計：由買賣動作推導均價、狀態與已實現損益
// - 投資組合聚合：總損益、勝率、獲利因子、每日損益日曆
// - 帳戶摘要：出入金與已實現損益合併的帳戶餘額

pub mod account;
pub mod portfolio;
pub mod trade_stats;

pub use account::{AccountSummary, CashFlow};
pub use portfolio::{
    daily_stats, profit_factor, total_pnl, win_percentage, DailyStat, PortfolioSummary,
    TradeOutcome, PROFIT_FACTOR_CAP,
};
pub use trade_stats::{compute_trade_stats, round_cents, TradeStats};
